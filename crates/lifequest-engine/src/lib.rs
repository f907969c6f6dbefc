// SPDX-FileCopyrightText: 2026 Lifequest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion orchestrator for the Lifequest habit engine.
//!
//! The [`Engine`] is the single authority that turns a "complete X" request
//! into consistent, at-most-once-per-period state changes across the entity,
//! its owning user, and the relevant skill aggregate. It owns no clock of its
//! own -- "now" comes from an injected [`Clock`] so tests drive time
//! deterministically -- and no storage of its own: every operation goes
//! through the [`lifequest_storage::Database`] collaborator.

pub mod clock;
pub mod engine;
pub mod outcome;

pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::{Engine, NewBoss, NewMission, NewQuest};
pub use outcome::{
    BossDayOutcome, BossView, CompletionOutcome, DashboardStats, LeaderboardEntry, MissionView,
    Profile, QuestView, SkillView, SubtaskView, XpAudit,
};
