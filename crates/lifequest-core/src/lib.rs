// SPDX-FileCopyrightText: 2026 Lifequest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Lifequest habit engine.
//!
//! This crate holds the pure domain logic: the error taxonomy shared across
//! the workspace, identifier and enum types, and the three calculators that
//! drive progression -- level derivation from cumulative XP, XP reward
//! policy, and quest streak transitions. Nothing here performs I/O or reads
//! a clock; callers supply "today" explicitly.

pub mod error;
pub mod progression;
pub mod reward;
pub mod streak;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::LifequestError;
pub use progression::{level_for_xp, progress_within_level, title_for_level, LevelProgress, Title};
pub use reward::{streak_multiplier, Difficulty, BOSS_DAILY_XP, DEFAULT_BOSS_REWARD};
pub use streak::Streak;
pub use types::{BossId, BossStatus, MissionId, MissionStatus, QuestId, SkillCategory, UserId};
