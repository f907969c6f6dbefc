// SPDX-FileCopyrightText: 2026 Lifequest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Result and view types returned by engine operations.

use chrono::NaiveDate;
use lifequest_core::progression::{LevelProgress, Title};
use lifequest_core::types::{BossStatus, MissionStatus, SkillCategory};
use lifequest_core::{Difficulty, Streak};
use serde::{Deserialize, Serialize};

/// What a successful completion earned the user.
///
/// `new_title` is set only when the award crossed a level boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionOutcome {
    pub xp_earned: u64,
    pub leveled_up: bool,
    pub new_level: u32,
    pub new_title: Option<Title>,
}

/// A boss daily hit: the XP outcome plus challenge progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossDayOutcome {
    #[serde(flatten)]
    pub completion: CompletionOutcome,
    pub days_completed: u32,
    pub defeated: bool,
}

/// A user with their derived progression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub total_xp: u64,
    pub title: Title,
    #[serde(flatten)]
    pub progress: LevelProgress,
}

/// One skill category balance, zero-filled when no award has touched it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillView {
    pub category: SkillCategory,
    pub xp: u64,
    pub level: u32,
}

/// A quest as shown in lists, with today's completion state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub skill_category: SkillCategory,
    pub xp_reward: u64,
    pub streak: Streak,
    pub completed_today: bool,
}

/// One subtask with its position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubtaskView {
    pub index: u32,
    pub title: String,
    pub completed: bool,
}

/// A mission with its subtask progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub skill_category: SkillCategory,
    pub difficulty: Difficulty,
    pub xp_reward: u64,
    pub deadline: Option<String>,
    pub status: MissionStatus,
    pub subtasks: Vec<SubtaskView>,
    /// Fraction of subtasks done, 0 when there are none. UI-only; never
    /// affects the reward.
    pub progress: f64,
}

/// A boss with its duration progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub skill_category: SkillCategory,
    pub daily_task: String,
    pub duration_days: u32,
    pub xp_reward: u64,
    pub start_date: NaiveDate,
    pub status: BossStatus,
    pub days_completed: u32,
    pub completed_today: bool,
    pub progress: f64,
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub active_quests: u64,
    pub missions_done: u64,
    pub active_bosses: u64,
    pub best_streak: u32,
    pub today_xp: u64,
    pub week_xp: u64,
}

/// One leaderboard row. Rank is 1-based in descending XP order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub name: String,
    pub total_xp: u64,
    pub level: u32,
    pub title: Title,
}

/// Reconciliation of a user's XP aggregate against its durable records.
///
/// `consistent` holds exactly when the three record sums add up to
/// `total_xp`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XpAudit {
    pub quest_xp: u64,
    pub mission_xp: u64,
    pub boss_xp: u64,
    pub total_xp: u64,
    pub consistent: bool,
}
