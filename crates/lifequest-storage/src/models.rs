// SPDX-FileCopyrightText: 2026 Lifequest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed row models for the Lifequest schema.
//!
//! Timestamps are ISO-8601 UTC strings; calendar days are `chrono::NaiveDate`
//! (stored as `YYYY-MM-DD` TEXT). Closed enums from `lifequest-core` are
//! stored in their lowercase string form and parsed on read.

use chrono::NaiveDate;
use lifequest_core::types::{BossStatus, MissionStatus, SkillCategory};
use lifequest_core::{Difficulty, Streak};
use serde::{Deserialize, Serialize};

/// Parse an enum (or date) column, mapping parse failures to a rusqlite
/// conversion error so they surface through the normal query error path.
pub(crate) fn parse_col<T>(idx: usize, raw: &str) -> Result<T, rusqlite::Error>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.parse::<T>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// A user account with its XP aggregate. Level and title are derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRow {
    pub id: String,
    pub name: String,
    pub total_xp: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Per-(user, category) XP balance, created lazily on first award.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillRow {
    pub user_id: String,
    pub category: SkillCategory,
    pub xp: i64,
}

/// A repeatable daily habit with its streak state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestRow {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub skill_category: SkillCategory,
    pub xp_reward: i64,
    pub streak: Streak,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Immutable record of one quest completion. Append-only; one per quest per
/// calendar day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestCompletionRow {
    pub id: String,
    pub quest_id: String,
    pub user_id: String,
    pub day: NaiveDate,
    pub completed_at: String,
    pub xp_earned: i64,
}

/// A one-time goal. `xp_reward` is frozen at creation from the difficulty
/// table and never recomputed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionRow {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub skill_category: SkillCategory,
    pub difficulty: Difficulty,
    pub xp_reward: i64,
    pub deadline: Option<String>,
    pub status: MissionStatus,
    pub completed_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// One ordered subtask of a mission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubtaskRow {
    pub idx: i64,
    pub title: String,
    pub completed: bool,
}

/// A fixed-duration daily challenge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossRow {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub skill_category: SkillCategory,
    pub duration_days: i64,
    pub daily_task: String,
    pub xp_reward: i64,
    pub start_date: NaiveDate,
    pub status: BossStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// One completed day of a boss challenge, with the XP it paid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossProgressRow {
    pub boss_id: String,
    pub user_id: String,
    pub day: NaiveDate,
    pub completed: bool,
    pub completed_at: String,
    pub xp_earned: i64,
}
