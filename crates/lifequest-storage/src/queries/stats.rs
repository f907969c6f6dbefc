// SPDX-FileCopyrightText: 2026 Lifequest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Aggregated reads for the dashboard and the XP audit.
//!
//! Every XP award is backed by exactly one durable record (a quest
//! completion, a boss progress row, or a completed mission's frozen reward),
//! so summing those records reconstructs a user's total exactly.

use chrono::NaiveDate;
use lifequest_core::LifequestError;
use rusqlite::params;

use crate::database::Database;

/// Number of the user's active quests.
pub async fn active_quest_count(db: &Database, user_id: &str) -> Result<i64, LifequestError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT count(*) FROM quests WHERE user_id = ?1 AND is_active = 1",
                params![user_id],
                |row| row.get(0),
            )
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// The user's best streak across all quests (0 when they have none).
pub async fn best_streak(db: &Database, user_id: &str) -> Result<i64, LifequestError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT coalesce(max(streak_best), 0) FROM quests WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Quest XP earned on or after `from_day`.
pub async fn quest_xp_since(
    db: &Database,
    user_id: &str,
    from_day: NaiveDate,
) -> Result<i64, LifequestError> {
    let user_id = user_id.to_string();
    let from_day = from_day.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT coalesce(sum(xp_earned), 0) FROM quest_completions
                 WHERE user_id = ?1 AND day >= ?2",
                params![user_id, from_day],
                |row| row.get(0),
            )
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Sum of all quest completion XP ever recorded for the user.
pub async fn quest_xp_total(db: &Database, user_id: &str) -> Result<i64, LifequestError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT coalesce(sum(xp_earned), 0) FROM quest_completions WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Sum of all boss progress XP ever recorded for the user.
pub async fn boss_xp_total(db: &Database, user_id: &str) -> Result<i64, LifequestError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT coalesce(sum(xp_earned), 0) FROM boss_progress WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Sum of frozen rewards of the user's completed missions.
pub async fn mission_xp_total(db: &Database, user_id: &str) -> Result<i64, LifequestError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT coalesce(sum(xp_reward), 0) FROM missions
                 WHERE user_id = ?1 AND status = 'completed'",
                params![user_id],
                |row| row.get(0),
            )
        })
        .await
        .map_err(crate::database::map_tr_err)
}
