// SPDX-FileCopyrightText: 2026 Lifequest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Quest CRUD, completion history, and the transactional completion write.

use lifequest_core::{LifequestError, Streak};
use lifequest_core::types::SkillCategory;
use rusqlite::{params, OptionalExtension};
use tracing::debug;

use crate::database::Database;
use crate::models::{parse_col, QuestCompletionRow, QuestRow};
use crate::queries::CompletionApplied;

fn row_to_quest(row: &rusqlite::Row<'_>) -> Result<QuestRow, rusqlite::Error> {
    let category: String = row.get(4)?;
    let last_day: Option<String> = row.get(8)?;
    let last_completed = match last_day {
        Some(ref d) => Some(parse_col(8, d)?),
        None => None,
    };
    Ok(QuestRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        skill_category: parse_col(4, &category)?,
        xp_reward: row.get(5)?,
        streak: Streak {
            current: row.get(6)?,
            best: row.get(7)?,
            last_completed,
        },
        is_active: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

const QUEST_COLUMNS: &str = "id, user_id, title, description, skill_category, xp_reward, \
     streak_current, streak_best, last_completed_day, is_active, created_at, updated_at";

/// Create a new quest.
pub async fn insert_quest(db: &Database, quest: &QuestRow) -> Result<(), LifequestError> {
    let q = quest.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO quests (id, user_id, title, description, skill_category, xp_reward,
                 streak_current, streak_best, last_completed_day, is_active, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params![
                    q.id,
                    q.user_id,
                    q.title,
                    q.description,
                    q.skill_category.to_string(),
                    q.xp_reward,
                    q.streak.current,
                    q.streak.best,
                    q.streak.last_completed.map(|d| d.to_string()),
                    q.is_active,
                    q.created_at,
                    q.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a quest by ID, scoped to its owner. Returns `None` for both "absent"
/// and "owned by someone else".
pub async fn get_quest(
    db: &Database,
    quest_id: &str,
    user_id: &str,
) -> Result<Option<QuestRow>, LifequestError> {
    let quest_id = quest_id.to_string();
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {QUEST_COLUMNS} FROM quests WHERE id = ?1 AND user_id = ?2"
            ))?;
            let result = stmt.query_row(params![quest_id, user_id], row_to_quest);
            match result {
                Ok(quest) => Ok(Some(quest)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// All active quests for a user, newest first.
pub async fn list_active(db: &Database, user_id: &str) -> Result<Vec<QuestRow>, LifequestError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {QUEST_COLUMNS} FROM quests
                 WHERE user_id = ?1 AND is_active = 1 ORDER BY created_at DESC"
            ))?;
            let quests = stmt
                .query_map(params![user_id], row_to_quest)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(quests)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// IDs of the user's quests completed on the given day.
pub async fn completed_on(
    db: &Database,
    user_id: &str,
    day: chrono::NaiveDate,
) -> Result<Vec<String>, LifequestError> {
    let user_id = user_id.to_string();
    let day = day.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT quest_id FROM quest_completions WHERE user_id = ?1 AND day = ?2",
            )?;
            let ids = stmt
                .query_map(params![user_id, day], |row| row.get(0))?
                .collect::<Result<Vec<String>, _>>()?;
            Ok(ids)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// The user's full completion history, oldest first.
pub async fn completions_for_user(
    db: &Database,
    user_id: &str,
) -> Result<Vec<QuestCompletionRow>, LifequestError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, quest_id, user_id, day, completed_at, xp_earned
                 FROM quest_completions WHERE user_id = ?1 ORDER BY day ASC, completed_at ASC",
            )?;
            let completions = stmt
                .query_map(params![user_id], |row| {
                    let day: String = row.get(3)?;
                    Ok(QuestCompletionRow {
                        id: row.get(0)?,
                        quest_id: row.get(1)?,
                        user_id: row.get(2)?,
                        day: parse_col(3, &day)?,
                        completed_at: row.get(4)?,
                        xp_earned: row.get(5)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(completions)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Soft-activate or deactivate a quest. Returns false when no owned quest
/// matched.
pub async fn set_active(
    db: &Database,
    quest_id: &str,
    user_id: &str,
    active: bool,
    updated_at: &str,
) -> Result<bool, LifequestError> {
    let quest_id = quest_id.to_string();
    let user_id = user_id.to_string();
    let updated_at = updated_at.to_string();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE quests SET is_active = ?1, updated_at = ?2 WHERE id = ?3 AND user_id = ?4",
                params![active, updated_at, quest_id, user_id],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Hard-delete a quest and purge its completion history in one transaction.
/// Returns false when no owned quest matched (nothing is deleted then).
pub async fn delete_quest(
    db: &Database,
    quest_id: &str,
    user_id: &str,
) -> Result<bool, LifequestError> {
    let quest_id = quest_id.to_string();
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let owned = tx
                .query_row(
                    "SELECT 1 FROM quests WHERE id = ?1 AND user_id = ?2",
                    params![quest_id, user_id],
                    |_| Ok(()),
                )
                .optional()?
                .is_some();
            if !owned {
                return Ok(false);
            }
            tx.execute(
                "DELETE FROM quest_completions WHERE quest_id = ?1",
                params![quest_id],
            )?;
            tx.execute("DELETE FROM quests WHERE id = ?1", params![quest_id])?;
            tx.commit()?;
            Ok(true)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Everything the transactional quest-completion write needs.
#[derive(Debug, Clone)]
pub struct QuestCompletionWrite {
    pub completion: QuestCompletionRow,
    pub category: SkillCategory,
    pub streak: Streak,
    pub now: String,
}

/// Apply a quest completion atomically: insert the immutable completion
/// record, persist the new streak state, and move the skill and user XP
/// aggregates by the same delta.
///
/// The duplicate-day check runs inside the transaction; combined with the
/// single background writer thread this makes two same-day completions
/// resolve to exactly one `Applied`. The UNIQUE(quest_id, day) index remains
/// as the schema-level backstop.
pub async fn apply_completion(
    db: &Database,
    write: QuestCompletionWrite,
) -> Result<CompletionApplied, LifequestError> {
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let c = &write.completion;
            let day = c.day.to_string();

            let exists = tx
                .query_row(
                    "SELECT 1 FROM quest_completions WHERE quest_id = ?1 AND day = ?2",
                    params![c.quest_id, day],
                    |_| Ok(()),
                )
                .optional()?
                .is_some();
            if exists {
                return Ok(CompletionApplied::AlreadyCompleted);
            }

            tx.execute(
                "INSERT INTO quest_completions (id, quest_id, user_id, day, completed_at, xp_earned)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![c.id, c.quest_id, c.user_id, day, c.completed_at, c.xp_earned],
            )?;

            tx.execute(
                "UPDATE quests SET streak_current = ?1, streak_best = ?2,
                 last_completed_day = ?3, updated_at = ?4 WHERE id = ?5",
                params![
                    write.streak.current,
                    write.streak.best,
                    write.streak.last_completed.map(|d| d.to_string()),
                    write.now,
                    c.quest_id,
                ],
            )?;

            tx.execute(
                "INSERT INTO skills (user_id, category, xp, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)
                 ON CONFLICT(user_id, category)
                 DO UPDATE SET xp = xp + excluded.xp, updated_at = excluded.updated_at",
                params![c.user_id, write.category.to_string(), c.xp_earned, write.now],
            )?;

            tx.execute(
                "UPDATE users SET total_xp = total_xp + ?1, updated_at = ?2 WHERE id = ?3",
                params![c.xp_earned, write.now, c.user_id],
            )?;

            let new_total_xp: i64 = tx.query_row(
                "SELECT total_xp FROM users WHERE id = ?1",
                params![c.user_id],
                |row| row.get(0),
            )?;

            tx.commit()?;
            debug!(quest_id = %c.quest_id, xp = c.xp_earned, "quest completion applied");
            Ok(CompletionApplied::Applied { new_total_xp })
        })
        .await
        .map_err(crate::database::map_tr_err)
}
