// SPDX-FileCopyrightText: 2026 Lifequest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mission CRUD, subtask bookkeeping, and the transactional completion write.

use lifequest_core::types::{MissionStatus, SkillCategory};
use lifequest_core::LifequestError;
use rusqlite::params;
use tracing::debug;

use crate::database::Database;
use crate::models::{parse_col, MissionRow, SubtaskRow};
use crate::queries::CompletionApplied;

fn row_to_mission(row: &rusqlite::Row<'_>) -> Result<MissionRow, rusqlite::Error> {
    let category: String = row.get(4)?;
    let difficulty: String = row.get(5)?;
    let status: String = row.get(8)?;
    Ok(MissionRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        skill_category: parse_col(4, &category)?,
        difficulty: parse_col(5, &difficulty)?,
        xp_reward: row.get(6)?,
        deadline: row.get(7)?,
        status: parse_col(8, &status)?,
        completed_at: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

const MISSION_COLUMNS: &str = "id, user_id, title, description, skill_category, difficulty, \
     xp_reward, deadline, status, completed_at, created_at, updated_at";

/// Create a mission along with its ordered subtasks.
pub async fn insert_mission(
    db: &Database,
    mission: &MissionRow,
    subtasks: &[String],
) -> Result<(), LifequestError> {
    let m = mission.clone();
    let subtasks = subtasks.to_vec();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO missions (id, user_id, title, description, skill_category, difficulty,
                 xp_reward, deadline, status, completed_at, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params![
                    m.id,
                    m.user_id,
                    m.title,
                    m.description,
                    m.skill_category.to_string(),
                    m.difficulty.to_string(),
                    m.xp_reward,
                    m.deadline,
                    m.status.to_string(),
                    m.completed_at,
                    m.created_at,
                    m.updated_at,
                ],
            )?;
            for (idx, title) in subtasks.iter().enumerate() {
                tx.execute(
                    "INSERT INTO mission_subtasks (mission_id, idx, title, completed)
                     VALUES (?1, ?2, ?3, 0)",
                    params![m.id, idx as i64, title],
                )?;
            }
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a mission by ID, scoped to its owner.
pub async fn get_mission(
    db: &Database,
    mission_id: &str,
    user_id: &str,
) -> Result<Option<MissionRow>, LifequestError> {
    let mission_id = mission_id.to_string();
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MISSION_COLUMNS} FROM missions WHERE id = ?1 AND user_id = ?2"
            ))?;
            let result = stmt.query_row(params![mission_id, user_id], row_to_mission);
            match result {
                Ok(mission) => Ok(Some(mission)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// A mission's subtasks in order.
pub async fn subtasks_for(
    db: &Database,
    mission_id: &str,
) -> Result<Vec<SubtaskRow>, LifequestError> {
    let mission_id = mission_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT idx, title, completed FROM mission_subtasks
                 WHERE mission_id = ?1 ORDER BY idx ASC",
            )?;
            let subtasks = stmt
                .query_map(params![mission_id], |row| {
                    Ok(SubtaskRow {
                        idx: row.get(0)?,
                        title: row.get(1)?,
                        completed: row.get(2)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(subtasks)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// A user's missions with the given status, newest first.
pub async fn list_by_status(
    db: &Database,
    user_id: &str,
    status: MissionStatus,
) -> Result<Vec<MissionRow>, LifequestError> {
    let user_id = user_id.to_string();
    let status = status.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MISSION_COLUMNS} FROM missions
                 WHERE user_id = ?1 AND status = ?2 ORDER BY created_at DESC"
            ))?;
            let missions = stmt
                .query_map(params![user_id, status], row_to_mission)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(missions)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Flip one subtask's completed flag. Returns false when the index doesn't
/// exist for this mission.
pub async fn toggle_subtask(
    db: &Database,
    mission_id: &str,
    idx: i64,
) -> Result<bool, LifequestError> {
    let mission_id = mission_id.to_string();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE mission_subtasks SET completed = 1 - completed
                 WHERE mission_id = ?1 AND idx = ?2",
                params![mission_id, idx],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// One-way transition to `failed`. Returns false when the mission wasn't
/// active (or wasn't owned).
pub async fn fail_mission(
    db: &Database,
    mission_id: &str,
    user_id: &str,
    now: &str,
) -> Result<bool, LifequestError> {
    let mission_id = mission_id.to_string();
    let user_id = user_id.to_string();
    let now = now.to_string();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE missions SET status = 'failed', updated_at = ?1
                 WHERE id = ?2 AND user_id = ?3 AND status = 'active'",
                params![now, mission_id, user_id],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete a mission (subtasks cascade). Returns false when no owned mission
/// matched.
pub async fn delete_mission(
    db: &Database,
    mission_id: &str,
    user_id: &str,
) -> Result<bool, LifequestError> {
    let mission_id = mission_id.to_string();
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "DELETE FROM missions WHERE id = ?1 AND user_id = ?2",
                params![mission_id, user_id],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Everything the transactional mission-completion write needs.
#[derive(Debug, Clone)]
pub struct MissionCompletionWrite {
    pub mission_id: String,
    pub user_id: String,
    pub category: SkillCategory,
    pub xp_earned: i64,
    pub now: String,
}

/// Apply a mission completion atomically: the guarded status transition and
/// both XP increments commit together.
///
/// The `status = 'active'` guard inside the transaction is what makes the
/// transition one-way under races: a second caller updates zero rows and
/// gets `AlreadyCompleted`.
pub async fn apply_completion(
    db: &Database,
    write: MissionCompletionWrite,
) -> Result<CompletionApplied, LifequestError> {
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;

            let changed = tx.execute(
                "UPDATE missions SET status = 'completed', completed_at = ?1, updated_at = ?1
                 WHERE id = ?2 AND user_id = ?3 AND status = 'active'",
                params![write.now, write.mission_id, write.user_id],
            )?;
            if changed == 0 {
                return Ok(CompletionApplied::AlreadyCompleted);
            }

            tx.execute(
                "INSERT INTO skills (user_id, category, xp, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)
                 ON CONFLICT(user_id, category)
                 DO UPDATE SET xp = xp + excluded.xp, updated_at = excluded.updated_at",
                params![
                    write.user_id,
                    write.category.to_string(),
                    write.xp_earned,
                    write.now
                ],
            )?;

            tx.execute(
                "UPDATE users SET total_xp = total_xp + ?1, updated_at = ?2 WHERE id = ?3",
                params![write.xp_earned, write.now, write.user_id],
            )?;

            let new_total_xp: i64 = tx.query_row(
                "SELECT total_xp FROM users WHERE id = ?1",
                params![write.user_id],
                |row| row.get(0),
            )?;

            tx.commit()?;
            debug!(mission_id = %write.mission_id, xp = write.xp_earned, "mission completion applied");
            Ok(CompletionApplied::Applied { new_total_xp })
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Count of a user's missions with the given status.
pub async fn count_by_status(
    db: &Database,
    user_id: &str,
    status: MissionStatus,
) -> Result<i64, LifequestError> {
    let user_id = user_id.to_string();
    let status = status.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT count(*) FROM missions WHERE user_id = ?1 AND status = ?2",
                params![user_id, status],
                |row| row.get(0),
            )
        })
        .await
        .map_err(crate::database::map_tr_err)
}
