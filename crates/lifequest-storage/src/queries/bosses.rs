// SPDX-FileCopyrightText: 2026 Lifequest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Boss CRUD and the transactional daily-hit write.

use chrono::NaiveDate;
use lifequest_core::types::{BossStatus, SkillCategory};
use lifequest_core::LifequestError;
use rusqlite::{params, OptionalExtension};
use tracing::debug;

use crate::database::Database;
use crate::models::{parse_col, BossProgressRow, BossRow};

fn row_to_boss(row: &rusqlite::Row<'_>) -> Result<BossRow, rusqlite::Error> {
    let category: String = row.get(4)?;
    let start_date: String = row.get(8)?;
    let status: String = row.get(9)?;
    Ok(BossRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        skill_category: parse_col(4, &category)?,
        duration_days: row.get(5)?,
        daily_task: row.get(6)?,
        xp_reward: row.get(7)?,
        start_date: parse_col(8, &start_date)?,
        status: parse_col(9, &status)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

const BOSS_COLUMNS: &str = "id, user_id, title, description, skill_category, duration_days, \
     daily_task, xp_reward, start_date, status, created_at, updated_at";

/// Create a new boss challenge.
pub async fn insert_boss(db: &Database, boss: &BossRow) -> Result<(), LifequestError> {
    let b = boss.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO bosses (id, user_id, title, description, skill_category,
                 duration_days, daily_task, xp_reward, start_date, status, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params![
                    b.id,
                    b.user_id,
                    b.title,
                    b.description,
                    b.skill_category.to_string(),
                    b.duration_days,
                    b.daily_task,
                    b.xp_reward,
                    b.start_date.to_string(),
                    b.status.to_string(),
                    b.created_at,
                    b.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a boss by ID, scoped to its owner.
pub async fn get_boss(
    db: &Database,
    boss_id: &str,
    user_id: &str,
) -> Result<Option<BossRow>, LifequestError> {
    let boss_id = boss_id.to_string();
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {BOSS_COLUMNS} FROM bosses WHERE id = ?1 AND user_id = ?2"
            ))?;
            let result = stmt.query_row(params![boss_id, user_id], row_to_boss);
            match result {
                Ok(boss) => Ok(Some(boss)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// A user's bosses with the given status, newest first.
pub async fn list_by_status(
    db: &Database,
    user_id: &str,
    status: BossStatus,
) -> Result<Vec<BossRow>, LifequestError> {
    let user_id = user_id.to_string();
    let status = status.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {BOSS_COLUMNS} FROM bosses
                 WHERE user_id = ?1 AND status = ?2 ORDER BY created_at DESC"
            ))?;
            let bosses = stmt
                .query_map(params![user_id, status], row_to_boss)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(bosses)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// A boss's progress entries, oldest day first.
pub async fn progress_for(
    db: &Database,
    boss_id: &str,
) -> Result<Vec<BossProgressRow>, LifequestError> {
    let boss_id = boss_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT boss_id, user_id, day, completed, completed_at, xp_earned
                 FROM boss_progress WHERE boss_id = ?1 ORDER BY day ASC",
            )?;
            let progress = stmt
                .query_map(params![boss_id], |row| {
                    let day: String = row.get(2)?;
                    Ok(BossProgressRow {
                        boss_id: row.get(0)?,
                        user_id: row.get(1)?,
                        day: parse_col(2, &day)?,
                        completed: row.get(3)?,
                        completed_at: row.get(4)?,
                        xp_earned: row.get(5)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(progress)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete a boss (progress cascades). Returns false when no owned boss
/// matched.
pub async fn delete_boss(
    db: &Database,
    boss_id: &str,
    user_id: &str,
) -> Result<bool, LifequestError> {
    let boss_id = boss_id.to_string();
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "DELETE FROM bosses WHERE id = ?1 AND user_id = ?2",
                params![boss_id, user_id],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Everything the transactional boss daily-hit write needs.
#[derive(Debug, Clone)]
pub struct BossDayWrite {
    pub boss_id: String,
    pub user_id: String,
    pub category: SkillCategory,
    pub day: NaiveDate,
    pub now: String,
    /// XP paid for a non-terminal day.
    pub daily_xp: i64,
    /// The boss's stored one-time bonus, paid instead of `daily_xp` on the
    /// day the duration target is reached.
    pub completion_reward: i64,
    pub duration_days: i64,
}

/// Result of a committed boss daily hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BossDayApplied {
    pub new_total_xp: i64,
    pub days_completed: i64,
    pub defeated: bool,
    pub xp_earned: i64,
}

/// Apply a boss daily hit atomically: insert today's progress row, count
/// completed days, transition to `completed` when the duration target is
/// reached, and move both XP aggregates.
///
/// Returns `None` when nothing may be written: today's row already existed,
/// or the boss is no longer active. Both checks run inside the transaction
/// so a racing hit that defeats the boss cannot be followed by a payout
/// against the now-terminal row. The completion bonus replaces the daily
/// reward on the final day rather than adding to it.
pub async fn apply_day(
    db: &Database,
    write: BossDayWrite,
) -> Result<Option<BossDayApplied>, LifequestError> {
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let day = write.day.to_string();

            let active = tx
                .query_row(
                    "SELECT 1 FROM bosses WHERE id = ?1 AND status = 'active'",
                    params![write.boss_id],
                    |_| Ok(()),
                )
                .optional()?
                .is_some();
            if !active {
                return Ok(None);
            }

            let exists = tx
                .query_row(
                    "SELECT 1 FROM boss_progress WHERE boss_id = ?1 AND day = ?2 AND completed = 1",
                    params![write.boss_id, day],
                    |_| Ok(()),
                )
                .optional()?
                .is_some();
            if exists {
                return Ok(None);
            }

            let days_completed: i64 = tx.query_row(
                "SELECT count(*) FROM boss_progress WHERE boss_id = ?1 AND completed = 1",
                params![write.boss_id],
                |row| row.get(0),
            )?;
            let days_completed = days_completed + 1;

            let defeated = days_completed >= write.duration_days;
            let xp_earned = if defeated {
                write.completion_reward
            } else {
                write.daily_xp
            };

            tx.execute(
                "INSERT INTO boss_progress (boss_id, user_id, day, completed, completed_at, xp_earned)
                 VALUES (?1, ?2, ?3, 1, ?4, ?5)",
                params![write.boss_id, write.user_id, day, write.now, xp_earned],
            )?;

            if defeated {
                tx.execute(
                    "UPDATE bosses SET status = 'completed', updated_at = ?1 WHERE id = ?2",
                    params![write.now, write.boss_id],
                )?;
            }

            tx.execute(
                "INSERT INTO skills (user_id, category, xp, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)
                 ON CONFLICT(user_id, category)
                 DO UPDATE SET xp = xp + excluded.xp, updated_at = excluded.updated_at",
                params![write.user_id, write.category.to_string(), xp_earned, write.now],
            )?;

            tx.execute(
                "UPDATE users SET total_xp = total_xp + ?1, updated_at = ?2 WHERE id = ?3",
                params![xp_earned, write.now, write.user_id],
            )?;

            let new_total_xp: i64 = tx.query_row(
                "SELECT total_xp FROM users WHERE id = ?1",
                params![write.user_id],
                |row| row.get(0),
            )?;

            tx.commit()?;
            debug!(boss_id = %write.boss_id, days_completed, defeated, "boss day applied");
            Ok(Some(BossDayApplied {
                new_total_xp,
                days_completed,
                defeated,
                xp_earned,
            }))
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Count of a user's bosses with the given status.
pub async fn count_by_status(
    db: &Database,
    user_id: &str,
    status: BossStatus,
) -> Result<i64, LifequestError> {
    let user_id = user_id.to_string();
    let status = status.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT count(*) FROM bosses WHERE user_id = ?1 AND status = ?2",
                params![user_id, status],
                |row| row.get(0),
            )
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRow;
    use crate::queries::users;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    async fn seed(db: &Database) -> (String, String) {
        let user_id = "user-rin".to_string();
        let boss_id = "boss-pushups".to_string();
        users::create_user(
            db,
            &UserRow {
                id: user_id.clone(),
                name: "rin".to_string(),
                total_xp: 0,
                created_at: "2026-03-01T10:00:00.000Z".to_string(),
                updated_at: "2026-03-01T10:00:00.000Z".to_string(),
            },
        )
        .await
        .unwrap();
        insert_boss(
            db,
            &BossRow {
                id: boss_id.clone(),
                user_id: user_id.clone(),
                title: "Pushups".to_string(),
                description: String::new(),
                skill_category: SkillCategory::Health,
                duration_days: 1,
                daily_task: "50 pushups".to_string(),
                xp_reward: 100,
                start_date: day("2026-03-01"),
                status: BossStatus::Active,
                created_at: "2026-03-01T10:00:00.000Z".to_string(),
                updated_at: "2026-03-01T10:00:00.000Z".to_string(),
            },
        )
        .await
        .unwrap();
        (user_id, boss_id)
    }

    fn day_write(user_id: &str, boss_id: &str, d: &str) -> BossDayWrite {
        BossDayWrite {
            boss_id: boss_id.to_string(),
            user_id: user_id.to_string(),
            category: SkillCategory::Health,
            day: day(d),
            now: format!("{d}T10:00:00.000Z"),
            daily_xp: 15,
            completion_reward: 100,
            duration_days: 1,
        }
    }

    #[tokio::test]
    async fn terminal_boss_refuses_further_hits() {
        let db = Database::open_in_memory().await.unwrap();
        let (user_id, boss_id) = seed(&db).await;

        let applied = apply_day(&db, day_write(&user_id, &boss_id, "2026-03-01"))
            .await
            .unwrap()
            .expect("first hit applies");
        assert!(applied.defeated);
        assert_eq!(applied.xp_earned, 100);

        // Next calendar day: no duplicate row exists, so only the status
        // check inside the transaction stands between this write and a
        // payout against a completed boss.
        let after = apply_day(&db, day_write(&user_id, &boss_id, "2026-03-02"))
            .await
            .unwrap();
        assert!(after.is_none());

        let user = users::get_user(&db, &user_id).await.unwrap().unwrap();
        assert_eq!(user.total_xp, 100);
        let progress = progress_for(&db, &boss_id).await.unwrap();
        assert_eq!(progress.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_day_refused_while_active() {
        let db = Database::open_in_memory().await.unwrap();
        let (user_id, boss_id) = seed(&db).await;

        // Two-day duration so the first hit leaves the boss active.
        let mut first = day_write(&user_id, &boss_id, "2026-03-01");
        first.duration_days = 2;
        assert!(apply_day(&db, first.clone()).await.unwrap().is_some());
        assert!(apply_day(&db, first).await.unwrap().is_none());

        let user = users::get_user(&db, &user_id).await.unwrap().unwrap();
        assert_eq!(user.total_xp, 15);
    }
}
