// SPDX-FileCopyrightText: 2026 Lifequest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User CRUD and leaderboard queries.

use lifequest_core::LifequestError;
use rusqlite::params;

use crate::database::Database;
use crate::models::UserRow;

fn row_to_user(row: &rusqlite::Row<'_>) -> Result<UserRow, rusqlite::Error> {
    Ok(UserRow {
        id: row.get(0)?,
        name: row.get(1)?,
        total_xp: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

/// Create a new user.
pub async fn create_user(db: &Database, user: &UserRow) -> Result<(), LifequestError> {
    let user = user.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO users (id, name, total_xp, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    user.id,
                    user.name,
                    user.total_xp,
                    user.created_at,
                    user.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a user by ID.
pub async fn get_user(db: &Database, id: &str) -> Result<Option<UserRow>, LifequestError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, total_xp, created_at, updated_at FROM users WHERE id = ?1",
            )?;
            let result = stmt.query_row(params![id], row_to_user);
            match result {
                Ok(user) => Ok(Some(user)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a user by unique name.
pub async fn find_by_name(db: &Database, name: &str) -> Result<Option<UserRow>, LifequestError> {
    let name = name.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, total_xp, created_at, updated_at FROM users WHERE name = ?1",
            )?;
            let result = stmt.query_row(params![name], row_to_user);
            match result {
                Ok(user) => Ok(Some(user)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Top users by total XP, descending. Users with zero XP are excluded.
pub async fn leaderboard(db: &Database, limit: u32) -> Result<Vec<UserRow>, LifequestError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, total_xp, created_at, updated_at FROM users
                 WHERE total_xp > 0 ORDER BY total_xp DESC, name ASC LIMIT ?1",
            )?;
            let users = stmt
                .query_map(params![limit], row_to_user)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(users)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(name: &str, total_xp: i64) -> UserRow {
        UserRow {
            id: uuid_like(name),
            name: name.to_string(),
            total_xp,
            created_at: "2026-03-01T10:00:00.000Z".to_string(),
            updated_at: "2026-03-01T10:00:00.000Z".to_string(),
        }
    }

    fn uuid_like(seed: &str) -> String {
        format!("user-{seed}")
    }

    #[tokio::test]
    async fn create_and_get_round_trip() {
        let db = Database::open_in_memory().await.unwrap();
        create_user(&db, &sample_user("ana", 0)).await.unwrap();

        let user = get_user(&db, "user-ana").await.unwrap().unwrap();
        assert_eq!(user.name, "ana");
        assert_eq!(user.total_xp, 0);

        assert!(get_user(&db, "user-nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_by_name_matches_exactly() {
        let db = Database::open_in_memory().await.unwrap();
        create_user(&db, &sample_user("bo", 10)).await.unwrap();

        assert!(find_by_name(&db, "bo").await.unwrap().is_some());
        assert!(find_by_name(&db, "Bo").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn leaderboard_orders_and_filters() {
        let db = Database::open_in_memory().await.unwrap();
        create_user(&db, &sample_user("idle", 0)).await.unwrap();
        create_user(&db, &sample_user("mid", 500)).await.unwrap();
        create_user(&db, &sample_user("top", 2500)).await.unwrap();

        let board = leaderboard(&db, 20).await.unwrap();
        let names: Vec<_> = board.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["top", "mid"]);
    }
}
