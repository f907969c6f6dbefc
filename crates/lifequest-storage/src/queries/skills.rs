// SPDX-FileCopyrightText: 2026 Lifequest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Skill balance reads.
//!
//! Skill rows are written only inside completion transactions (see the
//! `apply_*` functions in the sibling modules), so this module is read-only.

use lifequest_core::LifequestError;
use rusqlite::params;

use crate::database::Database;
use crate::models::{parse_col, SkillRow};

/// All skill rows for a user. Categories with no awards yet have no row;
/// callers zero-fill the missing ones.
pub async fn skills_for_user(db: &Database, user_id: &str) -> Result<Vec<SkillRow>, LifequestError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT user_id, category, xp FROM skills WHERE user_id = ?1 ORDER BY category",
            )?;
            let skills = stmt
                .query_map(params![user_id], |row| {
                    let category: String = row.get(1)?;
                    Ok(SkillRow {
                        user_id: row.get(0)?,
                        category: parse_col(1, &category)?,
                        xp: row.get(2)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(skills)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
