// SPDX-FileCopyrightText: 2026 Lifequest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional Connection instances for writes: the
//! per-entity completion ordering guarantee relies on every write going
//! through this one handle.

use lifequest_core::LifequestError;
use tokio_rusqlite::Connection;
use tracing::debug;

use crate::migrations;

/// Convert a tokio-rusqlite error into `LifequestError::Storage`.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> LifequestError {
    LifequestError::Storage {
        source: Box::new(e),
    }
}

/// Handle to the SQLite database backing the engine.
///
/// Cheap to clone; all clones share the same background writer thread.
#[derive(Clone)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (creating if necessary) the database at `path`, apply PRAGMAs,
    /// and run any pending migrations.
    pub async fn open(path: impl AsRef<std::path::Path>) -> Result<Self, LifequestError> {
        let path = path.as_ref();
        // Connection::open fails with a plain rusqlite error, unlike the
        // wrapped error the call sites below produce.
        let conn = Connection::open(path.to_path_buf())
            .await
            .map_err(|e| LifequestError::Storage {
                source: Box::new(e),
            })?;
        let db = Self { conn };
        db.initialize().await?;
        debug!(path = %path.display(), "SQLite database opened");
        Ok(db)
    }

    /// Open a fresh in-memory database with the full schema applied.
    ///
    /// Used by tests; the database disappears when the handle is dropped.
    pub async fn open_in_memory() -> Result<Self, LifequestError> {
        let conn = Connection::open(":memory:")
            .await
            .map_err(|e| LifequestError::Storage {
                source: Box::new(e),
            })?;
        let db = Self { conn };
        db.initialize().await?;
        Ok(db)
    }

    async fn initialize(&self) -> Result<(), LifequestError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch(
                    "PRAGMA journal_mode=WAL;
                     PRAGMA synchronous=NORMAL;
                     PRAGMA foreign_keys=ON;
                     PRAGMA busy_timeout=5000;",
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;

        self.conn
            .call(|conn| migrations::run_migrations(conn))
            .await
            .map_err(|e| LifequestError::Storage {
                source: Box::new(e),
            })?;
        Ok(())
    }

    /// The underlying tokio-rusqlite connection for query modules.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Checkpoint the WAL and flush pending writes before shutdown.
    pub async fn close(&self) -> Result<(), LifequestError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}
