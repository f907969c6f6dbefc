// SPDX-FileCopyrightText: 2026 Lifequest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Lifequest engine.

use thiserror::Error;

/// The primary error type used across all Lifequest crates.
///
/// The first four variants form the domain taxonomy every completion
/// operation reports through; callers branch on them to render "not found",
/// "already done today", and validation messages distinctly. The remaining
/// variants are infrastructure failures.
#[derive(Debug, Error)]
pub enum LifequestError {
    /// Entity absent, or present but owned by a different user. The two
    /// cases are deliberately indistinguishable so existence never leaks
    /// to non-owners.
    #[error("not found")]
    NotFound,

    /// Duplicate completion within the same period, or a mutation of an
    /// entity already in a terminal status.
    #[error("conflict: {message}")]
    Conflict { message: String },

    /// Malformed arguments (out-of-range subtask index, empty title, ...).
    #[error("bad input: {reason}")]
    BadInput { reason: String },

    /// No valid caller identity.
    #[error("unauthorized")]
    Unauthorized,

    /// Storage backend errors (database connection, query failure).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration errors (invalid TOML, missing required fields).
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl LifequestError {
    /// Shorthand for a [`LifequestError::Conflict`] with the given message.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Shorthand for a [`LifequestError::BadInput`] with the given reason.
    pub fn bad_input(reason: impl Into<String>) -> Self {
        Self::BadInput {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_strings() {
        assert_eq!(LifequestError::NotFound.to_string(), "not found");
        assert_eq!(
            LifequestError::conflict("already completed today").to_string(),
            "conflict: already completed today"
        );
        assert_eq!(
            LifequestError::bad_input("subtask index out of range").to_string(),
            "bad input: subtask index out of range"
        );
        assert_eq!(LifequestError::Unauthorized.to_string(), "unauthorized");
    }

    #[test]
    fn domain_variants_are_distinguishable() {
        let errs = [
            LifequestError::NotFound,
            LifequestError::conflict("x"),
            LifequestError::bad_input("y"),
            LifequestError::Unauthorized,
        ];
        let conflicts = errs
            .iter()
            .filter(|e| matches!(e, LifequestError::Conflict { .. }))
            .count();
        assert_eq!(conflicts, 1);
    }
}
