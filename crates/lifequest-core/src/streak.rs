// SPDX-FileCopyrightText: 2026 Lifequest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Quest streak transition logic.
//!
//! The tracker owns no clock: callers supply "today" as a calendar date, so
//! the transition is a pure function of prior state and that date. Same-day
//! re-entry is rejected upstream by the orchestrator's duplicate check and
//! never reaches this module.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Per-quest streak state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Streak {
    /// Consecutive-day completion count. 0 only before the first completion;
    /// a completion after any gap resets to 1, not 0.
    pub current: u32,
    /// Running maximum of `current`. Never decreases.
    pub best: u32,
    /// Calendar day of the most recent completion.
    pub last_completed: Option<NaiveDate>,
}

impl Streak {
    /// State after completing the quest on `today`.
    ///
    /// The streak continues only when the last completion fell exactly on
    /// the previous calendar day; any longer gap (or a first-ever
    /// completion) resets to 1 with no partial credit.
    #[must_use]
    pub fn advance(self, today: NaiveDate) -> Streak {
        let continues = self
            .last_completed
            .and_then(|last| last.checked_add_days(Days::new(1)))
            .is_some_and(|next| next == today);

        let current = if continues { self.current + 1 } else { 1 };
        Streak {
            current,
            best: self.best.max(current),
            last_completed: Some(today),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn first_completion_starts_at_one() {
        let s = Streak::default().advance(day("2026-03-10"));
        assert_eq!(s.current, 1);
        assert_eq!(s.best, 1);
        assert_eq!(s.last_completed, Some(day("2026-03-10")));
    }

    #[test]
    fn consecutive_days_increment() {
        let mut s = Streak::default();
        for (i, d) in ["2026-03-10", "2026-03-11", "2026-03-12"].iter().enumerate() {
            s = s.advance(day(d));
            assert_eq!(s.current, i as u32 + 1);
        }
        assert_eq!(s.best, 3);
    }

    #[test]
    fn any_gap_resets_to_one() {
        let s = Streak {
            current: 12,
            best: 12,
            last_completed: Some(day("2026-03-01")),
        };
        // Two-day gap and a long gap behave identically.
        assert_eq!(s.advance(day("2026-03-03")).current, 1);
        assert_eq!(s.advance(day("2026-07-01")).current, 1);
    }

    #[test]
    fn best_survives_a_reset() {
        let s = Streak {
            current: 9,
            best: 9,
            last_completed: Some(day("2026-02-01")),
        };
        let s = s.advance(day("2026-02-10"));
        assert_eq!(s.current, 1);
        assert_eq!(s.best, 9);
    }

    #[test]
    fn best_is_running_maximum() {
        let s = Streak {
            current: 4,
            best: 4,
            last_completed: Some(day("2026-02-01")),
        };
        let s = s.advance(day("2026-02-02"));
        assert_eq!(s.current, 5);
        assert_eq!(s.best, 5);
    }

    #[test]
    fn continuation_across_month_boundary() {
        let s = Streak {
            current: 1,
            best: 1,
            last_completed: Some(day("2026-01-31")),
        };
        assert_eq!(s.advance(day("2026-02-01")).current, 2);
    }
}
