// SPDX-FileCopyrightText: 2026 Lifequest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Injectable clock.
//!
//! The engine never reads the system clock directly: completion semantics
//! depend on "today", so tests need to pin and advance time. UTC is the
//! reference timezone for calendar days.

use std::sync::Mutex;

use chrono::{DateTime, Days, Utc};

/// Source of "now" for the engine.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// The current calendar day in the reference timezone.
    fn today(&self) -> chrono::NaiveDate {
        self.now().date_naive()
    }
}

/// Wall-clock time. The production clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to a settable instant, for deterministic tests.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    /// Pin the clock to `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Pin the clock from an RFC 3339 string, e.g. `2026-03-10T09:00:00Z`.
    ///
    /// # Panics
    /// Panics on an unparseable string; intended for test setup.
    pub fn at(rfc3339: &str) -> Self {
        Self::new(
            DateTime::parse_from_rfc3339(rfc3339)
                .expect("valid RFC 3339 timestamp")
                .with_timezone(&Utc),
        )
    }

    /// Move the clock to a new instant.
    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().expect("clock lock") = now;
    }

    /// Advance the clock by whole days.
    pub fn advance_days(&self, days: u64) {
        let mut now = self.now.lock().expect("clock lock");
        *now = now
            .checked_add_days(Days::new(days))
            .expect("clock within chrono range");
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_advances_by_days() {
        let clock = FixedClock::at("2026-03-10T23:30:00Z");
        assert_eq!(clock.today().to_string(), "2026-03-10");

        clock.advance_days(1);
        assert_eq!(clock.today().to_string(), "2026-03-11");

        clock.advance_days(20);
        assert_eq!(clock.today().to_string(), "2026-03-31");
    }

    #[test]
    fn today_is_utc_calendar_day() {
        let clock = FixedClock::at("2026-03-10T23:30:00-05:00");
        // 23:30 EST is already 04:30 next day in UTC.
        assert_eq!(clock.today().to_string(), "2026-03-11");
    }
}
