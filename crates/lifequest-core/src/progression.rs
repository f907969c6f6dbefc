// SPDX-FileCopyrightText: 2026 Lifequest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Level and title derivation from cumulative XP.
//!
//! Levels follow a quadratic curve: reaching level L costs `L^2 * 100` XP,
//! so `level = floor(sqrt(total_xp / 100))`. Levels and titles are never
//! stored -- every caller recomputes them from the XP aggregate, which keeps
//! the aggregates the single source of truth.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Title tier, bucketed by level. Lower bounds are inclusive: level 10 is
/// already an Apprentice, level 50 already a Legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
pub enum Title {
    Novice,
    Apprentice,
    Master,
    Legend,
}

/// Position within the current level, for progress bars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelProgress {
    pub level: u32,
    /// XP earned since the current level's threshold.
    pub current_xp: u64,
    /// XP between the current and next level thresholds. Always positive.
    pub required_xp: u64,
    /// `current_xp / required_xp`, in `0.0..1.0`.
    pub fraction: f64,
}

/// Level for a cumulative XP total: `floor(sqrt(total_xp / 100))`.
#[must_use]
pub fn level_for_xp(total_xp: u64) -> u32 {
    // floor(sqrt(x / 100)) == floor(sqrt(floor(x / 100))), so integer
    // division first keeps the whole computation exact for any u64.
    let level = (total_xp / 100).isqrt();
    u32::try_from(level).unwrap_or(u32::MAX)
}

/// Cumulative XP required to reach `level`. Saturates at `u64::MAX`: near
/// the top of the u64 range the next level's threshold would overflow.
#[must_use]
pub fn xp_threshold(level: u32) -> u64 {
    let level = u64::from(level);
    (level * level).saturating_mul(100)
}

/// Progress within the level implied by `total_xp`.
#[must_use]
pub fn progress_within_level(total_xp: u64) -> LevelProgress {
    let level = level_for_xp(total_xp);
    let floor = xp_threshold(level);
    let ceiling = xp_threshold(level + 1);
    let current_xp = total_xp - floor;
    let required_xp = ceiling - floor;
    let fraction = if required_xp == 0 {
        0.0
    } else {
        current_xp as f64 / required_xp as f64
    };
    LevelProgress {
        level,
        current_xp,
        required_xp,
        fraction,
    }
}

/// Title tier for a level.
#[must_use]
pub fn title_for_level(level: u32) -> Title {
    if level >= 50 {
        Title::Legend
    } else if level >= 25 {
        Title::Master
    } else if level >= 10 {
        Title::Apprentice
    } else {
        Title::Novice
    }
}
