// SPDX-FileCopyrightText: 2026 Lifequest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! XP reward policy: streak multipliers, mission difficulty tiers, and boss
//! payout constants.
//!
//! Mission and boss rewards are frozen into the entity row at creation time;
//! changing these tables later must never retroactively alter existing
//! entities, so nothing outside creation paths reads them.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Base XP for a quest when the creator doesn't supply one.
pub const DEFAULT_QUEST_XP: u64 = 15;

/// XP paid for each non-terminal day of a boss challenge.
pub const BOSS_DAILY_XP: u64 = 15;

/// Default one-time bonus paid when a boss challenge is completed.
pub const DEFAULT_BOSS_REWARD: u64 = 500;

/// Default boss duration in days.
pub const DEFAULT_BOSS_DURATION: u32 = 30;

/// Mission difficulty tier. Each maps to a fixed base XP value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Epic,
}

impl Difficulty {
    /// Base XP awarded for completing a mission of this difficulty.
    #[must_use]
    pub fn base_xp(self) -> u64 {
        match self {
            Difficulty::Easy => 10,
            Difficulty::Medium => 25,
            Difficulty::Hard => 50,
            Difficulty::Epic => 100,
        }
    }
}

/// Streak multiplier applied to a quest's base reward.
///
/// Thresholds at 7, 30, and 100 consecutive days.
#[must_use]
pub fn streak_multiplier(streak_days: u32) -> f64 {
    if streak_days >= 100 {
        3.0
    } else if streak_days >= 30 {
        2.0
    } else if streak_days >= 7 {
        1.5
    } else {
        1.0
    }
}

/// Quest XP for a given base reward and streak length: base times the
/// streak multiplier, rounded to the nearest integer.
#[must_use]
pub fn quest_xp(base_reward: u64, streak_days: u32) -> u64 {
    (base_reward as f64 * streak_multiplier(streak_days)).round() as u64
}
