// SPDX-FileCopyrightText: 2026 Lifequest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common identifier and enum types used across the Lifequest workspace.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Unique identifier for a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Unique identifier for a quest (repeatable daily habit).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuestId(pub String);

/// Unique identifier for a mission (one-time goal).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MissionId(pub String);

/// Unique identifier for a boss (fixed-duration daily challenge).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BossId(pub String);

macro_rules! id_impls {
    ($name:ident) => {
        impl $name {
            /// Generate a fresh random id.
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

id_impls!(UserId);
id_impls!(QuestId);
id_impls!(MissionId);
id_impls!(BossId);

/// The six life domains a quest, mission, or boss can train.
///
/// This is a closed set: skill rows are keyed by it, and every XP award
/// names exactly one category. Stored lowercase.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SkillCategory {
    Health,
    Knowledge,
    Finance,
    Career,
    Relationships,
    Creativity,
}

/// Lifecycle status of a mission. `Completed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MissionStatus {
    Active,
    Completed,
    Failed,
}

/// Lifecycle status of a boss. `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BossStatus {
    Active,
    Completed,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn skill_category_has_six_variants() {
        assert_eq!(SkillCategory::iter().count(), 6);
    }

    #[test]
    fn skill_category_round_trips_lowercase() {
        for category in SkillCategory::iter() {
            let s = category.to_string();
            assert_eq!(s, s.to_lowercase());
            let parsed = SkillCategory::from_str(&s).expect("should parse back");
            assert_eq!(category, parsed);
        }
        assert!(SkillCategory::from_str("wizardry").is_err());
    }

    #[test]
    fn statuses_serialize_lowercase() {
        let json = serde_json::to_string(&MissionStatus::Active).unwrap();
        assert_eq!(json, "\"active\"");
        let parsed: BossStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(parsed, BossStatus::Completed);
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = QuestId::generate();
        let b = QuestId::generate();
        assert_ne!(a, b);
    }
}
