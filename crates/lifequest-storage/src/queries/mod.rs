// SPDX-FileCopyrightText: 2026 Lifequest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules, one per entity family.

pub mod bosses;
pub mod missions;
pub mod quests;
pub mod skills;
pub mod stats;
pub mod users;

/// Result of a transactional completion write.
///
/// `AlreadyCompleted` means the in-transaction duplicate check found an
/// existing record for the period; the transaction commits nothing in that
/// case. Because every write runs on the single background writer thread,
/// two racing completions resolve deterministically to one `Applied` and one
/// `AlreadyCompleted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionApplied {
    /// The completion committed; carries the user's new XP total.
    Applied { new_total_xp: i64 },
    /// A record for this period already existed; nothing was written.
    AlreadyCompleted,
}
