// SPDX-FileCopyrightText: 2026 Lifequest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The completion orchestrator and read-side operations.
//!
//! Write paths follow one shape: load the entity scoped to its owner
//! (absent and not-owned are both `NotFound`), classify terminal-status and
//! duplicate-period cases as `Conflict`, compute the XP delta with the pure
//! core calculators, then hand a single transactional write to storage. The
//! in-transaction duplicate checks are the authority under races; the
//! pre-checks here only produce friendlier early errors.

use std::sync::Arc;

use chrono::NaiveDate;
use lifequest_core::progression::{level_for_xp, progress_within_level, title_for_level};
use lifequest_core::reward::{
    quest_xp, Difficulty, BOSS_DAILY_XP, DEFAULT_BOSS_DURATION, DEFAULT_BOSS_REWARD,
    DEFAULT_QUEST_XP,
};
use lifequest_core::types::{
    BossId, BossStatus, MissionId, MissionStatus, QuestId, SkillCategory, UserId,
};
use lifequest_core::{LifequestError, Streak};
use lifequest_storage::queries::{bosses, missions, quests, skills, stats, users, CompletionApplied};
use lifequest_storage::{
    BossRow, Database, MissionRow, QuestCompletionRow, QuestRow, SubtaskRow, UserRow,
};
use strum::IntoEnumIterator;
use tracing::info;
use uuid::Uuid;

use crate::clock::Clock;
use crate::outcome::{
    BossDayOutcome, BossView, CompletionOutcome, DashboardStats, LeaderboardEntry, MissionView,
    Profile, QuestView, SkillView, SubtaskView, XpAudit,
};

/// Non-negative database counter to u64. The schema CHECK constraints keep
/// these columns non-negative; clamp rather than panic if one ever isn't.
fn xp_u64(v: i64) -> u64 {
    v.max(0) as u64
}

/// Fields for creating a quest.
#[derive(Debug, Clone)]
pub struct NewQuest {
    pub title: String,
    pub description: String,
    pub category: SkillCategory,
    /// Base XP per completion; defaults to [`DEFAULT_QUEST_XP`].
    pub xp_reward: Option<u64>,
}

/// Fields for creating a mission. The XP reward is frozen from the
/// difficulty at creation and never recomputed.
#[derive(Debug, Clone)]
pub struct NewMission {
    pub title: String,
    pub description: String,
    pub category: SkillCategory,
    pub difficulty: Difficulty,
    pub deadline: Option<NaiveDate>,
    pub subtasks: Vec<String>,
}

/// Fields for creating a boss challenge.
#[derive(Debug, Clone)]
pub struct NewBoss {
    pub title: String,
    pub description: String,
    pub category: SkillCategory,
    pub daily_task: String,
    /// Challenge length in days; defaults to [`DEFAULT_BOSS_DURATION`].
    pub duration_days: Option<u32>,
    /// One-time completion bonus; defaults to [`DEFAULT_BOSS_REWARD`].
    pub xp_reward: Option<u64>,
}

/// The engine: storage plus an injected clock. Cheap to clone.
#[derive(Clone)]
pub struct Engine {
    db: Database,
    clock: Arc<dyn Clock>,
}

impl Engine {
    pub fn new(db: Database, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    fn now_string(&self) -> String {
        self.clock.now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
    }

    fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Level-transition report for an award of `xp` that brought the user's
    /// total to `new_total`.
    fn outcome(new_total: i64, xp: i64) -> CompletionOutcome {
        let new_total = xp_u64(new_total);
        let xp = xp_u64(xp);
        let old_level = level_for_xp(new_total - xp.min(new_total));
        let new_level = level_for_xp(new_total);
        let leveled_up = new_level > old_level;
        CompletionOutcome {
            xp_earned: xp,
            leveled_up,
            new_level,
            new_title: leveled_up.then(|| title_for_level(new_level)),
        }
    }

    fn require_title(title: &str) -> Result<(), LifequestError> {
        if title.trim().is_empty() {
            return Err(LifequestError::bad_input("title must not be empty"));
        }
        Ok(())
    }

    async fn require_user(&self, user_id: &UserId) -> Result<UserRow, LifequestError> {
        users::get_user(&self.db, user_id.as_str())
            .await?
            .ok_or(LifequestError::NotFound)
    }

    // --- Users ---

    /// Register a new user. Names are unique.
    pub async fn register_user(&self, name: &str) -> Result<Profile, LifequestError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LifequestError::bad_input("name must not be empty"));
        }
        if users::find_by_name(&self.db, name).await?.is_some() {
            return Err(LifequestError::conflict("name already taken"));
        }
        let now = self.now_string();
        let user = UserRow {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            total_xp: 0,
            created_at: now.clone(),
            updated_at: now,
        };
        users::create_user(&self.db, &user).await?;
        info!(user_id = %user.id, name, "user registered");
        Ok(Self::profile_from(user))
    }

    /// A user's profile with derived level, title, and progress.
    pub async fn get_profile(&self, user_id: &UserId) -> Result<Profile, LifequestError> {
        let user = self.require_user(user_id).await?;
        Ok(Self::profile_from(user))
    }

    /// Look up a profile by unique name.
    pub async fn find_profile(&self, name: &str) -> Result<Profile, LifequestError> {
        let user = users::find_by_name(&self.db, name)
            .await?
            .ok_or(LifequestError::NotFound)?;
        Ok(Self::profile_from(user))
    }

    fn profile_from(user: UserRow) -> Profile {
        let total_xp = xp_u64(user.total_xp);
        let progress = progress_within_level(total_xp);
        Profile {
            id: user.id,
            name: user.name,
            total_xp,
            title: title_for_level(progress.level),
            progress,
        }
    }

    /// All six skill balances, zero-filled for categories with no awards.
    pub async fn get_skills(&self, user_id: &UserId) -> Result<Vec<SkillView>, LifequestError> {
        let rows = skills::skills_for_user(&self.db, user_id.as_str()).await?;
        Ok(SkillCategory::iter()
            .map(|category| {
                let xp = rows
                    .iter()
                    .find(|s| s.category == category)
                    .map_or(0, |s| xp_u64(s.xp));
                SkillView {
                    category,
                    xp,
                    level: level_for_xp(xp),
                }
            })
            .collect())
    }

    /// Top users by XP with 1-based ranks.
    pub async fn leaderboard(&self, limit: u32) -> Result<Vec<LeaderboardEntry>, LifequestError> {
        let rows = users::leaderboard(&self.db, limit).await?;
        Ok(rows
            .into_iter()
            .enumerate()
            .map(|(i, u)| {
                let total_xp = xp_u64(u.total_xp);
                let level = level_for_xp(total_xp);
                LeaderboardEntry {
                    rank: i as u32 + 1,
                    name: u.name,
                    total_xp,
                    level,
                    title: title_for_level(level),
                }
            })
            .collect())
    }

    /// Reconcile the XP aggregate against its durable records.
    pub async fn xp_audit(&self, user_id: &UserId) -> Result<XpAudit, LifequestError> {
        let user = self.require_user(user_id).await?;
        let uid = user_id.as_str();
        let quest_xp = xp_u64(stats::quest_xp_total(&self.db, uid).await?);
        let mission_xp = xp_u64(stats::mission_xp_total(&self.db, uid).await?);
        let boss_xp = xp_u64(stats::boss_xp_total(&self.db, uid).await?);
        let total_xp = xp_u64(user.total_xp);
        Ok(XpAudit {
            quest_xp,
            mission_xp,
            boss_xp,
            total_xp,
            consistent: quest_xp + mission_xp + boss_xp == total_xp,
        })
    }

    // --- Quests ---

    pub async fn create_quest(
        &self,
        user_id: &UserId,
        new: NewQuest,
    ) -> Result<QuestView, LifequestError> {
        Self::require_title(&new.title)?;
        let xp_reward = new.xp_reward.unwrap_or(DEFAULT_QUEST_XP);
        if xp_reward == 0 {
            return Err(LifequestError::bad_input("xp_reward must be positive"));
        }
        self.require_user(user_id).await?;

        let now = self.now_string();
        let quest = QuestRow {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.as_str().to_string(),
            title: new.title.trim().to_string(),
            description: new.description,
            skill_category: new.category,
            xp_reward: xp_reward as i64,
            streak: Streak::default(),
            is_active: true,
            created_at: now.clone(),
            updated_at: now,
        };
        quests::insert_quest(&self.db, &quest).await?;
        info!(quest_id = %quest.id, "quest created");
        Ok(Self::quest_view(quest, false))
    }

    /// The user's active quests, flagged with today's completion state.
    pub async fn list_quests(&self, user_id: &UserId) -> Result<Vec<QuestView>, LifequestError> {
        let rows = quests::list_active(&self.db, user_id.as_str()).await?;
        let done_today = quests::completed_on(&self.db, user_id.as_str(), self.today()).await?;
        Ok(rows
            .into_iter()
            .map(|q| {
                let completed_today = done_today.contains(&q.id);
                Self::quest_view(q, completed_today)
            })
            .collect())
    }

    fn quest_view(q: QuestRow, completed_today: bool) -> QuestView {
        QuestView {
            id: q.id,
            title: q.title,
            description: q.description,
            skill_category: q.skill_category,
            xp_reward: xp_u64(q.xp_reward),
            streak: q.streak,
            completed_today,
        }
    }

    /// Complete a quest for today: streak transition, multiplied reward, and
    /// the atomic record/aggregate write.
    pub async fn complete_quest(
        &self,
        user_id: &UserId,
        quest_id: &QuestId,
    ) -> Result<CompletionOutcome, LifequestError> {
        let quest = quests::get_quest(&self.db, quest_id.as_str(), user_id.as_str())
            .await?
            .ok_or(LifequestError::NotFound)?;
        if !quest.is_active {
            return Err(LifequestError::NotFound);
        }

        let today = self.today();
        let streak = quest.streak.advance(today);
        let xp_earned = quest_xp(xp_u64(quest.xp_reward), streak.current) as i64;

        let write = quests::QuestCompletionWrite {
            completion: QuestCompletionRow {
                id: Uuid::new_v4().to_string(),
                quest_id: quest.id.clone(),
                user_id: user_id.as_str().to_string(),
                day: today,
                completed_at: self.now_string(),
                xp_earned,
            },
            category: quest.skill_category,
            streak,
            now: self.now_string(),
        };

        match quests::apply_completion(&self.db, write).await? {
            CompletionApplied::Applied { new_total_xp } => {
                let outcome = Self::outcome(new_total_xp, xp_earned);
                info!(
                    quest_id = %quest_id,
                    xp = outcome.xp_earned,
                    streak = streak.current,
                    leveled_up = outcome.leveled_up,
                    "quest completed"
                );
                Ok(outcome)
            }
            CompletionApplied::AlreadyCompleted => {
                Err(LifequestError::conflict("already completed today"))
            }
        }
    }

    /// Soft-activate or deactivate a quest.
    pub async fn set_quest_active(
        &self,
        user_id: &UserId,
        quest_id: &QuestId,
        active: bool,
    ) -> Result<(), LifequestError> {
        let now = self.now_string();
        if quests::set_active(&self.db, quest_id.as_str(), user_id.as_str(), active, &now).await? {
            Ok(())
        } else {
            Err(LifequestError::NotFound)
        }
    }

    /// Hard-delete a quest and its completion history. Previously awarded XP
    /// stays in the aggregates; history is not rewound.
    pub async fn delete_quest(
        &self,
        user_id: &UserId,
        quest_id: &QuestId,
    ) -> Result<(), LifequestError> {
        if quests::delete_quest(&self.db, quest_id.as_str(), user_id.as_str()).await? {
            info!(quest_id = %quest_id, "quest deleted");
            Ok(())
        } else {
            Err(LifequestError::NotFound)
        }
    }

    /// The user's quest completion history, oldest first.
    pub async fn xp_history(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<QuestCompletionRow>, LifequestError> {
        quests::completions_for_user(&self.db, user_id.as_str()).await
    }

    // --- Missions ---

    pub async fn create_mission(
        &self,
        user_id: &UserId,
        new: NewMission,
    ) -> Result<MissionView, LifequestError> {
        Self::require_title(&new.title)?;
        self.require_user(user_id).await?;

        let now = self.now_string();
        let mission = MissionRow {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.as_str().to_string(),
            title: new.title.trim().to_string(),
            description: new.description,
            skill_category: new.category,
            difficulty: new.difficulty,
            xp_reward: new.difficulty.base_xp() as i64,
            deadline: new.deadline.map(|d| d.to_string()),
            status: MissionStatus::Active,
            completed_at: None,
            created_at: now.clone(),
            updated_at: now,
        };
        let subtasks: Vec<String> = new
            .subtasks
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        missions::insert_mission(&self.db, &mission, &subtasks).await?;
        info!(mission_id = %mission.id, difficulty = %mission.difficulty, "mission created");
        self.mission_view(mission).await
    }

    pub async fn list_missions(
        &self,
        user_id: &UserId,
        status: MissionStatus,
    ) -> Result<Vec<MissionView>, LifequestError> {
        let rows = missions::list_by_status(&self.db, user_id.as_str(), status).await?;
        let mut views = Vec::with_capacity(rows.len());
        for row in rows {
            views.push(self.mission_view(row).await?);
        }
        Ok(views)
    }

    async fn mission_view(&self, m: MissionRow) -> Result<MissionView, LifequestError> {
        let subtasks = missions::subtasks_for(&self.db, &m.id).await?;
        let total = subtasks.len();
        let done = subtasks.iter().filter(|s| s.completed).count();
        let progress = if total > 0 {
            done as f64 / total as f64
        } else {
            0.0
        };
        Ok(MissionView {
            id: m.id,
            title: m.title,
            description: m.description,
            skill_category: m.skill_category,
            difficulty: m.difficulty,
            xp_reward: xp_u64(m.xp_reward),
            deadline: m.deadline,
            status: m.status,
            subtasks: subtasks
                .into_iter()
                .map(|s: SubtaskRow| SubtaskView {
                    index: s.idx.max(0) as u32,
                    title: s.title,
                    completed: s.completed,
                })
                .collect(),
            progress,
        })
    }

    /// Flip one subtask's flag. Pure bookkeeping; awards no XP.
    pub async fn toggle_subtask(
        &self,
        user_id: &UserId,
        mission_id: &MissionId,
        index: u32,
    ) -> Result<(), LifequestError> {
        missions::get_mission(&self.db, mission_id.as_str(), user_id.as_str())
            .await?
            .ok_or(LifequestError::NotFound)?;
        if missions::toggle_subtask(&self.db, mission_id.as_str(), i64::from(index)).await? {
            Ok(())
        } else {
            Err(LifequestError::bad_input("subtask index out of range"))
        }
    }

    /// Complete a mission, awarding its frozen reward in full regardless of
    /// subtask state. One-way: re-completion is a Conflict.
    pub async fn complete_mission(
        &self,
        user_id: &UserId,
        mission_id: &MissionId,
    ) -> Result<CompletionOutcome, LifequestError> {
        let mission = missions::get_mission(&self.db, mission_id.as_str(), user_id.as_str())
            .await?
            .ok_or(LifequestError::NotFound)?;
        if mission.status != MissionStatus::Active {
            return Err(LifequestError::conflict("mission already completed"));
        }

        let write = missions::MissionCompletionWrite {
            mission_id: mission.id.clone(),
            user_id: user_id.as_str().to_string(),
            category: mission.skill_category,
            xp_earned: mission.xp_reward,
            now: self.now_string(),
        };

        match missions::apply_completion(&self.db, write).await? {
            CompletionApplied::Applied { new_total_xp } => {
                let outcome = Self::outcome(new_total_xp, mission.xp_reward);
                info!(
                    mission_id = %mission_id,
                    xp = outcome.xp_earned,
                    leveled_up = outcome.leveled_up,
                    "mission completed"
                );
                Ok(outcome)
            }
            CompletionApplied::AlreadyCompleted => {
                Err(LifequestError::conflict("mission already completed"))
            }
        }
    }

    /// One-way transition to `failed`. Awards nothing.
    pub async fn fail_mission(
        &self,
        user_id: &UserId,
        mission_id: &MissionId,
    ) -> Result<(), LifequestError> {
        missions::get_mission(&self.db, mission_id.as_str(), user_id.as_str())
            .await?
            .ok_or(LifequestError::NotFound)?;
        let now = self.now_string();
        if missions::fail_mission(&self.db, mission_id.as_str(), user_id.as_str(), &now).await? {
            Ok(())
        } else {
            Err(LifequestError::conflict("mission is not active"))
        }
    }

    pub async fn delete_mission(
        &self,
        user_id: &UserId,
        mission_id: &MissionId,
    ) -> Result<(), LifequestError> {
        if missions::delete_mission(&self.db, mission_id.as_str(), user_id.as_str()).await? {
            Ok(())
        } else {
            Err(LifequestError::NotFound)
        }
    }

    // --- Bosses ---

    pub async fn create_boss(
        &self,
        user_id: &UserId,
        new: NewBoss,
    ) -> Result<BossView, LifequestError> {
        Self::require_title(&new.title)?;
        if new.daily_task.trim().is_empty() {
            return Err(LifequestError::bad_input("daily_task must not be empty"));
        }
        let duration = new.duration_days.unwrap_or(DEFAULT_BOSS_DURATION);
        if duration == 0 {
            return Err(LifequestError::bad_input("duration must be positive"));
        }
        self.require_user(user_id).await?;

        let now = self.now_string();
        let boss = BossRow {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.as_str().to_string(),
            title: new.title.trim().to_string(),
            description: new.description,
            skill_category: new.category,
            duration_days: i64::from(duration),
            daily_task: new.daily_task.trim().to_string(),
            xp_reward: new.xp_reward.unwrap_or(DEFAULT_BOSS_REWARD) as i64,
            start_date: self.today(),
            status: BossStatus::Active,
            created_at: now.clone(),
            updated_at: now,
        };
        bosses::insert_boss(&self.db, &boss).await?;
        info!(boss_id = %boss.id, duration, "boss created");
        self.boss_view(boss).await
    }

    pub async fn list_bosses(
        &self,
        user_id: &UserId,
        status: BossStatus,
    ) -> Result<Vec<BossView>, LifequestError> {
        let rows = bosses::list_by_status(&self.db, user_id.as_str(), status).await?;
        let mut views = Vec::with_capacity(rows.len());
        for row in rows {
            views.push(self.boss_view(row).await?);
        }
        Ok(views)
    }

    async fn boss_view(&self, b: BossRow) -> Result<BossView, LifequestError> {
        let progress_rows = bosses::progress_for(&self.db, &b.id).await?;
        let today = self.today();
        let days_completed = progress_rows.iter().filter(|p| p.completed).count() as u32;
        let completed_today = progress_rows
            .iter()
            .any(|p| p.completed && p.day == today);
        let duration = b.duration_days.max(0) as u32;
        let progress = if duration > 0 {
            f64::from(days_completed) / f64::from(duration)
        } else {
            0.0
        };
        Ok(BossView {
            id: b.id,
            title: b.title,
            description: b.description,
            skill_category: b.skill_category,
            daily_task: b.daily_task,
            duration_days: duration,
            xp_reward: xp_u64(b.xp_reward),
            start_date: b.start_date,
            status: b.status,
            days_completed,
            completed_today,
            progress,
        })
    }

    /// Log today's boss hit. Pays the small daily reward, or the one-time
    /// bonus (instead of it) on the day the duration target is reached.
    pub async fn complete_boss_day(
        &self,
        user_id: &UserId,
        boss_id: &BossId,
    ) -> Result<BossDayOutcome, LifequestError> {
        let boss = bosses::get_boss(&self.db, boss_id.as_str(), user_id.as_str())
            .await?
            .ok_or(LifequestError::NotFound)?;
        if boss.status != BossStatus::Active {
            return Err(LifequestError::conflict("boss already completed"));
        }

        let write = bosses::BossDayWrite {
            boss_id: boss.id.clone(),
            user_id: user_id.as_str().to_string(),
            category: boss.skill_category,
            day: self.today(),
            now: self.now_string(),
            daily_xp: BOSS_DAILY_XP as i64,
            completion_reward: boss.xp_reward,
            duration_days: boss.duration_days,
        };

        match bosses::apply_day(&self.db, write).await? {
            Some(applied) => {
                let completion = Self::outcome(applied.new_total_xp, applied.xp_earned);
                info!(
                    boss_id = %boss_id,
                    days_completed = applied.days_completed,
                    defeated = applied.defeated,
                    xp = completion.xp_earned,
                    "boss day completed"
                );
                Ok(BossDayOutcome {
                    completion,
                    days_completed: applied.days_completed.max(0) as u32,
                    defeated: applied.defeated,
                })
            }
            None => Err(LifequestError::conflict("already completed today")),
        }
    }

    pub async fn delete_boss(
        &self,
        user_id: &UserId,
        boss_id: &BossId,
    ) -> Result<(), LifequestError> {
        if bosses::delete_boss(&self.db, boss_id.as_str(), user_id.as_str()).await? {
            Ok(())
        } else {
            Err(LifequestError::NotFound)
        }
    }

    // --- Dashboard ---

    /// Headline numbers: counts, best streak, and XP earned today and over
    /// the trailing week.
    pub async fn dashboard(&self, user_id: &UserId) -> Result<DashboardStats, LifequestError> {
        self.require_user(user_id).await?;
        let uid = user_id.as_str();
        let today = self.today();
        let week_ago = today - chrono::Days::new(7);

        let active_quests = stats::active_quest_count(&self.db, uid).await?;
        let missions_done =
            missions::count_by_status(&self.db, uid, MissionStatus::Completed).await?;
        let active_bosses = bosses::count_by_status(&self.db, uid, BossStatus::Active).await?;
        let best_streak = stats::best_streak(&self.db, uid).await?;
        let today_xp = stats::quest_xp_since(&self.db, uid, today).await?;
        let week_xp = stats::quest_xp_since(&self.db, uid, week_ago).await?;

        Ok(DashboardStats {
            active_quests: xp_u64(active_quests),
            missions_done: xp_u64(missions_done),
            active_bosses: xp_u64(active_bosses),
            best_streak: best_streak.max(0) as u32,
            today_xp: xp_u64(today_xp),
            week_xp: xp_u64(week_xp),
        })
    }
}
