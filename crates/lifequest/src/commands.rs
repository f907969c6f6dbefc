// SPDX-FileCopyrightText: 2026 Lifequest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subcommand handlers.
//!
//! Each handler resolves the acting user by name, calls one engine operation,
//! and renders the result either as aligned text or as JSON when `--json` is
//! given.

use chrono::NaiveDate;
use clap::Subcommand;
use lifequest_core::types::{
    BossId, BossStatus, MissionId, MissionStatus, QuestId, SkillCategory, UserId,
};
use lifequest_core::{Difficulty, LifequestError};
use lifequest_engine::{CompletionOutcome, Engine, NewBoss, NewMission, NewQuest, Profile};
use serde::Serialize;

/// User account commands.
#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Register a new user.
    Register { name: String },
    /// Show the user's profile and level progress.
    Profile,
    /// Show per-category skill XP.
    Skills,
    /// Reconcile the XP total against its completion records.
    Audit,
}

/// Daily quest commands.
#[derive(Subcommand, Debug)]
pub enum QuestCommands {
    /// Create a daily quest.
    Add {
        title: String,
        /// Skill category the quest trains.
        #[arg(long, default_value = "health")]
        category: SkillCategory,
        /// Base XP per completion.
        #[arg(long)]
        xp: Option<u64>,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// List active quests with streaks and today's state.
    List,
    /// Complete a quest for today.
    Done { id: String },
    /// Pause a quest without losing its history.
    Pause { id: String },
    /// Resume a paused quest.
    Resume { id: String },
    /// Delete a quest and its completion history. Earned XP stays.
    Delete { id: String },
    /// Show the completion history.
    History,
}

/// One-time mission commands.
#[derive(Subcommand, Debug)]
pub enum MissionCommands {
    /// Create a mission. The reward is fixed by difficulty at creation.
    Add {
        title: String,
        /// easy, medium, hard, or epic.
        #[arg(long, default_value = "medium")]
        difficulty: Difficulty,
        #[arg(long, default_value = "health")]
        category: SkillCategory,
        /// Optional deadline as YYYY-MM-DD.
        #[arg(long)]
        deadline: Option<NaiveDate>,
        /// Subtask titles; repeatable.
        #[arg(long = "subtask")]
        subtasks: Vec<String>,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// List missions by status.
    List {
        #[arg(long, default_value = "active")]
        status: MissionStatus,
    },
    /// Toggle one subtask's checkbox.
    Subtask { id: String, index: u32 },
    /// Complete a mission and collect its full reward.
    Done { id: String },
    /// Mark a mission failed. Awards nothing; one-way.
    Fail { id: String },
    /// Delete a mission.
    Delete { id: String },
}

/// Boss challenge commands.
#[derive(Subcommand, Debug)]
pub enum BossCommands {
    /// Create a multi-day boss challenge.
    Add {
        title: String,
        /// The task to repeat every day.
        #[arg(long)]
        task: String,
        /// Challenge length in days.
        #[arg(long)]
        days: Option<u32>,
        #[arg(long, default_value = "health")]
        category: SkillCategory,
        /// One-time bonus paid on the final day.
        #[arg(long)]
        bonus: Option<u64>,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// List bosses by status.
    List {
        #[arg(long, default_value = "active")]
        status: BossStatus,
    },
    /// Log today's hit against a boss.
    Hit { id: String },
    /// Abandon a boss challenge. Earned XP stays.
    Delete { id: String },
}

/// Render either JSON or the human line(s).
fn emit<T: Serialize>(json: bool, value: &T, human: impl FnOnce()) -> Result<(), LifequestError> {
    if json {
        let rendered = serde_json::to_string_pretty(value)
            .map_err(|e| LifequestError::Internal(e.to_string()))?;
        println!("{rendered}");
    } else {
        human();
    }
    Ok(())
}

#[derive(Serialize)]
struct StatusMessage<'a> {
    status: &'a str,
}

/// Acknowledge a mutation with no richer result to show.
fn emit_status(json: bool, status: &str) -> Result<(), LifequestError> {
    emit(json, &StatusMessage { status }, || println!("{status}"))
}

fn print_outcome(outcome: &CompletionOutcome) {
    println!("+{} XP", outcome.xp_earned);
    if outcome.leveled_up {
        match &outcome.new_title {
            Some(title) => println!("Level up! Now level {} ({title})", outcome.new_level),
            None => println!("Level up! Now level {}", outcome.new_level),
        }
    }
}

/// Look up the acting user by name.
async fn resolve_user(engine: &Engine, name: Option<&str>) -> Result<Profile, LifequestError> {
    let name = name.ok_or_else(|| {
        LifequestError::bad_input("no user selected; pass --user or set user.name in the config")
    })?;
    engine.find_profile(name).await
}

pub async fn run_user(
    engine: &Engine,
    user_name: Option<&str>,
    json: bool,
    cmd: UserCommands,
) -> Result<(), LifequestError> {
    match cmd {
        UserCommands::Register { name } => {
            let profile = engine.register_user(&name).await?;
            emit(json, &profile, || {
                println!("registered {} ({})", profile.name, profile.id);
            })
        }
        UserCommands::Profile => {
            let profile = resolve_user(engine, user_name).await?;
            emit(json, &profile, || {
                println!(
                    "{}  level {} {}  {} XP total  ({}/{} into the level)",
                    profile.name,
                    profile.progress.level,
                    profile.title,
                    profile.total_xp,
                    profile.progress.current_xp,
                    profile.progress.required_xp,
                );
            })
        }
        UserCommands::Skills => {
            let profile = resolve_user(engine, user_name).await?;
            let skills = engine.get_skills(&UserId::from(profile.id)).await?;
            emit(json, &skills, || {
                for s in &skills {
                    println!("{:<14} level {:<3} {} XP", s.category.to_string(), s.level, s.xp);
                }
            })
        }
        UserCommands::Audit => {
            let profile = resolve_user(engine, user_name).await?;
            let audit = engine.xp_audit(&UserId::from(profile.id)).await?;
            emit(json, &audit, || {
                println!(
                    "quests {} + missions {} + bosses {} = {} (total {}, {})",
                    audit.quest_xp,
                    audit.mission_xp,
                    audit.boss_xp,
                    audit.quest_xp + audit.mission_xp + audit.boss_xp,
                    audit.total_xp,
                    if audit.consistent { "consistent" } else { "INCONSISTENT" },
                );
            })
        }
    }
}

pub async fn run_quest(
    engine: &Engine,
    user_name: Option<&str>,
    json: bool,
    cmd: QuestCommands,
) -> Result<(), LifequestError> {
    let profile = resolve_user(engine, user_name).await?;
    let user = UserId::from(profile.id);
    match cmd {
        QuestCommands::Add {
            title,
            category,
            xp,
            description,
        } => {
            let quest = engine
                .create_quest(
                    &user,
                    NewQuest {
                        title,
                        description,
                        category,
                        xp_reward: xp,
                    },
                )
                .await?;
            emit(json, &quest, || {
                println!("quest created: {} ({})", quest.title, quest.id);
            })
        }
        QuestCommands::List => {
            let quests = engine.list_quests(&user).await?;
            emit(json, &quests, || {
                for q in &quests {
                    println!(
                        "{} [{}] {} XP  streak {} (best {}){}  {}",
                        q.id,
                        q.skill_category,
                        q.xp_reward,
                        q.streak.current,
                        q.streak.best,
                        if q.completed_today { "  done today" } else { "" },
                        q.title,
                    );
                }
            })
        }
        QuestCommands::Done { id } => {
            let outcome = engine.complete_quest(&user, &QuestId::from(id.as_str())).await?;
            emit(json, &outcome, || print_outcome(&outcome))
        }
        QuestCommands::Pause { id } => {
            engine
                .set_quest_active(&user, &QuestId::from(id.as_str()), false)
                .await?;
            emit_status(json, "quest paused")
        }
        QuestCommands::Resume { id } => {
            engine
                .set_quest_active(&user, &QuestId::from(id.as_str()), true)
                .await?;
            emit_status(json, "quest resumed")
        }
        QuestCommands::Delete { id } => {
            engine.delete_quest(&user, &QuestId::from(id.as_str())).await?;
            emit_status(json, "quest deleted")
        }
        QuestCommands::History => {
            let history = engine.xp_history(&user).await?;
            emit(json, &history, || {
                for entry in &history {
                    println!("{}  quest {}  +{} XP", entry.day, entry.quest_id, entry.xp_earned);
                }
            })
        }
    }
}

pub async fn run_mission(
    engine: &Engine,
    user_name: Option<&str>,
    json: bool,
    cmd: MissionCommands,
) -> Result<(), LifequestError> {
    let profile = resolve_user(engine, user_name).await?;
    let user = UserId::from(profile.id);
    match cmd {
        MissionCommands::Add {
            title,
            difficulty,
            category,
            deadline,
            subtasks,
            description,
        } => {
            let mission = engine
                .create_mission(
                    &user,
                    NewMission {
                        title,
                        description,
                        category,
                        difficulty,
                        deadline,
                        subtasks,
                    },
                )
                .await?;
            emit(json, &mission, || {
                println!(
                    "mission created: {} ({}, {} XP, {})",
                    mission.title, mission.difficulty, mission.xp_reward, mission.id,
                );
            })
        }
        MissionCommands::List { status } => {
            let missions = engine.list_missions(&user, status).await?;
            emit(json, &missions, || {
                for m in &missions {
                    let done = m.subtasks.iter().filter(|s| s.completed).count();
                    println!(
                        "{} [{}] {} XP  {}/{} subtasks  {}",
                        m.id,
                        m.difficulty,
                        m.xp_reward,
                        done,
                        m.subtasks.len(),
                        m.title,
                    );
                    for s in &m.subtasks {
                        println!("    [{}] {} {}", if s.completed { "x" } else { " " }, s.index, s.title);
                    }
                }
            })
        }
        MissionCommands::Subtask { id, index } => {
            engine
                .toggle_subtask(&user, &MissionId::from(id.as_str()), index)
                .await?;
            emit_status(json, "subtask toggled")
        }
        MissionCommands::Done { id } => {
            let outcome = engine
                .complete_mission(&user, &MissionId::from(id.as_str()))
                .await?;
            emit(json, &outcome, || print_outcome(&outcome))
        }
        MissionCommands::Fail { id } => {
            engine.fail_mission(&user, &MissionId::from(id.as_str())).await?;
            emit_status(json, "mission failed")
        }
        MissionCommands::Delete { id } => {
            engine
                .delete_mission(&user, &MissionId::from(id.as_str()))
                .await?;
            emit_status(json, "mission deleted")
        }
    }
}

pub async fn run_boss(
    engine: &Engine,
    user_name: Option<&str>,
    json: bool,
    cmd: BossCommands,
) -> Result<(), LifequestError> {
    let profile = resolve_user(engine, user_name).await?;
    let user = UserId::from(profile.id);
    match cmd {
        BossCommands::Add {
            title,
            task,
            days,
            category,
            bonus,
            description,
        } => {
            let boss = engine
                .create_boss(
                    &user,
                    NewBoss {
                        title,
                        description,
                        category,
                        daily_task: task,
                        duration_days: days,
                        xp_reward: bonus,
                    },
                )
                .await?;
            emit(json, &boss, || {
                println!(
                    "boss created: {} ({} days, {} XP bonus, {})",
                    boss.title, boss.duration_days, boss.xp_reward, boss.id,
                );
            })
        }
        BossCommands::List { status } => {
            let bosses = engine.list_bosses(&user, status).await?;
            emit(json, &bosses, || {
                for b in &bosses {
                    println!(
                        "{} [{}] day {}/{}{}  {}",
                        b.id,
                        b.skill_category,
                        b.days_completed,
                        b.duration_days,
                        if b.completed_today { "  done today" } else { "" },
                        b.title,
                    );
                }
            })
        }
        BossCommands::Hit { id } => {
            let outcome = engine
                .complete_boss_day(&user, &BossId::from(id.as_str()))
                .await?;
            emit(json, &outcome, || {
                print_outcome(&outcome.completion);
                if outcome.defeated {
                    println!("Boss defeated after {} days!", outcome.days_completed);
                } else {
                    println!("Day {} logged", outcome.days_completed);
                }
            })
        }
        BossCommands::Delete { id } => {
            engine.delete_boss(&user, &BossId::from(id.as_str())).await?;
            emit_status(json, "boss deleted")
        }
    }
}

pub async fn run_dashboard(
    engine: &Engine,
    user_name: Option<&str>,
    json: bool,
) -> Result<(), LifequestError> {
    let profile = resolve_user(engine, user_name).await?;
    let user = UserId::from(profile.id.clone());
    let stats = engine.dashboard(&user).await?;
    emit(json, &stats, || {
        println!(
            "{}  level {} {}  {} XP",
            profile.name, profile.progress.level, profile.title, profile.total_xp,
        );
        println!(
            "active quests {}  missions done {}  active bosses {}  best streak {}",
            stats.active_quests, stats.missions_done, stats.active_bosses, stats.best_streak,
        );
        println!("XP today {}  this week {}", stats.today_xp, stats.week_xp);
    })
}

pub async fn run_leaderboard(
    engine: &Engine,
    json: bool,
    limit: u32,
) -> Result<(), LifequestError> {
    let board = engine.leaderboard(limit).await?;
    emit(json, &board, || {
        for entry in &board {
            println!(
                "{:>3}. {:<20} level {:<3} {} XP  {}",
                entry.rank, entry.name, entry.level, entry.total_xp, entry.title,
            );
        }
    })
}
