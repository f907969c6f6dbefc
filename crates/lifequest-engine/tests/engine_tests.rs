// SPDX-FileCopyrightText: 2026 Lifequest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end engine tests over in-memory SQLite with a pinned clock.

use std::sync::Arc;

use lifequest_core::types::{BossId, BossStatus, MissionId, MissionStatus, QuestId, SkillCategory, UserId};
use lifequest_core::{Difficulty, LifequestError, Title, BOSS_DAILY_XP};
use lifequest_engine::{Engine, FixedClock, NewBoss, NewMission, NewQuest};
use lifequest_storage::Database;

async fn engine_at(rfc3339: &str) -> (Engine, Arc<FixedClock>) {
    let db = Database::open_in_memory().await.expect("open database");
    let clock = Arc::new(FixedClock::at(rfc3339));
    (Engine::new(db, clock.clone()), clock)
}

async fn setup() -> (Engine, Arc<FixedClock>, UserId) {
    let (engine, clock) = engine_at("2026-03-10T09:00:00Z").await;
    let profile = engine.register_user("ada").await.expect("register");
    (engine, clock, UserId::from(profile.id))
}

async fn add_quest(engine: &Engine, user: &UserId, xp: Option<u64>) -> QuestId {
    let view = engine
        .create_quest(
            user,
            NewQuest {
                title: "Morning run".into(),
                description: "5k before work".into(),
                category: SkillCategory::Health,
                xp_reward: xp,
            },
        )
        .await
        .expect("create quest");
    QuestId::from(view.id)
}

#[tokio::test]
async fn register_rejects_duplicate_and_empty_names() {
    let (engine, _clock) = engine_at("2026-03-10T09:00:00Z").await;
    engine.register_user("ada").await.expect("first register");

    let dup = engine.register_user("ada").await;
    assert!(matches!(dup, Err(LifequestError::Conflict { .. })));

    let empty = engine.register_user("   ").await;
    assert!(matches!(empty, Err(LifequestError::BadInput { .. })));
}

#[tokio::test]
async fn fresh_user_is_a_level_zero_novice() {
    let (engine, _clock, user) = setup().await;
    let profile = engine.get_profile(&user).await.expect("profile");
    assert_eq!(profile.total_xp, 0);
    assert_eq!(profile.progress.level, 0);
    assert_eq!(profile.title, Title::Novice);

    let skills = engine.get_skills(&user).await.expect("skills");
    assert_eq!(skills.len(), 6);
    assert!(skills.iter().all(|s| s.xp == 0 && s.level == 0));
}

#[tokio::test]
async fn quest_completion_awards_xp_once_per_day() {
    let (engine, _clock, user) = setup().await;
    let quest = add_quest(&engine, &user, Some(15)).await;

    let outcome = engine.complete_quest(&user, &quest).await.expect("complete");
    assert_eq!(outcome.xp_earned, 15);
    assert!(!outcome.leveled_up);

    // Same calendar day again: conflict, and no second award.
    let again = engine.complete_quest(&user, &quest).await;
    assert!(matches!(again, Err(LifequestError::Conflict { .. })));

    let profile = engine.get_profile(&user).await.expect("profile");
    assert_eq!(profile.total_xp, 15);
    let history = engine.xp_history(&user).await.expect("history");
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn racing_completions_yield_one_success_and_one_conflict() {
    let (engine, _clock, user) = setup().await;
    let quest = add_quest(&engine, &user, Some(15)).await;

    let (a, b) = tokio::join!(
        engine.complete_quest(&user, &quest),
        engine.complete_quest(&user, &quest),
    );

    let results = [a, b];
    let successes = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(LifequestError::Conflict { .. })))
        .count();
    assert_eq!(successes, 1);
    assert_eq!(conflicts, 1);

    let profile = engine.get_profile(&user).await.expect("profile");
    assert_eq!(profile.total_xp, 15);
    let history = engine.xp_history(&user).await.expect("history");
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn consecutive_days_grow_the_streak_and_a_gap_resets_it() {
    let (engine, clock, user) = setup().await;
    let quest = add_quest(&engine, &user, Some(15)).await;

    for _ in 0..3 {
        engine.complete_quest(&user, &quest).await.expect("complete");
        clock.advance_days(1);
    }

    let quests = engine.list_quests(&user).await.expect("list");
    assert_eq!(quests[0].streak.current, 3);
    assert_eq!(quests[0].streak.best, 3);

    // Skip a day; the next completion starts over at 1 but best survives.
    clock.advance_days(1);
    engine.complete_quest(&user, &quest).await.expect("complete");
    let quests = engine.list_quests(&user).await.expect("list");
    assert_eq!(quests[0].streak.current, 1);
    assert_eq!(quests[0].streak.best, 3);
}

#[tokio::test]
async fn streak_multiplier_scales_the_daily_reward() {
    let (engine, clock, user) = setup().await;
    let quest = add_quest(&engine, &user, Some(15)).await;

    // Days 1..=6 pay the base reward.
    let mut last = 0;
    for _ in 0..6 {
        last = engine
            .complete_quest(&user, &quest)
            .await
            .expect("complete")
            .xp_earned;
        clock.advance_days(1);
    }
    assert_eq!(last, 15);

    // Day 7 reaches the 1.5x tier: round(15 * 1.5) = 23.
    let day7 = engine.complete_quest(&user, &quest).await.expect("complete");
    assert_eq!(day7.xp_earned, 23);
}

#[tokio::test]
async fn completing_inactive_quest_is_not_found() {
    let (engine, _clock, user) = setup().await;
    let quest = add_quest(&engine, &user, None).await;
    engine
        .set_quest_active(&user, &quest, false)
        .await
        .expect("deactivate");

    let res = engine.complete_quest(&user, &quest).await;
    assert!(matches!(res, Err(LifequestError::NotFound)));
}

#[tokio::test]
async fn quests_are_owner_scoped() {
    let (engine, _clock, user) = setup().await;
    let quest = add_quest(&engine, &user, None).await;

    let other = engine.register_user("bob").await.expect("register");
    let other = UserId::from(other.id);
    let res = engine.complete_quest(&other, &quest).await;
    assert!(matches!(res, Err(LifequestError::NotFound)));
    let res = engine.delete_quest(&other, &quest).await;
    assert!(matches!(res, Err(LifequestError::NotFound)));
}

#[tokio::test]
async fn deleting_a_quest_keeps_earned_xp() {
    let (engine, _clock, user) = setup().await;
    let quest = add_quest(&engine, &user, Some(40)).await;
    engine.complete_quest(&user, &quest).await.expect("complete");

    engine.delete_quest(&user, &quest).await.expect("delete");

    // History rows are purged with the quest, but aggregates keep the award.
    let history = engine.xp_history(&user).await.expect("history");
    assert!(history.is_empty());
    let profile = engine.get_profile(&user).await.expect("profile");
    assert_eq!(profile.total_xp, 40);
    let skills = engine.get_skills(&user).await.expect("skills");
    let health = skills
        .iter()
        .find(|s| s.category == SkillCategory::Health)
        .expect("health skill");
    assert_eq!(health.xp, 40);
}

#[tokio::test]
async fn level_up_is_reported_with_the_new_title() {
    let (engine, _clock, user) = setup().await;
    let quest = add_quest(&engine, &user, Some(120)).await;

    // 0 -> 120 XP crosses the level 1 threshold at 100.
    let outcome = engine.complete_quest(&user, &quest).await.expect("complete");
    assert_eq!(outcome.xp_earned, 120);
    assert!(outcome.leveled_up);
    assert_eq!(outcome.new_level, 1);
    assert_eq!(outcome.new_title, Some(Title::Novice));
}

#[tokio::test]
async fn mission_pays_its_frozen_reward_regardless_of_subtasks() {
    let (engine, _clock, user) = setup().await;
    let view = engine
        .create_mission(
            &user,
            NewMission {
                title: "Ship the portfolio site".into(),
                description: String::new(),
                category: SkillCategory::Career,
                difficulty: Difficulty::Hard,
                deadline: None,
                subtasks: vec!["Design".into(), "Build".into(), "Deploy".into()],
            },
        )
        .await
        .expect("create mission");
    assert_eq!(view.xp_reward, 50);
    assert_eq!(view.subtasks.len(), 3);
    let mission = MissionId::from(view.id);

    // Only one of three subtasks done; the reward is unaffected.
    engine
        .toggle_subtask(&user, &mission, 0)
        .await
        .expect("toggle");
    let outcome = engine
        .complete_mission(&user, &mission)
        .await
        .expect("complete");
    assert_eq!(outcome.xp_earned, 50);

    // Completion is one-way.
    let again = engine.complete_mission(&user, &mission).await;
    assert!(matches!(again, Err(LifequestError::Conflict { .. })));

    let done = engine
        .list_missions(&user, MissionStatus::Completed)
        .await
        .expect("list");
    assert_eq!(done.len(), 1);
}

#[tokio::test]
async fn subtask_index_out_of_range_is_bad_input() {
    let (engine, _clock, user) = setup().await;
    let view = engine
        .create_mission(
            &user,
            NewMission {
                title: "Read the borrow checker paper".into(),
                description: String::new(),
                category: SkillCategory::Knowledge,
                difficulty: Difficulty::Easy,
                deadline: None,
                subtasks: vec!["Find it".into()],
            },
        )
        .await
        .expect("create mission");
    let mission = MissionId::from(view.id);

    let res = engine.toggle_subtask(&user, &mission, 5).await;
    assert!(matches!(res, Err(LifequestError::BadInput { .. })));
}

#[tokio::test]
async fn failed_mission_awards_nothing_and_cannot_complete() {
    let (engine, _clock, user) = setup().await;
    let view = engine
        .create_mission(
            &user,
            NewMission {
                title: "Run a marathon".into(),
                description: String::new(),
                category: SkillCategory::Health,
                difficulty: Difficulty::Epic,
                deadline: None,
                subtasks: vec![],
            },
        )
        .await
        .expect("create mission");
    let mission = MissionId::from(view.id);

    engine.fail_mission(&user, &mission).await.expect("fail");
    let res = engine.complete_mission(&user, &mission).await;
    assert!(matches!(res, Err(LifequestError::Conflict { .. })));

    let profile = engine.get_profile(&user).await.expect("profile");
    assert_eq!(profile.total_xp, 0);
}

#[tokio::test]
async fn boss_pays_daily_xp_and_the_bonus_on_the_final_day() {
    let (engine, clock, user) = setup().await;
    let view = engine
        .create_boss(
            &user,
            NewBoss {
                title: "30 days of writing".into(),
                description: String::new(),
                category: SkillCategory::Creativity,
                daily_task: "Write 500 words".into(),
                duration_days: Some(30),
                xp_reward: None,
            },
        )
        .await
        .expect("create boss");
    let boss = BossId::from(view.id);

    // Days 1..=29 each pay the small daily reward.
    let mut last = None;
    for _ in 0..29 {
        last = Some(
            engine
                .complete_boss_day(&user, &boss)
                .await
                .expect("daily hit"),
        );
        clock.advance_days(1);
    }
    let day29 = last.expect("29 hits");
    assert_eq!(day29.completion.xp_earned, BOSS_DAILY_XP);
    assert_eq!(day29.days_completed, 29);
    assert!(!day29.defeated);

    // Day 30 pays the one-time bonus instead of the daily reward and
    // transitions the boss to completed.
    let day30 = engine
        .complete_boss_day(&user, &boss)
        .await
        .expect("final hit");
    assert_eq!(day30.completion.xp_earned, 500);
    assert!(day30.defeated);

    let profile = engine.get_profile(&user).await.expect("profile");
    assert_eq!(profile.total_xp, 29 * BOSS_DAILY_XP + 500);

    // A defeated boss takes no further hits.
    clock.advance_days(1);
    let after = engine.complete_boss_day(&user, &boss).await;
    assert!(matches!(after, Err(LifequestError::Conflict { .. })));

    let done = engine
        .list_bosses(&user, BossStatus::Completed)
        .await
        .expect("list");
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].days_completed, 30);
}

#[tokio::test]
async fn boss_day_is_at_most_once_per_calendar_day() {
    let (engine, _clock, user) = setup().await;
    let view = engine
        .create_boss(
            &user,
            NewBoss {
                title: "Cold showers".into(),
                description: String::new(),
                category: SkillCategory::Health,
                daily_task: "2 minutes".into(),
                duration_days: Some(7),
                xp_reward: Some(100),
            },
        )
        .await
        .expect("create boss");
    let boss = BossId::from(view.id);

    engine.complete_boss_day(&user, &boss).await.expect("hit");
    let again = engine.complete_boss_day(&user, &boss).await;
    assert!(matches!(again, Err(LifequestError::Conflict { .. })));

    let active = engine
        .list_bosses(&user, BossStatus::Active)
        .await
        .expect("list");
    assert_eq!(active[0].days_completed, 1);
    assert!(active[0].completed_today);
}

#[tokio::test]
async fn dashboard_and_leaderboard_reflect_activity() {
    let (engine, clock, user) = setup().await;
    let quest = add_quest(&engine, &user, Some(15)).await;
    engine.complete_quest(&user, &quest).await.expect("complete");
    clock.advance_days(1);
    engine.complete_quest(&user, &quest).await.expect("complete");

    let stats = engine.dashboard(&user).await.expect("dashboard");
    assert_eq!(stats.active_quests, 1);
    assert_eq!(stats.best_streak, 2);
    assert_eq!(stats.today_xp, 15);
    assert_eq!(stats.week_xp, 30);

    let rival = engine.register_user("bob").await.expect("register");
    let rival = UserId::from(rival.id);
    let rival_quest = add_quest(&engine, &rival, Some(100)).await;
    engine
        .complete_quest(&rival, &rival_quest)
        .await
        .expect("complete");

    let board = engine.leaderboard(10).await.expect("leaderboard");
    assert_eq!(board.len(), 2);
    assert_eq!(board[0].name, "bob");
    assert_eq!(board[0].rank, 1);
    assert_eq!(board[0].total_xp, 100);
    assert_eq!(board[1].name, "ada");
    assert_eq!(board[1].rank, 2);
}

#[tokio::test]
async fn xp_audit_reconciles_all_three_sources() {
    let (engine, clock, user) = setup().await;

    let quest = add_quest(&engine, &user, Some(15)).await;
    engine.complete_quest(&user, &quest).await.expect("quest");

    let mission = engine
        .create_mission(
            &user,
            NewMission {
                title: "File taxes".into(),
                description: String::new(),
                category: SkillCategory::Finance,
                difficulty: Difficulty::Medium,
                deadline: None,
                subtasks: vec![],
            },
        )
        .await
        .expect("create mission");
    let mission = MissionId::from(mission.id);
    engine
        .complete_mission(&user, &mission)
        .await
        .expect("mission");

    let boss = engine
        .create_boss(
            &user,
            NewBoss {
                title: "No sugar".into(),
                description: String::new(),
                category: SkillCategory::Health,
                daily_task: "Skip dessert".into(),
                duration_days: Some(14),
                xp_reward: None,
            },
        )
        .await
        .expect("create boss");
    let boss = BossId::from(boss.id);
    engine.complete_boss_day(&user, &boss).await.expect("boss");
    clock.advance_days(1);
    engine.complete_boss_day(&user, &boss).await.expect("boss");

    let audit = engine.xp_audit(&user).await.expect("audit");
    assert_eq!(audit.quest_xp, 15);
    assert_eq!(audit.mission_xp, 25);
    assert_eq!(audit.boss_xp, 2 * BOSS_DAILY_XP);
    assert!(audit.consistent);
    assert_eq!(
        audit.total_xp,
        audit.quest_xp + audit.mission_xp + audit.boss_xp
    );
}
