// ABOUTME: Integration tests for the achievement evaluator's persistent award pass
// ABOUTME: Threshold crossing, simultaneous unlocks, XP rewards, and idempotent re-evaluation
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2025 ForgeFit

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use common::{create_test_gateway, test_user, TestGateway};
use forgefit_progress::achievements::{AchievementEvaluator, StaticCatalog};
use forgefit_progress::models::{
    Achievement, MetricType, Rarity, Timeframe, UnlockCriteria,
};

fn badge(id: &str, target: f64, xp_reward: u64) -> Achievement {
    Achievement {
        id: id.to_owned(),
        name: id.to_owned(),
        description: String::new(),
        xp_reward,
        criteria: UnlockCriteria {
            metric: MetricType::Workouts,
            target,
            timeframe: Timeframe::AllTime,
        },
        rarity: Rarity::Common,
    }
}

async fn evaluator_with(catalog: Vec<Achievement>) -> (AchievementEvaluator, TestGateway) {
    let fixture = create_test_gateway().await;
    let evaluator = AchievementEvaluator::new(
        fixture.gateway.clone(),
        Arc::new(StaticCatalog::new(catalog)),
    );
    (evaluator, fixture)
}

#[tokio::test]
async fn test_threshold_crossing_unlocks_exactly_once() {
    let (evaluator, fixture) = evaluator_with(vec![badge("fifty-club", 50.0, 120)]).await;
    let user_id = test_user();

    // Below the threshold: nothing
    let unlocked = evaluator
        .evaluate_and_award(user_id, MetricType::Workouts, 49.0)
        .await
        .unwrap();
    assert!(unlocked.is_empty());

    // Crossing 49 -> 50 unlocks and awards
    let unlocked = evaluator
        .evaluate_and_award(user_id, MetricType::Workouts, 50.0)
        .await
        .unwrap();
    assert_eq!(unlocked.len(), 1);
    assert_eq!(unlocked[0].id, "fifty-club");

    let progress = fixture.gateway.load_progress(user_id).await.unwrap();
    assert_eq!(progress.total_xp, 120);
    assert_eq!(progress.current_level, 2);
    assert!(progress.achievements_unlocked.contains("fifty-club"));

    // Same value again: idempotent no-op
    let repeat = evaluator
        .evaluate_and_award(user_id, MetricType::Workouts, 50.0)
        .await
        .unwrap();
    assert!(repeat.is_empty());
    let progress = fixture.gateway.load_progress(user_id).await.unwrap();
    assert_eq!(progress.total_xp, 120);
}

#[tokio::test]
async fn test_multiple_thresholds_unlock_simultaneously_in_catalog_order() {
    let (evaluator, fixture) = evaluator_with(vec![
        badge("first", 1.0, 10),
        badge("tenth", 10.0, 40),
        badge("fiftieth", 50.0, 100),
    ])
    .await;
    let user_id = test_user();

    // A metric jumping straight to 12 unlocks both lower badges in one pass
    let unlocked = evaluator
        .evaluate_and_award(user_id, MetricType::Workouts, 12.0)
        .await
        .unwrap();
    let ids: Vec<&str> = unlocked.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["first", "tenth"]);

    // Rewards sum in the same write
    let progress = fixture.gateway.load_progress(user_id).await.unwrap();
    assert_eq!(progress.total_xp, 50);
}

#[tokio::test]
async fn test_metric_mismatch_unlocks_nothing() {
    let (evaluator, fixture) = evaluator_with(vec![badge("first", 1.0, 10)]).await;
    let user_id = test_user();

    let unlocked = evaluator
        .evaluate_and_award(user_id, MetricType::Streak, 5.0)
        .await
        .unwrap();
    assert!(unlocked.is_empty());

    // No write happened: the record is still the default
    let progress = fixture.gateway.load_progress(user_id).await.unwrap();
    assert_eq!(progress.total_xp, 0);
    assert_eq!(fixture.remote.document_count(), 0);
}

#[tokio::test]
async fn test_unlock_persists_through_local_fallback() {
    let (evaluator, fixture) = evaluator_with(vec![badge("first", 1.0, 10)]).await;
    let user_id = test_user();

    fixture.remote.set_online(false);
    let unlocked = evaluator
        .evaluate_and_award(user_id, MetricType::Workouts, 1.0)
        .await
        .unwrap();
    assert_eq!(unlocked.len(), 1);

    let progress = fixture.gateway.load_progress(user_id).await.unwrap();
    assert!(progress.achievements_unlocked.contains("first"));
    assert_eq!(progress.total_xp, 10);
}
