// ABOUTME: Integration tests for the set-tracking recorder
// ABOUTME: Idempotent initialization, set completion XP, force completion, and session lifecycle
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2025 ForgeFit

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{create_test_gateway, test_user, TestGateway};
use forgefit_progress::errors::ErrorCode;
use forgefit_progress::models::{RepTarget, SessionStatus};
use forgefit_progress::set_tracking::{ExerciseSpec, SetCompletion, SetTrackingRecorder};

fn bench_press() -> ExerciseSpec {
    ExerciseSpec {
        name: "Barbell Bench Press".into(),
        sets: "3".into(),
        reps: "8-12".into(),
        rest: "90 sec".into(),
    }
}

async fn recorder() -> (SetTrackingRecorder, TestGateway) {
    let fixture = create_test_gateway().await;
    (SetTrackingRecorder::new(fixture.gateway.clone()), fixture)
}

#[tokio::test]
async fn test_initialize_creates_contiguous_sets() {
    let (recorder, _fixture) = recorder().await;
    let user_id = test_user();

    let tracking = recorder
        .initialize_exercise(user_id, "Push Day", 0, &bench_press(), 1)
        .await
        .unwrap();

    assert_eq!(tracking.exercise_id, "push-day-w1-e0");
    assert_eq!(tracking.total_sets, 3);
    assert_eq!(tracking.target_rest_seconds, 90);
    assert_eq!(tracking.target_reps, RepTarget::Range { min: 8, max: 12 });
    let numbers: Vec<u32> = tracking.sets.iter().map(|s| s.set_number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert!(!tracking.completed);
    assert_eq!(tracking.current_set_index, 0);
}

#[tokio::test]
async fn test_initialize_is_idempotent() {
    let (recorder, _fixture) = recorder().await;
    let user_id = test_user();

    let first = recorder
        .initialize_exercise(user_id, "Push Day", 0, &bench_press(), 1)
        .await
        .unwrap();

    recorder
        .complete_set(
            user_id,
            &first.exercise_id,
            SetCompletion {
                set_number: 1,
                weight_kg: Some(80.0),
                actual_reps: Some(10),
                rpe: Some(7),
            },
        )
        .await
        .unwrap();

    // Re-initializing must return the record with the completed set, not a
    // fresh one
    let again = recorder
        .initialize_exercise(user_id, "Push Day", 0, &bench_press(), 1)
        .await
        .unwrap();
    assert!(again.sets[0].completed);
    assert_eq!(again.current_set_index, 1);
}

#[tokio::test]
async fn test_unparseable_spec_degrades_to_defaults() {
    let (recorder, _fixture) = recorder().await;
    let user_id = test_user();

    let vague = ExerciseSpec {
        name: "Farmer Carry".into(),
        sets: "a few".into(),
        reps: "to failure".into(),
        rest: "as needed".into(),
    };
    let tracking = recorder
        .initialize_exercise(user_id, "Conditioning", 2, &vague, 4)
        .await
        .unwrap();

    assert_eq!(tracking.total_sets, 3);
    assert_eq!(tracking.target_reps, RepTarget::Range { min: 8, max: 12 });
    assert_eq!(tracking.target_rest_seconds, 90);
}

#[tokio::test]
async fn test_no_rest_sentinel_maps_to_zero() {
    let (recorder, _fixture) = recorder().await;
    let user_id = test_user();

    let superset = ExerciseSpec {
        name: "Lateral Raise".into(),
        sets: "4".into(),
        reps: "15".into(),
        rest: "No rest".into(),
    };
    let tracking = recorder
        .initialize_exercise(user_id, "Shoulders", 1, &superset, 2)
        .await
        .unwrap();
    assert_eq!(tracking.target_rest_seconds, 0);
}

#[tokio::test]
async fn test_complete_set_awards_bonuses_and_advances() {
    let (recorder, _fixture) = recorder().await;
    let user_id = test_user();
    let tracking = recorder
        .initialize_exercise(user_id, "Push Day", 0, &bench_press(), 1)
        .await
        .unwrap();

    // In-range reps with optimal RPE: 5 base + 2 + 3
    let result = recorder
        .complete_set(
            user_id,
            &tracking.exercise_id,
            SetCompletion {
                set_number: 1,
                weight_kg: Some(80.0),
                actual_reps: Some(10),
                rpe: Some(8),
            },
        )
        .await
        .unwrap();
    assert_eq!(result.xp_awarded, 10);
    assert!(!result.exercise_completed);
    assert_eq!(result.tracking.current_set_index, 1);

    // Exceeding the range replaces the in-range bonus: 5 + 5
    let result = recorder
        .complete_set(
            user_id,
            &tracking.exercise_id,
            SetCompletion {
                set_number: 2,
                weight_kg: Some(80.0),
                actual_reps: Some(14),
                rpe: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(result.xp_awarded, 10);

    // Final set flips the exercise to completed
    let result = recorder
        .complete_set(
            user_id,
            &tracking.exercise_id,
            SetCompletion {
                set_number: 3,
                weight_kg: Some(75.0),
                actual_reps: Some(6),
                rpe: Some(9),
            },
        )
        .await
        .unwrap();
    assert_eq!(result.xp_awarded, 5);
    assert!(result.exercise_completed);
    assert!(result.tracking.completed);
    assert!(result.tracking.completed_at.is_some());
    assert_eq!(result.tracking.current_set_index, 3);
}

#[tokio::test]
async fn test_set_cursor_caps_at_total_sets() {
    let (recorder, _fixture) = recorder().await;
    let user_id = test_user();
    let tracking = recorder
        .initialize_exercise(user_id, "Push Day", 0, &bench_press(), 1)
        .await
        .unwrap();

    // Completing the same set repeatedly never pushes the cursor past the
    // set count
    for _ in 0..5 {
        recorder
            .complete_set(
                user_id,
                &tracking.exercise_id,
                SetCompletion {
                    set_number: 1,
                    weight_kg: None,
                    actual_reps: Some(8),
                    rpe: None,
                },
            )
            .await
            .unwrap();
    }
    let reloaded = recorder
        .initialize_exercise(user_id, "Push Day", 0, &bench_press(), 1)
        .await
        .unwrap();
    assert!(reloaded.current_set_index <= reloaded.total_sets);
}

#[tokio::test]
async fn test_complete_set_on_unknown_exercise_is_fatal() {
    let (recorder, _fixture) = recorder().await;
    let user_id = test_user();

    let err = recorder
        .complete_set(
            user_id,
            "never-initialized",
            SetCompletion {
                set_number: 1,
                weight_kg: None,
                actual_reps: None,
                rpe: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_rpe_out_of_range_is_rejected() {
    let (recorder, _fixture) = recorder().await;
    let user_id = test_user();
    let tracking = recorder
        .initialize_exercise(user_id, "Push Day", 0, &bench_press(), 1)
        .await
        .unwrap();

    let err = recorder
        .complete_set(
            user_id,
            &tracking.exercise_id,
            SetCompletion {
                set_number: 1,
                weight_kg: None,
                actual_reps: Some(10),
                rpe: Some(11),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValueOutOfRange);
}

#[tokio::test]
async fn test_force_complete_exercise_ignores_set_state() {
    let (recorder, _fixture) = recorder().await;
    let user_id = test_user();
    let tracking = recorder
        .initialize_exercise(user_id, "Push Day", 0, &bench_press(), 1)
        .await
        .unwrap();

    let completed = recorder
        .complete_exercise(user_id, &tracking.exercise_id)
        .await
        .unwrap();
    assert!(completed.completed);
    assert!(completed.completed_at.is_some());
    assert!(completed.sets.iter().all(|s| !s.completed));
}

#[tokio::test]
async fn test_session_lifecycle() {
    let (recorder, _fixture) = recorder().await;
    let user_id = test_user();

    let specs = vec![
        bench_press(),
        ExerciseSpec {
            name: "Incline Dumbbell Press".into(),
            sets: "3".into(),
            reps: "10".into(),
            rest: "2 min".into(),
        },
    ];
    let session = recorder
        .start_session(user_id, "Push Day", 1, "Foundation", "ppl-6wk", &specs)
        .await
        .unwrap();
    assert_eq!(session.status, SessionStatus::InProgress);
    assert_eq!(session.exercises.len(), 2);
    assert_eq!(session.exercises[1].target_rest_seconds, 120);

    recorder
        .complete_set(
            user_id,
            &session.exercises[0].exercise_id,
            SetCompletion {
                set_number: 1,
                weight_kg: Some(80.0),
                actual_reps: Some(10),
                rpe: Some(7),
            },
        )
        .await
        .unwrap();

    let completed = recorder
        .complete_session(user_id, &session.id, 10)
        .await
        .unwrap();
    assert_eq!(completed.status, SessionStatus::Completed);
    assert!(completed.completed_at.is_some());
    assert_eq!(completed.xp_earned, 10);
    // Embedded exercises were refreshed from their authoritative records
    assert!(completed.exercises[0].sets[0].completed);
}

#[tokio::test]
async fn test_abandon_session_keeps_recorded_sets() {
    let (recorder, _fixture) = recorder().await;
    let user_id = test_user();

    let session = recorder
        .start_session(user_id, "Pull Day", 2, "Foundation", "ppl-6wk", &[bench_press()])
        .await
        .unwrap();

    recorder
        .complete_set(
            user_id,
            &session.exercises[0].exercise_id,
            SetCompletion {
                set_number: 1,
                weight_kg: None,
                actual_reps: Some(9),
                rpe: None,
            },
        )
        .await
        .unwrap();

    let abandoned = recorder.abandon_session(user_id, &session.id).await.unwrap();
    assert_eq!(abandoned.status, SessionStatus::Abandoned);
    assert!(abandoned.completed_at.is_none());

    // The per-exercise record still holds the completed set
    let exercise = recorder
        .initialize_exercise(user_id, "Pull Day", 0, &bench_press(), 2)
        .await
        .unwrap();
    assert!(exercise.sets[0].completed);
}
