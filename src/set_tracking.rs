// ABOUTME: Per-set workout tracking: spec parsing, set completion XP, session lifecycle
// ABOUTME: Whole-record persistence through the gateway; idempotent initialization per exercise id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ForgeFit

//! Set-Tracking Recorder
//!
//! Records structured per-exercise set data (weight, reps, RPE, rest) within
//! a workout session. Exercise records are created from the textual specs
//! program content ships with ("4" sets, "8-12" reps, "90 sec" rest);
//! unparseable values degrade to documented defaults instead of failing the
//! operation. Sets are stored as one nested structure, so every mutation
//! persists the entire updated record - no partial-field updates.

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::constants::{rpe, set_parsing, xp};
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::gateway::ProgressGateway;
use crate::models::{
    ExerciseSetTracking, RepTarget, SessionStatus, SetData, WorkoutSessionData,
};

/// Textual exercise definition as delivered by program content.
#[derive(Debug, Clone)]
pub struct ExerciseSpec {
    /// Display name, e.g. "Barbell Bench Press"
    pub name: String,
    /// Set count text, e.g. "4"
    pub sets: String,
    /// Rep target text, e.g. "8-12" or "10"
    pub reps: String,
    /// Rest text, e.g. "90 sec", "2 min", "No rest"
    pub rest: String,
}

/// Input for completing one set
#[derive(Debug, Clone, Copy)]
pub struct SetCompletion {
    /// 1-based set number within the exercise
    pub set_number: u32,
    /// Weight lifted, if applicable
    pub weight_kg: Option<f64>,
    /// Repetitions actually performed
    pub actual_reps: Option<u32>,
    /// Rate of Perceived Exertion, 1-10
    pub rpe: Option<u8>,
}

/// Result of completing one set
#[derive(Debug, Clone)]
pub struct SetCompletionResult {
    /// XP awarded for this set (base plus bonuses)
    pub xp_awarded: u64,
    /// Whether this set completion finished the exercise
    pub exercise_completed: bool,
    /// The updated exercise record as persisted
    pub tracking: ExerciseSetTracking,
}

/// Stable exercise id derived from its position in the program:
/// `{day-slug}-w{week}-e{index}`.
#[must_use]
pub fn exercise_id(day_name: &str, exercise_index: usize, week: u32) -> String {
    let slug: String = day_name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    let slug = slug.trim_matches('-').to_owned();
    format!("{slug}-w{week}-e{exercise_index}")
}

/// Parse a set count from its textual spec. Leading digits win; anything
/// unparseable (or zero) falls back to the default.
#[must_use]
pub fn parse_set_count(text: &str) -> u32 {
    let digits: String = text
        .trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    match digits.parse::<u32>() {
        Ok(n) if n > 0 => n,
        _ => set_parsing::DEFAULT_SETS,
    }
}

/// Parse a rep target: `"8-12"` becomes a range, `"10"` a single count,
/// anything else the default range.
#[must_use]
pub fn parse_rep_target(text: &str) -> RepTarget {
    let trimmed = text.trim();
    if let Some((lo, hi)) = trimmed.split_once('-') {
        if let (Ok(min), Ok(max)) = (lo.trim().parse::<u32>(), hi.trim().parse::<u32>()) {
            if min > 0 && max >= min {
                return RepTarget::Range { min, max };
            }
        }
    } else if let Ok(n) = trimmed.parse::<u32>() {
        if n > 0 {
            return RepTarget::Single(n);
        }
    }
    RepTarget::Range {
        min: set_parsing::DEFAULT_REP_MIN,
        max: set_parsing::DEFAULT_REP_MAX,
    }
}

/// Parse a rest duration into seconds. Supports minute and second units and
/// fractional minutes; the "no rest" sentinel maps to 0; unparseable values
/// default to 90 seconds.
#[must_use]
pub fn parse_rest_seconds(text: &str) -> u32 {
    let normalized = text.trim().to_lowercase();
    if normalized.contains(set_parsing::NO_REST_SENTINEL) {
        return 0;
    }

    let numeric: String = normalized
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let Ok(amount) = numeric.parse::<f64>() else {
        return set_parsing::DEFAULT_REST_SECONDS;
    };

    if normalized.contains("min") {
        (amount * 60.0).round() as u32
    } else {
        amount.round() as u32
    }
}

/// XP for one completed set: base award, +2 when actual reps land in the
/// target range XOR +5 when they exceed its upper bound, +3 independently
/// for RPE in the optimal band.
#[must_use]
pub fn set_completion_xp(target: RepTarget, actual_reps: Option<u32>, rpe_value: Option<u8>) -> u64 {
    let mut awarded = xp::SET_COMPLETION_BASE;

    if let Some(reps) = actual_reps {
        if reps > target.upper_bound() {
            awarded += xp::SET_REPS_EXCEEDED_BONUS;
        } else if target.contains(reps) {
            awarded += xp::SET_REPS_IN_RANGE_BONUS;
        }
    }

    if let Some(r) = rpe_value {
        if (rpe::OPTIMAL_MIN..=rpe::OPTIMAL_MAX).contains(&r) {
            awarded += xp::SET_RPE_OPTIMAL_BONUS;
        }
    }

    awarded
}

/// Creates, mutates, and completes per-exercise set data through the
/// persistence gateway.
#[derive(Clone)]
pub struct SetTrackingRecorder {
    gateway: ProgressGateway,
}

impl SetTrackingRecorder {
    /// Recorder over the given gateway.
    pub fn new(gateway: ProgressGateway) -> Self {
        Self { gateway }
    }

    /// Initialize tracking for one exercise. Idempotent per derived id: if
    /// tracking already exists, the existing record is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error only when both storage tiers fail.
    pub async fn initialize_exercise(
        &self,
        user_id: Uuid,
        day_name: &str,
        exercise_index: usize,
        spec: &ExerciseSpec,
        week: u32,
    ) -> AppResult<ExerciseSetTracking> {
        let id = exercise_id(day_name, exercise_index, week);

        if let Some(existing) = self.gateway.load_exercise(user_id, &id).await? {
            debug!(%user_id, exercise_id = %id, "tracking already initialized");
            return Ok(existing);
        }

        let total_sets = parse_set_count(&spec.sets);
        let target_reps = parse_rep_target(&spec.reps);
        let target_rest_seconds = parse_rest_seconds(&spec.rest);

        let sets = (1..=total_sets)
            .map(|n| SetData {
                id: format!("{id}-s{n}"),
                set_number: n,
                weight_kg: None,
                target_reps,
                actual_reps: None,
                rpe: None,
                completed: false,
                completed_at: None,
            })
            .collect();

        let tracking = ExerciseSetTracking {
            exercise_id: id,
            exercise_name: spec.name.clone(),
            total_sets,
            target_rest_seconds,
            target_reps,
            sets,
            current_set_index: 0,
            completed: false,
            completed_at: None,
        };

        self.gateway.store_exercise(user_id, &tracking).await?;
        Ok(tracking)
    }

    /// Mark one set completed: record its data, stamp it, advance the set
    /// cursor (capped at the set count), flip the exercise to completed once
    /// every set is done, and compute the XP award.
    ///
    /// # Errors
    ///
    /// Returns an error if tracking was never initialized for this exercise
    /// id (the fatal case - there is nothing to operate on), if the set
    /// number or RPE is out of range, or when both storage tiers fail.
    pub async fn complete_set(
        &self,
        user_id: Uuid,
        exercise_id: &str,
        completion: SetCompletion,
    ) -> AppResult<SetCompletionResult> {
        if let Some(r) = completion.rpe {
            if !(1..=10).contains(&r) {
                return Err(AppError::new(
                    ErrorCode::ValueOutOfRange,
                    format!("RPE must be 1-10, got {r}"),
                ));
            }
        }

        let mut tracking = self
            .gateway
            .load_exercise(user_id, exercise_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("exercise tracking")
                    .with_user_id(user_id)
                    .with_resource_id(exercise_id)
            })?;

        let now = Utc::now();
        let target_reps = tracking.target_reps;
        let set = tracking
            .sets
            .iter_mut()
            .find(|s| s.set_number == completion.set_number)
            .ok_or_else(|| {
                AppError::invalid_input(format!(
                    "set {} does not exist on {exercise_id}",
                    completion.set_number
                ))
            })?;

        set.weight_kg = completion.weight_kg;
        set.actual_reps = completion.actual_reps;
        set.rpe = completion.rpe;
        set.completed = true;
        set.completed_at = Some(now);

        tracking.current_set_index = (tracking.current_set_index + 1).min(tracking.total_sets);

        let exercise_completed = tracking.all_sets_completed();
        if exercise_completed && !tracking.completed {
            tracking.completed = true;
            tracking.completed_at = Some(now);
        }

        let xp_awarded = set_completion_xp(target_reps, completion.actual_reps, completion.rpe);

        self.gateway.store_exercise(user_id, &tracking).await?;

        debug!(
            %user_id,
            exercise_id,
            set_number = completion.set_number,
            xp_awarded,
            exercise_completed,
            "set completed"
        );

        Ok(SetCompletionResult {
            xp_awarded,
            exercise_completed,
            tracking,
        })
    }

    /// Force-mark an exercise complete regardless of individual set states.
    /// Used for partial-completion flows.
    ///
    /// # Errors
    ///
    /// Returns an error if tracking was never initialized for this exercise
    /// id, or when both storage tiers fail.
    pub async fn complete_exercise(
        &self,
        user_id: Uuid,
        exercise_id: &str,
    ) -> AppResult<ExerciseSetTracking> {
        let mut tracking = self
            .gateway
            .load_exercise(user_id, exercise_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("exercise tracking")
                    .with_user_id(user_id)
                    .with_resource_id(exercise_id)
            })?;

        tracking.completed = true;
        tracking.completed_at = Some(Utc::now());

        self.gateway.store_exercise(user_id, &tracking).await?;
        Ok(tracking)
    }

    /// Start a workout session: initialize tracking for every exercise on
    /// the day (idempotent per exercise) and persist the session record in
    /// `in_progress` state.
    ///
    /// # Errors
    ///
    /// Returns an error only when both storage tiers fail.
    pub async fn start_session(
        &self,
        user_id: Uuid,
        day_name: &str,
        week_number: u32,
        phase: &str,
        program_id: &str,
        specs: &[ExerciseSpec],
    ) -> AppResult<WorkoutSessionData> {
        let mut exercises = Vec::with_capacity(specs.len());
        for (index, spec) in specs.iter().enumerate() {
            let tracking = self
                .initialize_exercise(user_id, day_name, index, spec, week_number)
                .await?;
            exercises.push(tracking);
        }

        let session = WorkoutSessionData {
            id: Uuid::new_v4().to_string(),
            day_name: day_name.to_owned(),
            week_number,
            phase: phase.to_owned(),
            program_id: program_id.to_owned(),
            exercises,
            started_at: Utc::now(),
            completed_at: None,
            xp_earned: 0,
            status: SessionStatus::InProgress,
        };

        self.gateway.store_session(user_id, &session).await?;
        Ok(session)
    }

    /// Complete a session: refresh the embedded exercise records from their
    /// authoritative per-exercise documents, record the XP accumulated
    /// during the session, and stamp completion.
    ///
    /// # Errors
    ///
    /// Returns an error if the session does not exist, or when both storage
    /// tiers fail.
    pub async fn complete_session(
        &self,
        user_id: Uuid,
        session_id: &str,
        xp_earned: u64,
    ) -> AppResult<WorkoutSessionData> {
        let mut session = self.load_required_session(user_id, session_id).await?;

        for exercise in &mut session.exercises {
            if let Some(fresh) = self
                .gateway
                .load_exercise(user_id, &exercise.exercise_id)
                .await?
            {
                *exercise = fresh;
            }
        }

        session.xp_earned = xp_earned;
        session.completed_at = Some(Utc::now());
        session.status = SessionStatus::Completed;

        self.gateway.store_session(user_id, &session).await?;
        Ok(session)
    }

    /// Abandon a session without erasing recorded sets.
    ///
    /// # Errors
    ///
    /// Returns an error if the session does not exist, or when both storage
    /// tiers fail.
    pub async fn abandon_session(
        &self,
        user_id: Uuid,
        session_id: &str,
    ) -> AppResult<WorkoutSessionData> {
        let mut session = self.load_required_session(user_id, session_id).await?;
        session.status = SessionStatus::Abandoned;
        self.gateway.store_session(user_id, &session).await?;
        Ok(session)
    }

    async fn load_required_session(
        &self,
        user_id: Uuid,
        session_id: &str,
    ) -> AppResult<WorkoutSessionData> {
        self.gateway
            .load_session(user_id, session_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("workout session")
                    .with_user_id(user_id)
                    .with_resource_id(session_id)
            })
    }
}
