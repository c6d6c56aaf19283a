// ABOUTME: Core data models for the progress & gamification engine
// ABOUTME: Defines UserProgress, UserGamificationStats, Achievement, ExerciseSetTracking and friends
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ForgeFit

//! # Data Models
//!
//! The durable records the engine reads and writes through the persistence
//! gateway, plus the immutable achievement catalog types.
//!
//! ## Design Principles
//!
//! - **Tier Agnostic**: one serde representation for the remote document API
//!   and the local cache, so values round-trip between tiers without loss
//! - **Derived State Near Data**: mutations that must preserve invariants
//!   (level recompute on XP changes, longest-streak clamping) live on the
//!   records themselves
//! - **Wire Shape**: camelCase field names to match the remote document API

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::leveling;

/// Durable per-user progress record. Created on first access, never deleted
/// during normal operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    /// Owning user
    pub user_id: Uuid,
    /// Cumulative experience points
    pub total_xp: u64,
    /// Level derived from `total_xp`; never stored without a recompute
    pub current_level: u32,
    /// Program the user is currently following, if any
    pub current_program_id: Option<String>,
    /// Week within the current program (1-based)
    pub current_week: u32,
    /// Ids of programs the user has finished
    pub programs_completed: BTreeSet<String>,
    /// Ids of unlocked achievements; append-only, duplicate-free
    pub achievements_unlocked: BTreeSet<String>,
    /// Last mutation timestamp
    pub updated_at: DateTime<Utc>,
}

impl UserProgress {
    /// The well-defined default returned when no record exists yet:
    /// level 1, 0 XP, week 1, empty sets.
    #[must_use]
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            total_xp: 0,
            current_level: 1,
            current_program_id: None,
            current_week: 1,
            programs_completed: BTreeSet::new(),
            achievements_unlocked: BTreeSet::new(),
            updated_at: Utc::now(),
        }
    }

    /// Add XP and recompute the level in the same mutation, so
    /// `current_level == level_for_xp(total_xp)` holds after every change.
    pub fn add_xp(&mut self, amount: u64) {
        self.total_xp = self.total_xp.saturating_add(amount);
        self.current_level = leveling::level_for_xp(self.total_xp);
        self.updated_at = Utc::now();
    }
}

/// Durable per-user gamification statistics. Created lazily with zeroed
/// fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserGamificationStats {
    /// Owning user
    pub user_id: Uuid,
    /// Consecutive qualifying days with at least one completed workout
    pub current_streak: u32,
    /// All-time longest streak; never less than `current_streak`
    pub longest_streak: u32,
    /// Lifetime completed workouts
    pub total_workouts: u64,
    /// Lifetime nutrition goals hit
    pub total_nutrition_goals_hit: u64,
    /// Timestamp of the most recent completed workout, consumed by the
    /// streak evaluator; kept in this record so streak state updates in one
    /// write
    pub last_workout_at: Option<DateTime<Utc>>,
    /// Current-week counters, reset together at the week boundary
    pub weekly_stats: WeeklyStats,
    /// Last mutation timestamp
    pub updated_at: DateTime<Utc>,
}

impl UserGamificationStats {
    /// The well-defined default returned when no record exists yet.
    #[must_use]
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            current_streak: 0,
            longest_streak: 0,
            total_workouts: 0,
            total_nutrition_goals_hit: 0,
            last_workout_at: None,
            weekly_stats: WeeklyStats::default(),
            updated_at: Utc::now(),
        }
    }

    /// Apply a streak evaluation result, clamping `longest_streak` so the
    /// `longest_streak >= current_streak` invariant holds.
    pub fn apply_streak(&mut self, current: u32, longest: u32) {
        self.current_streak = current;
        self.longest_streak = longest.max(current);
        self.updated_at = Utc::now();
    }
}

/// Current-week counters. All fields reset together, never partially.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyStats {
    /// Workouts completed since the week boundary
    pub workouts_completed: u32,
    /// Nutrition goals hit since the week boundary
    pub nutrition_goals_hit: u32,
    /// 0-100 consistency score against the weekly session target
    pub consistency_percentage: u8,
    /// XP earned since the week boundary
    pub xp_earned: u64,
}

impl WeeklyStats {
    /// Zero every field as one mutation.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Metric tracked by an achievement's unlock criteria
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum MetricType {
    /// Lifetime completed workouts
    Workouts,
    /// Current workout streak in days
    Streak,
    /// Number of completed programs
    ProgramCompletion,
    /// Lifetime nutrition goals hit
    Nutrition,
    /// Weekly consistency percentage
    Consistency,
}

/// Window an achievement's metric is measured over
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Timeframe {
    /// Measured against lifetime totals
    #[default]
    AllTime,
    /// Measured within the current week window
    Weekly,
}

/// Achievement rarity tier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    /// Entry-level milestones
    Common,
    /// Takes sustained effort
    Rare,
    /// Long-haul milestones
    Epic,
    /// The outliers
    Legendary,
}

/// Condition under which an achievement unlocks
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UnlockCriteria {
    /// Metric the target applies to
    pub metric: MetricType,
    /// Threshold the metric must reach (inclusive)
    pub target: f64,
    /// Measurement window
    #[serde(default)]
    pub timeframe: Timeframe,
}

/// Immutable catalog entry. Unlocking is recorded only in
/// [`UserProgress::achievements_unlocked`], never by mutating the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    /// Stable catalog id
    pub id: String,
    /// Display name
    pub name: String,
    /// Short description shown on the badge
    pub description: String,
    /// One-time XP granted on unlock
    pub xp_reward: u64,
    /// Unlock condition
    pub criteria: UnlockCriteria,
    /// Rarity tier
    pub rarity: Rarity,
}

/// Target repetitions for a set: a single count or an inclusive range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum RepTarget {
    /// Exact rep count, e.g. "10"
    Single(u32),
    /// Inclusive range, e.g. "8-12"
    Range {
        /// Lower bound
        min: u32,
        /// Upper bound
        max: u32,
    },
}

impl RepTarget {
    /// Whether an actual rep count lands inside the target
    #[must_use]
    pub fn contains(&self, reps: u32) -> bool {
        match *self {
            Self::Single(n) => reps == n,
            Self::Range { min, max } => reps >= min && reps <= max,
        }
    }

    /// Upper bound of the target
    #[must_use]
    pub fn upper_bound(&self) -> u32 {
        match *self {
            Self::Single(n) => n,
            Self::Range { max, .. } => max,
        }
    }
}

/// One recorded repetition block within an exercise.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SetData {
    /// Stable id, derived from the owning exercise id and set number
    pub id: String,
    /// 1-based position within the exercise; unique and contiguous
    pub set_number: u32,
    /// Weight lifted, if applicable
    pub weight_kg: Option<f64>,
    /// Target repetitions for this set
    pub target_reps: RepTarget,
    /// Repetitions actually performed
    pub actual_reps: Option<u32>,
    /// Rate of Perceived Exertion, 1-10
    pub rpe: Option<u8>,
    /// Whether the set has been completed
    pub completed: bool,
    /// Completion timestamp
    pub completed_at: Option<DateTime<Utc>>,
}

/// Per-exercise set tracking within a workout session. Persisted as one
/// nested structure; mutations always write the whole record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseSetTracking {
    /// Stable id derived from (day name, exercise index, week)
    pub exercise_id: String,
    /// Display name from the program content
    pub exercise_name: String,
    /// Planned number of sets
    pub total_sets: u32,
    /// Planned rest between sets, in seconds
    pub target_rest_seconds: u32,
    /// Planned repetitions per set
    pub target_reps: RepTarget,
    /// Ordered set records, `set_number` 1..=total_sets
    pub sets: Vec<SetData>,
    /// Index of the next set to perform, capped at `total_sets`
    pub current_set_index: u32,
    /// Whether every set is completed (or the exercise was force-completed)
    pub completed: bool,
    /// Completion timestamp
    pub completed_at: Option<DateTime<Utc>>,
}

impl ExerciseSetTracking {
    /// Whether every individual set has been marked completed
    #[must_use]
    pub fn all_sets_completed(&self) -> bool {
        !self.sets.is_empty() && self.sets.iter().all(|s| s.completed)
    }
}

/// Lifecycle state of a workout session
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Session started, sets being recorded
    InProgress,
    /// Session finished normally
    Completed,
    /// Session ended without completion; recorded sets are kept
    Abandoned,
}

/// One workout session: the exercises performed on a given program day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSessionData {
    /// Session id
    pub id: String,
    /// Program day name, e.g. "Push Day"
    pub day_name: String,
    /// Week within the program (1-based)
    pub week_number: u32,
    /// Program phase label
    pub phase: String,
    /// Owning program id
    pub program_id: String,
    /// Exercises tracked in this session
    pub exercises: Vec<ExerciseSetTracking>,
    /// Session start timestamp
    pub started_at: DateTime<Utc>,
    /// Session completion timestamp
    pub completed_at: Option<DateTime<Utc>>,
    /// XP accumulated during the session
    pub xp_earned: u64,
    /// Lifecycle state
    pub status: SessionStatus,
}
