// ABOUTME: Workout streak evaluation from calendar-day differences
// ABOUTME: Same-day idempotence, one-day continuation, and reset on longer gaps
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ForgeFit

//! Streak Evaluator
//!
//! Streaks count consecutive UTC calendar days with at least one completed
//! workout. The model assumes at most one meaningful workout signal per day:
//! a second completion on the same day leaves the streak unchanged, and a
//! gap of more than one day resets it. Out-of-order events (a "last workout"
//! timestamp after "now", from clock skew or offline replay) are treated as
//! same-day no-ops so the streak stays monotonic under reordering.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of a streak evaluation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StreakUpdate {
    /// Updated current streak
    pub current_streak: u32,
    /// Updated longest streak, never below `current_streak`
    pub longest_streak: u32,
    /// Whether this evaluation grew the current streak
    pub extended: bool,
}

/// Evaluate the streak for a workout completed at `now`, given the previous
/// state and the timestamp of the most recent prior completed workout.
#[must_use]
pub fn evaluate(
    current_streak: u32,
    longest_streak: u32,
    last_workout_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> StreakUpdate {
    let new_current = match last_workout_at {
        None => 1,
        Some(last) => {
            let day_gap = (now.date_naive() - last.date_naive()).num_days();
            if day_gap <= 0 {
                // same day, or clock skew: no double-counting, no reset
                current_streak
            } else if day_gap == 1 {
                current_streak + 1
            } else {
                1
            }
        }
    };

    StreakUpdate {
        current_streak: new_current,
        longest_streak: longest_streak.max(new_current),
        extended: new_current > current_streak,
    }
}
