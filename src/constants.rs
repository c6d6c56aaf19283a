// ABOUTME: System-wide constants for the progress engine
// ABOUTME: XP award amounts, parsing defaults, weekly targets, and storage collection names
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Constants Module
//!
//! Hardcoded engine constants. Values that may vary per deployment live in
//! [`crate::config::EngineConfig`] instead.

/// XP award amounts
pub mod xp {
    /// Maximum XP for a fully completed workout (scaled by completion rate)
    pub const WORKOUT_COMPLETION_MAX: u64 = 50;

    /// Maximum XP for fully hitting nutrition goals (scaled by completion rate)
    pub const NUTRITION_COMPLETION_MAX: u64 = 30;

    /// Base XP for completing a single set
    pub const SET_COMPLETION_BASE: u64 = 5;

    /// Bonus when actual reps land inside the target range
    pub const SET_REPS_IN_RANGE_BONUS: u64 = 2;

    /// Bonus when actual reps exceed the target range's upper bound
    /// (replaces the in-range bonus, never stacks with it)
    pub const SET_REPS_EXCEEDED_BONUS: u64 = 5;

    /// Bonus when RPE falls in the optimal band
    pub const SET_RPE_OPTIMAL_BONUS: u64 = 3;

    /// One-time award for finishing a training program
    pub const PROGRAM_COMPLETION: u64 = 250;
}

/// RPE (Rate of Perceived Exertion) bands
pub mod rpe {
    /// Lower bound of the optimal effort band (inclusive)
    pub const OPTIMAL_MIN: u8 = 7;

    /// Upper bound of the optimal effort band (inclusive)
    pub const OPTIMAL_MAX: u8 = 8;
}

/// Level progression
pub mod leveling {
    /// XP per quadratic level unit: level n starts at (n-1)^2 * this
    pub const XP_PER_LEVEL_UNIT: u64 = 100;
}

/// Weekly statistics
pub mod weekly {
    /// Sessions per week counted as 100% consistency
    pub const DEFAULT_SESSION_TARGET: u32 = 3;
}

/// Defaults applied when textual exercise specs fail to parse
pub mod set_parsing {
    /// Set count when the sets field is unparseable
    pub const DEFAULT_SETS: u32 = 3;

    /// Rep range lower bound when the reps field is unparseable
    pub const DEFAULT_REP_MIN: u32 = 8;

    /// Rep range upper bound when the reps field is unparseable
    pub const DEFAULT_REP_MAX: u32 = 12;

    /// Rest duration when the rest field is unparseable
    pub const DEFAULT_REST_SECONDS: u32 = 90;

    /// Sentinel rest value meaning "move straight to the next set"
    pub const NO_REST_SENTINEL: &str = "no rest";
}

/// Storage collection names, shared by the remote and local tiers
pub mod collections {
    /// Per-user progress records (XP, level, programs, achievements)
    pub const USER_PROGRESS: &str = "user_progress";

    /// Per-user gamification stats (streaks, totals, weekly stats)
    pub const GAMIFICATION_STATS: &str = "gamification_stats";

    /// Per-exercise set tracking records
    pub const EXERCISE_TRACKING: &str = "exercise_tracking";

    /// Workout session records
    pub const WORKOUT_SESSIONS: &str = "workout_sessions";
}
