// ABOUTME: Level computation from cumulative experience points
// ABOUTME: Quadratic level curve with progress-toward-next-level figures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ForgeFit

//! Level Calculator
//!
//! Levels follow a quadratic curve: level `n` starts at `(n-1)^2 * 100` XP,
//! so the boundaries fall at 0, 100, 400, 900, 1600... Pure functions, no
//! I/O; every record mutation that touches XP recomputes its level through
//! [`level_for_xp`] rather than storing the level independently.

use serde::{Deserialize, Serialize};

use crate::constants::leveling::XP_PER_LEVEL_UNIT;

/// Progress figures for a given XP total
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LevelProgress {
    /// Level derived from the XP total
    pub level: u32,
    /// XP accumulated since this level's start threshold
    pub current_level_xp: u64,
    /// XP between this level's start and the next level's threshold
    pub xp_needed_for_next_level: u64,
    /// 0-100, capped
    pub progress_percent: f64,
}

/// Level for a cumulative XP total: `floor(sqrt(xp / 100)) + 1`.
#[must_use]
pub fn level_for_xp(total_xp: u64) -> u32 {
    let units = total_xp as f64 / XP_PER_LEVEL_UNIT as f64;
    units.sqrt().floor() as u32 + 1
}

/// Absolute XP threshold to reach level `level + 1`: `level^2 * 100`.
#[must_use]
pub fn xp_required_for_level(level: u32) -> u64 {
    u64::from(level) * u64::from(level) * XP_PER_LEVEL_UNIT
}

/// Progress figures for the level containing `total_xp`.
///
/// Never divides by zero: if the span to the next level resolves to 0,
/// progress is defined as 100%.
#[must_use]
pub fn level_progress(total_xp: u64) -> LevelProgress {
    let level = level_for_xp(total_xp);
    let level_start = xp_required_for_level(level - 1);
    let next_threshold = xp_required_for_level(level);

    let current_level_xp = total_xp.saturating_sub(level_start);
    let xp_needed_for_next_level = next_threshold.saturating_sub(level_start);

    let progress_percent = if xp_needed_for_next_level == 0 {
        100.0
    } else {
        (current_level_xp as f64 / xp_needed_for_next_level as f64 * 100.0).min(100.0)
    };

    LevelProgress {
        level,
        current_level_xp,
        xp_needed_for_next_level,
        progress_percent,
    }
}
