// ABOUTME: Main library entry point for the ForgeFit progress & gamification engine
// ABOUTME: Converts workout/nutrition completion events into XP, levels, streaks, and achievements
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ForgeFit

#![deny(unsafe_code)]

//! # ForgeFit Progress Engine
//!
//! The progress and gamification subsystem of the ForgeFit training
//! application. It turns raw workout and nutrition completion events into
//! durable progress state: experience points, levels, streaks, unlocked
//! achievements, and weekly statistics. It also records fine-grained per-set
//! workout data for analytics.
//!
//! ## Architecture
//!
//! - **Calculators** (`leveling`, `streaks`, `consistency`): pure derivation
//!   of levels, streaks, and weekly consistency scores
//! - **Achievements** (`achievements`): catalog-driven unlock evaluation with
//!   one-time XP rewards
//! - **Set tracking** (`set_tracking`): per-exercise set recording and
//!   workout-session lifecycle
//! - **Gateway** (`gateway`): remote-first persistence with a silent local
//!   SQLite fallback, so no user action is lost while offline
//! - **Orchestrator** (`orchestrator`): the single entry point that drives a
//!   workout completion through XP award, streak update, weekly stats, and
//!   achievement passes
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use forgefit_progress::config::EngineConfig;
//! use forgefit_progress::errors::AppResult;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = EngineConfig::from_env()?;
//!     println!("remote store: {}", config.remote_base_url);
//!     Ok(())
//! }
//! ```

/// Achievement catalog and unlock evaluation
pub mod achievements;

/// Environment-based engine configuration
pub mod config;

/// Weekly consistency scoring
pub mod consistency;

/// XP awards, parsing defaults, and collection names
pub mod constants;

/// Unified error handling system with standard error codes
pub mod errors;

/// Two-tier persistence gateway (remote-first, local fallback)
pub mod gateway;

/// Level computation from cumulative XP
pub mod leveling;

/// Logging configuration and structured logging setup
pub mod logging;

/// Engine data models
pub mod models;

/// Workout completion orchestration
pub mod orchestrator;

/// Per-set workout tracking and session lifecycle
pub mod set_tracking;

/// Workout streak evaluation
pub mod streaks;
