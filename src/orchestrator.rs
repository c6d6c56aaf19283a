// ABOUTME: Workout completion orchestration: XP award, streak, weekly stats, achievement passes
// ABOUTME: Fixed sequential steps, durable once written, no partial rollback
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ForgeFit

//! Workout Completion Orchestrator
//!
//! The single entry point that converts a completed workout's tallies into
//! durable progress state. Steps run in a fixed order because later steps
//! read values written by earlier ones; a failure partway through is
//! reported to the caller but earlier writes stay - the engine favors "some
//! progress recorded" over all-or-nothing with full data loss. Updating
//! stats and progress are independent writes; one succeeding while the
//! other fails is a recoverable inconsistency, not a fatal error.
//!
//! Concurrent invocations for the same user are not serialized: XP updates
//! are read-modify-write, so two simultaneous completions (two browser
//! tabs) can lose one update. Known limitation, preserved deliberately.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::achievements::{AchievementCatalog, AchievementEvaluator};
use crate::constants::xp;
use crate::errors::AppResult;
use crate::gateway::ProgressGateway;
use crate::leveling::{self, LevelProgress};
use crate::models::{Achievement, MetricType};
use crate::streaks;

/// Tallies from one completed workout
#[derive(Debug, Clone, Copy)]
pub struct WorkoutCompletionSummary {
    /// Exercises the user finished
    pub exercises_completed: u32,
    /// Exercises the day called for
    pub exercises_total: u32,
    /// Nutrition goals hit today
    pub nutrition_completed: u32,
    /// Nutrition goals set for today
    pub nutrition_total: u32,
    /// When the workout was completed
    pub completed_at: DateTime<Utc>,
}

/// Everything a completion changed, for the presentation layer
#[derive(Debug, Clone)]
pub struct WorkoutCompletionOutcome {
    /// XP from exercise completion rate
    pub workout_xp: u64,
    /// XP from nutrition completion rate
    pub nutrition_xp: u64,
    /// `workout_xp + nutrition_xp` (achievement rewards not included)
    pub total_xp_awarded: u64,
    /// Total XP after the completion and any achievement rewards
    pub new_total_xp: u64,
    /// Level after the completion and any achievement rewards
    pub new_level: u32,
    /// Whether the level rose during this invocation
    pub leveled_up: bool,
    /// Updated current streak
    pub current_streak: u32,
    /// Updated longest streak
    pub longest_streak: u32,
    /// Achievements unlocked by this completion, in catalog order
    pub unlocked_achievements: Vec<Achievement>,
}

/// Outcome of a program completion
#[derive(Debug, Clone)]
pub struct ProgramCompletionOutcome {
    /// False when the program was already completed (idempotent no-op)
    pub newly_completed: bool,
    /// Achievements unlocked by the completion
    pub unlocked: Vec<Achievement>,
}

/// XP scaled by a completion rate: `floor(completed / total * max)`.
/// A zero denominator yields zero XP rather than an error.
fn scaled_xp(completed: u32, total: u32, max: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    (f64::from(completed) / f64::from(total) * max as f64).floor() as u64
}

/// Drives workout completions, standalone XP awards, program completions,
/// and weekly resets against the persistence gateway.
#[derive(Clone)]
pub struct ProgressOrchestrator {
    gateway: ProgressGateway,
    achievements: AchievementEvaluator,
}

impl ProgressOrchestrator {
    /// Orchestrator over the given gateway and achievement catalog.
    pub fn new(gateway: ProgressGateway, catalog: Arc<dyn AchievementCatalog>) -> Self {
        let achievements = AchievementEvaluator::new(gateway.clone(), catalog);
        Self {
            gateway,
            achievements,
        }
    }

    /// The achievement evaluator this orchestrator awards through.
    #[must_use]
    pub fn achievements(&self) -> &AchievementEvaluator {
        &self.achievements
    }

    /// Log one completed workout. Sequential steps, each durable once
    /// written:
    ///
    /// 1. compute workout and nutrition XP from completion rates
    /// 2. update lifetime and weekly stats counters
    /// 3. evaluate the streak against the prior workout timestamp
    /// 4. persist stats (one write)
    /// 5. add the XP to progress and recompute the level (one write);
    ///    this is the only place completion XP is added
    /// 6. achievement passes for workouts, streak, and nutrition against
    ///    the freshly written values, each persisting independently
    ///
    /// # Errors
    ///
    /// Returns an error when a step's read or write fails on both storage
    /// tiers. Earlier steps are not rolled back.
    pub async fn log_workout_completion(
        &self,
        user_id: Uuid,
        summary: WorkoutCompletionSummary,
    ) -> AppResult<WorkoutCompletionOutcome> {
        // Step 1: completion XP
        let workout_xp = scaled_xp(
            summary.exercises_completed,
            summary.exercises_total,
            xp::WORKOUT_COMPLETION_MAX,
        );
        let nutrition_xp = scaled_xp(
            summary.nutrition_completed,
            summary.nutrition_total,
            xp::NUTRITION_COMPLETION_MAX,
        );
        let total_xp_awarded = workout_xp + nutrition_xp;

        debug!(%user_id, workout_xp, nutrition_xp, "workout completion XP computed");

        // Step 2: stats counters
        let mut stats = self.gateway.load_stats(user_id).await?;
        stats.total_workouts += 1;
        stats.total_nutrition_goals_hit += u64::from(summary.nutrition_completed);
        stats.weekly_stats.workouts_completed += 1;
        stats.weekly_stats.nutrition_goals_hit += summary.nutrition_completed;
        stats.weekly_stats.xp_earned += total_xp_awarded;

        // Step 3: streak against the prior workout timestamp
        let streak = streaks::evaluate(
            stats.current_streak,
            stats.longest_streak,
            stats.last_workout_at,
            summary.completed_at,
        );
        stats.apply_streak(streak.current_streak, streak.longest_streak);
        stats.last_workout_at = Some(summary.completed_at);

        // Step 4: one stats write
        self.gateway.store_stats(&stats).await?;

        // Step 5: the only place completion XP is added
        let mut progress = self.gateway.load_progress(user_id).await?;
        let level_before = progress.current_level;
        progress.add_xp(total_xp_awarded);
        self.gateway.store_progress(&progress).await?;

        // Step 6: achievement passes against the freshly written values
        let mut unlocked = Vec::new();
        for (metric, value) in [
            (MetricType::Workouts, stats.total_workouts as f64),
            (MetricType::Streak, f64::from(streak.current_streak)),
            (
                MetricType::Nutrition,
                stats.total_nutrition_goals_hit as f64,
            ),
        ] {
            let mut pass = self
                .achievements
                .evaluate_and_award(user_id, metric, value)
                .await?;
            unlocked.append(&mut pass);
        }

        let progress = self.gateway.load_progress(user_id).await?;
        let outcome = WorkoutCompletionOutcome {
            workout_xp,
            nutrition_xp,
            total_xp_awarded,
            new_total_xp: progress.total_xp,
            new_level: progress.current_level,
            leveled_up: progress.current_level > level_before,
            current_streak: streak.current_streak,
            longest_streak: streak.longest_streak,
            unlocked_achievements: unlocked,
        };

        info!(
            %user_id,
            xp = outcome.total_xp_awarded,
            level = outcome.new_level,
            streak = outcome.current_streak,
            achievements = outcome.unlocked_achievements.len(),
            "workout completion logged"
        );
        Ok(outcome)
    }

    /// Add XP outside of a workout completion and recompute the level.
    ///
    /// Read-modify-write; concurrent calls for the same user are not
    /// serialized (see the module docs).
    ///
    /// # Errors
    ///
    /// Returns an error when the progress record cannot be read or written
    /// through either tier.
    pub async fn add_xp(&self, user_id: Uuid, amount: u64) -> AppResult<LevelProgress> {
        let mut progress = self.gateway.load_progress(user_id).await?;
        progress.add_xp(amount);
        self.gateway.store_progress(&progress).await?;
        Ok(leveling::level_progress(progress.total_xp))
    }

    /// Record a finished training program: insert it into the completed
    /// set, award the one-time program XP, and run a program-completion
    /// achievement pass. Idempotent per program id.
    ///
    /// # Errors
    ///
    /// Returns an error when the progress record cannot be read or written
    /// through either tier.
    pub async fn complete_program(
        &self,
        user_id: Uuid,
        program_id: &str,
    ) -> AppResult<ProgramCompletionOutcome> {
        let mut progress = self.gateway.load_progress(user_id).await?;
        if progress.programs_completed.contains(program_id) {
            return Ok(ProgramCompletionOutcome {
                newly_completed: false,
                unlocked: Vec::new(),
            });
        }

        progress.programs_completed.insert(program_id.to_owned());
        progress.add_xp(xp::PROGRAM_COMPLETION);
        self.gateway.store_progress(&progress).await?;

        let completed_count = progress.programs_completed.len() as f64;
        let unlocked = self
            .achievements
            .evaluate_and_award(user_id, MetricType::ProgramCompletion, completed_count)
            .await?;

        info!(%user_id, program_id, "program completed");
        Ok(ProgramCompletionOutcome {
            newly_completed: true,
            unlocked,
        })
    }

    /// Zero the weekly counters as one record write. Triggered externally
    /// at the week boundary; the engine never self-schedules.
    ///
    /// # Errors
    ///
    /// Returns an error when the stats record cannot be read or written
    /// through either tier.
    pub async fn reset_weekly_stats(&self, user_id: Uuid) -> AppResult<()> {
        let mut stats = self.gateway.load_stats(user_id).await?;
        stats.weekly_stats.reset();
        stats.updated_at = Utc::now();
        self.gateway.store_stats(&stats).await?;
        debug!(%user_id, "weekly stats reset");
        Ok(())
    }
}
