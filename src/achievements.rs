// ABOUTME: Achievement catalog and unlock evaluation with one-time XP rewards
// ABOUTME: Candidate filtering in catalog order, simultaneous unlocks, idempotent re-evaluation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ForgeFit

//! Achievement Evaluator
//!
//! Achievements are immutable catalog entries; unlocking only ever touches
//! [`crate::models::UserProgress::achievements_unlocked`]. One evaluation
//! pass unlocks every
//! qualifying entry simultaneously: the ids are inserted, the XP rewards
//! summed and added, and the level recomputed in a single progress write.
//! Results come back in catalog order so callers and tests get deterministic
//! sequences, and a repeat pass with unchanged inputs is a no-op because
//! already-unlocked ids are excluded by construction.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::errors::AppResult;
use crate::gateway::ProgressGateway;
use crate::models::{Achievement, MetricType, Rarity, Timeframe, UnlockCriteria};

/// Read-only achievement catalog, injected so test suites can substitute
/// fixtures for the production badge set.
pub trait AchievementCatalog: Send + Sync {
    /// Every catalog entry, in definition order.
    fn all(&self) -> &[Achievement];
}

/// Catalog backed by a fixed list of entries.
pub struct StaticCatalog {
    achievements: Vec<Achievement>,
}

impl StaticCatalog {
    /// Catalog over an explicit entry list.
    #[must_use]
    pub fn new(achievements: Vec<Achievement>) -> Self {
        Self { achievements }
    }

    /// The production badge set shipped with the engine.
    #[must_use]
    pub fn builtin() -> Self {
        use MetricType::{Consistency, Nutrition, ProgramCompletion, Streak, Workouts};
        use Rarity::{Common, Epic, Legendary, Rare};
        use Timeframe::{AllTime, Weekly};

        let defs: &[(&str, &str, &str, u64, MetricType, f64, Timeframe, Rarity)] = &[
            ("first-workout", "First Steps", "Complete your first workout", 50, Workouts, 1.0, AllTime, Common),
            ("workouts-10", "Getting Into It", "Complete 10 workouts", 100, Workouts, 10.0, AllTime, Common),
            ("workouts-50", "Regular", "Complete 50 workouts", 250, Workouts, 50.0, AllTime, Rare),
            ("workouts-100", "Centurion", "Complete 100 workouts", 500, Workouts, 100.0, AllTime, Epic),
            ("workouts-250", "Iron Will", "Complete 250 workouts", 1000, Workouts, 250.0, AllTime, Legendary),
            ("streak-3", "Warming Up", "Train 3 days in a row", 75, Streak, 3.0, AllTime, Common),
            ("streak-7", "Full Week", "Train 7 days in a row", 150, Streak, 7.0, AllTime, Rare),
            ("streak-14", "Two Weeks Strong", "Train 14 days in a row", 300, Streak, 14.0, AllTime, Epic),
            ("streak-30", "Unbroken", "Train 30 days in a row", 750, Streak, 30.0, AllTime, Legendary),
            ("nutrition-10", "Mindful Eater", "Hit 10 nutrition goals", 75, Nutrition, 10.0, AllTime, Common),
            ("nutrition-50", "Fueled Up", "Hit 50 nutrition goals", 200, Nutrition, 50.0, AllTime, Rare),
            ("nutrition-100", "Nutritionist", "Hit 100 nutrition goals", 400, Nutrition, 100.0, AllTime, Epic),
            ("program-1", "Finisher", "Complete a training program", 300, ProgramCompletion, 1.0, AllTime, Rare),
            ("program-3", "Collector", "Complete 3 training programs", 750, ProgramCompletion, 3.0, AllTime, Epic),
            ("perfect-week", "Perfect Week", "Hit 100% consistency for a week", 100, Consistency, 100.0, Weekly, Rare),
        ];

        Self::new(
            defs.iter()
                .map(
                    |&(id, name, description, xp_reward, metric, target, timeframe, rarity)| {
                        Achievement {
                            id: id.to_owned(),
                            name: name.to_owned(),
                            description: description.to_owned(),
                            xp_reward,
                            criteria: UnlockCriteria {
                                metric,
                                target,
                                timeframe,
                            },
                            rarity,
                        }
                    },
                )
                .collect(),
        )
    }
}

impl AchievementCatalog for StaticCatalog {
    fn all(&self) -> &[Achievement] {
        &self.achievements
    }
}

/// Catalog entries that newly qualify: matching metric, target reached,
/// not already unlocked. Catalog order, not magnitude order.
#[must_use]
pub fn eligible<'a>(
    catalog: &'a [Achievement],
    metric: MetricType,
    current_value: f64,
    unlocked: &BTreeSet<String>,
) -> Vec<&'a Achievement> {
    catalog
        .iter()
        .filter(|a| {
            a.criteria.metric == metric
                && a.criteria.target <= current_value
                && !unlocked.contains(&a.id)
        })
        .collect()
}

/// Runs unlock passes against durable progress state.
#[derive(Clone)]
pub struct AchievementEvaluator {
    gateway: ProgressGateway,
    catalog: Arc<dyn AchievementCatalog>,
}

impl AchievementEvaluator {
    /// Evaluator over the given gateway and catalog.
    pub fn new(gateway: ProgressGateway, catalog: Arc<dyn AchievementCatalog>) -> Self {
        Self { gateway, catalog }
    }

    /// Run one unlock pass for a metric at its current value.
    ///
    /// All qualifying entries unlock simultaneously: ids inserted, rewards
    /// summed into `total_xp`, level recomputed, one progress write.
    /// Returns the newly unlocked entries in catalog order; empty when
    /// nothing qualifies (including on idempotent re-invocation).
    ///
    /// # Errors
    ///
    /// Returns an error if the progress record cannot be read or written
    /// through either tier.
    pub async fn evaluate_and_award(
        &self,
        user_id: Uuid,
        metric: MetricType,
        current_value: f64,
    ) -> AppResult<Vec<Achievement>> {
        let mut progress = self.gateway.load_progress(user_id).await?;

        let qualifying: Vec<Achievement> = eligible(
            self.catalog.all(),
            metric,
            current_value,
            &progress.achievements_unlocked,
        )
        .into_iter()
        .cloned()
        .collect();

        if qualifying.is_empty() {
            return Ok(qualifying);
        }

        let reward_total: u64 = qualifying.iter().map(|a| a.xp_reward).sum();
        for achievement in &qualifying {
            progress
                .achievements_unlocked
                .insert(achievement.id.clone());
        }
        progress.add_xp(reward_total);

        info!(
            user_id = %progress.user_id,
            metric = ?metric,
            value = current_value,
            unlocked = qualifying.len(),
            xp_awarded = reward_total,
            "achievements unlocked"
        );

        self.gateway.store_progress(&progress).await?;
        Ok(qualifying)
    }
}
