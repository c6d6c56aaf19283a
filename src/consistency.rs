// ABOUTME: Weekly consistency scoring against the fixed session target
// ABOUTME: One week-boundary convention shared by every call site
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ForgeFit

//! Weekly Consistency Aggregator
//!
//! Consistency is the share of the weekly session target met inside the
//! current week window, capped at 100. The week starts Monday 00:00 UTC;
//! [`start_of_week`] is the single definition of that boundary. Writing the
//! score back into `WeeklyStats` is a side effect of [`ConsistencyAggregator::recompute`],
//! followed by a `consistency` achievement pass.

use chrono::{DateTime, NaiveTime, Utc, Weekday};
use tracing::debug;
use uuid::Uuid;

use crate::achievements::AchievementEvaluator;
use crate::errors::AppResult;
use crate::gateway::ProgressGateway;
use crate::models::{Achievement, MetricType};

/// Outcome of a consistency recompute
#[derive(Debug, Clone)]
pub struct ConsistencyOutcome {
    /// The 0-100 score written back to `WeeklyStats`
    pub percentage: u8,
    /// Achievements unlocked by the consistency pass
    pub unlocked: Vec<Achievement>,
}

/// Start of the week containing `now`: Monday 00:00 UTC.
#[must_use]
pub fn start_of_week(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .week(Weekday::Mon)
        .first_day()
        .and_time(NaiveTime::MIN)
        .and_utc()
}

/// 0-100 consistency score for a session count against a weekly target,
/// rounded and capped at 100.
#[must_use]
pub fn consistency_percentage(sessions_this_week: u32, target: u32) -> u8 {
    if target == 0 {
        return 100;
    }
    let pct = (f64::from(sessions_this_week) / f64::from(target) * 100.0).round();
    pct.min(100.0) as u8
}

/// Recomputes and persists weekly consistency scores.
#[derive(Clone)]
pub struct ConsistencyAggregator {
    gateway: ProgressGateway,
    achievements: AchievementEvaluator,
    weekly_target: u32,
}

impl ConsistencyAggregator {
    /// Aggregator over the given gateway, evaluator, and weekly target.
    pub fn new(
        gateway: ProgressGateway,
        achievements: AchievementEvaluator,
        weekly_target: u32,
    ) -> Self {
        Self {
            gateway,
            achievements,
            weekly_target,
        }
    }

    /// Recompute the score from the completed sessions falling inside the
    /// current week, write it back into `WeeklyStats`, then run a
    /// `consistency` achievement pass against the fresh value.
    ///
    /// # Errors
    ///
    /// Returns an error if the stats or progress record cannot be read or
    /// written through either tier.
    pub async fn recompute(
        &self,
        user_id: Uuid,
        completed_sessions: &[DateTime<Utc>],
        now: DateTime<Utc>,
    ) -> AppResult<ConsistencyOutcome> {
        let week_start = start_of_week(now);
        let sessions_this_week = completed_sessions
            .iter()
            .filter(|ts| **ts >= week_start)
            .count() as u32;
        let percentage = consistency_percentage(sessions_this_week, self.weekly_target);

        debug!(
            %user_id,
            sessions_this_week,
            target = self.weekly_target,
            percentage,
            "weekly consistency recomputed"
        );

        let mut stats = self.gateway.load_stats(user_id).await?;
        stats.weekly_stats.consistency_percentage = percentage;
        stats.updated_at = Utc::now();
        self.gateway.store_stats(&stats).await?;

        let unlocked = self
            .achievements
            .evaluate_and_award(user_id, MetricType::Consistency, f64::from(percentage))
            .await?;

        Ok(ConsistencyOutcome {
            percentage,
            unlocked,
        })
    }
}
