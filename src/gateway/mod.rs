// ABOUTME: Two-tier persistence gateway: remote-first with silent local fallback
// ABOUTME: Typed read/update contract for progress, stats, exercise, and session records
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ForgeFit

//! # Progress Persistence Gateway
//!
//! Every engine component persists through this gateway rather than talking
//! to a store directly. Reads and writes go to the remote document API
//! first; on any remote failure they degrade to a local SQLite cache keyed
//! identically, so no user action is silently lost while offline. Not-found
//! is never an error: every read defines an explicit default.
//!
//! The two tiers share one serde representation, so a value written remotely
//! and later read locally (or vice versa) round-trips without loss. There is
//! no automatic reconciliation between tiers when connectivity returns;
//! whichever tier was last written inside an operation holds the
//! authoritative value until a later read pulls fresh remote data.

/// Local SQLite fallback cache
pub mod local;
/// HTTP remote store client
pub mod remote;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::constants::collections;
use crate::errors::{AppError, AppResult};
use crate::models::{
    ExerciseSetTracking, UserGamificationStats, UserProgress, WorkoutSessionData,
};
use local::LocalCache;
use remote::HttpRemoteStore;

/// Failure surfaced by a store tier. Not-found is expressed as `Ok(None)`
/// on fetch, never as an error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached (network down, timeout, 5xx)
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// The store answered but the operation failed
    #[error("store error: {0}")]
    Backend(String),
    /// Payload could not be (de)serialized
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Contract the engine expects from the remote document store: JSON
/// documents addressed by collection and key, with upsert write semantics.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetch one document. `Ok(None)` means "no row", which callers map to
    /// a default value.
    async fn fetch(&self, collection: &str, key: &str) -> Result<Option<Value>, StoreError>;

    /// Insert-or-update one document.
    async fn upsert(&self, collection: &str, key: &str, value: &Value) -> Result<(), StoreError>;
}

/// Which tier ultimately served a write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreTier {
    /// The remote store accepted the write
    Remote,
    /// The remote store failed; the value landed in the local cache
    LocalFallback,
}

/// Two-tier persistence strategy: remote first, local cache on failure.
///
/// Writes across entity types are independent calls; one succeeding while
/// another fails is a recoverable inconsistency, not a fatal error, and is
/// deliberately not wrapped in a transaction.
#[derive(Clone)]
pub struct ProgressGateway {
    remote: Arc<dyn RemoteStore>,
    local: LocalCache,
}

impl ProgressGateway {
    /// Create a gateway over an explicit remote store and local cache.
    pub fn new(remote: Arc<dyn RemoteStore>, local: LocalCache) -> Self {
        Self { remote, local }
    }

    /// Build the production gateway from configuration: HTTP remote store
    /// plus SQLite local cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed or the
    /// local cache database cannot be opened/migrated.
    pub async fn from_config(config: &EngineConfig) -> AppResult<Self> {
        let remote = HttpRemoteStore::new(&config.remote_base_url, config.request_timeout)?;
        let local = LocalCache::new(&config.cache_database_url).await?;
        Ok(Self::new(Arc::new(remote), local))
    }

    /// Read one document, remote first. Remote success with no row does not
    /// consult the local tier; only remote failure does.
    async fn read_document(&self, collection: &str, key: &str) -> AppResult<Option<Value>> {
        match self.remote.fetch(collection, key).await {
            Ok(value) => Ok(value),
            Err(remote_err) => {
                warn!(
                    collection,
                    key,
                    error = %remote_err,
                    "remote read failed, falling back to local cache"
                );
                self.local.fetch(collection, key).await.map_err(|local_err| {
                    AppError::storage(format!(
                        "both store tiers failed reading {collection}/{key}: \
                         remote: {remote_err}; local: {local_err}"
                    ))
                })
            }
        }
    }

    /// Write one document, remote first, local cache on any remote failure.
    async fn write_document(
        &self,
        collection: &str,
        key: &str,
        value: &Value,
    ) -> AppResult<StoreTier> {
        match self.remote.upsert(collection, key, value).await {
            Ok(()) => {
                debug!(collection, key, "remote write ok");
                Ok(StoreTier::Remote)
            }
            Err(remote_err) => {
                warn!(
                    collection,
                    key,
                    error = %remote_err,
                    "remote write failed, writing to local cache"
                );
                self.local
                    .upsert(collection, key, value)
                    .await
                    .map_err(|local_err| {
                        AppError::storage(format!(
                            "both store tiers failed writing {collection}/{key}: \
                             remote: {remote_err}; local: {local_err}"
                        ))
                    })?;
                Ok(StoreTier::LocalFallback)
            }
        }
    }

    fn user_key(user_id: Uuid) -> String {
        user_id.to_string()
    }

    fn scoped_key(user_id: Uuid, record_id: &str) -> String {
        format!("{user_id}/{record_id}")
    }

    /// Load a user's progress record, defaulting to the first-access shape
    /// (level 1, 0 XP, week 1, empty sets) when no record exists in either
    /// tier.
    ///
    /// # Errors
    ///
    /// Returns an error only when both tiers fail or the stored payload is
    /// malformed.
    pub async fn load_progress(&self, user_id: Uuid) -> AppResult<UserProgress> {
        match self
            .read_document(collections::USER_PROGRESS, &Self::user_key(user_id))
            .await?
        {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(UserProgress::new(user_id)),
        }
    }

    /// Persist a user's progress record.
    ///
    /// # Errors
    ///
    /// Returns an error only when both tiers fail.
    pub async fn store_progress(&self, progress: &UserProgress) -> AppResult<StoreTier> {
        let value = serde_json::to_value(progress)?;
        self.write_document(
            collections::USER_PROGRESS,
            &Self::user_key(progress.user_id),
            &value,
        )
        .await
    }

    /// Load a user's gamification stats, defaulting to zeroed fields.
    ///
    /// # Errors
    ///
    /// Returns an error only when both tiers fail or the stored payload is
    /// malformed.
    pub async fn load_stats(&self, user_id: Uuid) -> AppResult<UserGamificationStats> {
        match self
            .read_document(collections::GAMIFICATION_STATS, &Self::user_key(user_id))
            .await?
        {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(UserGamificationStats::new(user_id)),
        }
    }

    /// Persist a user's gamification stats.
    ///
    /// # Errors
    ///
    /// Returns an error only when both tiers fail.
    pub async fn store_stats(&self, stats: &UserGamificationStats) -> AppResult<StoreTier> {
        let value = serde_json::to_value(stats)?;
        self.write_document(
            collections::GAMIFICATION_STATS,
            &Self::user_key(stats.user_id),
            &value,
        )
        .await
    }

    /// Load one exercise tracking record. `None` means tracking was never
    /// initialized for this exercise.
    ///
    /// # Errors
    ///
    /// Returns an error only when both tiers fail or the stored payload is
    /// malformed.
    pub async fn load_exercise(
        &self,
        user_id: Uuid,
        exercise_id: &str,
    ) -> AppResult<Option<ExerciseSetTracking>> {
        match self
            .read_document(
                collections::EXERCISE_TRACKING,
                &Self::scoped_key(user_id, exercise_id),
            )
            .await?
        {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Persist one exercise tracking record. Sets are stored as one nested
    /// structure, so the whole record is written on every mutation.
    ///
    /// # Errors
    ///
    /// Returns an error only when both tiers fail.
    pub async fn store_exercise(
        &self,
        user_id: Uuid,
        tracking: &ExerciseSetTracking,
    ) -> AppResult<StoreTier> {
        let value = serde_json::to_value(tracking)?;
        self.write_document(
            collections::EXERCISE_TRACKING,
            &Self::scoped_key(user_id, &tracking.exercise_id),
            &value,
        )
        .await
    }

    /// Load one workout session record.
    ///
    /// # Errors
    ///
    /// Returns an error only when both tiers fail or the stored payload is
    /// malformed.
    pub async fn load_session(
        &self,
        user_id: Uuid,
        session_id: &str,
    ) -> AppResult<Option<WorkoutSessionData>> {
        match self
            .read_document(
                collections::WORKOUT_SESSIONS,
                &Self::scoped_key(user_id, session_id),
            )
            .await?
        {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Persist one workout session record.
    ///
    /// # Errors
    ///
    /// Returns an error only when both tiers fail.
    pub async fn store_session(
        &self,
        user_id: Uuid,
        session: &WorkoutSessionData,
    ) -> AppResult<StoreTier> {
        let value = serde_json::to_value(session)?;
        self.write_document(
            collections::WORKOUT_SESSIONS,
            &Self::scoped_key(user_id, &session.id),
            &value,
        )
        .await
    }
}
