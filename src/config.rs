// ABOUTME: Environment-based configuration for the progress engine
// ABOUTME: Remote store endpoint, local cache location, and weekly target parsing
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Environment-based configuration management
//!
//! The engine is configured entirely from environment variables, with
//! sensible defaults for local development. No configuration files.

use std::env;
use std::time::Duration;

use crate::constants::weekly;
use crate::errors::{AppError, AppResult};

/// Default remote document API endpoint for local development
const DEFAULT_REMOTE_BASE_URL: &str = "http://localhost:8080/api/v1";

/// Default local cache database (created on first use)
const DEFAULT_CACHE_DATABASE_URL: &str = "sqlite:forgefit_cache.db";

/// Default remote request timeout in seconds
const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 10;

/// Engine configuration resolved from the environment
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Base URL of the remote document API
    pub remote_base_url: String,
    /// Per-request timeout against the remote store
    pub request_timeout: Duration,
    /// SQLite URL for the local fallback cache
    pub cache_database_url: String,
    /// Sessions per week counted as 100% consistency
    pub weekly_session_target: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            remote_base_url: DEFAULT_REMOTE_BASE_URL.into(),
            request_timeout: Duration::from_secs(DEFAULT_REMOTE_TIMEOUT_SECS),
            cache_database_url: DEFAULT_CACHE_DATABASE_URL.into(),
            weekly_session_target: weekly::DEFAULT_SESSION_TARGET,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `FORGEFIT_REMOTE_URL` | `http://localhost:8080/api/v1` |
    /// | `FORGEFIT_REMOTE_TIMEOUT_SECS` | `10` |
    /// | `FORGEFIT_CACHE_DATABASE_URL` | `sqlite:forgefit_cache.db` |
    /// | `FORGEFIT_WEEKLY_SESSION_TARGET` | `3` |
    ///
    /// # Errors
    ///
    /// Returns an error if a set variable fails validation (empty remote
    /// URL, zero weekly target, zero timeout).
    pub fn from_env() -> AppResult<Self> {
        let remote_base_url = env::var("FORGEFIT_REMOTE_URL")
            .unwrap_or_else(|_| DEFAULT_REMOTE_BASE_URL.into())
            .trim_end_matches('/')
            .to_owned();

        let timeout_secs = env::var("FORGEFIT_REMOTE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_REMOTE_TIMEOUT_SECS);

        let cache_database_url = env::var("FORGEFIT_CACHE_DATABASE_URL")
            .unwrap_or_else(|_| DEFAULT_CACHE_DATABASE_URL.into());

        let weekly_session_target = env::var("FORGEFIT_WEEKLY_SESSION_TARGET")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(weekly::DEFAULT_SESSION_TARGET);

        let config = Self {
            remote_base_url,
            request_timeout: Duration::from_secs(timeout_secs),
            cache_database_url,
            weekly_session_target,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote URL is empty, the weekly target is
    /// zero, or the timeout is zero.
    pub fn validate(&self) -> AppResult<()> {
        if self.remote_base_url.is_empty() {
            return Err(AppError::config("FORGEFIT_REMOTE_URL must not be empty"));
        }
        if self.weekly_session_target == 0 {
            return Err(AppError::config(
                "FORGEFIT_WEEKLY_SESSION_TARGET must be at least 1",
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(AppError::config(
                "FORGEFIT_REMOTE_TIMEOUT_SECS must be at least 1",
            ));
        }
        Ok(())
    }
}
