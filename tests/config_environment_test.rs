// ABOUTME: Tests for environment-based engine configuration
// ABOUTME: Default fallbacks, overrides, and validation failures
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2025 ForgeFit

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::time::Duration;

use forgefit_progress::config::EngineConfig;
use serial_test::serial;

fn clear_env() {
    for var in [
        "FORGEFIT_REMOTE_URL",
        "FORGEFIT_REMOTE_TIMEOUT_SECS",
        "FORGEFIT_CACHE_DATABASE_URL",
        "FORGEFIT_WEEKLY_SESSION_TARGET",
    ] {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_defaults_when_nothing_set() {
    clear_env();
    let config = EngineConfig::from_env().unwrap();
    assert_eq!(config.remote_base_url, "http://localhost:8080/api/v1");
    assert_eq!(config.request_timeout, Duration::from_secs(10));
    assert_eq!(config.cache_database_url, "sqlite:forgefit_cache.db");
    assert_eq!(config.weekly_session_target, 3);
}

#[test]
#[serial]
fn test_env_overrides_apply() {
    clear_env();
    std::env::set_var("FORGEFIT_REMOTE_URL", "https://api.forgefit.app/v1/");
    std::env::set_var("FORGEFIT_REMOTE_TIMEOUT_SECS", "30");
    std::env::set_var("FORGEFIT_WEEKLY_SESSION_TARGET", "5");

    let config = EngineConfig::from_env().unwrap();
    // Trailing slash is normalized away
    assert_eq!(config.remote_base_url, "https://api.forgefit.app/v1");
    assert_eq!(config.request_timeout, Duration::from_secs(30));
    assert_eq!(config.weekly_session_target, 5);

    clear_env();
}

#[test]
#[serial]
fn test_unparseable_values_fall_back_to_defaults() {
    clear_env();
    std::env::set_var("FORGEFIT_REMOTE_TIMEOUT_SECS", "soon");
    std::env::set_var("FORGEFIT_WEEKLY_SESSION_TARGET", "several");

    let config = EngineConfig::from_env().unwrap();
    assert_eq!(config.request_timeout, Duration::from_secs(10));
    assert_eq!(config.weekly_session_target, 3);

    clear_env();
}

#[test]
#[serial]
fn test_zero_weekly_target_is_rejected() {
    clear_env();
    std::env::set_var("FORGEFIT_WEEKLY_SESSION_TARGET", "0");

    let result = EngineConfig::from_env();
    assert!(result.is_err());

    clear_env();
}
