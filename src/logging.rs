// ABOUTME: Logging configuration and structured logging setup for the progress engine
// ABOUTME: Configures log levels and output formats via tracing-subscriber
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2025 ForgeFit

//! Structured logging setup
//!
//! The engine logs through `tracing`; the embedding application decides when
//! to install a subscriber. [`init`] installs one configured from the
//! environment for binaries and test harnesses that want the default setup.

use std::env;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// `JSON` format for production logging
    Json,
    /// Pretty format for development
    Pretty,
    /// Compact format for space-constrained environments
    Compact,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter (`RUST_LOG` syntax)
    pub level: String,
    /// Output format
    pub format: LogFormat,
    /// Include source file and line numbers
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
            include_location: false,
        }
    }
}

impl LoggingConfig {
    /// Create logging configuration from environment variables
    /// (`RUST_LOG`, `LOG_FORMAT`, `LOG_INCLUDE_LOCATION`).
    #[must_use]
    pub fn from_env() -> Self {
        let level = env::var("RUST_LOG").unwrap_or_else(|_| "info".into());

        let format = match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("compact") => LogFormat::Compact,
            _ => LogFormat::Pretty,
        };

        let include_location = env::var("LOG_INCLUDE_LOCATION")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        Self {
            level,
            format,
            include_location,
        }
    }
}

/// Initialize the global tracing subscriber from the given configuration.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed or the level
/// filter fails to parse.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_new(&config.level)?;

    let fmt_layer = match config.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .boxed(),
    };

    Registry::default().with(filter).with(fmt_layer).try_init()?;

    info!(
        level = %config.level,
        format = ?config.format,
        "logging initialized"
    );
    Ok(())
}

/// Initialize logging from the environment. Convenience wrapper over
/// [`init`] with [`LoggingConfig::from_env`].
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_from_env() -> Result<()> {
    init(&LoggingConfig::from_env())
}
