// ABOUTME: Local SQLite fallback cache for the persistence gateway
// ABOUTME: Key-to-JSON-blob storage keyed by (collection, cache_key) with upsert writes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ForgeFit

//! Local fallback tier
//!
//! A single `progress_cache` table holding JSON payloads under the same
//! logical keys the remote store uses, so values round-trip between tiers.
//! Only ever written when the remote store is unreachable.

use serde_json::Value;
use sqlx::{Pool, Row, Sqlite, SqlitePool};

use crate::errors::AppResult;

/// SQLite-backed key-to-JSON-blob cache
#[derive(Clone)]
pub struct LocalCache {
    pool: Pool<Sqlite>,
}

impl LocalCache {
    /// Open (creating if needed) the cache database and run migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the schema
    /// migration fails.
    pub async fn new(database_url: &str) -> AppResult<Self> {
        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options = if database_url.starts_with("sqlite:") {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_owned()
        };

        let pool = SqlitePool::connect(&connection_options).await?;
        let cache = Self { pool };
        cache.migrate().await?;
        Ok(cache)
    }

    /// Create the cache table.
    ///
    /// # Errors
    ///
    /// Returns an error if table creation fails.
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS progress_cache (
                collection TEXT NOT NULL,
                cache_key TEXT NOT NULL,
                payload TEXT NOT NULL,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                PRIMARY KEY (collection, cache_key)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Fetch one cached document. `Ok(None)` means no cached row.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the cached payload is not
    /// valid JSON.
    pub async fn fetch(&self, collection: &str, key: &str) -> AppResult<Option<Value>> {
        let row = sqlx::query(
            r"
            SELECT payload FROM progress_cache
            WHERE collection = $1 AND cache_key = $2
            ",
        )
        .bind(collection)
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row {
            let payload: String = row.get("payload");
            let value: Value = serde_json::from_str(&payload)?;
            Ok(Some(value))
        } else {
            Ok(None)
        }
    }

    /// Insert or update one cached document.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub async fn upsert(&self, collection: &str, key: &str, value: &Value) -> AppResult<()> {
        let payload = serde_json::to_string(value)?;

        sqlx::query(
            r"
            INSERT INTO progress_cache (collection, cache_key, payload, updated_at)
            VALUES ($1, $2, $3, CURRENT_TIMESTAMP)
            ON CONFLICT(collection, cache_key) DO UPDATE SET
                payload = $3,
                updated_at = CURRENT_TIMESTAMP
            ",
        )
        .bind(collection)
        .bind(key)
        .bind(payload)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
