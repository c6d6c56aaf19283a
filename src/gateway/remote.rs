// ABOUTME: HTTP client for the remote JSON document API
// ABOUTME: GET/PUT per (collection, key) with upsert semantics and timeout handling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ForgeFit

//! HTTP implementation of [`RemoteStore`](super::RemoteStore)
//!
//! Documents live at `{base}/{collection}/{key}`. `GET` returns the JSON
//! document or 404 when no row exists; `PUT` upserts. A 404 on read maps to
//! `Ok(None)` (defaults are the caller's concern); transport failures,
//! timeouts, and 5xx responses map to [`StoreError::Unavailable`] so the
//! gateway degrades to the local tier.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

use super::{RemoteStore, StoreError};
use crate::errors::{AppError, AppResult};

/// Remote document API client
#[derive(Clone)]
pub struct HttpRemoteStore {
    client: Client,
    base_url: String,
}

impl HttpRemoteStore {
    /// Create a client for the given base URL with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    fn document_url(&self, collection: &str, key: &str) -> String {
        format!("{}/{collection}/{key}", self.base_url)
    }

    fn classify_status(status: StatusCode, body: &str) -> StoreError {
        if status.is_server_error() {
            StoreError::Unavailable(format!("remote responded {status}"))
        } else {
            StoreError::Backend(format!("remote responded {status}: {body}"))
        }
    }
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn fetch(&self, collection: &str, key: &str) -> Result<Option<Value>, StoreError> {
        let url = self.document_url(collection, key);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(format!("GET {url} failed: {e}")))?;

        let status = response.status();
        debug!(%url, %status, "remote fetch");

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::classify_status(status, &body));
        }

        let value = response
            .json::<Value>()
            .await
            .map_err(|e| StoreError::Backend(format!("malformed response from {url}: {e}")))?;
        Ok(Some(value))
    }

    async fn upsert(&self, collection: &str, key: &str, value: &Value) -> Result<(), StoreError> {
        let url = self.document_url(collection, key);
        let response = self
            .client
            .put(&url)
            .json(value)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(format!("PUT {url} failed: {e}")))?;

        let status = response.status();
        debug!(%url, %status, "remote upsert");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::classify_status(status, &body));
        }
        Ok(())
    }
}
