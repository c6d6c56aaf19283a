// ABOUTME: Shared test utilities for progress engine integration tests
// ABOUTME: Scriptable in-memory remote store double and gateway/orchestrator fixtures
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2025 ForgeFit
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

//! Shared test utilities for `forgefit-progress`
//!
//! Integration tests drive the engine against an in-memory remote store that
//! can be flipped offline, plus a tempfile-backed SQLite local cache.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use serde_json::Value;
use tempfile::TempDir;
use uuid::Uuid;

use forgefit_progress::achievements::StaticCatalog;
use forgefit_progress::gateway::{local::LocalCache, ProgressGateway, RemoteStore, StoreError};
use forgefit_progress::orchestrator::ProgressOrchestrator;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_test_writer()
            .init();
    });
}

/// In-memory remote store double. Holds JSON documents under
/// `(collection, key)` and can be flipped offline to exercise the local
/// fallback path.
#[derive(Default)]
pub struct InMemoryRemote {
    docs: Mutex<HashMap<(String, String), Value>>,
    online: AtomicBool,
}

impl InMemoryRemote {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            docs: Mutex::new(HashMap::new()),
            online: AtomicBool::new(true),
        })
    }

    /// Flip remote availability
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    /// Number of documents the remote currently holds
    pub fn document_count(&self) -> usize {
        self.docs.lock().unwrap().len()
    }

    /// Raw document access for assertions
    pub fn document(&self, collection: &str, key: &str) -> Option<Value> {
        self.docs
            .lock()
            .unwrap()
            .get(&(collection.to_owned(), key.to_owned()))
            .cloned()
    }
}

#[async_trait]
impl RemoteStore for InMemoryRemote {
    async fn fetch(&self, collection: &str, key: &str) -> Result<Option<Value>, StoreError> {
        if !self.online.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("remote offline".into()));
        }
        Ok(self
            .docs
            .lock()
            .unwrap()
            .get(&(collection.to_owned(), key.to_owned()))
            .cloned())
    }

    async fn upsert(&self, collection: &str, key: &str, value: &Value) -> Result<(), StoreError> {
        if !self.online.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("remote offline".into()));
        }
        self.docs
            .lock()
            .unwrap()
            .insert((collection.to_owned(), key.to_owned()), value.clone());
        Ok(())
    }
}

/// Gateway fixture: scriptable remote plus a scratch SQLite cache. Keep the
/// `TempDir` alive for the duration of the test.
pub struct TestGateway {
    pub gateway: ProgressGateway,
    pub remote: Arc<InMemoryRemote>,
    pub cache_dir: TempDir,
}

/// Build a gateway over a fresh in-memory remote and scratch local cache.
pub async fn create_test_gateway() -> TestGateway {
    init_test_logging();
    let remote = InMemoryRemote::new();
    let cache_dir = TempDir::new().expect("create temp dir");
    let cache_url = format!(
        "sqlite:{}",
        cache_dir.path().join("progress_cache.db").display()
    );
    let local = LocalCache::new(&cache_url).await.expect("open local cache");
    TestGateway {
        gateway: ProgressGateway::new(remote.clone(), local),
        remote,
        cache_dir,
    }
}

/// Orchestrator over a fresh test gateway and the builtin catalog.
pub async fn create_test_orchestrator() -> (ProgressOrchestrator, TestGateway) {
    let fixture = create_test_gateway().await;
    let orchestrator = ProgressOrchestrator::new(
        fixture.gateway.clone(),
        Arc::new(StaticCatalog::builtin()),
    );
    (orchestrator, fixture)
}

/// A stable user id for single-user tests
pub fn test_user() -> Uuid {
    Uuid::new_v4()
}
