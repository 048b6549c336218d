// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use studio_auth::config::Config;
use studio_auth::models::Provider;
use studio_auth::services::{
    ExternalIdentityProvider, LogDelivery, MockGoogleProvider, PasswordResetDelivery,
    ProviderIdentity,
};
use studio_auth::session::SessionManager;
use studio_auth::store::{KeyValueStore, MemoryStore};

static INIT_LOGGING: std::sync::Once = std::sync::Once::new();

/// Initialize env-filtered log output once per test binary.
/// Run tests with RUST_LOG=debug to see the crate's tracing output.
#[allow(dead_code)]
pub fn init_logging() {
    INIT_LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Create a fresh in-memory store.
#[allow(dead_code)]
pub fn test_store() -> Arc<MemoryStore> {
    init_logging();
    Arc::new(MemoryStore::new())
}

/// Create a session manager over a fresh in-memory store.
/// Returns the manager and the shared store for inspection.
#[allow(dead_code)]
pub async fn test_manager() -> (SessionManager, Arc<MemoryStore>) {
    let store = test_store();
    let manager = SessionManager::start(Config::default(), store.clone()).await;
    (manager, store)
}

/// Create a session manager over an existing store (restart simulation).
#[allow(dead_code)]
pub async fn test_manager_with_store(store: Arc<dyn KeyValueStore>) -> SessionManager {
    SessionManager::start(Config::default(), store).await
}

/// Reset delivery that records every dispatch instead of logging.
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingDelivery {
    pub sent: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl PasswordResetDelivery for RecordingDelivery {
    async fn deliver(&self, email: &str, token: &str) -> anyhow::Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((email.to_string(), token.to_string()));
        Ok(())
    }
}

/// Identity provider whose flow always fails.
#[allow(dead_code)]
pub struct FailingProvider;

#[async_trait]
impl ExternalIdentityProvider for FailingProvider {
    fn provider(&self) -> Provider {
        Provider::Google
    }

    async fn authenticate(&self) -> anyhow::Result<ProviderIdentity> {
        anyhow::bail!("consent screen dismissed")
    }
}

/// Create a session manager with a recording reset delivery.
#[allow(dead_code)]
pub async fn test_manager_with_delivery(
    delivery: Arc<RecordingDelivery>,
) -> (SessionManager, Arc<MemoryStore>) {
    let store = test_store();
    let manager = SessionManager::start_with(
        Config::default(),
        store.clone(),
        Arc::new(MockGoogleProvider::default()),
        delivery,
    )
    .await;
    (manager, store)
}

/// Create a session manager whose provider sign-in always fails.
#[allow(dead_code)]
pub async fn test_manager_with_failing_provider() -> SessionManager {
    SessionManager::start_with(
        Config::default(),
        test_store(),
        Arc::new(FailingProvider),
        Arc::new(LogDelivery),
    )
    .await
}
