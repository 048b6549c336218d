// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! External identity provider seam for OAuth sign-in.
//!
//! The product ships a mocked Google flow: no browser redirect, no token
//! exchange, just an identity handed back as if the consent screen had
//! completed. The trait keeps that pluggable so a real OAuth client can
//! slot in behind the same session-manager call.

use async_trait::async_trait;

use crate::models::Provider;

/// Identity asserted by an external provider after authentication.
#[derive(Debug, Clone)]
pub struct ProviderIdentity {
    pub email: String,
    pub name: String,
    pub avatar: Option<String>,
    /// Whether the provider vouches for the email address.
    pub verified: bool,
}

/// A third-party identity source (Google today).
#[async_trait]
pub trait ExternalIdentityProvider: Send + Sync {
    /// Provider tag recorded on accounts this source creates.
    fn provider(&self) -> Provider;

    /// Run the provider's sign-in flow and return the asserted identity.
    async fn authenticate(&self) -> anyhow::Result<ProviderIdentity>;
}

/// Mock Google provider resolving one fixed identity.
///
/// Deterministic on purpose: signing in twice must find the same directory
/// entry, exercising the reuse path as well as the creation path.
pub struct MockGoogleProvider {
    identity: ProviderIdentity,
}

impl Default for MockGoogleProvider {
    fn default() -> Self {
        Self {
            identity: ProviderIdentity {
                email: "demo.user@gmail.com".to_string(),
                name: "Demo User".to_string(),
                avatar: Some("https://lh3.googleusercontent.com/a/demo-user".to_string()),
                verified: true,
            },
        }
    }
}

impl MockGoogleProvider {
    /// Mock provider that asserts a caller-chosen identity.
    pub fn with_identity(identity: ProviderIdentity) -> Self {
        Self { identity }
    }
}

#[async_trait]
impl ExternalIdentityProvider for MockGoogleProvider {
    fn provider(&self) -> Provider {
        Provider::Google
    }

    async fn authenticate(&self) -> anyhow::Result<ProviderIdentity> {
        tracing::debug!(email = %self.identity.email, "Mock Google sign-in resolved");
        Ok(self.identity.clone())
    }
}
