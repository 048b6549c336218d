// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Auth session manager.
//!
//! Owns the current-user state machine and the seven mutating operations.
//! Every operation validates its input before any pacing or mutation, and
//! either applies all of its effects or none of them: on a storage failure
//! after a directory write, the directory is rolled back to its prior state
//! so the in-memory snapshot, the stored snapshot, and the directory entry
//! never disagree.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::config::Config;
use crate::directory::UserDirectory;
use crate::error::{AuthError, Result};
use crate::models::{ProfileUpdate, Provider, User};
use crate::services::{
    ExternalIdentityProvider, LogDelivery, MockGoogleProvider, PasswordResetDelivery,
    ResetTokenSigner,
};
use crate::store::{keys, KeyValueStore};
use crate::token::SessionCodec;
use crate::validation;

/// Clears the busy flag on every exit path, including early `?` returns.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn new(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// The session/auth core.
///
/// The view layer calls the operations, reads [`current_user`] and
/// [`is_busy`] reactively, and surfaces every error's `Display` text to the
/// end user.
///
/// [`current_user`]: SessionManager::current_user
/// [`is_busy`]: SessionManager::is_busy
pub struct SessionManager {
    config: Config,
    store: Arc<dyn KeyValueStore>,
    directory: UserDirectory,
    codec: SessionCodec,
    reset_signer: ResetTokenSigner,
    identity_provider: Arc<dyn ExternalIdentityProvider>,
    reset_delivery: Arc<dyn PasswordResetDelivery>,
    current_user: RwLock<Option<User>>,
    busy: AtomicBool,
}

impl SessionManager {
    /// Create a manager with the default collaborators (mock Google
    /// provider, log-only reset delivery) and restore any stored session.
    pub async fn start(config: Config, store: Arc<dyn KeyValueStore>) -> Self {
        Self::start_with(
            config,
            store,
            Arc::new(MockGoogleProvider::default()),
            Arc::new(LogDelivery),
        )
        .await
    }

    /// Create a manager with injected collaborators and restore any stored
    /// session.
    ///
    /// Restoration runs to completion before this returns, so no operation
    /// can observe a half-initialized session. It never fails: corrupt
    /// storage, a malformed token, or an expired token all degrade to
    /// "not authenticated".
    pub async fn start_with(
        config: Config,
        store: Arc<dyn KeyValueStore>,
        identity_provider: Arc<dyn ExternalIdentityProvider>,
        reset_delivery: Arc<dyn PasswordResetDelivery>,
    ) -> Self {
        let manager = Self {
            codec: SessionCodec::new(&config.session_signing_key),
            reset_signer: ResetTokenSigner::new(&config.reset_signing_key),
            directory: UserDirectory::new(store.clone()),
            store,
            identity_provider,
            reset_delivery,
            current_user: RwLock::new(None),
            busy: AtomicBool::new(false),
            config,
        };

        let restored = match manager.restore_session() {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, "Session restore failed, starting unauthenticated");
                None
            }
        };

        if let Some(user) = restored {
            tracing::info!(user_id = %user.id, "Session restored");
            manager.set_current_user(Some(user));
        }

        manager
    }

    // ─── State Accessors ─────────────────────────────────────────

    /// Snapshot of the signed-in user, if any.
    pub fn current_user(&self) -> Option<User> {
        self.read_user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read_user().is_some()
    }

    /// Whether an operation is in flight. Advisory only: the view layer
    /// disables inputs while true, but a second programmatic call is not
    /// rejected.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    // ─── Operations ──────────────────────────────────────────────

    /// Register a new email/password account and sign it in.
    pub async fn sign_up(&self, email: &str, password: &str, name: &str) -> Result<User> {
        let _busy = BusyGuard::new(&self.busy);

        let email = email.trim().to_lowercase();
        if !validation::is_valid_email(&email) {
            return Err(AuthError::InvalidEmail);
        }

        if let Some(first_unmet) = validation::unmet_password_requirements(password).first() {
            return Err(AuthError::WeakPassword(first_unmet.to_string()));
        }

        let name = name.trim();
        if !validation::is_valid_name(name) {
            return Err(AuthError::InvalidName);
        }

        if self.directory.find_by_email(&email)?.is_some() {
            return Err(AuthError::EmailAlreadyExists);
        }

        self.pace().await;

        // The mock has no confirmation-email flow, so accounts start verified
        let user = User::new(email, name, Provider::Email);
        self.directory.insert_new(&user)?;

        if let Err(e) = self.persist_session(&user) {
            self.roll_back_insert(&user.id);
            return Err(e);
        }

        tracing::info!(user_id = %user.id, "Account created");
        Ok(user)
    }

    /// Sign in to an existing account.
    ///
    /// The mock backend stores no password hash: it checks only that the
    /// password is non-empty and at least 8 characters, then trusts it.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User> {
        let _busy = BusyGuard::new(&self.busy);

        let email = email.trim().to_lowercase();
        if !validation::is_valid_email(&email) {
            return Err(AuthError::InvalidEmail);
        }
        if password.is_empty() {
            return Err(AuthError::EmptyPassword);
        }
        if password.len() < 8 {
            return Err(AuthError::InvalidPassword);
        }

        let prior = self
            .directory
            .find_by_email(&email)?
            .ok_or(AuthError::UserNotFound)?;

        self.pace().await;

        let mut user = prior.clone();
        user.touch_login();
        self.directory.upsert(&user)?;

        if let Err(e) = self.persist_session(&user) {
            self.roll_back_upsert(&prior);
            return Err(e);
        }

        tracing::info!(user_id = %user.id, "Signed in");
        Ok(user)
    }

    /// Clear the stored session. Best effort: storage failures are logged
    /// and the in-memory state is cleared regardless.
    pub async fn sign_out(&self) {
        let _busy = BusyGuard::new(&self.busy);

        let user_id = self.read_user().map(|u| u.id);
        self.clear_session();

        match user_id {
            Some(id) => tracing::info!(user_id = %id, "Signed out"),
            None => tracing::debug!("Sign-out with no active session"),
        }
    }

    /// Sign in through the external identity provider, creating a
    /// provider-tagged account on first use and reusing it afterwards.
    pub async fn sign_in_with_provider(&self) -> Result<User> {
        let _busy = BusyGuard::new(&self.busy);

        self.pace().await;

        let identity = match self.identity_provider.authenticate().await {
            Ok(identity) => identity,
            Err(e) => {
                tracing::warn!(error = %e, "Provider sign-in failed");
                return Err(AuthError::ProviderSignInFailed);
            }
        };

        let email = identity.email.trim().to_lowercase();

        match self.directory.find_by_email(&email)? {
            Some(prior) => {
                let mut user = prior.clone();
                user.touch_login();
                self.directory.upsert(&user)?;

                if let Err(e) = self.persist_session(&user) {
                    self.roll_back_upsert(&prior);
                    return Err(e);
                }

                tracing::info!(user_id = %user.id, "Provider sign-in, existing account");
                Ok(user)
            }
            None => {
                let tag = self.identity_provider.provider();
                let mut user = User::new(email, identity.name.trim(), tag);
                user.avatar = identity.avatar;
                user.is_verified = identity.verified;
                self.directory.insert_new(&user)?;

                if let Err(e) = self.persist_session(&user) {
                    self.roll_back_insert(&user.id);
                    return Err(e);
                }

                tracing::info!(user_id = %user.id, "Provider sign-in, account created");
                Ok(user)
            }
        }
    }

    /// Dispatch a password-reset token for a registered email address.
    ///
    /// No user record changes on this path; actual email delivery is out of
    /// scope and handled by the injected [`PasswordResetDelivery`].
    pub async fn reset_password(&self, email: &str) -> Result<()> {
        let _busy = BusyGuard::new(&self.busy);

        let email = email.trim().to_lowercase();
        if !validation::is_valid_email(&email) {
            return Err(AuthError::InvalidEmail);
        }

        if self.directory.find_by_email(&email)?.is_none() {
            return Err(AuthError::UserNotFound);
        }

        self.pace().await;

        let token = self.reset_signer.issue(&email)?;
        self.reset_delivery.deliver(&email, &token).await?;

        tracing::info!(email = %email, "Password reset dispatched");
        Ok(())
    }

    /// Apply a partial profile change to the signed-in user.
    ///
    /// Re-issues the session token, extending its expiry. Email and
    /// provider are not updatable.
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<User> {
        let _busy = BusyGuard::new(&self.busy);

        let prior = self.read_user().ok_or(AuthError::NotAuthenticated)?;

        let name = match update.name {
            Some(name) => {
                let trimmed = name.trim().to_string();
                if !validation::is_valid_name(&trimmed) {
                    return Err(AuthError::InvalidName);
                }
                Some(trimmed)
            }
            None => None,
        };

        self.pace().await;

        let mut user = prior.clone();
        if let Some(name) = name {
            user.name = name;
        }
        if let Some(avatar) = update.avatar {
            user.avatar = Some(avatar);
        }

        self.directory.upsert(&user)?;

        if let Err(e) = self.persist_session(&user) {
            self.roll_back_upsert(&prior);
            return Err(e);
        }

        tracing::info!(user_id = %user.id, "Profile updated");
        Ok(user)
    }

    /// Remove the signed-in user from the directory and clear the session.
    pub async fn delete_account(&self) -> Result<()> {
        let _busy = BusyGuard::new(&self.busy);

        let user = self.read_user().ok_or(AuthError::NotAuthenticated)?;

        self.pace().await;

        self.directory.remove(&user.id)?;
        self.clear_session();

        tracing::info!(user_id = %user.id, "Account deleted");
        Ok(())
    }

    // ─── Session Persistence ─────────────────────────────────────

    /// Restore a stored session at startup.
    ///
    /// Requires both the snapshot and the token to be present. A malformed
    /// or expired token clears both keys. A restored user gets a fresh
    /// last-login stamp, persisted to the directory and the snapshot; the
    /// token itself is kept as issued.
    fn restore_session(&self) -> Result<Option<User>> {
        let snapshot = self
            .store
            .get(keys::CURRENT_USER)
            .map_err(|e| AuthError::Storage(e.to_string()))?;
        let token = self
            .store
            .get(keys::SESSION_TOKEN)
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        let (Some(snapshot), Some(token)) = (snapshot, token) else {
            return Ok(None);
        };

        let claims = match self.codec.decode(&token) {
            Ok(claims) => claims,
            Err(_) => {
                tracing::warn!("Stored session token is malformed, clearing session");
                self.clear_session();
                return Ok(None);
            }
        };

        if claims.is_expired(chrono::Utc::now().timestamp()) {
            tracing::info!(user_id = %claims.sub, "Stored session expired, clearing session");
            self.clear_session();
            return Ok(None);
        }

        let mut user: User = match serde_json::from_str(&snapshot) {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, "Stored user snapshot is corrupt, clearing session");
                self.clear_session();
                return Ok(None);
            }
        };

        user.touch_login();
        self.directory.upsert(&user)?;
        let refreshed = serde_json::to_string(&user)
            .map_err(|e| AuthError::Internal(anyhow::anyhow!("snapshot encoding failed: {}", e)))?;
        self.store
            .set(keys::CURRENT_USER, &refreshed)
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        Ok(Some(user))
    }

    /// Issue a token and write it plus the user snapshot, then adopt the
    /// user in memory. Called only after the directory already holds the
    /// record, so a failure here triggers the caller's directory rollback.
    fn persist_session(&self, user: &User) -> Result<()> {
        let token = self.codec.encode(&user.id, self.config.session_ttl_days)?;

        self.store
            .set(keys::SESSION_TOKEN, &token)
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        let snapshot = serde_json::to_string(user)
            .map_err(|e| AuthError::Internal(anyhow::anyhow!("snapshot encoding failed: {}", e)))?;
        self.store
            .set(keys::CURRENT_USER, &snapshot)
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        self.set_current_user(Some(user.clone()));

        tracing::debug!(
            user_id = %user.id,
            ttl_days = self.config.session_ttl_days,
            "Session created"
        );
        Ok(())
    }

    /// Remove both session keys and clear the in-memory user. Best effort:
    /// storage failures are logged, never returned.
    fn clear_session(&self) {
        if let Err(e) = self.store.remove(keys::SESSION_TOKEN) {
            tracing::warn!(error = %e, "Failed to remove stored session token");
        }
        if let Err(e) = self.store.remove(keys::CURRENT_USER) {
            tracing::warn!(error = %e, "Failed to remove stored user snapshot");
        }
        self.set_current_user(None);
    }

    // ─── Rollback Helpers ────────────────────────────────────────

    fn roll_back_insert(&self, user_id: &str) {
        if let Err(e) = self.directory.remove(user_id) {
            tracing::error!(error = %e, user_id = %user_id, "Failed to roll back directory insert");
        }
    }

    fn roll_back_upsert(&self, prior: &User) {
        if let Err(e) = self.directory.upsert(prior) {
            tracing::error!(error = %e, user_id = %prior.id, "Failed to roll back directory update");
        }
    }

    // ─── Internal ────────────────────────────────────────────────

    /// Optional pause matching the pacing of a remote auth API. Runs after
    /// validation, so rejected input never waits.
    async fn pace(&self) {
        if let Some(delay) = self.config.api_latency {
            tokio::time::sleep(delay).await;
        }
    }

    fn read_user(&self) -> Option<User> {
        self.current_user
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn set_current_user(&self, user: Option<User>) {
        *self
            .current_user
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = user;
    }
}
