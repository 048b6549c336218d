// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User directory with typed operations.
//!
//! The whole directory is one JSON array under a single storage key, the
//! mock stand-in for a backend users table. Every mutation rewrites the
//! array wholesale. Lookups are linear scans, which is fine at the
//! demo-sized scale this store is meant for.

use std::sync::Arc;

use crate::error::{AuthError, Result};
use crate::models::User;
use crate::store::{keys, KeyValueStore};

/// Typed access to the persisted user collection.
#[derive(Clone)]
pub struct UserDirectory {
    store: Arc<dyn KeyValueStore>,
}

impl UserDirectory {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    // ─── Read Operations ─────────────────────────────────────────

    /// Load every registered user.
    ///
    /// An absent key or corrupt payload yields an empty directory: the
    /// store imitates a real database, and losing it means "no users",
    /// never a hard failure.
    pub fn load_all(&self) -> Result<Vec<User>> {
        let raw = self
            .store
            .get(keys::USER_DIRECTORY)
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        let Some(raw) = raw else {
            return Ok(Vec::new());
        };

        match serde_json::from_str(&raw) {
            Ok(users) => Ok(users),
            Err(e) => {
                tracing::warn!(error = %e, "User directory is corrupt, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    /// Find a user by email. The scan compares lowercased input against
    /// stored emails, which are lowercased at creation.
    pub fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = email.trim().to_lowercase();
        Ok(self.load_all()?.into_iter().find(|u| u.email == email))
    }

    /// Find a user by id.
    pub fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        Ok(self.load_all()?.into_iter().find(|u| u.id == id))
    }

    // ─── Write Operations ────────────────────────────────────────

    /// Replace the whole persisted collection.
    pub fn save_all(&self, users: &[User]) -> Result<()> {
        let serialized = serde_json::to_string(users)
            .map_err(|e| AuthError::Internal(anyhow::anyhow!("directory encoding failed: {}", e)))?;

        self.store
            .set(keys::USER_DIRECTORY, &serialized)
            .map_err(|e| AuthError::Storage(e.to_string()))
    }

    /// Append a brand-new user. The caller has already checked email
    /// uniqueness; the store itself has no constraint to enforce it.
    pub fn insert_new(&self, user: &User) -> Result<()> {
        let mut users = self.load_all()?;
        users.push(user.clone());
        self.save_all(&users)?;

        tracing::info!(user_id = %user.id, provider = ?user.provider, "User added to directory");
        Ok(())
    }

    /// Replace the entry with a matching id, or append if absent.
    pub fn upsert(&self, user: &User) -> Result<()> {
        let mut users = self.load_all()?;

        match users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => *existing = user.clone(),
            None => users.push(user.clone()),
        }

        self.save_all(&users)
    }

    /// Remove the entry with a matching id.
    ///
    /// Returns whether anything was removed.
    pub fn remove(&self, id: &str) -> Result<bool> {
        let users = self.load_all()?;
        let before = users.len();

        let remaining: Vec<User> = users.into_iter().filter(|u| u.id != id).collect();
        let removed = remaining.len() < before;

        if removed {
            self.save_all(&remaining)?;
            tracing::info!(user_id = %id, "User removed from directory");
        }

        Ok(removed)
    }
}
