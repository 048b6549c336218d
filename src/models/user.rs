//! User model for storage and the view layer.

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::time_utils::now_rfc3339;

/// Which identity flow created an account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Provider {
    #[default]
    Email,
    Google,
}

impl Provider {
    /// Prefix embedded in ids generated for this provider's accounts.
    fn id_prefix(self) -> &'static str {
        match self {
            Provider::Email => "user",
            Provider::Google => "google",
        }
    }
}

/// User profile stored in the directory and mirrored into the session
/// snapshot. Field names serialize in camelCase to match what the web
/// storefront persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct User {
    /// Unique id: provider prefix, creation millis, random base36 suffix
    pub id: String,
    /// Lowercased email address, unique within the directory
    pub email: String,
    /// Display name
    pub name: String,
    /// Avatar URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// When the account was created (RFC3339)
    pub created_at: String,
    /// Most recent sign-in or session restore (RFC3339)
    pub last_login: String,
    /// Accounts are auto-verified; there is no confirmation email flow
    pub is_verified: bool,
    /// Identity flow that created the account. Records written before this
    /// field existed deserialize as email accounts.
    #[serde(default)]
    pub provider: Provider,
}

impl User {
    /// Create a fresh account record stamped with the current time.
    pub fn new(email: impl Into<String>, name: impl Into<String>, provider: Provider) -> Self {
        let now = now_rfc3339();
        Self {
            id: generate_id(provider.id_prefix()),
            email: email.into(),
            name: name.into(),
            avatar: None,
            created_at: now.clone(),
            last_login: now,
            is_verified: true,
            provider,
        }
    }

    /// Refresh the last-login stamp to now.
    pub fn touch_login(&mut self) {
        self.last_login = now_rfc3339();
    }
}

/// Partial profile change applied by `update_profile`. Absent fields keep
/// their current values; email and provider are not updatable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate `{prefix}_{unix_millis}_{nine base36 chars}`.
fn generate_id(prefix: &str) -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..9)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect();
    format!("{}_{}_{}", prefix, Utc::now().timestamp_millis(), suffix)
}
