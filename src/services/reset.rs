// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Password reset tokens and delivery.
//!
//! A reset request mints a signed, self-contained token and hands it to a
//! delivery implementation. The token format is pipe-delimited
//! `email|timestamp_hex|signature_hex`, HMAC-SHA256 signed and base64url
//! encoded as a whole, so a later reset endpoint can verify it without any
//! server-side state.

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};

// Type alias for HMAC-SHA256
type HmacSha256 = Hmac<Sha256>;

/// Mints and verifies signed password-reset tokens.
pub struct ResetTokenSigner {
    key: Vec<u8>,
}

impl ResetTokenSigner {
    pub fn new(key: &[u8]) -> Self {
        Self { key: key.to_vec() }
    }

    /// Issue a reset token for an email address.
    pub fn issue(&self, email: &str) -> anyhow::Result<String> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| anyhow::anyhow!("system time error: {}", e))?
            .as_millis();

        // Payload: "email|timestamp_hex"
        let payload = format!("{}|{:x}", email, timestamp);

        let mut mac = HmacSha256::new_from_slice(&self.key)
            .map_err(|e| anyhow::anyhow!("HMAC init failed: {}", e))?;
        mac.update(payload.as_bytes());
        let signature = mac.finalize().into_bytes();

        // Payload + signature: "email|timestamp_hex|signature_hex"
        let signed = format!("{}|{}", payload, hex::encode(signature));

        Ok(URL_SAFE_NO_PAD.encode(signed.as_bytes()))
    }

    /// Verify a reset token and return the email it was issued for.
    ///
    /// Returns `None` for anything malformed, tampered with, or signed
    /// with a different key.
    pub fn verify(&self, token: &str) -> Option<String> {
        let bytes = URL_SAFE_NO_PAD.decode(token).ok()?;
        let token_str = String::from_utf8(bytes).ok()?;

        let parts: Vec<&str> = token_str.splitn(3, '|').collect();
        if parts.len() != 3 {
            return None;
        }

        let email = parts[0];
        let timestamp_hex = parts[1];
        let signature_hex = parts[2];

        let payload = format!("{}|{}", email, timestamp_hex);

        let mut mac = HmacSha256::new_from_slice(&self.key).ok()?;
        mac.update(payload.as_bytes());
        let expected_signature = hex::encode(mac.finalize().into_bytes());

        if signature_hex != expected_signature {
            tracing::warn!("Reset token signature mismatch");
            return None;
        }

        Some(email.to_string())
    }
}

/// Destination for minted reset tokens.
///
/// Real email delivery is out of scope; the shipped implementation logs
/// the dispatch the way the original product console-logged it.
#[async_trait]
pub trait PasswordResetDelivery: Send + Sync {
    async fn deliver(&self, email: &str, token: &str) -> anyhow::Result<()>;
}

/// Delivery that writes a structured log line instead of sending email.
pub struct LogDelivery;

#[async_trait]
impl PasswordResetDelivery for LogDelivery {
    async fn deliver(&self, email: &str, token: &str) -> anyhow::Result<()> {
        tracing::info!(
            email = %email,
            token_len = token.len(),
            "Password reset dispatched"
        );
        Ok(())
    }
}
