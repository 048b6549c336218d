// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session token codec.
//!
//! Sessions are HS256 JWTs carrying the user id and an absolute expiry.
//! Decoding deliberately skips the library's expiry validation so startup
//! restoration can tell a tampered token apart from a merely expired one
//! (both clear the session, but they are logged differently).

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, Result};

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user id)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl SessionClaims {
    /// Whether this session has expired as of `now` (Unix seconds).
    pub fn is_expired(&self, now: i64) -> bool {
        self.exp <= now
    }
}

/// Encoder/decoder for session tokens, bound to one signing key.
pub struct SessionCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl SessionCodec {
    pub fn new(signing_key: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(signing_key),
            decoding_key: DecodingKey::from_secret(signing_key),
        }
    }

    /// Create a session token for a user, valid for `ttl_days` from now.
    pub fn encode(&self, user_id: &str, ttl_days: i64) -> Result<String> {
        let now = chrono::Utc::now().timestamp();

        let claims = SessionClaims {
            sub: user_id.to_string(),
            iat: now,
            exp: now + ttl_days * SECONDS_PER_DAY,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(anyhow::anyhow!("session encoding failed: {}", e)))
    }

    /// Decode and verify a session token's structure and signature.
    ///
    /// An expired token still decodes; callers check expiry themselves via
    /// [`SessionClaims::is_expired`].
    pub fn decode(&self, token: &str) -> Result<SessionClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        // iat presence is enforced by the non-optional claims field
        validation.set_required_spec_claims(&["sub", "exp"]);

        jsonwebtoken::decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::MalformedToken)
    }
}
