//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// HS256 signing key for session tokens (raw bytes)
    pub session_signing_key: Vec<u8>,
    /// HMAC key for password reset tokens; defaults to the session key
    pub reset_signing_key: Vec<u8>,
    /// How long issued sessions stay valid, in days
    pub session_ttl_days: i64,
    /// Optional pause between validating an operation and applying it,
    /// matching the pacing of a remote auth API. Off by default.
    pub api_latency: Option<Duration>,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            session_signing_key: b"test_session_key_32_bytes_min!!!".to_vec(),
            reset_signing_key: b"test_reset_key_32_bytes_minimum!".to_vec(),
            session_ttl_days: 7,
            api_latency: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let session_signing_key = env::var("SESSION_SIGNING_KEY")
            .map_err(|_| ConfigError::Missing("SESSION_SIGNING_KEY"))?
            .into_bytes();

        Ok(Self {
            // Reset tokens ride on the session key unless given their own
            reset_signing_key: env::var("RESET_SIGNING_KEY")
                .map(String::into_bytes)
                .unwrap_or_else(|_| session_signing_key.clone()),
            session_ttl_days: env::var("SESSION_TTL_DAYS")
                .unwrap_or_else(|_| "7".to_string())
                .parse()
                .unwrap_or(7),
            api_latency: env::var("AUTH_API_LATENCY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis),
            session_signing_key,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
