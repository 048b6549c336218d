// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authentication error types with user-facing messages.

/// Authentication error type whose `Display` text is shown to the user.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Please enter a valid email address")]
    InvalidEmail,

    /// The message is the first unmet password requirement.
    #[error("{0}")]
    WeakPassword(String),

    #[error("Name must be at least 2 characters long")]
    InvalidName,

    #[error("An account with this email already exists")]
    EmailAlreadyExists,

    #[error("Password is required")]
    EmptyPassword,

    #[error("No account found with this email address")]
    UserNotFound,

    #[error("Invalid password")]
    InvalidPassword,

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Invalid or expired session token")]
    MalformedToken,

    #[error("Provider sign-in failed. Please try again.")]
    ProviderSignInFailed,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Result type alias for auth operations
pub type Result<T> = std::result::Result<T, AuthError>;
