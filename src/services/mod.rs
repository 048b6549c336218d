// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - pluggable collaborators of the session manager.

pub mod google;
pub mod reset;

pub use google::{ExternalIdentityProvider, MockGoogleProvider, ProviderIdentity};
pub use reset::{LogDelivery, PasswordResetDelivery, ResetTokenSigner};
