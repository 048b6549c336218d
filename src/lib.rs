// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Studio-Auth: client-side authentication and session management
//!
//! This crate provides the auth core of a media-brand storefront: user
//! registration, sign-in, session restoration, and profile management over
//! a string-keyed key-value store standing in for a real backend.

pub mod config;
pub mod directory;
pub mod error;
pub mod models;
pub mod services;
pub mod session;
pub mod store;
pub mod time_utils;
pub mod token;
pub mod validation;

pub use config::Config;
pub use directory::UserDirectory;
pub use error::{AuthError, Result};
pub use models::{ProfileUpdate, Provider, User};
pub use session::SessionManager;
pub use store::{FileStore, KeyValueStore, MemoryStore};
