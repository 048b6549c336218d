// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session token compatibility tests.
//!
//! These verify that tokens written by the session manager decode with the
//! codec, catching claim-format drift between the two sides early.

mod common;

use studio_auth::config::Config;
use studio_auth::store::{keys, KeyValueStore};
use studio_auth::token::SessionCodec;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

#[tokio::test]
async fn test_stored_token_matches_codec_format() {
    let (manager, store) = common::test_manager().await;

    let user = manager
        .sign_up("ann@example.com", "Abcdef1!", "Ann")
        .await
        .unwrap();

    let token = store.get(keys::SESSION_TOKEN).unwrap().unwrap();
    let codec = SessionCodec::new(&Config::default().session_signing_key);
    let claims = codec.decode(&token).expect("manager-issued token must decode");

    assert_eq!(claims.sub, user.id);
    // Default config issues 7-day sessions
    assert_eq!(claims.exp - claims.iat, 7 * SECONDS_PER_DAY);
    assert!(!claims.is_expired(chrono::Utc::now().timestamp()));
}

#[tokio::test]
async fn test_sign_in_issues_fresh_token() {
    let (manager, store) = common::test_manager().await;

    manager
        .sign_up("ann@example.com", "Abcdef1!", "Ann")
        .await
        .unwrap();
    let first = store.get(keys::SESSION_TOKEN).unwrap().unwrap();

    manager.sign_out().await;
    assert_eq!(store.get(keys::SESSION_TOKEN).unwrap(), None);

    manager
        .sign_in("ann@example.com", "Abcdef1!")
        .await
        .unwrap();
    let second = store.get(keys::SESSION_TOKEN).unwrap().unwrap();

    let codec = SessionCodec::new(&Config::default().session_signing_key);
    let first_claims = codec.decode(&first).unwrap();
    let second_claims = codec.decode(&second).unwrap();

    assert_eq!(first_claims.sub, second_claims.sub);
    assert!(second_claims.iat >= first_claims.iat);
}
