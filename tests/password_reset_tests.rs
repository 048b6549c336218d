// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Password reset flow tests.

mod common;

use std::sync::Arc;
use studio_auth::config::Config;
use studio_auth::error::AuthError;
use studio_auth::services::ResetTokenSigner;
use studio_auth::UserDirectory;

use common::RecordingDelivery;

#[tokio::test]
async fn test_reset_dispatches_verifiable_token() {
    let delivery = Arc::new(RecordingDelivery::default());
    let (manager, _store) = common::test_manager_with_delivery(delivery.clone()).await;

    manager
        .sign_up("ann@example.com", "Abcdef1!", "Ann")
        .await
        .unwrap();

    manager.reset_password("ann@example.com").await.unwrap();

    let sent = delivery.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    let (email, token) = &sent[0];
    assert_eq!(email, "ann@example.com");

    // The dispatched token verifies back to the same address
    let signer = ResetTokenSigner::new(&Config::default().reset_signing_key);
    assert_eq!(signer.verify(token), Some("ann@example.com".to_string()));
}

#[tokio::test]
async fn test_reset_leaves_directory_untouched() {
    let delivery = Arc::new(RecordingDelivery::default());
    let (manager, store) = common::test_manager_with_delivery(delivery).await;

    let user = manager
        .sign_up("ann@example.com", "Abcdef1!", "Ann")
        .await
        .unwrap();

    manager.reset_password("ann@example.com").await.unwrap();

    let directory = UserDirectory::new(store);
    assert_eq!(directory.find_by_id(&user.id).unwrap().unwrap(), user);
}

#[tokio::test]
async fn test_reset_rejects_invalid_and_unknown_emails() {
    let delivery = Arc::new(RecordingDelivery::default());
    let (manager, _store) = common::test_manager_with_delivery(delivery.clone()).await;

    let err = manager.reset_password("not an email").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidEmail));

    let err = manager
        .reset_password("nobody@example.com")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::UserNotFound));

    // Nothing was dispatched for either rejection
    assert!(delivery.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_reset_works_while_signed_out() {
    let delivery = Arc::new(RecordingDelivery::default());
    let (manager, _store) = common::test_manager_with_delivery(delivery.clone()).await;

    manager
        .sign_up("ann@example.com", "Abcdef1!", "Ann")
        .await
        .unwrap();
    manager.sign_out().await;

    manager.reset_password("Ann@Example.com").await.unwrap();
    assert_eq!(delivery.sent.lock().unwrap().len(), 1);
}
