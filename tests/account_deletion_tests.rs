// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account deletion tests.

mod common;

use studio_auth::error::AuthError;
use studio_auth::store::{keys, KeyValueStore};
use studio_auth::UserDirectory;

#[tokio::test]
async fn test_delete_requires_authentication() {
    let (manager, _store) = common::test_manager().await;

    let err = manager.delete_account().await.unwrap_err();
    assert!(matches!(err, AuthError::NotAuthenticated));
}

#[tokio::test]
async fn test_delete_removes_user_and_clears_session() {
    let (manager, store) = common::test_manager().await;

    let user = manager
        .sign_up("ann@example.com", "Abcdef1!", "Ann")
        .await
        .unwrap();

    manager.delete_account().await.unwrap();

    assert!(manager.current_user().is_none());
    assert_eq!(store.get(keys::SESSION_TOKEN).unwrap(), None);
    assert_eq!(store.get(keys::CURRENT_USER).unwrap(), None);

    // Gone from every subsequent directory read
    let directory = UserDirectory::new(store);
    assert!(directory.load_all().unwrap().is_empty());
    assert!(directory.find_by_id(&user.id).unwrap().is_none());
    assert!(directory.find_by_email("ann@example.com").unwrap().is_none());
}

#[tokio::test]
async fn test_delete_leaves_other_accounts_alone() {
    let (manager, store) = common::test_manager().await;

    let ann = manager
        .sign_up("ann@example.com", "Abcdef1!", "Ann")
        .await
        .unwrap();
    manager.sign_out().await;

    manager
        .sign_up("bob@example.com", "Abcdef1!", "Bob")
        .await
        .unwrap();
    manager.delete_account().await.unwrap();

    let directory = UserDirectory::new(store);
    let remaining = directory.load_all().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, ann.id);
}

#[tokio::test]
async fn test_email_is_reusable_after_deletion() {
    let (manager, _store) = common::test_manager().await;

    let first = manager
        .sign_up("ann@example.com", "Abcdef1!", "Ann")
        .await
        .unwrap();
    manager.delete_account().await.unwrap();

    let second = manager
        .sign_up("ann@example.com", "Abcdef1!", "Ann")
        .await
        .expect("email freed by deletion");
    assert_ne!(first.id, second.id);
}
