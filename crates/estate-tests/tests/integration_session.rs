// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Session Integration Tests
//!
//! Session store behavior over in-memory storage and over cookies.

use axum::http::{header, HeaderMap, HeaderValue};
use estate_api::{restore_session, CookieConfig, CookieStorage};
use estate_core::{
    session::{IDENTITY_KEY, TOKEN_KEY},
    MemoryStorage, SessionState, SessionStorage, SessionStore,
};
use estate_tests::prelude::*;

fn cookie_headers(cookie: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
    headers
}

// =============================================================================
// In-memory store
// =============================================================================

#[test]
fn test_session_store_lifecycle() {
    let mut store = SessionStore::new(MemoryStorage::new());
    assert_eq!(store.state(), &SessionState::Loading);

    assert_eq!(store.load(), &SessionState::Unauthenticated);

    let session = SessionBuilder::manager().build();
    store.save(session.clone()).unwrap();
    assert_eq!(store.session(), Some(&session));

    let mut reopened = SessionStore::new(store.into_storage());
    assert_eq!(reopened.load(), &SessionState::Authenticated(session));

    reopened.clear();
    assert_eq!(reopened.state(), &SessionState::Unauthenticated);
    assert!(reopened.storage().is_empty());
}

#[test]
fn test_session_corrupted_identity_is_cleared() {
    let storage = MemoryStorage::new()
        .with_entry(IDENTITY_KEY, "{not json")
        .with_entry(TOKEN_KEY, "tok");
    let mut store = SessionStore::new(storage);

    assert_eq!(store.load(), &SessionState::Unauthenticated);
    assert!(store.storage().get(IDENTITY_KEY).is_none());
    assert!(store.storage().get(TOKEN_KEY).is_none());
}

#[test]
fn test_session_undefined_literal_is_absent() {
    let storage = MemoryStorage::new()
        .with_entry(IDENTITY_KEY, "undefined")
        .with_entry(TOKEN_KEY, "tok");
    let mut store = SessionStore::new(storage);

    assert_eq!(store.load(), &SessionState::Unauthenticated);
    assert!(store.storage().is_empty());
}

#[test]
fn test_session_half_written_is_discarded() {
    let identity = serde_json::to_string(&IdentityFixtures::admin()).unwrap();
    let mut store = SessionStore::new(MemoryStorage::new().with_entry(IDENTITY_KEY, identity));

    assert_eq!(store.load(), &SessionState::Unauthenticated);
    assert!(store.storage().is_empty());
}

// =============================================================================
// Cookie-backed store
// =============================================================================

#[test]
fn test_session_restored_from_cookies() {
    let builder = SessionBuilder::admin().token("abc.def");
    let store = restore_session(&cookie_headers(&builder.cookie_header()), &CookieConfig::default());

    assert_eq!(store.session(), Some(&builder.build()));
    assert!(!store.storage().has_changes());
}

#[test]
fn test_session_save_emits_both_cookies() {
    let mut store = SessionStore::new(CookieStorage::new(CookieConfig::default()));
    store.save(SessionBuilder::user().build()).unwrap();

    let cookies = store.storage().set_cookies();
    assert_eq!(cookies.len(), 2);
    assert!(cookies.iter().any(|c| c.starts_with("estate.identity=")));
    assert!(cookies.iter().any(|c| c.starts_with("estate.token=test-token")));
    assert!(cookies.iter().all(|c| c.contains("HttpOnly") && c.contains("Path=/")));
}

#[test]
fn test_session_corrupted_cookie_is_expired() {
    let cookie = CookieHeaderBuilder::new()
        .raw(IDENTITY_KEY, "undefined")
        .raw(TOKEN_KEY, "tok")
        .build();
    let store = restore_session(&cookie_headers(&cookie), &CookieConfig::default());

    assert_eq!(store.state(), &SessionState::Unauthenticated);
    let cookies = store.storage().set_cookies();
    assert_eq!(cookies.len(), 2);
    assert!(cookies.iter().all(|c| c.contains("Max-Age=0")));
}

#[test]
fn test_session_secure_cookie_attributes() {
    let config = CookieConfig {
        secure: true,
        max_age_secs: Some(3600),
        ..CookieConfig::default()
    };
    let mut store = SessionStore::new(CookieStorage::new(config));
    store.save(SessionBuilder::admin().build()).unwrap();

    for cookie in store.storage().set_cookies() {
        assert!(cookie.contains("; Secure"), "{}", cookie);
        assert!(cookie.contains("Max-Age=3600"), "{}", cookie);
        assert!(cookie.contains("SameSite=Lax"), "{}", cookie);
    }
}
