// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Builders

use estate_api::{CookieConfig, CookieStorage};
use estate_core::{session, Identity, MenuRecord, Session, SessionStore, SessionToken};

use super::assertions::cookie_header_from;
use super::fixtures::IdentityFixtures;

// =============================================================================
// SessionBuilder
// =============================================================================

/// Builds sessions and the cookie headers that carry them.
#[derive(Debug, Clone)]
pub struct SessionBuilder {
    identity: Identity,
    token: String,
}

impl SessionBuilder {
    /// Starts from `identity`.
    pub fn new(identity: Identity) -> Self {
        Self {
            identity,
            token: "test-token".to_string(),
        }
    }

    /// An administrator session.
    pub fn admin() -> Self {
        Self::new(IdentityFixtures::admin())
    }

    /// A manager session.
    pub fn manager() -> Self {
        Self::new(IdentityFixtures::manager())
    }

    /// A resident session.
    pub fn user() -> Self {
        Self::new(IdentityFixtures::user())
    }

    /// Sets the token.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    /// Builds the session.
    pub fn build(&self) -> Session {
        Session::new(
            self.identity.clone(),
            SessionToken::new(self.token.clone()).expect("token must not be blank"),
        )
    }

    /// The `Cookie` header a browser holds after the console saved this
    /// session with default cookie settings.
    pub fn cookie_header(&self) -> String {
        self.cookie_header_with(&CookieConfig::default())
    }

    /// Like [`SessionBuilder::cookie_header`], signed with `config.secret`.
    pub fn cookie_header_with(&self, config: &CookieConfig) -> String {
        let mut store = SessionStore::new(CookieStorage::new(config.clone()));
        store.save(self.build()).expect("session saves");
        cookie_header_from(store.storage().set_cookies())
    }

    /// Both entries as plain values, the way a client could write them
    /// without the server's secret.
    pub fn unsigned_cookie_header(&self) -> String {
        let identity = serde_json::to_string(&self.identity).expect("identity serializes");
        CookieHeaderBuilder::new()
            .entry(session::IDENTITY_KEY, &identity)
            .entry(session::TOKEN_KEY, &self.token)
            .build()
    }
}

// =============================================================================
// CookieHeaderBuilder
// =============================================================================

/// Builds raw `Cookie` header values, percent-encoding each value.
#[derive(Debug, Default, Clone)]
pub struct CookieHeaderBuilder {
    pairs: Vec<(String, String)>,
}

impl CookieHeaderBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry, percent-encoding the value.
    pub fn entry(mut self, name: &str, value: &str) -> Self {
        self.pairs
            .push((name.to_string(), urlencoding::encode(value).into_owned()));
        self
    }

    /// Adds an entry verbatim.
    pub fn raw(mut self, name: &str, value: &str) -> Self {
        self.pairs.push((name.to_string(), value.to_string()));
        self
    }

    /// Joins the entries.
    pub fn build(&self) -> String {
        self.pairs
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

// =============================================================================
// MenuBodyBuilder
// =============================================================================

/// Builds menu endpoint response bodies.
#[derive(Debug, Clone)]
pub struct MenuBodyBuilder {
    success: bool,
    data: Option<serde_json::Value>,
}

impl MenuBodyBuilder {
    /// A successful envelope around `records`.
    pub fn records(records: &[MenuRecord]) -> Self {
        Self {
            success: true,
            data: Some(serde_json::to_value(records).expect("records serialize")),
        }
    }

    /// A failed envelope.
    pub fn failure() -> Self {
        Self {
            success: false,
            data: None,
        }
    }

    /// Replaces the data array with arbitrary JSON.
    pub fn data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Builds the JSON value.
    pub fn value(&self) -> serde_json::Value {
        let mut body = serde_json::json!({ "success": self.success });
        if let Some(data) = &self.data {
            body["data"] = data.clone();
        }
        body
    }

    /// Builds the body text.
    pub fn build(&self) -> String {
        self.value().to_string()
    }
}
