// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Cookie-backed session storage.
//!
//! The two session entries live in two cookies named after their storage
//! keys. Reads come from the request `Cookie` header; writes and removals are
//! collected as `Set-Cookie` values and attached to the response.
//!
//! The identity cookie is signed (see [`crate::signing`]). Reads hand the
//! verified identity JSON to the store; an identity that fails verification
//! reaches the store as unparseable data, so both cookies are expired and
//! the request is unauthenticated.

use std::collections::HashMap;

use axum::http::{header, HeaderMap, HeaderValue};
use estate_core::session::{SessionStorage, SessionStore, IDENTITY_KEY, TOKEN_KEY};
use tracing::{error, warn};

use crate::config::CookieConfig;
use crate::signing::SessionSigner;

/// Stored identity is the literal the store treats as absent.
const UNDEFINED_SENTINEL: &str = "undefined";

/// Handed to the store for an identity cookie that failed verification.
/// It never parses as an identity.
const REJECTED_IDENTITY: &str = "";

// =============================================================================
// CookieStorage
// =============================================================================

/// [`SessionStorage`] over request and response cookies.
#[derive(Debug, Clone)]
pub struct CookieStorage {
    jar: HashMap<String, String>,
    pending: Vec<String>,
    attributes: CookieConfig,
    signer: SessionSigner,
}

impl CookieStorage {
    /// Creates an empty storage.
    pub fn new(attributes: CookieConfig) -> Self {
        let signer = SessionSigner::new(&attributes.secret);
        Self {
            jar: HashMap::new(),
            pending: Vec::new(),
            attributes,
            signer,
        }
    }

    /// Reads every cookie from the request headers.
    pub fn from_headers(headers: &HeaderMap, attributes: CookieConfig) -> Self {
        let mut storage = Self::new(attributes);
        for value in headers.get_all(header::COOKIE) {
            let Ok(value) = value.to_str() else {
                continue;
            };
            for (name, value) in parse_cookie_header(value) {
                storage.jar.insert(name, value);
            }
        }
        storage.verify_identity();
        storage
    }

    /// Replaces the signed identity in the jar with the JSON it carries.
    fn verify_identity(&mut self) {
        let Some(signed) = self.jar.remove(IDENTITY_KEY) else {
            return;
        };
        if signed == UNDEFINED_SENTINEL {
            self.jar.insert(IDENTITY_KEY.to_string(), signed);
            return;
        }

        let token = self.jar.get(TOKEN_KEY).map(String::as_str).unwrap_or_default();
        let identity = match self.signer.verify(&signed, token) {
            Ok(identity) => identity,
            Err(e) => {
                warn!(error = %e, "Identity cookie failed verification");
                REJECTED_IDENTITY.to_string()
            }
        };
        self.jar.insert(IDENTITY_KEY.to_string(), identity);
    }

    fn write_cookie(&mut self, key: &str, value: &str) {
        let mut cookie = format!(
            "{}={}; {}",
            key,
            urlencoding::encode(value),
            self.attributes()
        );
        if let Some(max_age) = self.attributes.max_age_secs {
            cookie.push_str(&format!("; Max-Age={}", max_age));
        }
        self.pending.push(cookie);
    }

    /// Returns the `Set-Cookie` values collected so far.
    pub fn set_cookies(&self) -> &[String] {
        &self.pending
    }

    /// Returns `true` if any cookie was written or removed.
    pub fn has_changes(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Appends the collected `Set-Cookie` headers to `headers`.
    pub fn write_to(&self, headers: &mut HeaderMap) {
        for cookie in &self.pending {
            match HeaderValue::from_str(cookie) {
                Ok(value) => {
                    headers.append(header::SET_COOKIE, value);
                }
                Err(e) => warn!(error = %e, "Dropping unrepresentable Set-Cookie header"),
            }
        }
    }

    fn attributes(&self) -> String {
        let mut attributes = format!(
            "Path=/; HttpOnly; SameSite={}",
            self.attributes.same_site.as_str()
        );
        if self.attributes.secure {
            attributes.push_str("; Secure");
        }
        attributes
    }
}

impl SessionStorage for CookieStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.jar.get(key).cloned()
    }

    /// The identity is signed against the token currently in the jar.
    fn set(&mut self, key: &str, value: &str) {
        if key == IDENTITY_KEY {
            let token = self.jar.get(TOKEN_KEY).cloned().unwrap_or_default();
            match self.signer.sign(value, &token, self.attributes.max_age_secs) {
                Ok(signed) => self.write_cookie(key, &signed),
                Err(e) => {
                    error!(error = %e, "Identity cookie not written");
                    self.remove(key);
                    return;
                }
            }
        } else {
            self.write_cookie(key, value);
        }
        self.jar.insert(key.to_string(), value.to_string());
    }

    /// Writes the token before the identity that is signed against it.
    fn set_all(&mut self, entries: &[(&str, &str)]) {
        let (identity, others): (Vec<_>, Vec<_>) =
            entries.iter().partition(|(key, _)| *key == IDENTITY_KEY);
        for (key, value) in others.into_iter().chain(identity) {
            self.set(key, value);
        }
    }

    fn remove(&mut self, key: &str) {
        self.jar.remove(key);
        self.pending
            .push(format!("{}=; {}; Max-Age=0", key, self.attributes()));
    }
}

/// Restores the session carried by a request.
///
/// The returned store has already been loaded. Any cleanup of corrupted
/// entries is pending in its storage.
pub fn restore_session(headers: &HeaderMap, attributes: &CookieConfig) -> SessionStore<CookieStorage> {
    let mut store = SessionStore::new(CookieStorage::from_headers(headers, attributes.clone()));
    store.load();
    store
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Splits a `Cookie` header into decoded name/value pairs.
fn parse_cookie_header(header: &str) -> impl Iterator<Item = (String, String)> + '_ {
    header.split(';').filter_map(|part| {
        let (name, value) = part.trim().split_once('=')?;
        if name.is_empty() {
            return None;
        }
        let value = urlencoding::decode(value)
            .map(|v| v.into_owned())
            .unwrap_or_else(|_| value.to_string());
        Some((name.to_string(), value))
    })
}

// =============================================================================
// Tests
// =============================================================================
