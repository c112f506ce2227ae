// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Identity and session types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::role::Role;

// =============================================================================
// Identity
// =============================================================================

/// The signed-in user as reported by the backend at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Role label.
    pub role: Role,
    /// Name shown in the console header.
    pub display_name: String,
    /// Email address.
    pub email: String,
}

impl Identity {
    /// Creates a new identity.
    pub fn new(role: Role, display_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            role,
            display_name: display_name.into(),
            email: email.into(),
        }
    }
}

// =============================================================================
// SessionToken
// =============================================================================

/// Opaque credential for backend requests.
///
/// The value is never printed by `Debug`. There is no expiry: a stored token
/// is trusted until explicit logout.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Creates a token, rejecting blank values.
    pub fn new(raw: impl Into<String>) -> CoreResult<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(CoreError::invalid_token("token cannot be empty"));
        }
        Ok(Self(raw))
    }

    /// Returns the raw token for transmission.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(***)")
    }
}

// =============================================================================
// Session
// =============================================================================

/// An authenticated session: identity plus credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// The signed-in user.
    pub identity: Identity,
    /// The credential for backend requests.
    pub token: SessionToken,
}

impl Session {
    /// Creates a new session.
    pub fn new(identity: Identity, token: SessionToken) -> Self {
        Self { identity, token }
    }

    /// Returns the session's role.
    pub fn role(&self) -> &Role {
        &self.identity.role
    }
}

// =============================================================================
// Tests
// =============================================================================
