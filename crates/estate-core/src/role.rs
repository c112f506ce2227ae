// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Roles.
//!
//! Roles are labels assigned by the backend. The backend may introduce new
//! ones at any time, so [`Role`] is a validated string rather than a closed
//! enum. The roles the console ships with are listed in [`KnownRole`].
//!
//! Comparison against the permission table is case-insensitive on the role
//! side only. [`Role::normalized`] is the single place that folds case.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

// =============================================================================
// Role
// =============================================================================

/// A role label as delivered by the backend.
///
/// The original casing is preserved for display; use [`Role::normalized`]
/// for matching.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Role(String);

impl Role {
    /// Creates a role from the backend value exactly as given.
    ///
    /// Whitespace is kept, so `" admin"` is a different role from `admin`.
    /// Returns an error for an empty or all-whitespace value.
    pub fn new(raw: impl Into<String>) -> CoreResult<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(CoreError::invalid_role("role cannot be empty"));
        }
        Ok(Self(raw))
    }

    /// Returns the role as given.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the lower-cased form used for permission matching.
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }

    /// Returns the matching shipped role, if any.
    pub fn known(&self) -> Option<KnownRole> {
        KnownRole::parse(&self.0)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Role {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.0
    }
}

impl From<KnownRole> for Role {
    fn from(role: KnownRole) -> Self {
        Self(role.as_str().to_string())
    }
}

// =============================================================================
// KnownRole
// =============================================================================

/// Roles the console ships with.
///
/// These have no ordering or hierarchy. Each path lists the roles it admits
/// explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KnownRole {
    /// Full administration of users, roles, menus and permissions.
    Admin,
    /// Property and unit management.
    Manager,
    /// Resident or staff member with read access to community pages.
    User,
}

impl KnownRole {
    /// Returns the role name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            KnownRole::Admin => "admin",
            KnownRole::Manager => "manager",
            KnownRole::User => "user",
        }
    }

    /// Parses a role from a string, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Some(KnownRole::Admin),
            "manager" => Some(KnownRole::Manager),
            "user" => Some(KnownRole::User),
            _ => None,
        }
    }

    /// Returns all shipped roles.
    pub fn all() -> &'static [KnownRole] {
        &[KnownRole::Admin, KnownRole::Manager, KnownRole::User]
    }
}

impl fmt::Display for KnownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Tests
// =============================================================================
