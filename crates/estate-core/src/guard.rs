// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Route guards.
//!
//! Two gates run on every navigation, always in this order:
//!
//! ```text
//! ┌──────────────── AuthGate ────────────────┐
//! │ Loading       -> loading indicator       │
//! │ no session    -> redirect to login path  │
//! │ session       -> ┌──── RoleGate ───────┐ │
//! │                  │ denied -> AccessDenied│
//! │                  │ allowed -> page      │ │
//! │                  └─────────────────────┘ │
//! └──────────────────────────────────────────┘
//! ```
//!
//! Decisions are recomputed on every call. Nothing is cached, since a role
//! only changes through logout and login.

use tracing::info;

use crate::access::AccessEvaluator;
use crate::role::Role;
use crate::session::{Session, SessionState};

/// Default login path.
pub const DEFAULT_LOGIN_PATH: &str = "/login";

// =============================================================================
// AuthGate
// =============================================================================

/// Outcome of the authentication gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthDecision<'a> {
    /// The session is still loading; show a neutral indicator.
    Pending,
    /// No session; send the user to the login path.
    RedirectToLogin {
        /// Where to redirect.
        login_path: &'a str,
    },
    /// A session is present; continue to the role gate.
    Proceed(&'a Session),
}

/// Outer gate: is there a session at all.
#[derive(Debug, Clone)]
pub struct AuthGate {
    login_path: String,
}

impl AuthGate {
    /// Creates a gate that redirects to `login_path`.
    pub fn new(login_path: impl Into<String>) -> Self {
        Self {
            login_path: login_path.into(),
        }
    }

    /// Returns the login path.
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Evaluates the gate against the current session state.
    pub fn evaluate<'a>(&'a self, state: &'a SessionState) -> AuthDecision<'a> {
        match state {
            SessionState::Loading => AuthDecision::Pending,
            SessionState::Unauthenticated => AuthDecision::RedirectToLogin {
                login_path: &self.login_path,
            },
            SessionState::Authenticated(session) => AuthDecision::Proceed(session),
        }
    }
}

impl Default for AuthGate {
    fn default() -> Self {
        Self::new(DEFAULT_LOGIN_PATH)
    }
}

// =============================================================================
// RoleGate
// =============================================================================

/// Outcome of the role gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleDecision {
    /// Render the requested page.
    Render,
    /// Render the access-denied view in place of the page.
    Denied {
        /// The path that was refused.
        path: String,
        /// The role that was refused.
        role: Role,
    },
}

/// Inner gate: does the session's role pass the access evaluator.
#[derive(Debug, Clone)]
pub struct RoleGate {
    evaluator: AccessEvaluator,
}

impl RoleGate {
    /// Creates a gate over `evaluator`.
    pub fn new(evaluator: AccessEvaluator) -> Self {
        Self { evaluator }
    }

    /// Returns the evaluator.
    pub fn evaluator(&self) -> &AccessEvaluator {
        &self.evaluator
    }

    /// Evaluates the gate for `session` on `path`.
    ///
    /// A denial is an expected outcome and is logged at `info`.
    pub fn evaluate(&self, session: &Session, path: &str) -> RoleDecision {
        let role = session.role();
        if self.evaluator.can_enter_route(Some(role), path) {
            return RoleDecision::Render;
        }

        info!(role = %role, path = path, "Access denied by role gate");
        RoleDecision::Denied {
            path: path.to_string(),
            role: role.clone(),
        }
    }
}

// =============================================================================
// RouteGuard
// =============================================================================

/// Combined outcome of both gates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome<'a> {
    /// Session still loading.
    Loading,
    /// Redirect to `location`.
    Redirect {
        /// Redirect target.
        location: &'a str,
    },
    /// Show the access-denied view. The URL is left unchanged.
    AccessDenied {
        /// The refused path.
        path: String,
        /// The refused role.
        role: Role,
    },
    /// Render the page for this session.
    Render(&'a Session),
}

/// Both gates composed in their fixed order.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    auth: AuthGate,
    role: RoleGate,
}

impl RouteGuard {
    /// Creates a guard from its two gates.
    pub fn new(auth: AuthGate, role: RoleGate) -> Self {
        Self { auth, role }
    }

    /// Returns the authentication gate.
    pub fn auth_gate(&self) -> &AuthGate {
        &self.auth
    }

    /// Returns the role gate.
    pub fn role_gate(&self) -> &RoleGate {
        &self.role
    }

    /// Runs the authentication gate, then the role gate.
    pub fn evaluate<'a>(&'a self, state: &'a SessionState, path: &str) -> GuardOutcome<'a> {
        match self.auth.evaluate(state) {
            AuthDecision::Pending => GuardOutcome::Loading,
            AuthDecision::RedirectToLogin { login_path } => GuardOutcome::Redirect {
                location: login_path,
            },
            AuthDecision::Proceed(session) => match self.role.evaluate(session, path) {
                RoleDecision::Render => GuardOutcome::Render(session),
                RoleDecision::Denied { path, role } => GuardOutcome::AccessDenied { path, role },
            },
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
