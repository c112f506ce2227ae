// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The session store.
//!
//! # State Machine
//!
//! ```text
//!            load()
//! Loading ──────────┬──────────────► Unauthenticated
//!                   │                   │      ▲
//!                   │           save()  │      │ clear() / corrupted data
//!                   │                   ▼      │
//!                   └──────────────► Authenticated
//! ```
//!
//! There is no expiry or refresh transition.

use tracing::{debug, warn};

use super::identity::{Identity, Session, SessionToken};
use super::storage::SessionStorage;
use crate::error::CoreResult;

/// Storage key for the JSON identity.
pub const IDENTITY_KEY: &str = "estate.identity";

/// Storage key for the plain token.
pub const TOKEN_KEY: &str = "estate.token";

/// Value some clients wrote instead of removing an entry.
const UNDEFINED_SENTINEL: &str = "undefined";

// =============================================================================
// SessionState
// =============================================================================

/// Where the store is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Persisted data has not been read yet.
    Loading,
    /// No usable session.
    Unauthenticated,
    /// A session is present.
    Authenticated(Session),
}

impl SessionState {
    /// Returns the session, if authenticated.
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    /// Returns `true` until the first load resolves.
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }
}

// =============================================================================
// SessionStore
// =============================================================================

/// Load/save/clear contract over a [`SessionStorage`].
///
/// The store is an explicit value passed to whoever needs the session. It
/// never panics on bad persisted data; corrupted entries are cleared and
/// the store resolves to [`SessionState::Unauthenticated`].
#[derive(Debug)]
pub struct SessionStore<S> {
    storage: S,
    state: SessionState,
}

impl<S: SessionStorage> SessionStore<S> {
    /// Creates a store in the [`SessionState::Loading`] state.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            state: SessionState::Loading,
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Returns the current session, if any.
    pub fn session(&self) -> Option<&Session> {
        self.state.session()
    }

    /// Reads the persisted session.
    ///
    /// Missing entries resolve to unauthenticated. Entries that are the
    /// literal `"undefined"`, fail to parse, or are present without their
    /// counterpart are cleared first.
    pub fn load(&mut self) -> &SessionState {
        let identity = self.storage.get(IDENTITY_KEY);
        let token = self.storage.get(TOKEN_KEY);

        self.state = match read_session(identity.as_deref(), token.as_deref()) {
            Ok(Some(session)) => {
                debug!(role = %session.role(), "Session restored");
                SessionState::Authenticated(session)
            }
            Ok(None) => SessionState::Unauthenticated,
            Err(reason) => {
                warn!(reason = reason, "Discarding corrupted session data");
                self.remove_entries();
                SessionState::Unauthenticated
            }
        };

        &self.state
    }

    /// Persists `session`, writing both entries together.
    pub fn save(&mut self, session: Session) -> CoreResult<()> {
        let identity = serde_json::to_string(&session.identity)?;
        self.storage.set_all(&[
            (IDENTITY_KEY, identity.as_str()),
            (TOKEN_KEY, session.token.expose()),
        ]);

        debug!(role = %session.role(), "Session saved");
        self.state = SessionState::Authenticated(session);
        Ok(())
    }

    /// Removes both entries.
    pub fn clear(&mut self) {
        self.remove_entries();
        self.state = SessionState::Unauthenticated;
    }

    /// Returns the underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Consumes the store, returning the storage.
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn remove_entries(&mut self) {
        self.storage.remove(IDENTITY_KEY);
        self.storage.remove(TOKEN_KEY);
    }
}

/// Interprets the two raw entries.
///
/// `Ok(None)` means nothing was stored. `Err` carries a short reason for
/// logging and means the entries must be cleared.
fn read_session(
    identity: Option<&str>,
    token: Option<&str>,
) -> Result<Option<Session>, &'static str> {
    let (identity, token) = match (identity, token) {
        (None, None) => return Ok(None),
        (Some(identity), Some(token)) => (identity, token),
        _ => return Err("identity and token must be stored together"),
    };

    if identity == UNDEFINED_SENTINEL || token == UNDEFINED_SENTINEL {
        return Err("entry holds the literal \"undefined\"");
    }

    let identity: Identity =
        serde_json::from_str(identity).map_err(|_| "identity is not a valid identity object")?;
    let token = SessionToken::new(token).map_err(|_| "token is empty")?;

    Ok(Some(Session::new(identity, token)))
}

// =============================================================================
// Tests
// =============================================================================
