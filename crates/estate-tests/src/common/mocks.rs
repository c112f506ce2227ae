// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Mock Implementations
//!
//! An in-memory [`ConsoleBackend`] with configurable accounts, menu
//! responses and latency. Calls are counted for verification.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use estate_api::{BackendError, ConsoleBackend, LoginCredentials};
use estate_core::{Identity, MenuError, MenuRecord, Session, SessionToken};

use super::fixtures::{IdentityFixtures, MenuFixtures};

// =============================================================================
// MockBackend
// =============================================================================

/// A configurable mock backend.
#[derive(Debug)]
pub struct MockBackend {
    accounts: Mutex<HashMap<String, (String, Identity)>>,
    menu: Mutex<Result<Vec<MenuRecord>, MenuError>>,
    menu_latency: Mutex<Duration>,
    login_count: AtomicU64,
    menu_count: AtomicU64,
    last_menu_token: Mutex<Option<String>>,
}

impl MockBackend {
    /// Creates a backend with no accounts and the console menu.
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            menu: Mutex::new(Ok(MenuFixtures::console())),
            menu_latency: Mutex::new(Duration::ZERO),
            login_count: AtomicU64::new(0),
            menu_count: AtomicU64::new(0),
            last_menu_token: Mutex::new(None),
        }
    }

    /// Creates a backend with one account per shipped role, password `secret`.
    pub fn with_console_accounts() -> Self {
        let backend = Self::new();
        backend.add_account("secret", IdentityFixtures::admin());
        backend.add_account("secret", IdentityFixtures::manager());
        backend.add_account("secret", IdentityFixtures::user());
        backend
    }

    /// Adds an account keyed by the identity's email.
    pub fn add_account(&self, password: &str, identity: Identity) {
        self.accounts
            .lock()
            .unwrap()
            .insert(identity.email.clone(), (password.to_string(), identity));
    }

    /// Sets the menu records returned.
    pub fn set_menu(&self, records: Vec<MenuRecord>) {
        *self.menu.lock().unwrap() = Ok(records);
    }

    /// Makes menu fetches fail with `error`.
    pub fn fail_menu(&self, error: MenuError) {
        *self.menu.lock().unwrap() = Err(error);
    }

    /// Delays every menu fetch.
    pub fn set_menu_latency(&self, latency: Duration) {
        *self.menu_latency.lock().unwrap() = latency;
    }

    /// Number of login calls.
    pub fn login_count(&self) -> u64 {
        self.login_count.load(Ordering::SeqCst)
    }

    /// Number of menu fetches.
    pub fn menu_count(&self) -> u64 {
        self.menu_count.load(Ordering::SeqCst)
    }

    /// Token presented on the last menu fetch.
    pub fn last_menu_token(&self) -> Option<String> {
        self.last_menu_token.lock().unwrap().clone()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConsoleBackend for MockBackend {
    async fn login(&self, credentials: &LoginCredentials) -> Result<Session, BackendError> {
        let count = self.login_count.fetch_add(1, Ordering::SeqCst) + 1;

        let accounts = self.accounts.lock().unwrap();
        match accounts.get(&credentials.email) {
            Some((password, identity)) if *password == credentials.password => {
                let token = SessionToken::new(format!("mock-token-{}", count))
                    .map_err(|e| BackendError::malformed(e.to_string()))?;
                Ok(Session::new(identity.clone(), token))
            }
            _ => Err(BackendError::rejected("invalid email or password")),
        }
    }

    async fn fetch_menu(&self, token: &SessionToken) -> Result<Vec<MenuRecord>, MenuError> {
        self.menu_count.fetch_add(1, Ordering::SeqCst);
        *self.last_menu_token.lock().unwrap() = Some(token.expose().to_string());

        let latency = *self.menu_latency.lock().unwrap();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        self.menu.lock().unwrap().clone()
    }

    fn name(&self) -> &str {
        "mock"
    }
}
