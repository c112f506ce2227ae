// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Estate Integration Tests
//!
//! Integration tests for the estate admin console, with shared fixtures,
//! builders, assertions, mocks and a router harness.
//!
//! ## Module Structure
//!
//! - [`common`]: shared test utilities
//!   - `fixtures`: identities, menus, tables and config files
//!   - `builders`: sessions, cookie headers and menu bodies
//!   - `assertions`: response and menu tree assertions
//!   - `mocks`: an in-memory console backend
//!   - `harness`: the console router plus a fake REST backend
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p estate-tests
//! cargo test -p estate-tests --test integration_access
//! cargo test -p estate-tests --test integration_api -- --nocapture
//! ```
//!
//! ## Writing New Tests
//!
//! ```rust,ignore
//! use estate_tests::prelude::*;
//!
//! #[tokio::test]
//! async fn test_manager_sees_properties() {
//!     let harness = TestHarness::new();
//!     let cookie = SessionBuilder::manager().cookie_header();
//!     let response = harness.get("/properties", Some(&cookie)).await;
//!     response.assert_status(StatusCode::OK);
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod common;

/// Re-export commonly used items for convenience.
pub mod prelude {
    pub use crate::common::assertions::*;
    pub use crate::common::builders::*;
    pub use crate::common::fixtures::*;
    pub use crate::common::harness::*;
    pub use crate::common::mocks::*;
    pub use axum::http::StatusCode;
}
