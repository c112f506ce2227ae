// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # estate-api
//!
//! HTTP shell for the estate admin console.
//!
//! Sessions live in two cookies read through [`CookieStorage`]; the
//! identity cookie is signed by [`SessionSigner`]. Console
//! pages pass the authentication gate and then the role gate before the
//! page handler runs; the sidebar menu is fetched from the REST backend on
//! every page and never blocks it.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod backend;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod server;
pub mod session;
pub mod signing;
pub mod state;

pub use backend::{BackendError, ConsoleBackend, HttpBackend, HttpBackendConfig, LoginCredentials};
pub use config::{ApiConfig, CookieConfig, CorsConfig, SameSitePolicy};
pub use error::{ApiError, ApiResult, ErrorBody, ErrorEnvelope};
pub use middleware::{AuthGateLayer, GateMode, RoleGateLayer, REQUEST_ID_HEADER};
pub use response::{AccessDeniedView, LoginView, NavigationView, PageView, UserView};
pub use server::{ApiServer, ApiServerBuilder};
pub use session::{restore_session, CookieStorage};
pub use signing::{ephemeral_secret, SessionSigner, SigningError};
pub use state::{AppState, AppStateBuilder};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
