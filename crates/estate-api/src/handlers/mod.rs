// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! HTTP handlers.
//!
//! - [`health`]: liveness and readiness
//! - [`auth`]: login view, login, logout, current user
//! - [`navigation`]: the composed sidebar menu
//! - [`pages`]: console pages behind both gates

mod auth;
mod health;
mod navigation;
mod pages;

pub use auth::*;
pub use health::*;
pub use navigation::*;
pub use pages::*;
