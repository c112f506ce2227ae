// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Route gate middleware.
//!
//! - [`AuthGateLayer`]: session present, outermost
//! - [`RoleGateLayer`]: role allowed on the path, innermost

mod auth_gate;
mod role_gate;

pub use auth_gate::{AuthGateLayer, AuthGateMiddleware, GateMode, REQUEST_ID_HEADER};
pub use role_gate::{RoleGateLayer, RoleGateMiddleware};
