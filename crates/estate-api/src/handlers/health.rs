// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Liveness and readiness checks.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::response::{ComponentStatus, HealthResponse, ReadinessResponse};
use crate::state::AppState;

/// GET /health: 200 while the process serves requests.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse::healthy())
}

/// GET /ready
///
/// Reports the permission table, route coverage and backend. Only route
/// coverage decides readiness: an empty table leaves every page fail-open,
/// which is valid.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    let table = state.evaluator().table();
    let coverage = &state.coverage;

    let components = vec![
        component(
            "permission_table",
            true,
            format!("{} entries", table.len()),
        ),
        component(
            "route_catalog",
            coverage.is_ok(),
            format!(
                "{} mapped, {} fail-open, {} unmapped",
                coverage.mapped.len(),
                coverage.fail_open.len(),
                coverage.unmapped_restricted.len()
            ),
        ),
        component("backend", true, state.backend().name().to_string()),
    ];

    let ready = components.iter().all(|c| c.healthy);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(ReadinessResponse { ready, components }))
}

fn component(name: &str, healthy: bool, message: String) -> ComponentStatus {
    ComponentStatus {
        name: name.to_string(),
        healthy,
        message: Some(message),
    }
}
