// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Console page handler.
//!
//! Every catalog route is served by [`page`]. Both gates have already run
//! by the time it is called.

use axum::{extract::State, http::Uri, Json};
use estate_core::path;

use crate::error::{ApiError, ApiResult};
use crate::extractors::CurrentSession;
use crate::response::{PageView, UserView};
use crate::state::AppState;

/// GET on any catalog route.
///
/// Never touches the backend. The navigation area is served separately by
/// `GET /api/navigation`.
pub async fn page(
    State(state): State<AppState>,
    uri: Uri,
    CurrentSession(session): CurrentSession,
) -> ApiResult<Json<PageView>> {
    let path = path::normalize(uri.path());
    let route = state
        .catalog
        .find(&path)
        .ok_or_else(|| ApiError::not_found(path.clone()))?;

    Ok(Json(PageView::new(
        route.path.clone(),
        route.title.clone(),
        UserView::from(&session.identity),
    )))
}
