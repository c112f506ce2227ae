// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Navigation handler.

use axum::{extract::State, Json};
use estate_core::{MenuError, MenuState, NavigationComposer, Session};

use crate::extractors::CurrentSession;
use crate::response::NavigationView;
use crate::state::AppState;

/// GET /api/navigation
///
/// Always answers 200. A failed fetch yields `status: "error"` with an
/// empty menu.
pub async fn navigation(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Json<NavigationView> {
    Json(NavigationView::from(fetch_menu_state(&state, &session).await))
}

/// Fetches and composes the menu for `session`, bounded by the menu timeout.
pub async fn fetch_menu_state(state: &AppState, session: &Session) -> MenuState {
    let fetch = state.backend().fetch_menu(&session.token);

    let result = match tokio::time::timeout(state.config.menu_timeout, fetch).await {
        Ok(Ok(records)) => NavigationComposer::compose(&records),
        Ok(Err(e)) => Err(e),
        Err(_) => Err(MenuError::unavailable("timed out")),
    };

    MenuState::from(result)
}
