// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication handlers.

use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use estate_core::SessionStore;
use serde::Deserialize;

use crate::backend::LoginCredentials;
use crate::error::{ApiError, ApiResult};
use crate::extractors::{CurrentSession, ValidatedJson};
use crate::response::{ApiResponse, LoginView, UserView};
use crate::session::{restore_session, CookieStorage};
use crate::state::AppState;

// =============================================================================
// Login View
// =============================================================================

/// GET /login
///
/// Public. Reports an existing session so the client can skip the form.
pub async fn login_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let store = restore_session(&headers, &state.config.cookies);
    let signed_in_as = store.session().map(|s| UserView::from(&s.identity));

    let mut response = Json(LoginView::new(signed_in_as)).into_response();
    store.storage().write_to(response.headers_mut());
    response
}

// =============================================================================
// Login
// =============================================================================

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
}

/// POST /api/auth/login
///
/// Authenticates against the backend and persists the session as cookies.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Response> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    let credentials = LoginCredentials::new(request.email.trim(), request.password);
    let session = state.backend().login(&credentials).await.map_err(|e| {
        tracing::warn!(email = %credentials.email, error = %e, "Login failed");
        ApiError::from(e)
    })?;

    let user = UserView::from(&session.identity);
    let mut store = SessionStore::new(CookieStorage::new(state.config.cookies.clone()));
    store.save(session)?;

    tracing::info!(role = %user.role, "User logged in");

    let mut response = ApiResponse::success(user).into_response();
    store.storage().write_to(response.headers_mut());
    Ok(response)
}

// =============================================================================
// Logout
// =============================================================================

/// POST /api/auth/logout
///
/// Clears both session cookies and sends the browser to the login path.
/// The backend is not contacted.
pub async fn logout(State(state): State<AppState>) -> Response {
    let mut store = SessionStore::new(CookieStorage::new(state.config.cookies.clone()));
    store.clear();

    tracing::info!("User logged out");

    let mut response = Redirect::to(state.login_path()).into_response();
    store.storage().write_to(response.headers_mut());
    response
}

// =============================================================================
// Current User
// =============================================================================

/// GET /api/auth/me
pub async fn me(CurrentSession(session): CurrentSession) -> impl IntoResponse {
    ApiResponse::success(UserView::from(&session.identity))
}
