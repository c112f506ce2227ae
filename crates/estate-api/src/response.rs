// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API response types and console views.
//!
//! The console answers page requests with view documents that the browser
//! renders: a page, the access-denied view, the loading view, or the login
//! view. Each carries a `view` discriminator.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use estate_core::{Identity, MenuNode, MenuState, Role};
use serde::{Deserialize, Serialize};

// =============================================================================
// JSON envelopes
// =============================================================================

/// Success envelope for JSON endpoints, `{"success": true, "data": ..}`.
///
/// Failures go through [`crate::ApiError`] instead.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Always `true`.
    pub success: bool,
    /// Payload.
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// Wraps `data`.
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// `GET /health` body.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"ok"`.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Time of the check.
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    /// Body of a passing liveness check.
    pub fn healthy() -> Self {
        Self {
            status: "ok".to_string(),
            version: crate::VERSION.to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// `GET /ready` body. Ready only if every component is healthy.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// All components healthy.
    pub ready: bool,
    /// Per-component results.
    pub components: Vec<ComponentStatus>,
}

/// One readiness component.
#[derive(Debug, Serialize, Deserialize)]
pub struct ComponentStatus {
    /// `permission_table`, `route_catalog` or `backend`.
    pub name: String,
    /// Whether it passed.
    pub healthy: bool,
    /// Counts or backend name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// =============================================================================
// Views
// =============================================================================

/// The signed-in user as shown in the console header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    /// Role label.
    pub role: Role,
    /// Display name.
    pub display_name: String,
    /// Email address.
    pub email: String,
}

impl From<&Identity> for UserView {
    fn from(identity: &Identity) -> Self {
        Self {
            role: identity.role.clone(),
            display_name: identity.display_name.clone(),
            email: identity.email.clone(),
        }
    }
}

/// Navigation area contents.
///
/// `status` is `"ready"` or `"error"`. On error `items` is empty and
/// `message` explains why.
#[derive(Debug, Clone, Serialize)]
pub struct NavigationView {
    /// `"ready"` or `"error"`.
    pub status: &'static str,
    /// Menu tree.
    pub items: Vec<MenuNode>,
    /// Error message for the navigation area.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<MenuState> for NavigationView {
    fn from(state: MenuState) -> Self {
        match state {
            MenuState::Ready(tree) => Self {
                status: "ready",
                items: tree.into_roots(),
                message: None,
            },
            MenuState::Failed { message } => Self {
                status: "error",
                items: Vec::new(),
                message: Some(message),
            },
        }
    }
}

/// A rendered console page.
///
/// Carries no navigation; the sidebar is loaded from `/api/navigation`.
#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    /// Always `"page"`.
    pub view: &'static str,
    /// Page path.
    pub path: String,
    /// Page title.
    pub title: String,
    /// Signed-in user.
    pub user: UserView,
}

impl PageView {
    /// Creates a page view.
    pub fn new(path: impl Into<String>, title: impl Into<String>, user: UserView) -> Self {
        Self {
            view: "page",
            path: path.into(),
            title: title.into(),
            user,
        }
    }
}

/// Rendered in place of a page the role may not enter.
#[derive(Debug, Clone, Serialize)]
pub struct AccessDeniedView {
    /// Always `"access-denied"`.
    pub view: &'static str,
    /// The refused path. The browser URL stays on it.
    pub path: String,
    /// The refused role.
    pub role: Role,
    /// Message shown to the user.
    pub message: &'static str,
}

impl AccessDeniedView {
    /// Creates the view for `role` on `path`.
    pub fn new(path: impl Into<String>, role: Role) -> Self {
        Self {
            view: "access-denied",
            path: path.into(),
            role,
            message: "You do not have permission to view this page.",
        }
    }
}

impl IntoResponse for AccessDeniedView {
    fn into_response(self) -> Response {
        (StatusCode::FORBIDDEN, Json(self)).into_response()
    }
}

/// Neutral indicator while the session is still being read.
#[derive(Debug, Clone, Serialize)]
pub struct LoadingView {
    /// Always `"loading"`.
    pub view: &'static str,
}

impl LoadingView {
    /// Creates the view.
    pub fn new() -> Self {
        Self { view: "loading" }
    }
}

impl Default for LoadingView {
    fn default() -> Self {
        Self::new()
    }
}

impl IntoResponse for LoadingView {
    fn into_response(self) -> Response {
        (StatusCode::ACCEPTED, Json(self)).into_response()
    }
}

/// The login form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginView {
    /// Always `"login"`.
    pub view: &'static str,
    /// Where the form posts.
    pub action: &'static str,
    /// Set when a valid session already exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signed_in_as: Option<UserView>,
}

impl LoginView {
    /// Form action of the login view.
    pub const ACTION: &'static str = "/api/auth/login";

    /// Creates the view.
    pub fn new(signed_in_as: Option<UserView>) -> Self {
        Self {
            view: "login",
            action: Self::ACTION,
            signed_in_as,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use estate_core::{MenuError, MenuTree};

    #[test]
    fn test_success_envelope() {
        let json = serde_json::to_value(ApiResponse::success(42)).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "data": 42}));
    }

    #[test]
    fn test_navigation_view_from_failed_state() {
        let view = NavigationView::from(MenuState::failed(&MenuError::Rejected));
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["items"], serde_json::json!([]));
        assert!(json["message"].is_string());
    }

    #[test]
    fn test_navigation_view_from_ready_state() {
        let view = NavigationView::from(MenuState::Ready(MenuTree::empty()));
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["status"], "ready");
        assert!(json.get("message").is_none());
    }

    #[test]
    fn test_access_denied_view() {
        let view = AccessDeniedView::new("/admin/users", Role::new("manager").unwrap());
        let response = view.clone().into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(response.headers().get(axum::http::header::LOCATION).is_none());

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["view"], "access-denied");
        assert_eq!(json["role"], "manager");
    }

    #[test]
    fn test_loading_view_is_accepted() {
        assert_eq!(LoadingView::new().into_response().status(), StatusCode::ACCEPTED);
    }
}
