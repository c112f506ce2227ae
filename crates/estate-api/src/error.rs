// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Console API errors.
//!
//! JSON endpoints answer failures with `{"error": {"code": .., "message": ..}}`.
//! Page requests never reach this type for access decisions: a denied page
//! is rendered as a view, not reported as an error.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use estate_core::CoreError;

/// Result type alias for console handlers.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// ApiError
// =============================================================================

/// A failure while serving a console request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No page or endpoint at this path.
    #[error("nothing is served at {path}")]
    NotFound {
        /// Normalized request path.
        path: String,
    },

    /// The request body or parameters are unusable.
    #[error("malformed request: {message}")]
    BadRequest {
        /// Shown to the caller as is.
        message: String,
    },

    /// No usable session, or the backend refused the credentials.
    #[error("not signed in: {message}")]
    Unauthorized {
        /// Logged only.
        message: String,
    },

    /// The REST backend failed or answered with something unreadable.
    #[error("backend failure: {message}")]
    BadGateway {
        /// Logged only.
        message: String,
    },

    /// The REST backend did not answer in time.
    #[error("backend did not answer in time")]
    GatewayTimeout,

    /// A fault inside the console itself.
    #[error("console fault: {message}")]
    Internal {
        /// Logged only.
        message: String,
    },

    /// Access-control state is invalid or inconsistent.
    #[error("access control: {0}")]
    Core(#[from] CoreError),
}

/// How loudly a failure is logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Severity {
    /// The caller did something wrong.
    Caller,
    /// The backend let us down.
    Upstream,
    /// We are broken.
    Fault,
}

impl ApiError {
    /// 404 for `path`.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// 400; `message` reaches the caller.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// 401.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// 502.
    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::BadGateway {
            message: message.into(),
        }
    }

    /// 500 with a generic public message.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Status, body code and log severity.
    fn classify(&self) -> (StatusCode, &'static str, Severity) {
        use Severity::*;
        match self {
            Self::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found", Caller),
            Self::BadRequest { .. } => (StatusCode::BAD_REQUEST, "bad_request", Caller),
            Self::Unauthorized { .. } => (StatusCode::UNAUTHORIZED, "not_signed_in", Caller),
            Self::BadGateway { .. } => (StatusCode::BAD_GATEWAY, "backend_failed", Upstream),
            Self::GatewayTimeout => (StatusCode::GATEWAY_TIMEOUT, "backend_timeout", Upstream),
            Self::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "internal", Fault),
            Self::Core(
                CoreError::InvalidRole { .. }
                | CoreError::InvalidToken { .. }
                | CoreError::InvalidPath { .. },
            ) => (StatusCode::BAD_REQUEST, "invalid_session_data", Caller),
            Self::Core(_) => (StatusCode::INTERNAL_SERVER_ERROR, "access_control", Fault),
        }
    }

    /// HTTP status of the response.
    pub fn status_code(&self) -> StatusCode {
        self.classify().0
    }

    /// Machine-readable code placed in the response body.
    pub fn code(&self) -> &'static str {
        self.classify().1
    }

    /// Text shown to the person using the console. Faults stay generic.
    pub fn public_message(&self) -> String {
        match self {
            Self::NotFound { path } => format!("Nothing is served at {}", path),
            Self::BadRequest { message } => message.clone(),
            Self::Unauthorized { .. } => "Please sign in".to_string(),
            Self::BadGateway { .. } => "The backend could not complete the request".to_string(),
            Self::GatewayTimeout => "The backend is not responding".to_string(),
            Self::Core(e) if self.classify().2 == Severity::Caller => e.to_string(),
            Self::Internal { .. } | Self::Core(_) => "Something went wrong".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, severity) = self.classify();

        match severity {
            Severity::Fault => tracing::error!(error = %self, code, %status, "Request failed"),
            Severity::Upstream => tracing::warn!(error = %self, code, %status, "Backend failed"),
            Severity::Caller => tracing::debug!(error = %self, code, %status, "Request rejected"),
        }

        let body = ErrorEnvelope {
            error: ErrorBody {
                code: code.to_string(),
                message: self.public_message(),
            },
        };
        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Body
// =============================================================================

/// JSON envelope for error responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// The failure.
    pub error: ErrorBody,
}

/// Code and message of a failed request.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable snake_case code, e.g. `not_signed_in`.
    pub code: String,
    /// Text safe to show in the console.
    pub message: String,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::not_found("/nope").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::bad_request("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::unauthorized("x").status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::bad_gateway("x").status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(ApiError::GatewayTimeout.status_code(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(
            ApiError::internal("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_invalid_session_data_is_shown() {
        let err: ApiError = CoreError::invalid_role("role must not be empty").into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "invalid_session_data");
        assert!(err.public_message().contains("role must not be empty"));
    }

    #[test]
    fn test_access_control_fault_is_hidden() {
        let err: ApiError = CoreError::UnmappedRoutes {
            paths: vec!["/units".to_string()],
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("/units"));
        assert!(!err.public_message().contains("/units"));
    }

    #[tokio::test]
    async fn test_response_body() {
        let response = ApiError::unauthorized("no session cookie").into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorEnvelope = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error.code, "not_signed_in");
        assert_eq!(body.error.message, "Please sign in");
    }
}
