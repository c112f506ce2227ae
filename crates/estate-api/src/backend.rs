// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! REST backend the console sits in front of.
//!
//! Two calls are made: login, which yields the identity and token, and the
//! per-user menu. Both answer with the `{ "success", "data" }` envelope.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use estate_core::{Identity, MenuError, MenuPayload, MenuRecord, Session, SessionToken};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::ApiError;

// =============================================================================
// Types
// =============================================================================

/// Login form body.
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl LoginCredentials {
    /// Creates credentials.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Successful login payload: `{ "token", "user" }`.
#[derive(Debug, Deserialize)]
struct LoginData {
    token: String,
    user: Identity,
}

#[derive(Debug, Deserialize)]
struct LoginEnvelope {
    success: bool,
    #[serde(default)]
    data: Option<LoginData>,
    #[serde(default)]
    message: Option<String>,
}

/// Backend call failures.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend refused the request (bad credentials, revoked token).
    #[error("Rejected by backend: {message}")]
    Rejected {
        /// Error message.
        message: String,
    },

    /// The backend did not answer in time.
    #[error("Backend request timed out")]
    Timeout,

    /// The backend could not be reached or failed.
    #[error("Backend unavailable: {message}")]
    Unavailable {
        /// Error message.
        message: String,
    },

    /// The backend answered with an unexpected body.
    #[error("Malformed backend response: {message}")]
    Malformed {
        /// Error message.
        message: String,
    },
}

impl BackendError {
    /// Creates a rejected error.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a malformed error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }
}

impl From<BackendError> for ApiError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Rejected { .. } => ApiError::unauthorized("Invalid email or password"),
            BackendError::Timeout => ApiError::GatewayTimeout,
            BackendError::Unavailable { message } | BackendError::Malformed { message } => {
                ApiError::bad_gateway(message)
            }
        }
    }
}

// =============================================================================
// ConsoleBackend
// =============================================================================

/// Operations the console needs from the REST backend.
#[async_trait]
pub trait ConsoleBackend: Send + Sync {
    /// Exchanges credentials for a session.
    async fn login(&self, credentials: &LoginCredentials) -> Result<Session, BackendError>;

    /// Fetches the flat menu records for the token's user.
    async fn fetch_menu(&self, token: &SessionToken) -> Result<Vec<MenuRecord>, MenuError>;

    /// Short name for readiness reporting.
    fn name(&self) -> &str {
        "backend"
    }
}

// =============================================================================
// HttpBackend
// =============================================================================

/// Endpoints and timeout of the HTTP backend.
#[derive(Debug, Clone)]
pub struct HttpBackendConfig {
    /// Base URL, without trailing slash.
    pub base_url: String,
    /// Login endpoint path.
    pub login_endpoint: String,
    /// Menu endpoint path.
    pub menu_endpoint: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for HttpBackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000/api".to_string(),
            login_endpoint: "/auth/login".to_string(),
            menu_endpoint: "/menus/me".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// [`ConsoleBackend`] over HTTP with reqwest.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    config: HttpBackendConfig,
}

impl HttpBackend {
    /// Creates a client for `config`.
    pub fn new(config: HttpBackendConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BackendError::unavailable(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: HttpBackendConfig {
                base_url: config.base_url.trim_end_matches('/').to_string(),
                ..config
            },
        })
    }

    /// Returns the full URL of `endpoint`.
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.config.base_url, endpoint)
    }
}

#[async_trait]
impl ConsoleBackend for HttpBackend {
    async fn login(&self, credentials: &LoginCredentials) -> Result<Session, BackendError> {
        let url = self.url(&self.config.login_endpoint);
        debug!(url = %url, email = %credentials.email, "Sending login request");

        let response = self
            .client
            .post(&url)
            .json(credentials)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(BackendError::rejected(format!("login answered {}", status)));
        }
        if !status.is_success() {
            return Err(BackendError::unavailable(format!("login answered {}", status)));
        }

        let envelope: LoginEnvelope = response
            .json()
            .await
            .map_err(|e| BackendError::malformed(e.to_string()))?;

        if !envelope.success {
            return Err(BackendError::rejected(
                envelope.message.unwrap_or_else(|| "login refused".to_string()),
            ));
        }

        let data = envelope
            .data
            .ok_or_else(|| BackendError::malformed("missing login data"))?;
        let token = SessionToken::new(data.token).map_err(|e| BackendError::malformed(e.to_string()))?;

        Ok(Session::new(data.user, token))
    }

    async fn fetch_menu(&self, token: &SessionToken) -> Result<Vec<MenuRecord>, MenuError> {
        let url = self.url(&self.config.menu_endpoint);

        let response = self
            .client
            .get(&url)
            .bearer_auth(token.expose())
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "Menu request failed");
                MenuError::unavailable(e.to_string())
            })?;

        let status = response.status();
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(MenuError::Rejected);
        }
        if !status.is_success() {
            return Err(MenuError::unavailable(format!("menu answered {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| MenuError::unavailable(e.to_string()))?;

        MenuPayload::parse(&body)
    }

    fn name(&self) -> &str {
        "http"
    }
}

fn request_error(err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        BackendError::Timeout
    } else {
        BackendError::unavailable(err.to_string())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode as HttpStatus;

    #[test]
    fn test_url_join_trims_trailing_slash() {
        let backend = HttpBackend::new(HttpBackendConfig {
            base_url: "https://api.example.com/v1/".to_string(),
            ..HttpBackendConfig::default()
        })
        .unwrap();

        assert_eq!(backend.url("/menus/me"), "https://api.example.com/v1/menus/me");
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let credentials = LoginCredentials::new("kim@example.com", "hunter2");
        let debug = format!("{:?}", credentials);
        assert!(debug.contains("kim@example.com"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_backend_error_mapping() {
        let err: ApiError = BackendError::rejected("bad password").into();
        assert_eq!(err.status_code(), HttpStatus::UNAUTHORIZED);

        let err: ApiError = BackendError::Timeout.into();
        assert_eq!(err.status_code(), HttpStatus::GATEWAY_TIMEOUT);

        let err: ApiError = BackendError::malformed("not json").into();
        assert_eq!(err.status_code(), HttpStatus::BAD_GATEWAY);
    }

    #[test]
    fn test_login_envelope() {
        let envelope: LoginEnvelope = serde_json::from_str(
            r#"{"success":true,"data":{"token":"abc","user":{"role":"admin","displayName":"Ada","email":"ada@example.com"}}}"#,
        )
        .unwrap();
        let data = envelope.data.unwrap();
        assert_eq!(data.token, "abc");
        assert_eq!(data.user.role.as_str(), "admin");
    }
}
