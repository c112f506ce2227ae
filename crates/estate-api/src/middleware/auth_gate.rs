// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication gate middleware.
//!
//! Restores the session from cookies and decides whether the request may
//! continue. Page routes redirect to the login path; API routes answer 401.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    response::{IntoResponse, Redirect, Response},
};
use estate_core::{AuthDecision, AuthGate};
use tower::{Layer, Service};
use uuid::Uuid;

use crate::config::CookieConfig;
use crate::error::ApiError;
use crate::response::LoadingView;
use crate::session::restore_session;

/// Response header carrying the per-request identifier.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// How a missing session is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateMode {
    /// Browser navigation: `303 See Other` to the login path.
    Page,
    /// Programmatic call: `401` with a JSON error body.
    Api,
}

// =============================================================================
// AuthGateLayer
// =============================================================================

/// Layer running the authentication gate.
#[derive(Clone)]
pub struct AuthGateLayer {
    gate: Arc<AuthGate>,
    cookies: Arc<CookieConfig>,
    mode: GateMode,
}

impl AuthGateLayer {
    /// Creates a layer for page routes.
    pub fn page(gate: AuthGate, cookies: CookieConfig) -> Self {
        Self {
            gate: Arc::new(gate),
            cookies: Arc::new(cookies),
            mode: GateMode::Page,
        }
    }

    /// Creates a layer for API routes.
    pub fn api(gate: AuthGate, cookies: CookieConfig) -> Self {
        Self {
            mode: GateMode::Api,
            ..Self::page(gate, cookies)
        }
    }

    /// Returns the mode.
    pub fn mode(&self) -> GateMode {
        self.mode
    }
}

impl<S> Layer<S> for AuthGateLayer {
    type Service = AuthGateMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthGateMiddleware {
            inner,
            gate: self.gate.clone(),
            cookies: self.cookies.clone(),
            mode: self.mode,
        }
    }
}

// =============================================================================
// AuthGateMiddleware
// =============================================================================

/// Middleware running the authentication gate.
#[derive(Clone)]
pub struct AuthGateMiddleware<S> {
    inner: S,
    gate: Arc<AuthGate>,
    cookies: Arc<CookieConfig>,
    mode: GateMode,
}

impl<S> Service<Request<Body>> for AuthGateMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let gate = self.gate.clone();
        let cookies = self.cookies.clone();
        let mode = self.mode;
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let request_id = Uuid::now_v7();
            let path = req.uri().path().to_string();

            let store = restore_session(req.headers(), &cookies);

            let mut response = match gate.evaluate(store.state()) {
                AuthDecision::Pending => LoadingView::new().into_response(),
                AuthDecision::RedirectToLogin { login_path } => {
                    tracing::debug!(request_id = %request_id, path = %path, "No session");
                    match mode {
                        GateMode::Page => Redirect::to(login_path).into_response(),
                        GateMode::Api => ApiError::unauthorized("No session").into_response(),
                    }
                }
                AuthDecision::Proceed(session) => {
                    tracing::debug!(
                        request_id = %request_id,
                        role = %session.role(),
                        path = %path,
                        "Session accepted"
                    );
                    req.extensions_mut().insert(session.clone());
                    inner.call(req).await?
                }
            };

            store.storage().write_to(response.headers_mut());
            if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
                response.headers_mut().insert(REQUEST_ID_HEADER, value);
            }

            Ok(response)
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
