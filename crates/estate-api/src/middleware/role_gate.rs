// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Role gate middleware.
//!
//! Runs after the authentication gate. A refused role gets the
//! access-denied view with status 403 at the requested URL; there is no
//! redirect.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use estate_core::{path, RoleDecision, RoleGate, Session};
use tower::{Layer, Service};

use crate::error::ApiError;
use crate::response::AccessDeniedView;

// =============================================================================
// RoleGateLayer
// =============================================================================

/// Layer running the role gate.
#[derive(Clone)]
pub struct RoleGateLayer {
    gate: Arc<RoleGate>,
}

impl RoleGateLayer {
    /// Creates a layer over `gate`.
    pub fn new(gate: RoleGate) -> Self {
        Self {
            gate: Arc::new(gate),
        }
    }
}

impl<S> Layer<S> for RoleGateLayer {
    type Service = RoleGateMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RoleGateMiddleware {
            inner,
            gate: self.gate.clone(),
        }
    }
}

// =============================================================================
// RoleGateMiddleware
// =============================================================================

/// Middleware running the role gate.
#[derive(Clone)]
pub struct RoleGateMiddleware<S> {
    inner: S,
    gate: Arc<RoleGate>,
}

impl<S> Service<Request<Body>> for RoleGateMiddleware<S>
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

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let gate = self.gate.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let Some(session) = req.extensions().get::<Session>() else {
                tracing::warn!("Role gate reached without a session, denying access");
                return Ok(ApiError::unauthorized("Authentication required").into_response());
            };

            let path = path::normalize(req.uri().path());
            match gate.evaluate(session, &path) {
                RoleDecision::Render => inner.call(req).await,
                RoleDecision::Denied { path, role } => {
                    Ok(AccessDeniedView::new(path, role).into_response())
                }
            }
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
