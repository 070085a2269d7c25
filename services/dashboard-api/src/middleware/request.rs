// Copyright 2025 VDBBench Dashboard Contributors
// SPDX-License-Identifier: Apache-2.0

//! Request context middleware for the Dashboard API.
//!
//! Takes the caller's `x-request-id` (or generates one), makes it available
//! to handlers through request extensions, and echoes it on the response.

use axum::{
    extract::{FromRequestParts, Request},
    http::{request::Parts, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::{debug, Instrument};
use uuid::Uuid;

use crate::error::ApiError;

/// Header carrying the request id.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Longest caller-supplied id that is accepted.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Per-request context.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Id from the caller, or a generated UUID v4.
    pub request_id: String,
}

/// Middleware attaching a [`RequestContext`] to every request.
///
/// Ids longer than 128 bytes or with non-visible characters are replaced
/// by a generated one.
pub async fn request_context_middleware(mut req: Request, next: Next) -> Response {
    let request_id = req
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|id| !id.is_empty() && id.len() <= MAX_REQUEST_ID_LEN)
        .map(|id| id.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    debug!(request_id = %request_id, path = %req.uri().path(), "Request received");
    metrics::counter!("vdbbench_http_requests_total").increment(1);

    req.extensions_mut().insert(RequestContext {
        request_id: request_id.clone(),
    });

    let span = tracing::info_span!("request", request_id = %request_id);
    let mut response = next.run(req).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(X_REQUEST_ID, value);
    }
    response
}

/// Extractor for the [`RequestContext`] set by the middleware.
#[derive(Debug, Clone)]
pub struct ReqContext(pub RequestContext);

impl std::ops::Deref for ReqContext {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[async_trait::async_trait]
impl<S> FromRequestParts<S> for ReqContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .map(ReqContext)
            .ok_or_else(|| {
                ApiError::internal(
                    "MISSING_REQUEST_CONTEXT",
                    "Request context not found. Ensure the request context middleware is applied.",
                )
            })
    }
}
