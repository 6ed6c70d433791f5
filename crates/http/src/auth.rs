//! Bearer-token authentication middleware.
//!
//! Resolves the `Authorization` header against the configured token table and
//! stashes the resulting [`Caller`] in request extensions for handlers to
//! pick up. Every API route sits behind this layer; health and docs do not.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use shelf_authz::{Caller, TokenSet};

use crate::error::AppError;

pub async fn require_auth(
    State(tokens): State<Arc<TokenSet>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = match extract_bearer(request.headers().get(header::AUTHORIZATION)) {
        Some(token) => token,
        None => {
            return AppError::unauthorized("missing bearer token").into_response();
        }
    };

    let caller: Caller = match tokens.resolve(&token) {
        Some(caller) => caller,
        None => {
            return AppError::unauthorized("invalid bearer token").into_response();
        }
    };

    tracing::debug!(subject = %caller.subject, "caller authenticated");
    request.extensions_mut().insert(caller);

    next.run(request).await
}

fn extract_bearer(header: Option<&HeaderValue>) -> Option<String> {
    let raw = header?.to_str().ok()?;
    let bearer = raw.strip_prefix("Bearer ")?;
    Some(bearer.to_string())
}
