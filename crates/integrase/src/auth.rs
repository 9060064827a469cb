use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use constant_time_eq::constant_time_eq;
use tracing::debug;

use crate::{handlers::HandlerError, AppState};

/// True only when `headers` exist and carry a non-empty `Authorization` value
/// equal to `secret`. The value is the raw key, not a `Bearer` token.
pub fn is_authorized(headers: Option<&HeaderMap>, secret: &str) -> bool {
    let Some(headers) = headers else {
        debug!("rejected request: no request headers");
        return false;
    };

    // Compared as raw bytes; the header need not be visible ASCII.
    let presented = headers.get(AUTHORIZATION).map(|v| v.as_bytes());

    match presented {
        Some(t) if !t.is_empty() && constant_time_eq(t, secret.as_bytes()) => true,
        Some(b"") | None => {
            debug!("rejected request: missing Authorization header");
            false
        }
        Some(_) => {
            debug!("rejected request: Authorization header does not match secret key");
            false
        }
    }
}

/// Axum middleware answering `401 Unauthorized` unless the request carries the
/// list's secret key.
pub async fn require_secret_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if is_authorized(Some(request.headers()), state.config.secret_key.expose()) {
        next.run(request).await
    } else {
        HandlerError::Unauthorized.into_response()
    }
}
