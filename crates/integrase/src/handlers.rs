use axum::{
    body::to_bytes,
    extract::{Query, Request, State},
    http::{header::CONTENT_TYPE, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, MethodRouter},
};
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::{adapter::Lifecycle, auth::is_authorized, types::Bot, AppState};

/// Body returned by every successful lifecycle call.
pub const OK_BODY: &str = "OK :)";

pub const DATA_DELETED_BODY: &str =
    "All associated data has been deleted from this list according to the lists adapter";

/// Upper bound on a lifecycle request body.
pub const MAX_BODY_BYTES: usize = 1_048_576;

// ── Errors ───────────────────────────────────────────────────────────────────

/// Every way a request can fail. Rendered as a plain-text body.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Bad Request: {0}")]
    Body(String),

    #[error("Bot ID is missing")]
    MissingBotId,

    #[error("Serialization error occurred: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Request handle error: {0:#}")]
    Adapter(anyhow::Error),
}

impl HandlerError {
    pub fn status(&self) -> StatusCode {
        match self {
            HandlerError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            HandlerError::Unauthorized => StatusCode::UNAUTHORIZED,
            HandlerError::Body(_)
            | HandlerError::MissingBotId
            | HandlerError::Serialization(_)
            | HandlerError::Adapter(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

// ── Lifecycle ────────────────────────────────────────────────────────────────

/// Builds the handler for one lifecycle event. Accepts any method so that a
/// wrong verb is answered with a text body before authorization runs.
pub fn lifecycle_route(action: Lifecycle) -> MethodRouter<AppState> {
    any(move |State(state): State<AppState>, request: Request| {
        handle_lifecycle(action, state, request)
    })
}

async fn handle_lifecycle(
    action: Lifecycle,
    state: AppState,
    request: Request,
) -> Result<&'static str, HandlerError> {
    if request.method() != Method::POST {
        return Err(HandlerError::MethodNotAllowed);
    }

    if !is_authorized(Some(request.headers()), state.config.secret_key.expose()) {
        return Err(HandlerError::Unauthorized);
    }

    let body = to_bytes(request.into_body(), MAX_BODY_BYTES)
        .await
        .map_err(|e| HandlerError::Body(e.to_string()))?;

    let bot: Bot = serde_json::from_slice(&body)?;

    if let Err(e) = action.dispatch(state.adapter.as_ref(), &bot).await {
        warn!(event = %action, bot_id = %bot.bot_id, error = %e, "adapter rejected lifecycle event");
        return Err(HandlerError::Adapter(e));
    }

    info!(event = %action, bot_id = %bot.bot_id, reviewer = %bot.reviewer, "lifecycle event handled");
    Ok(OK_BODY)
}

// ── Data request / deletion ──────────────────────────────────────────────────

/// Raw query pairs, in order. A repeated `bot_id` is allowed; the first wins.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct BotQuery(pub Vec<(String, String)>);

impl BotQuery {
    fn bot_id(&self) -> Result<&str, HandlerError> {
        self.0
            .iter()
            .find(|(key, _)| key == "bot_id")
            .map(|(_, id)| id.as_str())
            .filter(|id| !id.is_empty())
            .ok_or(HandlerError::MissingBotId)
    }
}

pub async fn data_request(
    State(state): State<AppState>,
    Query(query): Query<BotQuery>,
) -> Result<Response, HandlerError> {
    let bot_id = query.bot_id()?;

    let data = state.adapter.data_request(bot_id).await.map_err(|e| {
        warn!(bot_id, error = %e, "adapter failed data request");
        HandlerError::Adapter(e)
    })?;

    let body = serde_json::to_vec(&data)?;

    info!(bot_id, "audit: data.request");
    Ok(([(CONTENT_TYPE, "application/json")], body).into_response())
}

pub async fn data_delete(
    State(state): State<AppState>,
    Query(query): Query<BotQuery>,
) -> Result<&'static str, HandlerError> {
    let bot_id = query.bot_id()?;

    state.adapter.data_delete(bot_id).await.map_err(|e| {
        warn!(bot_id, error = %e, "adapter failed data deletion");
        HandlerError::Adapter(e)
    })?;

    info!(bot_id, "audit: data.delete");
    Ok(DATA_DELETED_BODY)
}
