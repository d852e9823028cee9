//! HTTP handlers for intake endpoints.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::handlers::intake::{HandleEventError, HandleInboundEventHandler};
use crate::domain::foundation::ConversationKey;
use crate::domain::intake::InboundEvent;

use super::dto::{ErrorResponse, InboundEventRequest, InboundEventResponse};

#[derive(Clone)]
pub struct IntakeHandlers {
    event_handler: Arc<HandleInboundEventHandler>,
}

impl IntakeHandlers {
    pub fn new(event_handler: Arc<HandleInboundEventHandler>) -> Self {
        Self { event_handler }
    }
}

/// POST /api/intake/events - Run one conversation turn
pub async fn post_event(
    State(handlers): State<IntakeHandlers>,
    Json(req): Json<InboundEventRequest>,
) -> Response {
    let identity = match ConversationKey::parse(req.identity) {
        Ok(key) => key,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request(e.to_string())),
            )
                .into_response()
        }
    };

    let event = InboundEvent {
        identity,
        kind: req.kind,
        payload: req.payload,
    };

    match handlers.event_handler.handle(event).await {
        Ok(reply) => {
            let response = InboundEventResponse {
                reply: reply.map(|r| r.text),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// GET /health
pub async fn health() -> &'static str {
    "ok"
}

impl IntoResponse for HandleEventError {
    fn into_response(self) -> Response {
        match self {
            HandleEventError::InvalidEvent(e) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request(e.to_string())),
            )
                .into_response(),
            HandleEventError::Store(e) => {
                tracing::error!(error = %e, "session store failure");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(ErrorResponse::unavailable("session store unavailable")),
                )
                    .into_response()
            }
        }
    }
}
