//! Event webhook handlers.
//!
//! Both webhooks acknowledge with 202 immediately and run the notification
//! cycle in a detached task; the event source never waits on (or learns
//! about) delivery.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::info;

use gridalert_core::types::event::GridEvent;

use crate::dto::request::StatusChangeRequest;
use crate::dto::response::{AcceptedResponse, ApiResponse};
use crate::state::AppState;

/// POST /hooks/events
///
/// A newly created event record.
pub async fn event_opened(
    State(state): State<AppState>,
    Json(event): Json<GridEvent>,
) -> (StatusCode, Json<ApiResponse<AcceptedResponse>>) {
    info!(event = %event.id, category = %event.event_type, "Event webhook received");
    let accepted = AcceptedResponse {
        event_id: event.id.to_string(),
    };
    let pipeline = Arc::clone(&state.pipeline);
    tokio::spawn(async move {
        pipeline.on_event_opened(&event).await;
    });
    (StatusCode::ACCEPTED, Json(ApiResponse::ok(accepted)))
}

/// POST /hooks/events/status
///
/// A status transition on an existing event record.
pub async fn event_status_changed(
    State(state): State<AppState>,
    Json(request): Json<StatusChangeRequest>,
) -> (StatusCode, Json<ApiResponse<AcceptedResponse>>) {
    info!(
        event = %request.event.id,
        before = ?request.before_status,
        after = ?request.event.status,
        "Status webhook received"
    );
    let accepted = AcceptedResponse {
        event_id: request.event.id.to_string(),
    };
    let pipeline = Arc::clone(&state.pipeline);
    tokio::spawn(async move {
        pipeline
            .on_event_updated(request.before_status, &request.event)
            .await;
    });
    (StatusCode::ACCEPTED, Json(ApiResponse::ok(accepted)))
}
