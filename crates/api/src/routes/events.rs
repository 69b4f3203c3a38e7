//! Event intake.
//!
//! `POST /events` accepts one delivery from the event infrastructure. The
//! response status tells the sender what to do: 2xx acknowledges, 422 is a
//! permanent failure, 5xx asks for a retry.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde_json::Value;

use partida_core::posting::{DeliveryOutcome, EventEnvelope};
use partida_db::repositories::PostingRepository;

use crate::{AppState, error::ApiError};

/// Creates the event routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/events", post(receive_event))
}

/// POST `/events` - Handle one event delivery.
async fn receive_event(
    State(state): State<AppState>,
    payload: Result<Json<EventEnvelope>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(envelope) = payload?;

    let posting = PostingRepository::new((*state.db).clone());
    let outcome = posting.handle_event(envelope).await?;

    let status =
        StatusCode::from_u16(outcome.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    Ok((status, Json(outcome_body(&outcome))))
}

fn outcome_body(outcome: &DeliveryOutcome) -> Value {
    let mut body = serde_json::to_value(outcome).unwrap_or(Value::Null);
    if let Value::Object(fields) = &mut body {
        let success = !matches!(outcome, DeliveryOutcome::Failed { .. });
        fields.insert("success".to_string(), Value::Bool(success));
    }
    body
}
