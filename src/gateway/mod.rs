//! HTTP gateway (Axum) for interview feedback and question classification.
//!
//! This module is primarily used by the `sierra` server binary.

pub mod error;
pub mod handler;
pub mod state;


use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::{
    live_feedback_handler, question_type_handler, score_out_of_ten, stage_feedback_handler,
    stage_handler,
};
pub use state::HandlerState;

use crate::constants::{SIERRA_STATUS_HEADER, SIERRA_STATUS_HEALTHY, SIERRA_STATUS_READY};

pub fn create_router_with_state(state: HandlerState) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/v1/feedback/live", post(live_feedback_handler))
        .route("/v1/feedback/stage", post(stage_feedback_handler))
        .route("/v1/classify/question-type", post(question_type_handler))
        .route("/v1/classify/stage", post(stage_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub embedder_mode: &'static str,
    pub question_classifier_mode: &'static str,
    pub stage_classifier_mode: &'static str,
    pub fallback_mode: &'static str,
}

fn model_mode(is_stub: bool) -> &'static str {
    if is_stub { "stub" } else { "model" }
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        SIERRA_STATUS_HEADER,
        HeaderValue::from_static(SIERRA_STATUS_HEALTHY),
    );

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

/// Models load before the listener binds, so a running server is always ready;
/// the body reports which components are stand-ins.
#[tracing::instrument(skip(state))]
pub async fn ready_handler(State(state): State<HandlerState>) -> Response {
    let components = ComponentStatus {
        http: SIERRA_STATUS_READY,
        embedder_mode: model_mode(state.scorer.embedder().is_stub()),
        question_classifier_mode: model_mode(state.question_types.primary_is_stub()),
        stage_classifier_mode: model_mode(state.stages.primary_is_stub()),
        fallback_mode: if state.question_types.fallback_is_mock() {
            "mock"
        } else {
            "llm"
        },
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        SIERRA_STATUS_HEADER,
        HeaderValue::from_static(SIERRA_STATUS_READY),
    );

    (
        StatusCode::OK,
        headers,
        Json(ReadyResponse {
            status: "ok",
            components,
        }),
    )
        .into_response()
}
