use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, info, instrument};

use crate::classify::{ClassificationOrchestrator, LabelSet};
use crate::constants::{
    SIERRA_STATUS_CLASSIFIED, SIERRA_STATUS_DEGRADED, SIERRA_STATUS_HEADER, SIERRA_STATUS_SCORED,
};
use crate::gateway::error::GatewayError;
use crate::gateway::state::HandlerState;
use crate::scoring::{ContinuityBranch, WindowScore};

#[derive(Debug, Deserialize)]
pub struct LiveFeedbackRequest {
    /// `[Q1, A, Q2]`, or `[Q, A]` for the first exchange.
    pub turns: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct LiveFeedbackResponse {
    pub score: f32,
    pub branch: ContinuityBranch,
    pub context_switch: bool,
}

#[derive(Debug, Deserialize)]
pub struct StageFeedbackRequest {
    pub transcript: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct StageFeedbackResponse {
    /// Mean continuity as a 0-10 grade.
    pub score: u8,
    pub mean: f32,
    pub windows: Vec<WindowScore>,
    /// `end_index` of every window flagged as a context switch.
    pub context_switches: Vec<usize>,
}

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub question: String,
    /// Skip straight to the fallback classifier.
    #[serde(default)]
    pub fallback: bool,
}

/// Mean continuity as a 0-10 grade: `mean * 10`, truncated, clamped into `0..=10`.
pub fn score_out_of_ten(mean: f32) -> u8 {
    if !mean.is_finite() {
        return 0;
    }
    (mean * 10.0).trunc().clamp(0.0, 10.0) as u8
}

fn parse_request<T: DeserializeOwned>(request: serde_json::Value) -> Result<T, GatewayError> {
    serde_json::from_value(request)
        .map_err(|e| GatewayError::InvalidRequest(format!("Invalid request schema: {}", e)))
}

fn make_response<T: Serialize>(body: T, sierra_status: &'static str) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        SIERRA_STATUS_HEADER,
        HeaderValue::from_static(sierra_status),
    );

    (StatusCode::OK, headers, Json(body)).into_response()
}

#[instrument(skip(state, request))]
pub async fn live_feedback_handler(
    State(state): State<HandlerState>,
    Json(request): Json<serde_json::Value>,
) -> Result<Response, GatewayError> {
    let request: LiveFeedbackRequest = parse_request(request)?;
    let turns = request.turns.len();

    let scorer = Arc::clone(&state.scorer);
    let scored = tokio::task::spawn_blocking(move || scorer.score_live(&request.turns))
        .await
        .map_err(|e| GatewayError::InternalError(format!("Scoring task failed: {}", e)))??;

    let context_switch = state.scorer.is_context_switch(scored.score);

    info!(
        turns,
        score = scored.score,
        branch = %scored.branch,
        context_switch,
        "Live feedback"
    );

    Ok(make_response(
        LiveFeedbackResponse {
            score: scored.score,
            branch: scored.branch,
            context_switch,
        },
        SIERRA_STATUS_SCORED,
    ))
}

#[instrument(skip(state, request))]
pub async fn stage_feedback_handler(
    State(state): State<HandlerState>,
    Json(request): Json<serde_json::Value>,
) -> Result<Response, GatewayError> {
    let request: StageFeedbackRequest = parse_request(request)?;

    let scorer = Arc::clone(&state.scorer);
    let assessment = tokio::task::spawn_blocking(move || scorer.assess_transcript(&request.transcript))
        .await
        .map_err(|e| GatewayError::InternalError(format!("Scoring task failed: {}", e)))??;

    let score = score_out_of_ten(assessment.mean);
    let context_switches: Vec<usize> = assessment
        .context_switches()
        .map(|window| window.end_index)
        .collect();

    info!(
        windows = assessment.window_count(),
        mean = assessment.mean,
        score,
        context_switches = context_switches.len(),
        "End-of-stage feedback"
    );

    Ok(make_response(
        StageFeedbackResponse {
            score,
            mean: assessment.mean,
            windows: assessment.windows,
            context_switches,
        },
        SIERRA_STATUS_SCORED,
    ))
}

#[instrument(skip(state, request))]
pub async fn question_type_handler(
    State(state): State<HandlerState>,
    Json(request): Json<serde_json::Value>,
) -> Result<Response, GatewayError> {
    classify_request(&state.question_types, request).await
}

#[instrument(skip(state, request))]
pub async fn stage_handler(
    State(state): State<HandlerState>,
    Json(request): Json<serde_json::Value>,
) -> Result<Response, GatewayError> {
    classify_request(&state.stages, request).await
}

async fn classify_request<L: LabelSet>(
    orchestrator: &ClassificationOrchestrator<L>,
    request: serde_json::Value,
) -> Result<Response, GatewayError> {
    let request: ClassifyRequest = parse_request(request)?;
    if request.question.trim().is_empty() {
        return Err(GatewayError::InvalidRequest(
            "question must not be empty".to_string(),
        ));
    }

    let result = orchestrator
        .classify(&request.question, request.fallback)
        .await;

    debug!(
        kind = L::KIND,
        label = %result.label,
        source = result.source.as_str(),
        "Classified question"
    );

    let sierra_status = if result.is_degraded() {
        SIERRA_STATUS_DEGRADED
    } else {
        SIERRA_STATUS_CLASSIFIED
    };

    Ok(make_response(result, sierra_status))
}
