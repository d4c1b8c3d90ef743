//! End-to-end HTTP tests against a live listener.

mod common;

use serde_json::{Value, json};
use sierra::constants::SIERRA_STATUS_HEADER;
use sierra::scoring::ScoringConfig;

use common::spawn_test_server;

async fn post(url: &str, body: Value) -> (u16, Option<String>, Value) {
    let response = reqwest::Client::new()
        .post(url)
        .json(&body)
        .send()
        .await
        .expect("request should reach the server");

    let status = response.status().as_u16();
    let sierra_status = response
        .headers()
        .get(SIERRA_STATUS_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let json = response.json::<Value>().await.unwrap_or(Value::Null);

    (status, sierra_status, json)
}

#[tokio::test]
async fn test_health_endpoint_returns_ok() {
    let server = spawn_test_server(ScoringConfig::default())
        .await
        .expect("Server should start");

    let health: Value = reqwest::get(format!("{}/healthz", server.url()))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(health["status"], "ok");
}

#[tokio::test]
async fn test_interview_session_flow() {
    let server = spawn_test_server(ScoringConfig::default())
        .await
        .expect("Server should start");
    let url = server.url();

    let transcript = [
        "Hi, my name is Sam. How are you today?",
        "Good.",
        "Tell me what happened at the park.",
        "A man took my ball.",
        "What did the man look like?",
        "He was tall.",
    ];

    // live feedback after every new question, as the interview progresses
    for end in 2..transcript.len() {
        let (status, _, json) = post(
            &format!("{url}/v1/feedback/live"),
            json!({ "turns": &transcript[end - 2..=end] }),
        )
        .await;

        assert_eq!(status, 200);
        let score = json["score"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&score), "window {end}: {score}");
    }

    let (status, sierra_status, json) = post(
        &format!("{url}/v1/feedback/stage"),
        json!({ "transcript": transcript }),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(sierra_status.as_deref(), Some("scored"));
    assert_eq!(json["windows"].as_array().unwrap().len(), 4);
    assert!(json["score"].as_u64().unwrap() <= 10);

    let (status, _, json) = post(
        &format!("{url}/v1/classify/stage"),
        json!({ "question": transcript[0] }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(json["label"], "Introduction");

    let (status, _, json) = post(
        &format!("{url}/v1/classify/question-type"),
        json!({ "question": transcript[2], "fallback": true }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(json["label"], "Open-ended");
    assert_eq!(json["source"], "fallback");
}

#[tokio::test]
async fn test_malformed_requests_are_client_errors() {
    let server = spawn_test_server(ScoringConfig::default())
        .await
        .expect("Server should start");
    let url = server.url();

    for (path, body) in [
        ("/v1/feedback/live", json!({ "turns": ["only one"] })),
        ("/v1/feedback/live", json!({ "turns": [1, 2, 3] })),
        ("/v1/feedback/stage", json!({ "transcript": [] })),
        ("/v1/feedback/stage", json!({ "transcript": "not a list" })),
        ("/v1/classify/question-type", json!({ "question": "" })),
    ] {
        let (status, sierra_status, json) = post(&format!("{url}{path}"), body).await;

        assert_eq!(status, 400, "{path}");
        assert_eq!(sierra_status.as_deref(), Some("invalid_request"));
        assert_eq!(json["code"], 400);
    }
}
