//! Shared harness: an in-process server on an ephemeral port, all stand-in backends.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use sierra::classify::{
    ClassificationOrchestrator, EscalationPolicy, HeuristicClassifier, InterviewStage,
    LlmClassifier, QuestionType,
};
use sierra::embedding::SentenceEmbedder;
use sierra::gateway::{HandlerState, create_router_with_state};
use sierra::scoring::{ContinuityScorer, ScoringConfig};

pub struct TestServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub fn stub_scorer(config: ScoringConfig) -> ContinuityScorer {
    ContinuityScorer::new(Arc::new(SentenceEmbedder::stub()), config)
        .expect("scoring config should be valid")
}

pub fn stub_state(config: ScoringConfig) -> HandlerState {
    HandlerState::new(
        Arc::new(stub_scorer(config)),
        ClassificationOrchestrator::new(
            Arc::new(HeuristicClassifier::<QuestionType>::default()),
            Arc::new(LlmClassifier::<QuestionType>::mock("mistral-large-latest")),
            EscalationPolicy::default(),
        ),
        ClassificationOrchestrator::new(
            Arc::new(HeuristicClassifier::<InterviewStage>::default()),
            Arc::new(LlmClassifier::<InterviewStage>::mock("mistral-large-latest")),
            EscalationPolicy::default(),
        ),
    )
}

pub async fn spawn_test_server(config: ScoringConfig) -> std::io::Result<TestServer> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = create_router_with_state(stub_state(config));

    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(TestServer { addr, handle })
}
