//! Sierra HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use sierra::classify::{
    ClassificationOrchestrator, EscalationPolicy, InterviewStage, LabelSet, LlmClassifier,
    QuestionType, load_primary,
};
use sierra::config::Config;
use sierra::embedding::{EmbedderConfig, SentenceEmbedder};
use sierra::gateway::{HandlerState, create_router_with_state};
use sierra::scoring::{ContinuityScorer, ScoringConfig};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        llm_model = %config.llm_model,
        mock_provider = config.mock_provider,
        "Sierra starting"
    );

    let embedder_config = match &config.embedding_model_path {
        Some(path) => EmbedderConfig::new(path.clone()),
        None => {
            tracing::warn!("No SIERRA_EMBEDDING_MODEL_PATH configured, running embedder in stub mode");
            EmbedderConfig::stub()
        }
    };
    let embedder = SentenceEmbedder::load(embedder_config)?;

    let scoring_config = ScoringConfig::from_env()?;
    let scorer = Arc::new(ContinuityScorer::new(Arc::new(embedder), scoring_config)?);

    let policy = EscalationPolicy::from_env()?;
    let question_types = build_orchestrator::<QuestionType>(
        config.question_classifier_path.as_deref(),
        &config,
        policy,
    )?;
    let stages = build_orchestrator::<InterviewStage>(
        config.stage_classifier_path.as_deref(),
        &config,
        policy,
    )?;

    let state = HandlerState::new(scorer, question_types, stages);
    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Sierra shutdown complete");
    Ok(())
}

fn build_orchestrator<L: LabelSet>(
    model_dir: Option<&std::path::Path>,
    config: &Config,
    policy: EscalationPolicy,
) -> anyhow::Result<ClassificationOrchestrator<L>> {
    let primary = load_primary::<L>(model_dir)?;
    let fallback = if config.mock_provider {
        LlmClassifier::<L>::mock(config.llm_model.clone())
    } else {
        LlmClassifier::<L>::new(config.llm_model.clone())
    };

    Ok(ClassificationOrchestrator::new(
        primary,
        Arc::new(fallback),
        policy,
    ))
}

fn run_health_check() -> i32 {
    let port = std::env::var("SIERRA_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build runtime");

    rt.block_on(async {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
            .expect("failed to build client");

        match client.get(&url).send().await {
            Ok(res) if res.status().is_success() => 0,
            _ => 1,
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
