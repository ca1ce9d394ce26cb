mod classifier;
mod config;
mod errors;
mod llm_client;
mod models;
mod outcomes;
mod profile;
mod resolver;
mod routes;
mod session;
mod state;
mod store;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::profile::ApplicantProfile;
use crate::resolver::generator::{LlmAnswerGenerator, LlmCoverLetterGenerator};
use crate::resolver::rules::RuleTable;
use crate::resolver::AnswerResolver;
use crate::routes::build_router;
use crate::session::Workspace;
use crate::state::AppState;
use crate::store::AnswerStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Autofill API v{}", env!("CARGO_PKG_VERSION"));

    // Applicant CV used as generation context
    let profile = Arc::new(ApplicantProfile::load(config.cv_path.as_deref()));

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone())
        .context("Failed to build LLM HTTP client")?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let rules = match &config.answer_rules_path {
        Some(path) => RuleTable::load(path)?,
        None => RuleTable::default(),
    };
    info!("Answer rules: {}", rules.rules.len());

    let resolver = AnswerResolver::new(
        Arc::new(rules),
        Arc::new(LlmAnswerGenerator::new(llm.clone(), profile.clone())),
        Arc::new(LlmCoverLetterGenerator::new(llm, profile)),
    );

    let store = AnswerStore::load(&config.answers_path)
        .with_context(|| format!("Failed to load answers from {}", config.answers_path.display()))?;
    info!(
        "Loaded {} stored answers from {}",
        store.len(),
        config.answers_path.display()
    );

    // Build app state
    let state = AppState::new(config.clone(), resolver, Workspace::new(store));

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
