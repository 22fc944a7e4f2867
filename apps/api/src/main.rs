mod config;
mod errors;
mod llm_client;
mod models;
mod resume;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::{AnthropicClient, CompletionClient};
use crate::resume::taxonomy::HeadingTaxonomy;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on a missing completion credential)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting PromptCV API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = AnthropicClient::from_config(&config).context("Failed to build LLM client")?;
    info!(
        "LLM client initialized (model: {}, attempts: {})",
        llm.model(),
        config.llm_max_attempts
    );
    info!(
        "Section evaluation concurrency: {}",
        config.section_concurrency
    );
    let labels: Vec<&str> = HeadingTaxonomy::standard()
        .entries()
        .map(|(label, _)| label)
        .collect();
    info!("Heading taxonomy: {}", labels.join(", "));

    // Build app state
    let state = AppState {
        llm: Arc::new(llm),
        config: config.clone(),
    };

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
