//! finagent HTTP Server
//!
//! Axum-based server exposing the financial analyst agent. A query goes to
//! the model service together with the market data and news search tools;
//! the model decides which tools to call and returns a Markdown report with a
//! sentiment label and a risk score.

mod config;
mod handlers;
mod state;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::{AgentBuilder, LlmProvider, ToolRegistry};
use agent_runtime::GeminiProvider;
use market_intel::{
    FINANCIAL_ANALYST_PROMPT,
    source::{FinnhubClient, TavilyClient},
    tools::{MarketDataTool, NewsSearchTool},
};

use crate::config::AppConfig;
use crate::handlers::{analyze_handler, health_check, list_models};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().inspect_err(|e| {
        tracing::error!("✗ Refusing to start: {}", e);
    })?;
    tracing::debug!(?config, "Configuration loaded");

    let state = build_state(&config)?;

    match state.provider.health_check().await {
        Ok(true) => tracing::info!("✓ Connected to Gemini (model: {})", config.model),
        Ok(false) | Err(_) => {
            tracing::warn!("⚠ Gemini not reachable - requests will fail until it is");
        }
    }

    let app = build_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 finagent server running on http://{}", addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("Endpoints:");
    tracing::info!("  POST /api/analyze - Analyze a financial query");
    tracing::info!("  GET  /health      - Health check");
    tracing::info!("  GET  /models      - List available models");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Wire providers, tools and the agent from configuration
fn build_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let provider: Arc<dyn LlmProvider> = Arc::new(GeminiProvider::new(config.gemini())?);

    let mut tools = ToolRegistry::new();
    tools.register(MarketDataTool::new(Arc::new(FinnhubClient::new(config.finnhub())?)));
    tools.register(NewsSearchTool::new(Arc::new(TavilyClient::new(config.tavily())?)));

    tracing::info!("Registered {} tools:", tools.len());
    for name in tools.names() {
        tracing::info!("  • {}", name);
    }

    let agent = AgentBuilder::new()
        .provider(provider.clone())
        .tools(tools)
        .system_prompt(FINANCIAL_ANALYST_PROMPT)
        .model(config.model.as_str())
        .build()?;

    Ok(AppState {
        agent: Arc::new(agent),
        provider,
    })
}

fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/models", get(list_models))
        .route("/api/analyze", post(analyze_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
