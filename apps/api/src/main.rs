mod config;
mod errors;
mod intake;
mod llm_client;
mod pipeline;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, DispatchMode};
use crate::llm_client::LlmClient;
use crate::pipeline::mailer::SmtpMailer;
use crate::pipeline::notification::Notifier;
use crate::pipeline::Pipeline;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on a missing backend API key)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Triage API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::with_api_url(config.anthropic_api_key.clone(), config.llm_api_url.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Initialize notifier
    let mailer = SmtpMailer::new(config.smtp.host.clone(), config.smtp.port);
    let notifier = Notifier::from_config(&config.smtp, Arc::new(mailer));
    match config.smtp.dispatch {
        DispatchMode::Enabled => info!(
            "Email dispatch enabled via {}:{}",
            config.smtp.host, config.smtp.port
        ),
        DispatchMode::Disabled => info!("Email dispatch disabled (simulation mode)"),
    }

    let state = AppState {
        pipeline: Pipeline::new(Arc::new(llm), Arc::new(notifier)),
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
