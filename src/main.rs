use anyhow::Result;
use cadastre_detector::ai::{OpenAiVisionClient, VisionService};
use cadastre_detector::models::Config;
use cadastre_detector::server::{self, AppState};
use clap::Parser;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "cadastre-detector")]
#[command(about = "Detect constructions outside cadastral lot boundaries")]
struct CliArgs {
    /// Address to listen on (overrides BIND_ADDRESS).
    #[arg(long, value_name = "HOST:PORT")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cadastre_detector=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting cadastre-detector");

    let args = CliArgs::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Vision provider: OpenAI (model: {}, max_tokens: {}, timeout: {:?})",
        config.vision_model, config.max_tokens, config.upstream_timeout
    );

    // One connection pool for the lifetime of the process.
    let http_client = reqwest::Client::new();
    let vision: Arc<dyn VisionService> = Arc::new(
        OpenAiVisionClient::new_with_client(
            config.openai_api_key.clone(),
            config.vision_model.clone(),
            config.upstream_timeout,
            http_client,
        )
        .with_base_url(config.openai_base_url.clone())
        .with_max_tokens(config.max_tokens)
        .with_analysis_level(config.analysis_level),
    );

    let router = server::build_router(AppState::new(vision), config.max_upload_bytes);
    let addr = args.bind.unwrap_or(config.bind_address);
    let listener = TcpListener::bind(&addr).await?;

    server::serve(listener, router).await?;
    Ok(())
}
