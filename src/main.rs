use std::sync::Arc;

use anyhow::Context;
use dotenv::dotenv;
use tracing_subscriber::EnvFilter;

use review_analyzer::api::{self, AppState};
use review_analyzer::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env();
    std::fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("creating output directory {}", config.output_dir.display()))?;
    if config.data_mode.is_demo() {
        tracing::warn!("🧪 Demo mode enabled: synthetic reviews are served from /analyze/demo");
    }

    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::from_config(config).context("loading keyword table")?);
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {}", bind_addr))?;
    tracing::info!("🚀 Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
