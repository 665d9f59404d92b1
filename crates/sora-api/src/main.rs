//! Binary entrypoint for the SORA API server.
use anyhow::Context;
use sora_api::{run, AppState, ADDR_ENV, DEFAULT_ADDR};
use sora_engine::EngineConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sora_api=info,sora_engine=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Engine profile comes from SORA_ENGINE_CONFIG, listen address from SORA_ADDR
    let config = EngineConfig::from_env().context("loading engine config")?;
    tracing::info!(profile = %config.name, "engine config loaded");

    let state = AppState::in_memory(config)?;
    let addr = std::env::var(ADDR_ENV).unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    run(&addr, state).await.context("server error")?;
    Ok(())
}
