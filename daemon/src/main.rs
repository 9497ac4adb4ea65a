mod config;
mod orchestrator;
mod predictor;
mod protocol;
mod server;

use anyhow::Result;
use config::DaemonConfig;
use predictor::SuggestionEngine;
use server::SuggestionServer;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = DaemonConfig::load()?;
    let has_api_key = config.remote.api_key().is_some();
    info!(
        socket = %config.server.socket_path.display(),
        backend = ?config.remote.backend,
        endpoint = %config.remote.endpoint,
        model = %config.remote.model,
        api_key_env = %config.remote.api_key_env,
        has_api_key,
        debounce_ms = config.suggest.debounce_ms,
        max_suggestions = config.suggest.max_suggestions,
        remote_timeout_ms = config.remote.request_timeout_ms,
        "loaded nextword config"
    );

    let engine = SuggestionEngine::from_config(config.remote.clone(), &config.suggest);
    info!(remote = ?engine.remote_name(), "suggestion engine ready");
    let server = SuggestionServer::new(config.server.clone(), &config.suggest, engine);
    server.run().await
}
