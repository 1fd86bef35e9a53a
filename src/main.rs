use anyhow::{Context, Result};
use std::net::SocketAddr;
use tracing::info;
use translator_finder::config::Config;
use translator_finder::db::Database;
use translator_finder::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("translator_finder=info".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .init();

    // Load configuration from environment
    let config = Config::from_env()?;
    let port = config.port;
    info!(environment = ?config.environment, "Configuration loaded");

    let db = Database::new(&config.database_path).await?;
    let app = translator_finder::app(AppState::new(config, db));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context(format!("Failed to bind {}", addr))?;

    info!("Translator Finder running at http://localhost:{}", port);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}
