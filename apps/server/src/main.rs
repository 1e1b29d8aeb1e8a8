//! Tally server entry point: config, database, router, listener.

use tracing_subscriber::EnvFilter;

use tally_db::{Database, DbConfig};
use tally_server::{AppState, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::load()?;
    tracing::info!(
        bind_addr = %config.bind_addr,
        db_path = %config.db_path,
        "Configuration loaded"
    );

    // Migrations run on connect
    let db = Database::new(DbConfig::new(&config.db_path)).await?;
    tracing::info!("Database ready");

    let state = AppState::new(db, config.post_timeout);
    let app = tally_server::app(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
