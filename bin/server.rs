// Budget Ledger - Web Server
// REST API with Axum over the configured ledger store

use anyhow::{Context, Result};
use budget_ledger::api::{router, AppState};
use budget_ledger::{logging, Config};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    if let Err(e) = run().await {
        tracing::error!("server stopped: {:#}", e);
        return Err(e);
    }

    Ok(())
}

async fn run() -> Result<()> {
    let config = Config::from_env()?;
    tracing::info!(backend = ?config.backend, "starting budget ledger server");

    let store = config.open_store()?;
    let app = router(AppState::new(store));

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.addr))?;

    tracing::info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .await
        .context("Server terminated unexpectedly")?;

    Ok(())
}
