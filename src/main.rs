use std::sync::Arc;

use anyhow::Context;
use companies_api::config::config;
use companies_api::database::{CompanyStore, DatabaseManager, MemoryCompanyStore, PgCompanyStore};
use companies_api::{app, logging, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();
    logging::init();

    let config = config();
    tracing::info!("Starting Companies API in {:?} mode", config.environment);

    if !companies_api::is_development!() && config.security.jwt_secret.is_empty() {
        anyhow::bail!("JWT_SECRET must be set outside development");
    }

    let store: Arc<dyn CompanyStore> = if use_memory_store() {
        tracing::warn!("Using the in-memory company store; data is lost on exit");
        Arc::new(MemoryCompanyStore::new())
    } else {
        let pool = DatabaseManager::connect(&config.database).await?;
        DatabaseManager::migrate(&pool).await?;
        Arc::new(PgCompanyStore::new(pool))
    };

    let state = AppState::new(store, config.clone()).context("failed to load request schemas")?;

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Companies API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Companies API stopped");
    Ok(())
}

fn use_memory_store() -> bool {
    std::env::args().any(|arg| arg == "--memory")
        || matches!(
            std::env::var("COMPANIES_API_MEMORY").as_deref(),
            Ok("1") | Ok("true")
        )
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        // Without a signal handler, keep serving
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
