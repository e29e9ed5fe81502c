//! Service entry point: configuration, database setup, router, listener.

use account_service::{
    app, ensure_accounts_table, ensure_database_exists, AppState, PgAccountStore, ServiceConfig,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("account_service=info,tower_http=info")),
        )
        .init();

    let config = ServiceConfig::from_env();
    ensure_database_exists(&config.database_url).await?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    ensure_accounts_table(&pool).await?;

    let state = AppState {
        store: Arc::new(PgAccountStore::new(pool)),
        config: config.clone(),
    };

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
