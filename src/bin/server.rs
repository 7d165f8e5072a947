//! HTTP server entry point.
//!
//! Run with: `cargo run --bin server`

use std::net::SocketAddr;
use std::sync::Arc;

use llm_gateway::api::{build_router, AppState};
use llm_gateway::config::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let settings = Settings::from_env();
    tracing::info!(environment = %settings.environment, "starting llm-gateway");

    let db_pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(10)
        .connect(&settings.database_url)
        .await?;

    let state = Arc::new(AppState::new(&settings, db_pool));
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], 8080));
    tracing::info!(%addr, "listening");
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
