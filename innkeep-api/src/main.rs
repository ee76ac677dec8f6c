use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use innkeep_api::{app, AppState, AuthConfig};
use innkeep_store::{DbClient, StoreReservationRepository, StoreRoomRepository};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "innkeep_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = innkeep_store::app_config::Config::load().context("Failed to load config")?;
    tracing::info!("Starting Innkeep API on port {}", config.server.port);

    let db = DbClient::new(&config.database)
        .await
        .context("Failed to connect to Postgres")?;
    db.migrate().await.context("Failed to run migrations")?;

    let rooms = Arc::new(StoreRoomRepository::new(db.pool.clone()));
    let reservations = Arc::new(StoreReservationRepository::new(db.pool.clone()));

    let app_state = AppState::new(
        rooms,
        reservations,
        AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
        },
    );

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind listener")?;
    axum::serve(listener, app)
        .await
        .context("Server exited unexpectedly")
}
