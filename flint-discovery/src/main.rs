use axum::{routing::{get, post}, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod config;
mod events;
mod models;
mod ranking;
mod routes;
mod schema;
mod services;

use config::AppConfig;
use flint_shared::clients::db::{create_pool, DbPool};
use flint_shared::clients::rabbitmq::RabbitMQClient;

pub struct AppState {
    pub db: DbPool,
    pub config: AppConfig,
    pub rabbitmq: RabbitMQClient,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    flint_shared::middleware::init_tracing("flint-discovery");

    let config = AppConfig::load()?;
    let port = config.port;

    let db = create_pool(&config.database_url);
    let rabbitmq = RabbitMQClient::connect(&config.rabbitmq_url).await?;

    let state = Arc::new(AppState { db, config, rabbitmq });

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/discover", get(routes::discover::discover))
        .route("/swipe", post(routes::swipe::record_swipe))
        .route("/swipe/rewind", post(routes::swipe::rewind_swipe))
        .route("/swipe/limit", get(routes::swipe::swipe_limit))
        .route("/boost", post(routes::boost::activate_boost))
        .route("/matches", get(routes::matches::list_matches))
        .route("/likes/received", get(routes::likes::received_likes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "flint-discovery starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
