pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod http;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;

use axum::{Router, middleware as axum_middleware};
use config::AppConfig;
use db::PgStore;
use middleware::{cors_layer, create_global_rate_limiter, rate_limit_middleware};
use sqlx::postgres::PgPoolOptions;
use state::AppState;
use std::{error::Error, net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;

/// Full application router with rate limiting, CORS and request tracing.
pub fn create_app(state: AppState) -> Router {
    let global_rate_limiter = create_global_rate_limiter();
    let cors = cors_layer(&state.config.allowed_origins);

    Router::new()
        .merge(http::create_http_routes(state))
        .layer(axum_middleware::from_fn(move |req, next| {
            rate_limit_middleware(global_rate_limiter.clone(), req, next)
        }))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .fallback(|| async { "404 Not Found" })
}

pub async fn start_server() -> Result<(), Box<dyn Error + Send + Sync>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    let port = config.port;
    let state = AppState::new(Arc::new(PgStore::new(pool)), config);
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    tracing::info!("Deckshow server running on port {}", port);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
