// src/main.rs

use axum::http::HeaderValue;
use axum::{Router, routing::get};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use habit_backend::api::http::{
    create_auth_router, create_goals_router, create_habits_router, create_suggestions_router,
    health_check, liveness_check, readiness_check,
};
use habit_backend::config::CONFIG;
use habit_backend::db;
use habit_backend::state::AppState;
use tower_http::cors::{Any, CorsLayer};

/// Graceful shutdown signal handler for SIGTERM and Ctrl+C
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections...");
}

fn cors_layer() -> CorsLayer {
    let origins: Vec<HeaderValue> = CONFIG
        .cors
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let level = CONFIG.logging.level.parse().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Habit Tracker Backend");
    info!(
        "Suggestion API: {}",
        if CONFIG.suggestions.is_configured() {
            "configured"
        } else {
            "not configured (fallback suggestions only)"
        }
    );

    let pool = db::connect(&CONFIG.database).await?;
    db::init_schema(&pool).await?;
    info!("Database schema ready");

    let app_state = Arc::new(AppState::new(pool)?);

    let app = Router::new()
        // Health endpoints for load balancers
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/live", get(liveness_check))
        .merge(create_auth_router())
        .merge(create_habits_router())
        .merge(create_goals_router())
        .merge(create_suggestions_router())
        .layer(cors_layer())
        .with_state(app_state);

    let bind_address = CONFIG.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;

    info!("Habit tracker API listening on http://{}", bind_address);
    info!("Health endpoints: /health, /ready, /live");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server shut down gracefully");

    Ok(())
}
