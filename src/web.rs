use std::sync::Arc;
use std::time::Duration;

use axum::{Router, http::StatusCode, middleware};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::Result;
use crate::aggregator::WeatherService;
use crate::api;
use crate::config::WeatherBoardConfig;

/// The full application: JSON API under `/api`
pub fn app(service: Arc<WeatherService>, request_timeout: Duration) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api::router(service))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::GATEWAY_TIMEOUT,
            request_timeout,
        ))
        .layer(middleware::map_response(api::timeout_as_error))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub async fn run(config: &WeatherBoardConfig, service: Arc<WeatherService>) -> Result<()> {
    let app = app(service, config.request_timeout());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Web server running at http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Web server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
