pub mod api;
pub mod config;
pub mod error;
pub mod generator;
pub mod health;
pub mod roster;
pub mod state;

use std::time::Duration;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;

use config::ServerConfig;
use state::AppState;

/// Build the Axum router and application state from a config.
pub fn build_app(config: ServerConfig) -> (Router<()>, AppState) {
    let state = AppState::new(config);
    (router(state.clone()), state)
}

/// Build the router around an existing state.
pub fn router(state: AppState) -> Router<()> {
    let timeout = Duration::from_secs(state.config.limits.request_timeout_secs);

    let manager_routes = Router::new()
        .route("/floor", get(api::get_floor))
        .route("/agents", get(api::get_agents));

    Router::new()
        .nest("/api/manager", manager_routes)
        .route("/health", get(health::health_check))
        .layer(TimeoutLayer::new(timeout))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
