//! Router configuration for the web server.

use axum::{middleware, routing::get, Router};
use tower_http::cors::CorsLayer;

use super::auth;
use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/search_movies/", get(handlers::search_movies))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_token,
        ));

    Router::new()
        .merge(api)
        // Liveness probe stays open
        .route("/health", get(handlers::health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
