//! Route definitions for the PathGuard admin API.
//!
//! All routes are mounted under `/api`. Mutating routes carry the
//! admin-token middleware; the check and health endpoints do not.

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{delete, get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route("/protections", post(handlers::protection::protect))
        .route("/protections/{id}", delete(handlers::protection::unprotect))
        .route(
            "/protections/cache/clear",
            post(handlers::protection::clear_cache),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_admin,
        ));

    let open_routes = Router::new()
        .route("/protections", get(handlers::protection::list))
        .route("/protections/check", get(handlers::protection::check))
        .route("/protections/status", get(handlers::protection::status))
        .route("/health", get(handlers::health::health));

    let api_routes = admin_routes.merge(open_routes);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
