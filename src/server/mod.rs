//! HTTP surface: one form, one predict action, a JSON API, a health probe.

mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::assets::AppContext;

/// Shared application state: the immutable context built at startup.
pub type AppState = Arc<AppContext>;

/// Create the router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/predict", post(handlers::predict))
        .route("/api/predict", post(handlers::api_predict))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
