//! HTTP API surface: application state, router, and request handlers.

pub mod handlers;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::geocoding::Geocoder;
use crate::store::AddressStore;

/// Application state shared across handlers.
pub struct AppState {
    pub geocoder: Arc<dyn Geocoder>,
    pub store: AddressStore,
}

/// Build the API router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/geocode/", get(handlers::geocode_handler))
        .route("/reverse-geocode/", get(handlers::reverse_geocode_handler))
        .route("/distance/", get(handlers::distance_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
