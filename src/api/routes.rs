//! HTTP API route definitions.

use axum::{middleware, routing::get, Router};
use tower_http::normalize_path::NormalizePath;
use tower_http::trace::TraceLayer;

use super::handlers::{
    create_appointment, delete_appointment, get_appointment, health, list_appointments,
    render_metrics, AppState,
};
use crate::metrics::track_http;

/// Router wrapped so `/health/` and `/appointments/1/` route like their
/// slash-less forms.
pub type App = NormalizePath<Router>;

/// Create the API service.
pub fn create_router(state: AppState) -> App {
    let router = Router::new()
        // Health endpoint
        .route("/health", get(health))
        // Appointments
        .route(
            "/appointments",
            get(list_appointments).post(create_appointment),
        )
        .route(
            "/appointments/:id",
            get(get_appointment).delete(delete_appointment),
        )
        // Metrics
        .route("/metrics", get(render_metrics))
        .layer(middleware::from_fn(track_http))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    NormalizePath::trim_trailing_slash(router)
}
