//! HTTP API handlers.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{ApiError, MessageResponse};
use crate::metrics;
use crate::store::{parse_id, AppointmentStore, NewAppointment};

/// Message returned after every delete.
pub const DELETED_MESSAGE: &str = "Appointment deleted successfully";

/// Application state shared with handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Appointment collection.
    pub store: AppointmentStore,
    /// Prometheus render handle, when a recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state around a store.
    pub fn new(store: AppointmentStore) -> Self {
        Self {
            store,
            metrics: None,
        }
    }

    /// Attach a Prometheus handle for `/metrics`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppointmentStore::default())
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "OK".
    pub status: &'static str,
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "OK" })
}

/// List every appointment in insertion order.
pub async fn list_appointments(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.store.list().await)
}

/// Look up one appointment; 404 when the id is unknown or not numeric.
pub async fn get_appointment(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(id) = parse_id(&raw_id) else {
        debug!(%raw_id, "Non-numeric appointment id");
        metrics::inc_lookup_misses();
        return Err(ApiError::NotFound);
    };

    match state.store.get(id).await {
        Some(appointment) => Ok(Json(appointment)),
        None => {
            metrics::inc_lookup_misses();
            Err(ApiError::NotFound)
        }
    }
}

/// Create an appointment from whatever fields the body carries.
pub async fn create_appointment(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let draft = decode_draft(&headers, &body)?;
    let appointment = state.store.create(draft).await;

    metrics::inc_appointments_created();
    info!(id = appointment.id, "Appointment created");

    Ok((StatusCode::CREATED, Json(appointment)))
}

/// Remove all appointments with the id. Succeeds even when nothing matched.
pub async fn delete_appointment(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> impl IntoResponse {
    let removed = match parse_id(&raw_id) {
        Some(id) => state.store.delete(id).await,
        None => 0,
    };

    metrics::inc_appointments_deleted(removed);
    info!(%raw_id, removed, "Appointment delete handled");

    Json(MessageResponse::new(DELETED_MESSAGE))
}

/// Prometheus exposition, 404 when no recorder was installed.
pub async fn render_metrics(State(state): State<AppState>) -> impl IntoResponse {
    match state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Decode a create payload.
///
/// Bodies that are empty or not sent as `application/json` count as `{}`. A
/// JSON array also carries no fields. Field values are kept as any JSON.
/// Only malformed JSON or a bare scalar is a bad request.
fn decode_draft(headers: &HeaderMap, body: &[u8]) -> Result<NewAppointment, ApiError> {
    if !is_json(headers) || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(NewAppointment::default());
    }

    let value: Value =
        serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    match value {
        Value::Object(_) => {
            serde_json::from_value(value).map_err(|e| ApiError::BadRequest(e.to_string()))
        }
        Value::Array(_) => Ok(NewAppointment::default()),
        other => Err(ApiError::BadRequest(format!(
            "request body must be a JSON object, got {}",
            other
        ))),
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|mime| {
            let mime = mime.trim().to_ascii_lowercase();
            mime == "application/json"
        })
        .unwrap_or(false)
}
