//! HTTP API module: health check, appointment CRUD, and metrics.

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::{create_router, App};
