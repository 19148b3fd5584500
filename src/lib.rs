//! In-memory appointment booking service.
//!
//! A small HTTP service over one ordered collection of appointments:
//!
//! ```text
//! GET    /health             -> 200 {"status":"OK"}
//! GET    /appointments       -> 200 [Appointment...]
//! GET    /appointments/:id   -> 200 Appointment | 404
//! POST   /appointments       -> 201 Appointment
//! DELETE /appointments/:id   -> 200 {"message":"Appointment deleted successfully"}
//! ```
//!
//! Nothing is persisted; the collection lives for the life of the process.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Service and HTTP error types
//! - [`store`]: Appointment types and the shared collection
//! - [`api`]: HTTP router and handlers
//! - [`metrics`]: Prometheus counters and latency histograms
//! - [`utils`]: Shutdown signal handling

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod store;
pub mod utils;

pub use config::Config;
pub use error::{ApiError, Result, ServiceError};
