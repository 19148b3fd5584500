//! Appointment records and the in-memory collection that holds them.

pub mod memory;
pub mod types;

pub use memory::{AppointmentStore, IdPolicy};
pub use types::{parse_id, Appointment, AppointmentId, NewAppointment};
