//! In-memory appointment collection.

use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::debug;

use super::types::{seed_appointments, Appointment, AppointmentId, NewAppointment};

/// Rule for assigning ids to new appointments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum IdPolicy {
    /// `id = collection length + 1`. Can reuse a surviving id after a delete.
    #[default]
    Length,
    /// Monotonic counter, never reused across deletes.
    Sequential,
}

#[derive(Debug)]
struct Inner {
    records: Vec<Appointment>,
    next_id: AppointmentId,
}

impl Inner {
    fn assign_id(&mut self, policy: IdPolicy) -> AppointmentId {
        match policy {
            IdPolicy::Length => self.records.len() as AppointmentId + 1,
            IdPolicy::Sequential => {
                let id = self.next_id;
                self.next_id += 1;
                id
            }
        }
    }
}

/// Shared handle to the ordered appointment collection.
///
/// Cloning is cheap; clones see the same records. Every operation takes the
/// lock once, so create assigns and appends atomically.
#[derive(Debug, Clone)]
pub struct AppointmentStore {
    inner: Arc<RwLock<Inner>>,
    policy: IdPolicy,
}

impl AppointmentStore {
    /// Create an empty store.
    pub fn new(policy: IdPolicy) -> Self {
        Self::with_records(Vec::new(), policy)
    }

    /// Create a store holding the two seed appointments.
    pub fn seeded(policy: IdPolicy) -> Self {
        Self::with_records(seed_appointments(), policy)
    }

    /// Create a store from existing records, kept in the given order.
    pub fn with_records(records: Vec<Appointment>, policy: IdPolicy) -> Self {
        let next_id = records.iter().map(|a| a.id).max().unwrap_or(0).max(0) + 1;
        Self {
            inner: Arc::new(RwLock::new(Inner { records, next_id })),
            policy,
        }
    }

    /// Id assignment rule in effect.
    pub fn policy(&self) -> IdPolicy {
        self.policy
    }

    /// Snapshot of all appointments in insertion order.
    pub async fn list(&self) -> Vec<Appointment> {
        self.inner.read().await.records.clone()
    }

    /// First appointment with the given id.
    pub async fn get(&self, id: AppointmentId) -> Option<Appointment> {
        self.inner
            .read()
            .await
            .records
            .iter()
            .find(|a| a.id == id)
            .cloned()
    }

    /// Append a new appointment and return it with its assigned id.
    pub async fn create(&self, draft: NewAppointment) -> Appointment {
        let mut inner = self.inner.write().await;
        let id = inner.assign_id(self.policy);
        let appointment = Appointment::from_draft(id, draft);
        inner.records.push(appointment.clone());
        debug!(id, total = inner.records.len(), "Appointment stored");
        appointment
    }

    /// Remove every appointment with the given id. Returns how many were removed.
    pub async fn delete(&self, id: AppointmentId) -> usize {
        let mut inner = self.inner.write().await;
        let before = inner.records.len();
        inner.records.retain(|a| a.id != id);
        before - inner.records.len()
    }

    /// Number of stored appointments.
    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    /// Whether the store holds no appointments.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.records.is_empty()
    }
}

impl Default for AppointmentStore {
    fn default() -> Self {
        Self::seeded(IdPolicy::default())
    }
}
