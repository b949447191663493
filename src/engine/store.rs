use async_trait::async_trait;
use dashmap::DashMap;
use ulid::Ulid;

use crate::model::{
    Appointment, AppointmentStatus, BlockedStatus, BlockedTime, Company, Provider, Service, Span,
};

/// Failure inside a collaborator lookup or write. Opaque to the engine; it
/// surfaces to callers as `EngineError::Store`.
#[derive(Debug)]
pub struct StoreError(pub String);

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for StoreError {}

/// Entity lookups the engine depends on. Implemented by the persistence
/// layer; the engine never caches what these return.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn provider_by_id(&self, id: Ulid) -> Result<Option<Provider>, StoreError>;
    async fn company_by_id(&self, id: Ulid) -> Result<Option<Company>, StoreError>;
    async fn service_by_id(&self, id: Ulid) -> Result<Option<Service>, StoreError>;
}

/// Appointment and blocked-time storage. Range queries return records whose
/// span overlaps the window, ordered by start.
#[async_trait]
pub trait Ledger: Send + Sync {
    async fn appointment_by_id(&self, id: Ulid) -> Result<Option<Appointment>, StoreError>;

    async fn appointments_in_range(
        &self,
        provider_id: Ulid,
        window: Span,
        statuses: &[AppointmentStatus],
    ) -> Result<Vec<Appointment>, StoreError>;

    async fn insert_appointment(&self, appointment: &Appointment) -> Result<(), StoreError>;

    async fn update_appointment(&self, appointment: &Appointment) -> Result<(), StoreError>;

    async fn blocked_time_by_id(&self, id: Ulid) -> Result<Option<BlockedTime>, StoreError>;

    /// Active blocked time overlapping the window.
    async fn blocked_times_in_range(
        &self,
        provider_id: Ulid,
        window: Span,
    ) -> Result<Vec<BlockedTime>, StoreError>;

    async fn insert_blocked_time(&self, blocked: &BlockedTime) -> Result<(), StoreError>;

    async fn update_blocked_time(&self, blocked: &BlockedTime) -> Result<(), StoreError>;

    /// Administrative hard delete. Returns whether the record existed.
    async fn delete_blocked_time(&self, id: Ulid) -> Result<bool, StoreError>;
}

/// Self-contained implementation of both collaborator traits. Used by the
/// test suite and by embedders that want an engine with no external storage.
#[derive(Default)]
pub struct MemoryStore {
    providers: DashMap<Ulid, Provider>,
    companies: DashMap<Ulid, Company>,
    services: DashMap<Ulid, Service>,
    appointments: DashMap<Ulid, Appointment>,
    blocked: DashMap<Ulid, BlockedTime>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_provider(&self, provider: Provider) {
        self.providers.insert(provider.id, provider);
    }

    pub fn put_company(&self, company: Company) {
        self.companies.insert(company.id, company);
    }

    pub fn put_service(&self, service: Service) {
        self.services.insert(service.id, service);
    }

    pub fn appointment_count(&self) -> usize {
        self.appointments.len()
    }

    pub fn blocked_time_count(&self) -> usize {
        self.blocked.len()
    }
}

#[async_trait]
impl Catalog for MemoryStore {
    async fn provider_by_id(&self, id: Ulid) -> Result<Option<Provider>, StoreError> {
        Ok(self.providers.get(&id).map(|e| e.value().clone()))
    }

    async fn company_by_id(&self, id: Ulid) -> Result<Option<Company>, StoreError> {
        Ok(self.companies.get(&id).map(|e| e.value().clone()))
    }

    async fn service_by_id(&self, id: Ulid) -> Result<Option<Service>, StoreError> {
        Ok(self.services.get(&id).map(|e| e.value().clone()))
    }
}

#[async_trait]
impl Ledger for MemoryStore {
    async fn appointment_by_id(&self, id: Ulid) -> Result<Option<Appointment>, StoreError> {
        Ok(self.appointments.get(&id).map(|e| e.value().clone()))
    }

    async fn appointments_in_range(
        &self,
        provider_id: Ulid,
        window: Span,
        statuses: &[AppointmentStatus],
    ) -> Result<Vec<Appointment>, StoreError> {
        let mut hits: Vec<Appointment> = self
            .appointments
            .iter()
            .filter(|e| {
                let a = e.value();
                a.provider_id == provider_id
                    && statuses.contains(&a.status)
                    && a.span.overlaps(&window)
            })
            .map(|e| e.value().clone())
            .collect();
        hits.sort_by_key(|a| a.span.start);
        Ok(hits)
    }

    async fn insert_appointment(&self, appointment: &Appointment) -> Result<(), StoreError> {
        self.appointments.insert(appointment.id, appointment.clone());
        Ok(())
    }

    async fn update_appointment(&self, appointment: &Appointment) -> Result<(), StoreError> {
        match self.appointments.get_mut(&appointment.id) {
            Some(mut e) => {
                *e.value_mut() = appointment.clone();
                Ok(())
            }
            None => Err(StoreError(format!(
                "update of unknown appointment {}",
                appointment.id
            ))),
        }
    }

    async fn blocked_time_by_id(&self, id: Ulid) -> Result<Option<BlockedTime>, StoreError> {
        Ok(self.blocked.get(&id).map(|e| e.value().clone()))
    }

    async fn blocked_times_in_range(
        &self,
        provider_id: Ulid,
        window: Span,
    ) -> Result<Vec<BlockedTime>, StoreError> {
        let mut hits: Vec<BlockedTime> = self
            .blocked
            .iter()
            .filter(|e| {
                let b = e.value();
                b.provider_id == provider_id
                    && b.status == BlockedStatus::Active
                    && b.span.overlaps(&window)
            })
            .map(|e| e.value().clone())
            .collect();
        hits.sort_by_key(|b| b.span.start);
        Ok(hits)
    }

    async fn insert_blocked_time(&self, blocked: &BlockedTime) -> Result<(), StoreError> {
        self.blocked.insert(blocked.id, blocked.clone());
        Ok(())
    }

    async fn update_blocked_time(&self, blocked: &BlockedTime) -> Result<(), StoreError> {
        match self.blocked.get_mut(&blocked.id) {
            Some(mut e) => {
                *e.value_mut() = blocked.clone();
                Ok(())
            }
            None => Err(StoreError(format!(
                "update of unknown blocked time {}",
                blocked.id
            ))),
        }
    }

    async fn delete_blocked_time(&self, id: Ulid) -> Result<bool, StoreError> {
        Ok(self.blocked.remove(&id).is_some())
    }
}
