mod conflict;
mod error;
mod hours;
mod lifecycle;
mod mutations;
mod queries;
mod slots;
mod store;

pub use conflict::BlockGate;
pub use error::EngineError;
pub use hours::{resolve as resolve_hours, ClosedReason, DaySchedule, ResolvedHours};
pub use queries::{DayAvailability, HoursSource, Slot};
pub use slots::{SlotFilter, SlotIter};
pub use store::{Catalog, Ledger, MemoryStore, StoreError};

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use ulid::Ulid;

use crate::model::{Appointment, BlockedTime, Company, Provider, Service};

/// The two observable-policy switches. Defaults reproduce the hardened
/// behavior on the write path (`BlockGate::Enforce`) and the historical
/// behavior on the read path (`SlotFilter::StartOnly`).
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineConfig {
    pub slot_filter: SlotFilter,
    pub block_gate: BlockGate,
}

/// The availability & conflict engine. Stateless apart from the per-provider
/// lock table: all records live behind the collaborator traits.
pub struct Engine {
    catalog: Arc<dyn Catalog>,
    ledger: Arc<dyn Ledger>,
    config: EngineConfig,
    /// Per-provider write serialization. Holding a provider's mutex across
    /// conflict-check + insert makes the write gate atomic, so two
    /// overlapping bookings can never both pass.
    locks: DashMap<Ulid, Arc<Mutex<()>>>,
}

impl Engine {
    pub fn new(catalog: Arc<dyn Catalog>, ledger: Arc<dyn Ledger>) -> Self {
        Self::with_config(catalog, ledger, EngineConfig::default())
    }

    pub fn with_config(
        catalog: Arc<dyn Catalog>,
        ledger: Arc<dyn Ledger>,
        config: EngineConfig,
    ) -> Self {
        Self {
            catalog,
            ledger,
            config,
            locks: DashMap::new(),
        }
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    pub(super) fn provider_lock(&self, provider_id: Ulid) -> Arc<Mutex<()>> {
        self.locks
            .entry(provider_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    // ── Collaborator lookups with NotFound mapping ──────────────

    pub(super) async fn require_provider(&self, id: Ulid) -> Result<Provider, EngineError> {
        self.catalog
            .provider_by_id(id)
            .await?
            .ok_or(EngineError::ProviderNotFound(id))
    }

    pub(super) async fn require_company(&self, id: Ulid) -> Result<Company, EngineError> {
        self.catalog
            .company_by_id(id)
            .await?
            .ok_or(EngineError::CompanyNotFound(id))
    }

    pub(super) async fn require_service(&self, id: Ulid) -> Result<Service, EngineError> {
        let service = self
            .catalog
            .service_by_id(id)
            .await?
            .ok_or(EngineError::ServiceNotFound(id))?;
        if service.duration == 0 {
            return Err(EngineError::Validation {
                field: "duration",
                message: "service duration must be positive".into(),
            });
        }
        Ok(service)
    }

    pub(super) async fn require_appointment(&self, id: Ulid) -> Result<Appointment, EngineError> {
        self.ledger
            .appointment_by_id(id)
            .await?
            .ok_or(EngineError::AppointmentNotFound(id))
    }

    pub(super) async fn require_blocked_time(&self, id: Ulid) -> Result<BlockedTime, EngineError> {
        self.ledger
            .blocked_time_by_id(id)
            .await?
            .ok_or(EngineError::BlockedTimeNotFound(id))
    }
}
