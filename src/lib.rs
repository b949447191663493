//! Availability & conflict engine for an appointment-booking platform.
//!
//! The engine answers two questions: which slots are bookable for a
//! provider/service/date, and whether a proposed booking, edit or time-block
//! may proceed against existing commitments. Entity records reach it through
//! the [`engine::Catalog`] and [`engine::Ledger`] collaborator traits;
//! persistence, transport and authentication live with the caller.
//!
//! Internally everything computes on Unix-millisecond instants and half-open
//! [`model::Span`]s; calendar dates, `"HH:mm"` clock times and weekday names
//! are converted at the [`calendar`] edge, anchored to a single reference
//! timezone (UTC).

pub mod calendar;
pub mod engine;
pub mod limits;
pub mod model;
pub mod observability;

pub use engine::{
    BlockGate, Catalog, ClosedReason, DayAvailability, Engine, EngineConfig, EngineError,
    HoursSource, Ledger, MemoryStore, ResolvedHours, Slot, SlotFilter, StoreError,
};
pub use model::{Appointment, AppointmentStatus, BlockedStatus, BlockedTime, Ms, Span};
