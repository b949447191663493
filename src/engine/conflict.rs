use crate::limits::{MAX_SPAN_DURATION_MS, MAX_VALID_TIMESTAMP_MS, MIN_VALID_TIMESTAMP_MS};
use crate::model::{Appointment, BlockedTime, Ms, Span};

use super::slots::SlotFilter;
use super::EngineError;

pub(crate) fn now_ms() -> Ms {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as Ms
}

pub(crate) fn validate_span(span: &Span) -> Result<(), EngineError> {
    if span.start < MIN_VALID_TIMESTAMP_MS || span.end > MAX_VALID_TIMESTAMP_MS {
        return Err(EngineError::LimitExceeded("timestamp out of range"));
    }
    if span.duration_ms() > MAX_SPAN_DURATION_MS {
        return Err(EngineError::LimitExceeded("span too wide"));
    }
    Ok(())
}

/// Whether the write gate cross-checks new appointments against active
/// blocked time. The historical implementation did not (`Ignore`); the gap
/// is kept selectable so the old availability surface can be reproduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockGate {
    #[default]
    Enforce,
    Ignore,
}

/// Read-path test of a candidate slot against one active appointment.
///
/// `StartOnly` is the historical rule: a candidate is removed only when its
/// start instant coincides with the appointment's start. `FullInterval` is
/// the hardened rule: true interval overlap of the slot body.
pub(crate) fn slot_hits_appointment(
    candidate: Ms,
    duration: Ms,
    appointment: &Span,
    filter: SlotFilter,
) -> bool {
    match filter {
        SlotFilter::StartOnly => candidate == appointment.start,
        SlotFilter::FullInterval => {
            appointment.overlaps(&Span::new(candidate, candidate + duration))
        }
    }
}

/// Read-path test of a candidate slot against active blocked time. Blocked
/// intervals swallow any slot starting inside them, like breaks do.
pub(crate) fn slot_hits_block(
    candidate: Ms,
    duration: Ms,
    block: &Span,
    filter: SlotFilter,
) -> bool {
    match filter {
        SlotFilter::StartOnly => block.contains_instant(candidate),
        SlotFilter::FullInterval => block.overlaps(&Span::new(candidate, candidate + duration)),
    }
}

/// The authoritative write gate: true interval overlap against every active
/// appointment, and against active blocked time per `BlockGate`. The caller
/// holds the provider's write lock, so gate + insert is atomic.
pub(crate) fn check_write_gate(
    span: &Span,
    appointments: &[Appointment],
    blocked: &[BlockedTime],
    gate: BlockGate,
) -> Result<(), EngineError> {
    for a in appointments {
        if a.span.overlaps(span) {
            return Err(EngineError::Conflict(a.id));
        }
    }
    for b in blocked {
        if b.span.overlaps(span) {
            match gate {
                BlockGate::Enforce => return Err(EngineError::Conflict(b.id)),
                BlockGate::Ignore => {
                    tracing::warn!(blocked_time = %b.id, "write admitted over active blocked time")
                }
            }
        }
    }
    Ok(())
}
