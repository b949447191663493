//! Hard caps on externally supplied data. Everything here is enforced at the
//! engine's gates with `EngineError::LimitExceeded`.

use crate::model::Ms;

/// Earliest accepted instant (1970-01-01T00:00:00Z).
pub const MIN_VALID_TIMESTAMP_MS: Ms = 0;

/// Latest accepted instant (2100-01-01T00:00:00Z).
pub const MAX_VALID_TIMESTAMP_MS: Ms = 4_102_444_800_000;

/// Widest single appointment or blocked-time span: one week.
pub const MAX_SPAN_DURATION_MS: Ms = 7 * 24 * 3_600_000;

/// Longest accepted cancellation/blocking reason.
pub const MAX_REASON_LEN: usize = 512;

/// Most weekday entries a provider or company schedule may carry.
pub const MAX_HOURS_ENTRIES: usize = 64;

/// Most breaks a single weekday entry may carry.
pub const MAX_BREAKS_PER_DAY: usize = 16;
