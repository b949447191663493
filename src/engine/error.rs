use ulid::Ulid;

use super::store::StoreError;

/// Every failure path of the engine. Discriminated so the calling layer can
/// map it straight onto a transport status without string matching.
#[derive(Debug)]
pub enum EngineError {
    /// Malformed or missing input, with field-level detail.
    Validation {
        field: &'static str,
        message: String,
    },
    /// A configured clock time that is not a well-formed `"HH:mm"` value.
    InvalidTime(String),
    ProviderNotFound(Ulid),
    CompanyNotFound(Ulid),
    ServiceNotFound(Ulid),
    AppointmentNotFound(Ulid),
    BlockedTimeNotFound(Ulid),
    /// The requested interval overlaps an existing occupant of the timeline.
    Conflict(Ulid),
    /// The record is in a state that permits no further transition.
    Terminal(Ulid),
    LimitExceeded(&'static str),
    /// Unexpected collaborator failure; logged, never retried here.
    Store(String),
}

impl EngineError {
    /// Stable machine-readable reason code.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::Validation { .. } => "VALIDATION_ERROR",
            EngineError::InvalidTime(_) => "INVALID_TIME",
            EngineError::ProviderNotFound(_) => "PROVIDER_NOT_FOUND",
            EngineError::CompanyNotFound(_) => "COMPANY_NOT_FOUND",
            EngineError::ServiceNotFound(_) => "SERVICE_NOT_FOUND",
            EngineError::AppointmentNotFound(_) => "APPOINTMENT_NOT_FOUND",
            EngineError::BlockedTimeNotFound(_) => "BLOCKED_TIME_NOT_FOUND",
            EngineError::Conflict(_) => "CONFLICT",
            EngineError::Terminal(_) => "TERMINAL_STATE",
            EngineError::LimitExceeded(_) => "LIMIT_EXCEEDED",
            EngineError::Store(_) => "STORE_ERROR",
        }
    }

    /// HTTP-equivalent status for the calling layer.
    pub fn status(&self) -> u16 {
        match self {
            EngineError::Validation { .. }
            | EngineError::InvalidTime(_)
            | EngineError::LimitExceeded(_) => 400,
            EngineError::ProviderNotFound(_)
            | EngineError::CompanyNotFound(_)
            | EngineError::ServiceNotFound(_)
            | EngineError::AppointmentNotFound(_)
            | EngineError::BlockedTimeNotFound(_) => 404,
            EngineError::Conflict(_) | EngineError::Terminal(_) => 409,
            EngineError::Store(_) => 500,
        }
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::Validation { field, message } => {
                write!(f, "invalid {field}: {message}")
            }
            EngineError::InvalidTime(raw) => write!(f, "not a valid HH:mm clock time: {raw:?}"),
            EngineError::ProviderNotFound(id) => write!(f, "provider not found: {id}"),
            EngineError::CompanyNotFound(id) => write!(f, "company not found: {id}"),
            EngineError::ServiceNotFound(id) => write!(f, "service not found: {id}"),
            EngineError::AppointmentNotFound(id) => write!(f, "appointment not found: {id}"),
            EngineError::BlockedTimeNotFound(id) => write!(f, "blocked time not found: {id}"),
            EngineError::Conflict(id) => write!(f, "conflicts with existing entry: {id}"),
            EngineError::Terminal(id) => {
                write!(f, "record {id} is terminal; no further transitions")
            }
            EngineError::LimitExceeded(msg) => write!(f, "limit exceeded: {msg}"),
            EngineError::Store(e) => write!(f, "store error: {e}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<StoreError> for EngineError {
    fn from(e: StoreError) -> Self {
        EngineError::Store(e.0)
    }
}
