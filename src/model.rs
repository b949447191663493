use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unix milliseconds — the only time type the engine computes on.
pub type Ms = i64;

/// Half-open interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: Ms,
    pub end: Ms,
}

impl Span {
    pub fn new(start: Ms, end: Ms) -> Self {
        debug_assert!(start < end, "Span start must be before end");
        Self { start, end }
    }

    pub fn duration_ms(&self) -> Ms {
        self.end - self.start
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains_instant(&self, t: Ms) -> bool {
        self.start <= t && t < self.end
    }
}

// ── Working-hours configuration ─────────────────────────────────

/// One weekday's opening hours. Clock times keep their external `"HH:mm"`
/// form until resolution, where a malformed value surfaces as `INVALID_TIME`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekdayHours {
    /// English weekday name, matched case-insensitively ("Monday", "monday", …).
    pub day: String,
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub breaks: Vec<BreakSpec>,
    /// Per-day buffer in minutes. When set, takes precedence over the
    /// service's buffer for slot stepping on this day.
    #[serde(default)]
    pub buffer_time: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakSpec {
    pub start: String,
    pub end: String,
}

/// Company flavor of a weekday entry: same shape plus the day-on switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDayHours {
    #[serde(flatten)]
    pub hours: WeekdayHours,
    #[serde(default = "default_day_on")]
    pub is_day_on: bool,
}

fn default_day_on() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holiday {
    pub date: NaiveDate,
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
}

// ── Entities ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub id: Ulid,
    pub company_id: Ulid,
    #[serde(default)]
    pub name: Option<String>,
    /// When non-empty this list is authoritative; the owning company's
    /// schedule is only consulted as a fallback.
    #[serde(default)]
    pub working_hours: Vec<WeekdayHours>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: Ulid,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub working_hours: Vec<CompanyDayHours>,
    #[serde(default)]
    pub holidays: Vec<Holiday>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: Ulid,
    pub company_id: Ulid,
    #[serde(default)]
    pub name: Option<String>,
    /// Minutes; must be > 0.
    pub duration: u32,
    /// Minutes; ≥ 0. Duration + buffer define the slot step.
    #[serde(default)]
    pub buffer_duration: u32,
}

// ── Appointments & blocked time ─────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Booked,
    Completed,
    Cancelled,
    Blocked,
}

impl AppointmentStatus {
    /// Statuses that occupy the provider's timeline.
    pub const ACTIVE: &'static [AppointmentStatus] =
        &[AppointmentStatus::Booked, AppointmentStatus::Blocked];

    pub fn is_active(&self) -> bool {
        Self::ACTIVE.contains(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockedStatus {
    Active,
    Cancelled,
}

/// What a history entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryChange {
    Booked,
    Edited,
    Cancelled,
    Completed,
    Blocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub change: HistoryChange,
    pub at: Ms,
}

/// Append-only audit log. The only mutation is `record`; prior entries are
/// never rewritten or removed, and the API surface makes that unexpressible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn record(&mut self, change: HistoryChange, at: Ms) {
        self.entries.push(HistoryEntry { change, at });
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// 1..=5.
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Ulid,
    pub customer_id: Ulid,
    pub provider_id: Ulid,
    pub service_id: Ulid,
    /// `[dateTime, endTime)`; end = start + service duration at write time.
    pub span: Span,
    pub status: AppointmentStatus,
    pub history: History,
    #[serde(default)]
    pub cancellation_reason: Option<String>,
    #[serde(default)]
    pub cancellation_at: Option<Ms>,
    #[serde(default)]
    pub review: Option<Review>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockedTime {
    pub id: Ulid,
    pub provider_id: Ulid,
    pub span: Span,
    #[serde(default)]
    pub reason: Option<String>,
    pub status: BlockedStatus,
    #[serde(default)]
    pub cancellation_reason: Option<String>,
    #[serde(default)]
    pub cancellation_at: Option<Ms>,
}
