use std::time::Instant;

use chrono::NaiveDate;
use serde::Serialize;
use ulid::Ulid;

use crate::calendar::{self, MINUTE_MS};
use crate::model::{AppointmentStatus, Ms};
use crate::observability;

use super::conflict::{slot_hits_appointment, slot_hits_block};
use super::hours::{self, ClosedReason, ResolvedHours};
use super::slots::{in_break, SlotIter};
use super::{Engine, EngineError};

/// A bookable start instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub start: Ms,
}

impl Slot {
    /// Presentation form, local clock time.
    pub fn clock(&self) -> String {
        calendar::clock_label(self.start)
    }
}

/// Which tier supplied the effective hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HoursSource {
    Provider,
    Company,
}

/// The answer to "what can be booked on this day". A closed day is a
/// successful answer with an empty slot list and a reason, never an error.
#[derive(Debug, Clone, Serialize)]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub source: Option<HoursSource>,
    pub closed: Option<ClosedReason>,
    pub slots: Vec<Slot>,
}

impl DayAvailability {
    fn closed(date: NaiveDate, reason: ClosedReason) -> Self {
        Self {
            date,
            source: None,
            closed: Some(reason),
            slots: Vec::new(),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.is_some()
    }

    /// The external `{slots: ["HH:mm", ...]}` shape.
    pub fn clock_times(&self) -> Vec<String> {
        self.slots.iter().map(Slot::clock).collect()
    }
}

impl Engine {
    /// Compute the bookable slots for a provider/service/date.
    ///
    /// Candidates are generated over the resolved window, stepped by
    /// service duration + buffer (a day-level `bufferTime` on the matched
    /// hours entry overrides the service buffer), then filtered against
    /// breaks, active appointments and active blocked time per the
    /// configured `SlotFilter`.
    pub async fn available_slots(
        &self,
        provider_id: Ulid,
        service_id: Ulid,
        date: NaiveDate,
    ) -> Result<DayAvailability, EngineError> {
        let started = Instant::now();

        let provider = self.require_provider(provider_id).await?;
        let service = self.require_service(service_id).await?;
        let company = self.require_company(provider.company_id).await?;

        let (source, schedule) = match hours::resolve(&provider, &company, date)? {
            ResolvedHours::Closed(reason) => {
                metrics::counter!(observability::AVAILABILITY_QUERIES_TOTAL).increment(1);
                return Ok(DayAvailability::closed(date, reason));
            }
            ResolvedHours::Provider(s) => (HoursSource::Provider, s),
            ResolvedHours::Company(s) => (HoursSource::Company, s),
        };

        let buffer = schedule.buffer_time.unwrap_or(service.buffer_duration);
        let step = Ms::from(service.duration + buffer) * MINUTE_MS;
        let duration = Ms::from(service.duration) * MINUTE_MS;

        let window = calendar::day_window(date);
        let appointments = self
            .ledger
            .appointments_in_range(provider_id, window, AppointmentStatus::ACTIVE)
            .await?;
        let blocked = self
            .ledger
            .blocked_times_in_range(provider_id, window)
            .await?;

        let filter = self.config.slot_filter;
        let slots: Vec<Slot> = SlotIter::new(schedule.window, step)
            .filter(|&c| !in_break(c, duration, &schedule.breaks, filter))
            .filter(|&c| {
                !appointments
                    .iter()
                    .any(|a| slot_hits_appointment(c, duration, &a.span, filter))
            })
            .filter(|&c| {
                !blocked
                    .iter()
                    .any(|b| slot_hits_block(c, duration, &b.span, filter))
            })
            .map(|start| Slot { start })
            .collect();

        metrics::counter!(observability::AVAILABILITY_QUERIES_TOTAL).increment(1);
        metrics::histogram!(observability::AVAILABILITY_DURATION_SECONDS)
            .record(started.elapsed().as_secs_f64());

        Ok(DayAvailability {
            date,
            source: Some(source),
            closed: None,
            slots,
        })
    }
}
