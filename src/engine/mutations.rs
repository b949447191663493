use chrono::NaiveDate;
use ulid::Ulid;

use crate::calendar::{self, MINUTE_MS};
use crate::limits::MAX_REASON_LEN;
use crate::model::{Appointment, AppointmentStatus, BlockedTime, Ms, Review, Service, Span};
use crate::observability;

use super::conflict::{check_write_gate, now_ms, validate_span};
use super::{Engine, EngineError};

fn require_reason(reason: &str) -> Result<String, EngineError> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(EngineError::Validation {
            field: "reason",
            message: "a human-readable reason is required".into(),
        });
    }
    if reason.len() > MAX_REASON_LEN {
        return Err(EngineError::LimitExceeded("reason too long"));
    }
    Ok(reason.to_string())
}

/// `[start, start + duration)` for a service booked at date + clock time.
fn service_span(date: NaiveDate, time: &str, service: &Service) -> Result<Span, EngineError> {
    let start = calendar::at_clock(date, calendar::parse_clock(time)?);
    let span = Span::new(start, start + Ms::from(service.duration) * MINUTE_MS);
    validate_span(&span)?;
    Ok(span)
}

impl Engine {
    /// Fetch the provider's active timeline for `[span)` and run the write
    /// gate. Caller must hold the provider's lock.
    async fn gate(
        &self,
        provider_id: Ulid,
        span: &Span,
        exclude: Option<Ulid>,
        against_blocked: bool,
    ) -> Result<(), EngineError> {
        let mut appointments = self
            .ledger
            .appointments_in_range(provider_id, *span, AppointmentStatus::ACTIVE)
            .await?;
        if let Some(id) = exclude {
            appointments.retain(|a| a.id != id);
        }
        let blocked = if against_blocked {
            self.ledger
                .blocked_times_in_range(provider_id, *span)
                .await?
        } else {
            Vec::new()
        };
        check_write_gate(span, &appointments, &blocked, self.config.block_gate).inspect_err(
            |e| {
                if matches!(e, EngineError::Conflict(_)) {
                    metrics::counter!(observability::BOOKING_CONFLICTS_TOTAL).increment(1);
                }
            },
        )
    }

    /// `POST book`: conflict-gate the requested interval, then `∅ → Booked`.
    pub async fn book(
        &self,
        customer_id: Ulid,
        provider_id: Ulid,
        service_id: Ulid,
        date: NaiveDate,
        time: &str,
    ) -> Result<Appointment, EngineError> {
        let service = self.require_service(service_id).await?;
        self.require_provider(provider_id).await?;
        let span = service_span(date, time, &service)?;

        let lock = self.provider_lock(provider_id);
        let _guard = lock.lock().await;

        self.gate(provider_id, &span, None, true).await?;
        let appointment = Appointment::book(customer_id, provider_id, service_id, span, now_ms());
        self.ledger.insert_appointment(&appointment).await?;

        metrics::counter!(observability::BOOKINGS_TOTAL).increment(1);
        tracing::debug!(appointment = %appointment.id, provider = %provider_id, "booked");
        Ok(appointment)
    }

    /// `PUT editAppointment`: recompute the interval from the new
    /// date/time/service and replace it under the gate. The appointment's
    /// own interval is excluded from the conflict check.
    pub async fn edit_appointment(
        &self,
        appointment_id: Ulid,
        customer_id: Ulid,
        provider_id: Ulid,
        service_id: Ulid,
        date: NaiveDate,
        time: &str,
    ) -> Result<Appointment, EngineError> {
        let mut appointment = self.require_appointment(appointment_id).await?;
        appointment.ensure_booked()?;
        let service = self.require_service(service_id).await?;
        self.require_provider(provider_id).await?;
        let span = service_span(date, time, &service)?;

        // The edit may move the appointment to another provider; lock both
        // in sorted id order so concurrent edits cannot deadlock.
        let mut provider_ids = vec![appointment.provider_id, provider_id];
        provider_ids.sort();
        provider_ids.dedup();
        let mut guards = Vec::with_capacity(provider_ids.len());
        for id in &provider_ids {
            guards.push(self.provider_lock(*id).lock_owned().await);
        }

        self.gate(provider_id, &span, Some(appointment_id), true)
            .await?;
        appointment.reschedule(customer_id, provider_id, service_id, span, now_ms())?;
        self.ledger.update_appointment(&appointment).await?;

        tracing::debug!(appointment = %appointment.id, "edited");
        Ok(appointment)
    }

    /// `PUT cancelAppointment`: `Booked → Cancelled`, reason required.
    pub async fn cancel_appointment(
        &self,
        appointment_id: Ulid,
        reason: &str,
    ) -> Result<Appointment, EngineError> {
        let reason = require_reason(reason)?;
        let mut appointment = self.require_appointment(appointment_id).await?;

        let lock = self.provider_lock(appointment.provider_id);
        let _guard = lock.lock().await;

        appointment.cancel(reason, now_ms())?;
        self.ledger.update_appointment(&appointment).await?;

        metrics::counter!(observability::CANCELLATIONS_TOTAL).increment(1);
        tracing::debug!(appointment = %appointment.id, "cancelled");
        Ok(appointment)
    }

    /// `Booked → Completed`.
    pub async fn complete_appointment(
        &self,
        appointment_id: Ulid,
    ) -> Result<Appointment, EngineError> {
        let mut appointment = self.require_appointment(appointment_id).await?;
        appointment.complete(now_ms())?;
        self.ledger.update_appointment(&appointment).await?;
        Ok(appointment)
    }

    /// Record a customer review on a completed appointment.
    pub async fn record_review(
        &self,
        appointment_id: Ulid,
        review: Review,
    ) -> Result<Appointment, EngineError> {
        if !(1..=5).contains(&review.rating) {
            return Err(EngineError::Validation {
                field: "rating",
                message: "rating must be between 1 and 5".into(),
            });
        }
        let mut appointment = self.require_appointment(appointment_id).await?;
        appointment.attach_review(review)?;
        self.ledger.update_appointment(&appointment).await?;
        Ok(appointment)
    }

    /// `POST blockTime`: `∅ → Active`. The block is gated against active
    /// appointments (never against other blocks — overlapping personal
    /// blocks are harmless).
    pub async fn block_time(
        &self,
        provider_id: Ulid,
        start: Ms,
        end: Ms,
        reason: Option<&str>,
    ) -> Result<BlockedTime, EngineError> {
        self.require_provider(provider_id).await?;
        let reason = reason.map(require_reason).transpose()?;
        let blocked = BlockedTime::create(provider_id, start, end, reason)?;
        validate_span(&blocked.span)?;

        let lock = self.provider_lock(provider_id);
        let _guard = lock.lock().await;

        self.gate(provider_id, &blocked.span, None, false).await?;
        self.ledger.insert_blocked_time(&blocked).await?;

        metrics::counter!(observability::BLOCKS_TOTAL).increment(1);
        tracing::debug!(blocked_time = %blocked.id, provider = %provider_id, "time blocked");
        Ok(blocked)
    }

    /// `PUT cancelBlockedTime`: `Active → Cancelled`, reason required.
    pub async fn cancel_blocked_time(
        &self,
        blocked_time_id: Ulid,
        reason: &str,
    ) -> Result<BlockedTime, EngineError> {
        let reason = require_reason(reason)?;
        let mut blocked = self.require_blocked_time(blocked_time_id).await?;

        let lock = self.provider_lock(blocked.provider_id);
        let _guard = lock.lock().await;

        blocked.cancel(reason, now_ms())?;
        self.ledger.update_blocked_time(&blocked).await?;

        tracing::debug!(blocked_time = %blocked.id, "blocked time cancelled");
        Ok(blocked)
    }

    /// Administrative hard delete of a blocked-time record.
    pub async fn delete_blocked_time(&self, blocked_time_id: Ulid) -> Result<(), EngineError> {
        if !self.ledger.delete_blocked_time(blocked_time_id).await? {
            return Err(EngineError::BlockedTimeNotFound(blocked_time_id));
        }
        tracing::debug!(blocked_time = %blocked_time_id, "blocked time deleted");
        Ok(())
    }
}
