//! Status state machines for appointments and blocked time. Every legal
//! transition appends exactly one history entry; `Cancelled` and `Completed`
//! are terminal and further attempts fail with `EngineError::Terminal`
//! rather than silently succeeding.

use ulid::Ulid;

use crate::model::{
    Appointment, AppointmentStatus, BlockedStatus, BlockedTime, History, HistoryChange, Ms,
    Review, Span,
};

use super::EngineError;

impl Appointment {
    /// `∅ → Booked`.
    pub fn book(
        customer_id: Ulid,
        provider_id: Ulid,
        service_id: Ulid,
        span: Span,
        now: Ms,
    ) -> Self {
        let mut history = History::default();
        history.record(HistoryChange::Booked, now);
        Self {
            id: Ulid::new(),
            customer_id,
            provider_id,
            service_id,
            span,
            status: AppointmentStatus::Booked,
            history,
            cancellation_reason: None,
            cancellation_at: None,
            review: None,
        }
    }

    pub(super) fn ensure_booked(&self) -> Result<(), EngineError> {
        match self.status {
            AppointmentStatus::Booked => Ok(()),
            _ => Err(EngineError::Terminal(self.id)),
        }
    }

    /// `Booked → Booked`: the interval (and possibly customer, provider,
    /// service) is replaced and an `Edited` entry appended.
    pub fn reschedule(
        &mut self,
        customer_id: Ulid,
        provider_id: Ulid,
        service_id: Ulid,
        span: Span,
        now: Ms,
    ) -> Result<(), EngineError> {
        self.ensure_booked()?;
        self.customer_id = customer_id;
        self.provider_id = provider_id;
        self.service_id = service_id;
        self.span = span;
        self.history.record(HistoryChange::Edited, now);
        Ok(())
    }

    /// `Booked → Cancelled`. Terminal.
    pub fn cancel(&mut self, reason: String, now: Ms) -> Result<(), EngineError> {
        self.ensure_booked()?;
        self.status = AppointmentStatus::Cancelled;
        self.cancellation_reason = Some(reason);
        self.cancellation_at = Some(now);
        self.history.record(HistoryChange::Cancelled, now);
        Ok(())
    }

    /// `Booked → Completed`. Terminal.
    pub fn complete(&mut self, now: Ms) -> Result<(), EngineError> {
        self.ensure_booked()?;
        self.status = AppointmentStatus::Completed;
        self.history.record(HistoryChange::Completed, now);
        Ok(())
    }

    /// A review may be recorded once, only on a completed appointment.
    pub fn attach_review(&mut self, review: Review) -> Result<(), EngineError> {
        if self.status != AppointmentStatus::Completed {
            return Err(EngineError::Validation {
                field: "status",
                message: "review requires a completed appointment".into(),
            });
        }
        if self.review.is_some() {
            return Err(EngineError::Validation {
                field: "review",
                message: "review already recorded".into(),
            });
        }
        self.review = Some(review);
        Ok(())
    }
}

impl BlockedTime {
    /// `∅ → Active`. The interval is validated here so every constructed
    /// record satisfies `end > start`.
    pub fn create(
        provider_id: Ulid,
        start: Ms,
        end: Ms,
        reason: Option<String>,
    ) -> Result<Self, EngineError> {
        if end <= start {
            return Err(EngineError::Validation {
                field: "endTime",
                message: "end must be after start".into(),
            });
        }
        Ok(Self {
            id: Ulid::new(),
            provider_id,
            span: Span::new(start, end),
            reason,
            status: BlockedStatus::Active,
            cancellation_reason: None,
            cancellation_at: None,
        })
    }

    /// `Active → Cancelled`. Terminal.
    pub fn cancel(&mut self, reason: String, now: Ms) -> Result<(), EngineError> {
        match self.status {
            BlockedStatus::Active => {
                self.status = BlockedStatus::Cancelled;
                self.cancellation_reason = Some(reason);
                self.cancellation_at = Some(now);
                Ok(())
            }
            BlockedStatus::Cancelled => Err(EngineError::Terminal(self.id)),
        }
    }
}
