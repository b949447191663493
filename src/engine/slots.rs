use crate::model::{Ms, Span};

// ── Slot generation ──────────────────────────────────────────────

/// How a candidate slot is tested against a break or timeline occupant.
///
/// `StartOnly` reproduces the historical behavior: only the slot's start
/// instant is examined, so a slot whose body overlaps a break (or booking)
/// but whose start precedes it is still offered. `FullInterval` tests the
/// whole `[start, start + duration)` body. Changing the default changes
/// observable availability; both stay selectable via `EngineConfig`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotFilter {
    #[default]
    StartOnly,
    FullInterval,
}

/// Lazy, finite, restartable sequence of candidate slot starts.
///
/// Emits `window.start`, then advances by `step` while the candidate is
/// `< window.end` — slot-start positions only. The final slot may run past
/// the close time; that is intentional and covered by tests.
#[derive(Debug, Clone)]
pub struct SlotIter {
    next: Ms,
    end: Ms,
    step: Ms,
}

impl SlotIter {
    pub fn new(window: Span, step: Ms) -> Self {
        debug_assert!(step > 0, "slot step must be positive");
        Self {
            next: window.start,
            end: window.end,
            step,
        }
    }
}

impl Iterator for SlotIter {
    type Item = Ms;

    fn next(&mut self) -> Option<Ms> {
        if self.next >= self.end {
            return None;
        }
        let candidate = self.next;
        self.next += self.step;
        Some(candidate)
    }
}

/// True when `candidate` is knocked out by one of the day's breaks.
pub fn in_break(candidate: Ms, duration: Ms, breaks: &[Span], filter: SlotFilter) -> bool {
    breaks.iter().any(|b| match filter {
        SlotFilter::StartOnly => b.contains_instant(candidate),
        SlotFilter::FullInterval => b.overlaps(&Span::new(candidate, candidate + duration)),
    })
}
