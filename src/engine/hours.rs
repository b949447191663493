use chrono::NaiveDate;
use serde::Serialize;

use crate::calendar;
use crate::limits::{MAX_BREAKS_PER_DAY, MAX_HOURS_ENTRIES};
use crate::model::{Company, Provider, Span, WeekdayHours};

use super::EngineError;

/// Why a day resolved to no bookable hours. All of these are successful
/// outcomes of a lookup, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ClosedReason {
    /// Neither the provider nor the owning company configures any hours.
    NoWorkingHours,
    /// Hours exist, but not for this weekday (or the day is switched off).
    NoHoursForDay,
    Holiday {
        description: String,
    },
}

impl ClosedReason {
    pub fn code(&self) -> &'static str {
        match self {
            ClosedReason::NoWorkingHours => "NO_WORKING_HOURS",
            ClosedReason::NoHoursForDay => "NO_WORKING_HOURS_FOR_DAY",
            ClosedReason::Holiday { .. } => "HOLIDAY",
        }
    }
}

/// The effective open window for one provider on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySchedule {
    pub window: Span,
    /// Clamped to the window, sorted by start.
    pub breaks: Vec<Span>,
    /// Day-level buffer override in minutes, if configured.
    pub buffer_time: Option<u32>,
}

/// Tagged resolution result: callers can tell which tier supplied the hours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedHours {
    Provider(DaySchedule),
    Company(DaySchedule),
    Closed(ClosedReason),
}

/// Two-tier schedule lookup: the provider's own hours win outright when any
/// are configured; otherwise the owning company's schedule applies. Company
/// holidays close the day regardless of which tier supplied the hours.
pub fn resolve(
    provider: &Provider,
    company: &Company,
    date: NaiveDate,
) -> Result<ResolvedHours, EngineError> {
    if let Some(holiday) = company.holidays.iter().find(|h| h.date == date) {
        return Ok(ResolvedHours::Closed(ClosedReason::Holiday {
            description: holiday.description.clone(),
        }));
    }

    if !provider.working_hours.is_empty() {
        if provider.working_hours.len() > MAX_HOURS_ENTRIES {
            return Err(EngineError::LimitExceeded("too many working-hours entries"));
        }
        // Provider entries carry no day-on switch: present means open.
        return match provider
            .working_hours
            .iter()
            .find(|e| calendar::matches_weekday(&e.day, date))
        {
            Some(entry) => Ok(ResolvedHours::Provider(build_schedule(entry, date)?)),
            None => Ok(ResolvedHours::Closed(ClosedReason::NoHoursForDay)),
        };
    }

    if !company.working_hours.is_empty() {
        if company.working_hours.len() > MAX_HOURS_ENTRIES {
            return Err(EngineError::LimitExceeded("too many working-hours entries"));
        }
        return match company
            .working_hours
            .iter()
            .find(|e| calendar::matches_weekday(&e.hours.day, date))
        {
            Some(entry) if entry.is_day_on => {
                Ok(ResolvedHours::Company(build_schedule(&entry.hours, date)?))
            }
            _ => Ok(ResolvedHours::Closed(ClosedReason::NoHoursForDay)),
        };
    }

    Ok(ResolvedHours::Closed(ClosedReason::NoWorkingHours))
}

/// Anchor one weekday entry to the calendar date. Breaks are clamped to the
/// window; inverted or fully outside breaks are dropped.
fn build_schedule(entry: &WeekdayHours, date: NaiveDate) -> Result<DaySchedule, EngineError> {
    let start = calendar::at_clock(date, calendar::parse_clock(&entry.start)?);
    let end = calendar::at_clock(date, calendar::parse_clock(&entry.end)?);
    if end <= start {
        return Err(EngineError::InvalidTime(format!(
            "{}-{} is not an open window",
            entry.start, entry.end
        )));
    }
    if entry.breaks.len() > MAX_BREAKS_PER_DAY {
        return Err(EngineError::LimitExceeded("too many breaks on one day"));
    }
    let window = Span::new(start, end);

    let mut breaks = Vec::with_capacity(entry.breaks.len());
    for b in &entry.breaks {
        let bs = calendar::at_clock(date, calendar::parse_clock(&b.start)?);
        let be = calendar::at_clock(date, calendar::parse_clock(&b.end)?);
        let clamped_start = bs.max(window.start);
        let clamped_end = be.min(window.end);
        if clamped_start < clamped_end {
            breaks.push(Span::new(clamped_start, clamped_end));
        }
    }
    breaks.sort_by_key(|s| s.start);

    Ok(DaySchedule {
        window,
        breaks,
        buffer_time: entry.buffer_time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::MINUTE_MS;
    use crate::model::{BreakSpec, CompanyDayHours, Holiday};
    use ulid::Ulid;

    fn entry(day: &str, start: &str, end: &str, breaks: &[(&str, &str)]) -> WeekdayHours {
        WeekdayHours {
            day: day.into(),
            start: start.into(),
            end: end.into(),
            breaks: breaks
                .iter()
                .map(|(s, e)| BreakSpec {
                    start: (*s).into(),
                    end: (*e).into(),
                })
                .collect(),
            buffer_time: None,
        }
    }

    fn provider(hours: Vec<WeekdayHours>) -> Provider {
        Provider {
            id: Ulid::new(),
            company_id: Ulid::new(),
            name: None,
            working_hours: hours,
        }
    }

    fn company(hours: Vec<CompanyDayHours>) -> Company {
        Company {
            id: Ulid::new(),
            name: None,
            working_hours: hours,
            holidays: Vec::new(),
        }
    }

    fn monday() -> NaiveDate {
        calendar::parse_date("2024-10-14").unwrap()
    }

    #[test]
    fn provider_hours_win_over_company() {
        let p = provider(vec![entry("Monday", "10:00", "14:00", &[])]);
        let c = company(vec![CompanyDayHours {
            hours: entry("Monday", "08:00", "18:00", &[]),
            is_day_on: true,
        }]);
        match resolve(&p, &c, monday()).unwrap() {
            ResolvedHours::Provider(s) => assert_eq!(s.window.duration_ms(), 240 * MINUTE_MS),
            other => panic!("expected provider hours, got {other:?}"),
        }
    }

    #[test]
    fn company_fallback_when_provider_empty() {
        let p = provider(vec![]);
        let c = company(vec![CompanyDayHours {
            hours: entry("monday", "08:00", "18:00", &[]),
            is_day_on: true,
        }]);
        assert!(matches!(
            resolve(&p, &c, monday()).unwrap(),
            ResolvedHours::Company(_)
        ));
    }

    #[test]
    fn neither_tier_configured() {
        let resolved = resolve(&provider(vec![]), &company(vec![]), monday()).unwrap();
        assert_eq!(
            resolved,
            ResolvedHours::Closed(ClosedReason::NoWorkingHours)
        );
    }

    #[test]
    fn wrong_weekday_closes() {
        let p = provider(vec![entry("Tuesday", "09:00", "17:00", &[])]);
        let resolved = resolve(&p, &company(vec![]), monday()).unwrap();
        assert_eq!(resolved, ResolvedHours::Closed(ClosedReason::NoHoursForDay));
    }

    #[test]
    fn day_switched_off_closes() {
        let c = company(vec![CompanyDayHours {
            hours: entry("Monday", "09:00", "17:00", &[]),
            is_day_on: false,
        }]);
        let resolved = resolve(&provider(vec![]), &c, monday()).unwrap();
        assert_eq!(resolved, ResolvedHours::Closed(ClosedReason::NoHoursForDay));
    }

    #[test]
    fn holiday_closes_even_with_provider_hours() {
        let p = provider(vec![entry("Monday", "09:00", "17:00", &[])]);
        let mut c = company(vec![]);
        c.holidays.push(Holiday {
            date: monday(),
            description: "Maintenance day".into(),
            category: None,
        });
        match resolve(&p, &c, monday()).unwrap() {
            ResolvedHours::Closed(ClosedReason::Holiday { description }) => {
                assert_eq!(description, "Maintenance day");
            }
            other => panic!("expected holiday, got {other:?}"),
        }
    }

    #[test]
    fn malformed_clock_time_is_invalid_time() {
        let p = provider(vec![entry("Monday", "9 o'clock", "17:00", &[])]);
        assert!(matches!(
            resolve(&p, &company(vec![]), monday()),
            Err(EngineError::InvalidTime(_))
        ));
    }

    #[test]
    fn inverted_window_is_invalid_time() {
        let p = provider(vec![entry("Monday", "17:00", "09:00", &[])]);
        assert!(matches!(
            resolve(&p, &company(vec![]), monday()),
            Err(EngineError::InvalidTime(_))
        ));
    }

    #[test]
    fn breaks_clamped_and_sorted() {
        let p = provider(vec![entry(
            "Monday",
            "09:00",
            "17:00",
            &[("16:30", "18:00"), ("08:00", "09:30"), ("20:00", "21:00")],
        )]);
        let resolved = resolve(&p, &company(vec![]), monday()).unwrap();
        let ResolvedHours::Provider(s) = resolved else {
            panic!("expected provider hours");
        };
        // Out-of-window break dropped, the rest clamped and ordered.
        assert_eq!(s.breaks.len(), 2);
        assert_eq!(s.breaks[0].end - s.breaks[0].start, 30 * MINUTE_MS);
        assert!(s.breaks[0].start < s.breaks[1].start);
        assert_eq!(s.breaks[1].end, s.window.end);
    }
}
