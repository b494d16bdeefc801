//! Busy interval normalization
//!
//! Filters raw provider events down to busy time and converts them to
//! `(start, end)` instants. An event contributes iff it is timed (not
//! all-day), confirmed, and not marked transparent. Events that pass the
//! filter but cannot be parsed are reported, not dropped silently.

use chrono::{DateTime, Utc};
use rallypoint_domain::constants::{STATUS_CONFIRMED, TRANSPARENCY_TRANSPARENT, UNTITLED_EVENT};
use rallypoint_domain::{BusyInterval, EventParseFailure, EventTime, RawCalendarEvent};

/// Output of [`normalize`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedEvents {
    /// Busy intervals sorted ascending by start (then end).
    pub intervals: Vec<BusyInterval>,
    /// Events skipped because their boundaries could not be parsed.
    pub skipped: Vec<EventParseFailure>,
}

/// Convert raw events into sorted busy intervals.
pub fn normalize(events: &[RawCalendarEvent]) -> NormalizedEvents {
    let mut normalized = NormalizedEvents::default();

    for event in events {
        match to_busy_interval(event) {
            Ok(Some(interval)) => normalized.intervals.push(interval),
            Ok(None) => {}
            Err(failure) => normalized.skipped.push(failure),
        }
    }

    normalized.intervals.sort_by_key(|interval| (interval.start, interval.end));
    normalized
}

fn to_busy_interval(
    event: &RawCalendarEvent,
) -> Result<Option<BusyInterval>, EventParseFailure> {
    if event.status.as_deref() != Some(STATUS_CONFIRMED) {
        return Ok(None);
    }
    if event.transparency.as_deref() == Some(TRANSPARENCY_TRANSPARENT) {
        return Ok(None);
    }
    if event.start.is_all_day() || event.end.is_all_day() {
        return Ok(None);
    }

    let start = parse_instant(&event.id, "start", &event.start)?;
    let end = parse_instant(&event.id, "end", &event.end)?;

    if start >= end {
        return Err(EventParseFailure::new(
            event.id.clone(),
            "end",
            format!("end {end} is not after start {start}"),
        ));
    }

    let label = event
        .title
        .as_deref()
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .unwrap_or(UNTITLED_EVENT);

    Ok(Some(BusyInterval::new(start, end, label)))
}

/// Parse an RFC 3339 boundary. Bare local timestamps (no offset) are
/// rejected because they do not name an absolute instant.
fn parse_instant(
    event_id: &str,
    field: &'static str,
    value: &EventTime,
) -> Result<DateTime<Utc>, EventParseFailure> {
    let raw = value
        .date_time
        .as_deref()
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .ok_or_else(|| EventParseFailure::new(event_id, field, "missing dateTime"))?;

    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| EventParseFailure::new(event_id, field, format!("invalid timestamp '{raw}': {e}")))
}
