//! Free interval calculation
//!
//! Computes, for every day of a [`DateRange`], the complement of the busy set
//! against that day's working-hour window. All day boundaries are resolved in
//! the single timezone carried by [`WorkingHours`].

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use rallypoint_domain::{BusyInterval, DateRange, FreeInterval, WorkingHours};

use super::merger::merge;

/// Step used to walk forward out of a DST gap.
const GAP_STEP_MINUTES: i64 = 15;
/// Longest gap searched (covers every real-world transition).
const MAX_GAP_STEPS: usize = 12;

#[derive(Debug, Clone, Copy)]
pub struct FreeTimeCalculator {
    hours: WorkingHours,
}

impl FreeTimeCalculator {
    pub fn new(hours: WorkingHours) -> Self {
        Self { hours }
    }

    /// Calculator with the same window but a different minimum slot length.
    #[must_use]
    pub fn with_min_duration(&self, min_duration: Duration) -> Self {
        Self { hours: self.hours.with_min_duration(min_duration) }
    }

    pub fn hours(&self) -> &WorkingHours {
        &self.hours
    }

    /// Calendar day of `instant` in the configured timezone.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.hours.timezone).date_naive()
    }

    /// Absolute bounds of the working-hour window on `day`.
    ///
    /// `None` when the window cannot be placed on that day (both ends fall in
    /// a DST gap and collapse onto each other).
    pub fn day_window(&self, day: NaiveDate) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let start = self.resolve_local(day.and_time(self.hours.day_start))?;
        let end = self.resolve_local(day.and_time(self.hours.day_end))?;
        (start < end).then_some((start, end))
    }

    /// Provider query bounds covering every local day of `range`: local
    /// midnight of the first day up to local midnight after the last day.
    pub fn fetch_bounds(&self, range: &DateRange) -> (DateTime<Utc>, DateTime<Utc>) {
        let after_last = range.end().succ_opt().unwrap_or(range.end());
        (self.local_midnight(range.start()), self.local_midnight(after_last))
    }

    /// Free intervals for every day of `range`, in chronological order.
    ///
    /// A busy interval counts towards day `d` when its start falls on `d`
    /// (local calendar) and it overlaps that day's window.
    pub fn compute_free(&self, merged: &[BusyInterval], range: &DateRange) -> Vec<FreeInterval> {
        let mut free = Vec::new();

        for day in range.days() {
            let Some((window_start, window_end)) = self.day_window(day) else {
                tracing::debug!(%day, "working-hour window does not exist on this day, skipping");
                continue;
            };

            let todays: Vec<BusyInterval> = merged
                .iter()
                .filter(|busy| self.local_date(busy.start) == day)
                .filter(|busy| busy.overlaps(window_start, window_end))
                .cloned()
                .collect();

            let mut cursor = window_start;
            for busy in merge(&todays) {
                if busy.start > cursor {
                    self.push_if_long_enough(&mut free, cursor, busy.start);
                }
                cursor = cursor.max(busy.end);
            }
            if cursor < window_end {
                self.push_if_long_enough(&mut free, cursor, window_end);
            }
        }

        free
    }

    fn push_if_long_enough(
        &self,
        free: &mut Vec<FreeInterval>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) {
        if end - start >= self.hours.min_duration {
            free.push(FreeInterval { start, end });
        }
    }

    fn local_midnight(&self, day: NaiveDate) -> DateTime<Utc> {
        let midnight = day.and_time(NaiveTime::MIN);
        self.resolve_local(midnight).unwrap_or_else(|| midnight.and_utc())
    }

    /// Map a wall-clock time to an instant. Ambiguous times take the earlier
    /// offset; nonexistent times move forward to the first valid time.
    fn resolve_local(&self, local: NaiveDateTime) -> Option<DateTime<Utc>> {
        let tz = self.hours.timezone;
        let mut candidate = local;

        for _ in 0..=MAX_GAP_STEPS {
            match tz.from_local_datetime(&candidate) {
                LocalResult::Single(at) => return Some(at.with_timezone(&Utc)),
                LocalResult::Ambiguous(earliest, _) => return Some(earliest.with_timezone(&Utc)),
                LocalResult::None => candidate += Duration::minutes(GAP_STEP_MINUTES),
            }
        }

        None
    }
}
