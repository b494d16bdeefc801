//! Conflict resolution between busy time and stored availability

use chrono_tz::Tz;
use rallypoint_domain::{AvailabilityRecord, BusyInterval, ConflictResolution, DateRange};

/// Decides which availability records clash with busy time.
///
/// Pure decision logic; deleting the flagged records is left to the
/// [`AvailabilityStore`](crate::AvailabilityStore).
#[derive(Debug, Clone, Copy)]
pub struct ConflictResolver {
    timezone: Tz,
}

impl ConflictResolver {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    /// Split `records` into conflicting ids and untouched records.
    ///
    /// Only busy intervals starting on a day inside `range` (local calendar)
    /// are considered. A record conflicts when it strictly overlaps one of
    /// them; touching boundaries do not count.
    pub fn resolve(
        &self,
        merged: &[BusyInterval],
        records: Vec<AvailabilityRecord>,
        range: &DateRange,
    ) -> ConflictResolution {
        let relevant: Vec<&BusyInterval> = merged
            .iter()
            .filter(|busy| range.contains(busy.start.with_timezone(&self.timezone).date_naive()))
            .collect();

        let mut resolution = ConflictResolution::default();
        for record in records {
            if relevant.iter().any(|busy| busy.overlaps(record.start, record.end)) {
                resolution.removed.push(record.id);
            } else {
                resolution.keep.push(record);
            }
        }

        resolution
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};

    use super::*;

    fn utc(d: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, d, hour, minute, 0).unwrap()
    }

    fn record(id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> AvailabilityRecord {
        AvailabilityRecord {
            id: id.to_string(),
            owner_user: "user-1".to_string(),
            group_id: "group-1".to_string(),
            start,
            end,
        }
    }

    fn march(d: u32) -> DateRange {
        DateRange::day(NaiveDate::from_ymd_opt(2025, 3, d).unwrap())
    }

    #[test]
    fn overlapping_record_is_removed_once() {
        let resolver = ConflictResolver::new(Tz::UTC);
        let busy = vec![BusyInterval::new(utc(10, 10, 15), utc(10, 10, 45), "sync")];
        let records = vec![
            record("clash", utc(10, 10, 0), utc(10, 10, 30)),
            record("free", utc(10, 14, 0), utc(10, 15, 0)),
        ];

        let first = resolver.resolve(&busy, records, &march(10));
        assert_eq!(first.removed, vec!["clash".to_string()]);
        assert_eq!(first.keep.len(), 1);

        let second = resolver.resolve(&busy, first.keep.clone(), &march(10));
        assert!(second.removed.is_empty());
        assert_eq!(second.keep, first.keep);
    }

    #[test]
    fn touching_record_is_kept() {
        let resolver = ConflictResolver::new(Tz::UTC);
        let busy = vec![BusyInterval::new(utc(10, 10, 0), utc(10, 11, 0), "1:1")];
        let records = vec![
            record("before", utc(10, 9, 0), utc(10, 10, 0)),
            record("after", utc(10, 11, 0), utc(10, 12, 0)),
        ];

        let resolution = resolver.resolve(&busy, records, &march(10));

        assert!(resolution.removed.is_empty());
        assert_eq!(resolution.keep.len(), 2);
    }

    #[test]
    fn busy_time_outside_range_is_ignored() {
        let resolver = ConflictResolver::new(Tz::UTC);
        let busy = vec![BusyInterval::new(utc(11, 10, 0), utc(11, 11, 0), "tomorrow")];
        let records = vec![record("tomorrow-slot", utc(11, 10, 0), utc(11, 11, 0))];

        let resolution = resolver.resolve(&busy, records, &march(10));

        assert!(resolution.removed.is_empty());
    }

    #[test]
    fn range_membership_uses_local_calendar() {
        let resolver = ConflictResolver::new(Tz::America__Los_Angeles);
        // 02:00 UTC on the 11th is still the 10th in Los Angeles.
        let busy = vec![BusyInterval::new(utc(11, 2, 0), utc(11, 3, 0), "evening")];
        let records = vec![record("evening-slot", utc(11, 2, 30), utc(11, 4, 0))];

        let resolution = resolver.resolve(&busy, records, &march(10));

        assert_eq!(resolution.removed, vec!["evening-slot".to_string()]);
    }
}
