//! Interval merging
//!
//! Collapses overlapping or touching busy intervals into a minimal sorted,
//! pairwise non-overlapping set. Labels of merged intervals are joined in
//! start order.

use rallypoint_domain::BusyInterval;

const LABEL_SEPARATOR: &str = ", ";

/// Merge busy intervals.
///
/// Input is expected sorted by start; it is re-sorted (stable) so callers
/// holding an arbitrary subset get the same result. Touching intervals
/// (`next.start == current.end`) merge. Merging an already merged set returns
/// it unchanged.
pub fn merge(intervals: &[BusyInterval]) -> Vec<BusyInterval> {
    let mut sorted = intervals.to_vec();
    sorted.sort_by_key(|interval| (interval.start, interval.end));

    let mut iter = sorted.into_iter();
    let Some(mut current) = iter.next() else {
        return Vec::new();
    };

    let mut merged = Vec::new();
    for next in iter {
        if next.start <= current.end {
            current.end = current.end.max(next.end);
            current.label = join_labels(&current.label, &next.label);
        } else {
            merged.push(std::mem::replace(&mut current, next));
        }
    }
    merged.push(current);

    merged
}

fn join_labels(left: &str, right: &str) -> String {
    if left.is_empty() {
        return right.to_string();
    }
    if right.is_empty() {
        return left.to_string();
    }
    format!("{left}{LABEL_SEPARATOR}{right}")
}
