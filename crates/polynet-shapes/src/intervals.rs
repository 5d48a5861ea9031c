//! Ratio intervals along a segment.

/// `[start, end]` ratios along a segment, `0` at its start and `1` at its end.
pub type Interval = [f64; 2];

const EPSILON: f64 = 1e-9;

pub fn interval_length(interval: &Interval) -> f64 {
    interval[1] - interval[0]
}

/// Sort by start and merge overlapping or touching intervals.
pub fn normalize_intervals(intervals: &[Interval]) -> Vec<Interval> {
    let mut sorted: Vec<Interval> = intervals
        .iter()
        .copied()
        .filter(|i| interval_length(i) > EPSILON)
        .collect();
    sorted.sort_by(|a, b| a[0].total_cmp(&b[0]));

    let mut merged: Vec<Interval> = Vec::with_capacity(sorted.len());
    for interval in sorted {
        match merged.last_mut() {
            Some(last) if interval[0] <= last[1] + EPSILON => last[1] = last[1].max(interval[1]),
            _ => merged.push(interval),
        }
    }
    merged
}

/// Remove every part of `from` covered by `remove`.
pub fn subtract_intervals(from: &[Interval], remove: &[Interval]) -> Vec<Interval> {
    let remove = normalize_intervals(remove);
    let mut out = Vec::new();

    for interval in from {
        let mut cursor = interval[0];
        for cut in &remove {
            if cut[1] <= cursor {
                continue;
            }
            if cut[0] >= interval[1] {
                break;
            }
            if cut[0] > cursor {
                out.push([cursor, cut[0]]);
            }
            cursor = cursor.max(cut[1]);
            if cursor >= interval[1] {
                break;
            }
        }
        if cursor < interval[1] {
            out.push([cursor, interval[1]]);
        }
    }

    out.retain(|i| interval_length(i) > EPSILON);
    out
}

/// Gaps between `intervals` within `[0, 1]`, including the leading and
/// trailing gaps.
pub fn complement_intervals(intervals: &[Interval]) -> Vec<Interval> {
    subtract_intervals(&[[0.0, 1.0]], intervals)
}
