//! Dashed score lines.
//!
//! A dash pattern is tiled along a segment as ratio intervals, offset,
//! then centered so neither end of the segment gets a clipped half dash.

use polynet_core::Point;
use polynet_path::PathData;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;
use tracing::debug;

use crate::error::{ShapeError, ShapeResult};
use crate::intervals::{interval_length, Interval};

const EPSILON: f64 = 1e-9;

/// Most pattern repetitions tiled along one segment.
pub const MAX_DASH_REPETITIONS: usize = 10_000;

/// Dash parameters for one stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashPatternSpec {
    /// Alternating stroke and gap lengths, relative to each other.
    pub relative_stroke_dasharray: Vec<f64>,
    /// Absolute length of one full repetition of the dasharray.
    pub stroke_dash_length: f64,
    /// Shift of the pattern, as a ratio of the whole segment.
    #[serde(default)]
    pub stroke_dash_offset_ratio: f64,
}

impl Default for DashPatternSpec {
    fn default() -> Self {
        Self {
            relative_stroke_dasharray: vec![2.0, 1.0],
            stroke_dash_length: 11.0,
            stroke_dash_offset_ratio: 0.0,
        }
    }
}

impl DashPatternSpec {
    pub fn from_pattern(pattern: &DashPattern, stroke_dash_length: f64, offset_ratio: f64) -> Self {
        Self {
            relative_stroke_dasharray: pattern.relative_stroke_dasharray.to_vec(),
            stroke_dash_length,
            stroke_dash_offset_ratio: offset_ratio,
        }
    }

    /// A spec that draws the whole segment as one stroke.
    pub fn solid() -> Self {
        Self {
            relative_stroke_dasharray: Vec::new(),
            stroke_dash_length: 0.0,
            stroke_dash_offset_ratio: 0.0,
        }
    }
}

/// Named built-in dash pattern.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashPattern {
    pub id: &'static str,
    pub label: &'static str,
    pub relative_stroke_dasharray: &'static [f64],
}

/// Built-in dash patterns, checked once by [`validate_dash_patterns`].
pub const DASH_PATTERNS: &[DashPattern] = &[
    DashPattern {
        id: "base",
        label: "Even dash",
        relative_stroke_dasharray: &[1.0, 1.0],
    },
    DashPattern {
        id: "long",
        label: "Long dash",
        relative_stroke_dasharray: &[2.0, 1.0],
    },
    DashPattern {
        id: "dotted",
        label: "Dotted",
        relative_stroke_dasharray: &[1.0, 3.0],
    },
    DashPattern {
        id: "dash-dot",
        label: "Dash dot",
        relative_stroke_dasharray: &[3.0, 1.0, 1.0, 1.0],
    },
    DashPattern {
        id: "perforation",
        label: "Perforation",
        relative_stroke_dasharray: &[1.0, 2.0, 1.0, 3.0],
    },
];

/// Check a pattern catalog: non-empty arrays of finite non-negative lengths
/// with a positive stroke, unique ids and unique arrays.
pub fn check_dash_patterns(patterns: &[DashPattern]) -> ShapeResult<()> {
    let mut ids = HashSet::new();
    let mut arrays = HashSet::new();

    for pattern in patterns {
        let array = pattern.relative_stroke_dasharray;
        if array.is_empty() {
            return Err(ShapeError::InvalidParameters(format!(
                "dash pattern '{}' has an empty dasharray",
                pattern.id
            )));
        }
        if array.iter().any(|len| !len.is_finite() || *len < 0.0) {
            return Err(ShapeError::InvalidParameters(format!(
                "dash pattern '{}' has a negative or non-finite length",
                pattern.id
            )));
        }
        if array.iter().step_by(2).sum::<f64>() <= 0.0 {
            return Err(ShapeError::InvalidParameters(format!(
                "dash pattern '{}' never strokes",
                pattern.id
            )));
        }
        if !ids.insert(pattern.id) {
            return Err(ShapeError::InvalidParameters(format!(
                "duplicate dash pattern id '{}'",
                pattern.id
            )));
        }
        let key: Vec<u64> = array.iter().map(|len| len.to_bits()).collect();
        if !arrays.insert(key) {
            return Err(ShapeError::InvalidParameters(format!(
                "dash pattern '{}' repeats another pattern's dasharray",
                pattern.id
            )));
        }
    }
    Ok(())
}

/// Validate [`DASH_PATTERNS`]. The check runs once per process.
pub fn validate_dash_patterns() -> ShapeResult<()> {
    static CHECKED: OnceLock<ShapeResult<()>> = OnceLock::new();
    CHECKED.get_or_init(|| check_dash_patterns(DASH_PATTERNS)).clone()
}

/// Look up a built-in pattern by id.
pub fn dash_pattern(id: &str) -> ShapeResult<&'static DashPattern> {
    validate_dash_patterns()?;
    DASH_PATTERNS
        .iter()
        .find(|pattern| pattern.id == id)
        .ok_or_else(|| ShapeError::InvalidParameters(format!("unknown dash pattern '{}'", id)))
}

/// Stroke intervals of one dasharray repetition, normalized to `[0, 1]`.
fn pattern_stroke_intervals(dasharray: &[f64]) -> Vec<Interval> {
    let total: f64 = dasharray.iter().sum();
    let mut position = 0.0;
    let mut strokes = Vec::with_capacity(dasharray.len().div_ceil(2));
    for (index, length) in dasharray.iter().enumerate() {
        if index % 2 == 0 {
            strokes.push([position / total, (position + length) / total]);
        }
        position += length;
    }
    strokes
}

/// Ratio intervals of the dashes drawn between `start` and `end`.
///
/// A missing pattern, a zero-length segment or a non-positive dash length
/// give the single interval `[0, 1]`. Dashes that straddle an end of the
/// segment after the offset is applied are dropped, not split. Fails when
/// the pattern would repeat more than [`MAX_DASH_REPETITIONS`] times.
pub fn stroke_dash_path_ratios(
    start: Point,
    end: Point,
    spec: &DashPatternSpec,
) -> ShapeResult<Vec<Interval>> {
    let length = start.distance_to(&end);
    let total: f64 = spec.relative_stroke_dasharray.iter().sum();
    if spec.relative_stroke_dasharray.is_empty()
        || !total.is_finite()
        || total <= 0.0
        || length <= EPSILON
        || !spec.stroke_dash_length.is_finite()
        || spec.stroke_dash_length <= 0.0
    {
        return Ok(vec![[0.0, 1.0]]);
    }

    let repetitions = (length / spec.stroke_dash_length).ceil().max(1.0);
    if repetitions > MAX_DASH_REPETITIONS as f64 {
        return Err(ShapeError::InvalidParameters(format!(
            "dash length {} repeats {} times along a {:.3} long segment, at most {} allowed",
            spec.stroke_dash_length, repetitions, length, MAX_DASH_REPETITIONS
        )));
    }
    let repetitions = repetitions as usize;
    let repetition_ratio = spec.stroke_dash_length / length;
    let strokes = pattern_stroke_intervals(&spec.relative_stroke_dasharray);

    let mut intervals: Vec<Interval> = (0..repetitions)
        .flat_map(|rep| {
            strokes.iter().map(move |[a, b]| {
                [
                    (rep as f64 + a) * repetition_ratio,
                    (rep as f64 + b) * repetition_ratio,
                ]
            })
        })
        .filter(|interval| interval[0] <= 1.0)
        .map(|[a, b]| {
            let shifted = [a + spec.stroke_dash_offset_ratio, b + spec.stroke_dash_offset_ratio];
            // Wrap only intervals that left the segment entirely.
            if shifted[0] >= 1.0 || shifted[1] <= 0.0 {
                let wrap = shifted[0].floor();
                [shifted[0] - wrap, shifted[1] - wrap]
            } else {
                shifted
            }
        })
        .filter(|interval| interval[0] >= -EPSILON && interval[1] <= 1.0 + EPSILON)
        .filter(|interval| interval_length(interval) > EPSILON)
        .collect();

    intervals.sort_by(|a, b| a[0].total_cmp(&b[0]));

    if let Some(last_end) = intervals.iter().map(|i| i[1]).reduce(f64::max) {
        let shift = (1.0 - last_end) / 2.0;
        for interval in &mut intervals {
            interval[0] += shift;
            interval[1] += shift;
        }
    }
    Ok(intervals)
}

/// One move and line per interval, interpolated between `start` and `end`.
pub fn intervals_path(start: Point, end: Point, intervals: &[Interval]) -> ShapeResult<PathData> {
    intervals.iter().try_fold(PathData::new(), |path, [a, b]| {
        Ok(path
            .move_to(start.lerp(&end, *a))
            .line_to(start.lerp(&end, *b))?)
    })
}

/// Dashed stroke from `start` to `end`.
pub fn stroke_dash_path(start: Point, end: Point, spec: &DashPatternSpec) -> ShapeResult<PathData> {
    let intervals = stroke_dash_path_ratios(start, end, spec)?;
    debug!(
        "Dashed {:.3} long segment into {} strokes",
        start.distance_to(&end),
        intervals.len()
    );
    intervals_path(start, end, &intervals)
}
