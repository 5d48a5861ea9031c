//! Shape helpers shared by the tab generators.

use polynet_core::{symmetric_hinge_plot_by_projection_distance, Point};
use polynet_path::PathData;

use crate::error::{ShapeError, ShapeResult};

/// Cut and score lines produced for one feature.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CutScore {
    pub cut: PathData,
    pub score: PathData,
}

impl CutScore {
    pub fn concat(self, other: &CutScore) -> ShapeResult<CutScore> {
        Ok(CutScore {
            cut: self.cut.concat_path(&other.cut)?,
            score: self.score.concat_path(&other.score)?,
        })
    }
}

pub(crate) fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

pub(crate) fn is_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

/// Polyline through `points` with every interior corner rounded by a
/// quadratic bezier. The curve starts `retraction` before the corner and ends
/// `retraction` after it, using the corner as its control point. The first
/// and last points stay sharp.
pub fn rounded_edge_path(points: &[Point], retraction: f64) -> ShapeResult<PathData> {
    rounded_edge_path_with_retractions(points, &vec![retraction; points.len()])
}

/// [`rounded_edge_path`] with a retraction per point. Entries for the first
/// and last point are ignored; a zero retraction leaves that corner sharp.
///
/// Retractions are clamped to half of each adjacent edge so neighbouring
/// corners never overlap.
pub fn rounded_edge_path_with_retractions(
    points: &[Point],
    retractions: &[f64],
) -> ShapeResult<PathData> {
    if points.len() < 2 {
        return Err(ShapeError::InvalidParameters(format!(
            "rounded edge path needs at least 2 points, got {}",
            points.len()
        )));
    }
    if retractions.len() != points.len() {
        return Err(ShapeError::InvalidParameters(format!(
            "{} retractions given for {} points",
            retractions.len(),
            points.len()
        )));
    }

    let mut path = PathData::new().move_to(points[0]);
    for i in 1..points.len() - 1 {
        let (prev, corner, next) = (points[i - 1], points[i], points[i + 1]);
        let retraction = retractions[i]
            .max(0.0)
            .min(corner.distance_to(&prev) / 2.0)
            .min(corner.distance_to(&next) / 2.0);

        if retraction <= f64::EPSILON {
            path = path.line_to(corner)?;
            continue;
        }
        let before = corner + (prev - corner).normalized() * retraction;
        let after = corner + (next - corner).normalized() * retraction;
        path = path.line_to(before)?.quadratic_bezier(corner, after)?;
    }
    Ok(path.line_to(points[points.len() - 1])?)
}

/// Trapezoidal tab from `start` to `end`, protruding `depth` to the side
/// reached by turning the edge direction by −π/2. `theta` is the angle
/// between the edge and the tab sides; the two outer corners are rounded.
pub fn symmetric_rounded_tab(
    start: Point,
    end: Point,
    depth: f64,
    theta: f64,
    rounding: f64,
) -> ShapeResult<PathData> {
    let [corner_start, corner_end] =
        symmetric_hinge_plot_by_projection_distance(start, end, theta, depth)?;
    rounded_edge_path(&[start, corner_start, corner_end, end], rounding)
}
