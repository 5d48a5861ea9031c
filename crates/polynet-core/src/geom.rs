//! Plotting primitives.
//!
//! Everything here is built on [`hinged_plot`]: stand at `p2`, look back at
//! `p1`, turn by `theta` and walk `length`. Positive angles turn clockwise on
//! screen because y grows downward.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::error::{GeometryError, GeometryResult};
use crate::point::Point;

/// Below this magnitude a sine or determinant is treated as zero.
const PARALLEL_EPSILON: f64 = 1e-12;

pub fn point_from_polar(theta: f64, length: f64) -> Point {
    Point::new(theta.cos() * length, theta.sin() * length)
}

pub fn angle_relative_to_origin(pt: Point) -> f64 {
    pt.y.atan2(pt.x)
}

/// `p2 + polar(angle(p1 - p2) + theta, length)`.
pub fn hinged_plot(p1: Point, p2: Point, theta: f64, length: f64) -> Point {
    let angle = angle_relative_to_origin(p1 - p2) + theta;
    p2 + point_from_polar(angle, length)
}

/// [`hinged_plot`] with the walk length given as a ratio of `|p1 - p2|`.
pub fn hinged_plot_lerp(p1: Point, p2: Point, theta: f64, length_ratio: f64) -> Point {
    hinged_plot(p1, p2, theta, length_ratio * p1.distance_to(&p2))
}

/// Intersection of the infinite lines through `l1p1,l1p2` and `l2p1,l2p2`.
///
/// Returns `None` for parallel, coincident or zero-length lines.
pub fn line_line_intersection(l1p1: Point, l1p2: Point, l2p1: Point, l2p2: Point) -> Option<Point> {
    let d1 = l1p2 - l1p1;
    let d2 = l2p2 - l2p1;
    let denominator = d1.cross(&d2);
    let scale = d1.length() * d2.length();
    if scale == 0.0 || denominator.abs() <= PARALLEL_EPSILON * scale {
        return None;
    }
    let t = (l2p1 - l1p1).cross(&d2) / denominator;
    Some(l1p1 + d1 * t)
}

/// Hinge from `p2` at `theta` until the perpendicular distance from line
/// `p1p2` reaches `projection_distance`.
///
/// The result lies on the side of the line that the hinged ray heads
/// towards. Fails when the ray runs parallel to the line (`theta` near 0 or
/// π), since no point on it ever reaches the requested distance.
pub fn hinged_plot_by_projection_distance(
    p1: Point,
    p2: Point,
    theta: f64,
    projection_distance: f64,
) -> GeometryResult<Point> {
    let side = theta.sin();
    if side.abs() <= PARALLEL_EPSILON {
        return Err(GeometryError::ParallelLines(format!(
            "hinge angle {} runs parallel to the base line",
            theta
        )));
    }
    let turn = FRAC_PI_2.copysign(side);
    let offset_start = hinged_plot(p2, p1, -turn, projection_distance);
    let offset_end = hinged_plot(p1, p2, turn, projection_distance);
    let ray_point = hinged_plot(p1, p2, theta, 1.0);

    line_line_intersection(offset_start, offset_end, p2, ray_point).ok_or_else(|| {
        GeometryError::ParallelLines(format!(
            "hinge ray from {} does not meet the offset line",
            p2
        ))
    })
}

/// Projection-distance hinge applied from both ends of `p1p2`.
///
/// Returns `[near_p1, near_p2]`; both points sit on the side reached by
/// turning the direction `p1 -> p2` by −π/2, and lean towards each other
/// when `theta < π/2`.
pub fn symmetric_hinge_plot_by_projection_distance(
    p1: Point,
    p2: Point,
    theta: f64,
    projection_distance: f64,
) -> GeometryResult<[Point; 2]> {
    Ok([
        hinged_plot_by_projection_distance(p2, p1, -theta, projection_distance)?,
        hinged_plot_by_projection_distance(p1, p2, theta, projection_distance)?,
    ])
}

/// Law of cosines. `angles[i]` is the angle opposite `sides[i]`.
pub fn triangle_angles_given_sides(sides: [f64; 3]) -> GeometryResult<[f64; 3]> {
    let [a, b, c] = sides;
    let degenerate = GeometryError::DegenerateTriangle { a, b, c };
    if !sides.iter().all(|s| s.is_finite() && *s > 0.0) {
        return Err(degenerate);
    }
    if a + b <= c || a + c <= b || b + c <= a {
        return Err(degenerate);
    }

    let angle_a = ((b * b + c * c - a * a) / (2.0 * b * c)).clamp(-1.0, 1.0).acos();
    let angle_b = ((a * a + c * c - b * b) / (2.0 * a * c)).clamp(-1.0, 1.0).acos();
    Ok([angle_a, angle_b, PI - angle_a - angle_b])
}

/// Walk a polygon from `(0,0)` and `(sides[0], 0)`.
///
/// Angles are indexed like the output of [`triangle_angles_given_sides`]:
/// the interior angle where `sides[i]` meets `sides[i + 1]` is
/// `angles[(i + 2) % n]`, the angle opposite `sides[i + 2]` in a triangle.
/// So the second side leaves `(sides[0], 0)` at direction `π − angles[2]`.
/// The final side is implied by closing back to the origin.
pub fn polygon_points_given_angles_and_sides(
    angles: &[f64],
    sides: &[f64],
) -> GeometryResult<Vec<Point>> {
    if angles.len() != sides.len() {
        return Err(GeometryError::LengthMismatch {
            angles: angles.len(),
            sides: sides.len(),
        });
    }
    if sides.len() < 3 {
        return Err(GeometryError::InvalidInput(format!(
            "a polygon needs at least 3 sides, got {}",
            sides.len()
        )));
    }

    let n = sides.len();
    let mut points = vec![Point::ORIGIN, Point::new(sides[0], 0.0)];
    for i in 1..n - 1 {
        let interior = angles[(i + 1) % n];
        let next = hinged_plot(points[i - 1], points[i], TAU - interior, sides[i]);
        points.push(next);
    }
    Ok(points)
}
