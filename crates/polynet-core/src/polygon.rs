//! Polygon utilities: bounds, winding and parallel offsetting.

use cavalier_contours::polyline::{PlineSource, PlineSourceMut, PlineVertex, Polyline};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GeometryError, GeometryResult};
use crate::point::Point;

/// Vertices closer than this are merged before offsetting.
const DUPLICATE_TOLERANCE: f64 = 1e-6;

/// Axis-aligned bounds of a point set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

impl BoundingBox {
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let mut bounds = BoundingBox {
            min: *first,
            max: *first,
        };
        for p in &points[1..] {
            bounds.min.x = bounds.min.x.min(p.x);
            bounds.min.y = bounds.min.y.min(p.y);
            bounds.max.x = bounds.max.x.max(p.x);
            bounds.max.y = bounds.max.y.max(p.y);
        }
        Some(bounds)
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// Grow by `margin` on every side.
    pub fn expanded(&self, margin: f64) -> BoundingBox {
        BoundingBox {
            min: Point::new(self.min.x - margin, self.min.y - margin),
            max: Point::new(self.max.x + margin, self.max.y + margin),
        }
    }
}

/// Shoelace signed area; positive when the points wind counter-clockwise in
/// y-up coordinates.
pub fn signed_area(points: &[Point]) -> f64 {
    let n = points.len();
    (0..n)
        .map(|i| points[i].cross(&points[(i + 1) % n]))
        .sum::<f64>()
        / 2.0
}

/// Parallel offset of a closed polygon. Negative `distance` moves inward.
///
/// Round joins produced by outward offsets are reduced to their chord
/// endpoints. When the offset splits the polygon, the piece with the largest
/// area is returned.
pub fn offset_polygon_points(points: &[Point], distance: f64) -> GeometryResult<Vec<Point>> {
    let clean = dedupe_vertices(points);
    if clean.len() < 3 {
        return Err(GeometryError::InvalidInput(format!(
            "offset needs at least 3 distinct vertices, got {}",
            clean.len()
        )));
    }
    if distance == 0.0 {
        return Ok(clean);
    }

    // Cavalier offsets to the left of travel for positive values; winding the
    // polygon clockwise makes negative values move inward.
    let mut vertices = clean;
    if signed_area(&vertices) > 0.0 {
        vertices.reverse();
    }

    let mut polyline = Polyline::new();
    for p in &vertices {
        polyline.add_vertex(PlineVertex::new(p.x, p.y, 0.0));
    }
    polyline.set_is_closed(true);

    let offsets = polyline.parallel_offset(distance);
    debug!(
        "Offset polygon of {} vertices by {} produced {} loop(s)",
        vertices.len(),
        distance,
        offsets.len()
    );

    let best = offsets
        .iter()
        .map(|pline| {
            pline
                .vertex_data
                .iter()
                .map(|v| Point::new(v.x, v.y))
                .collect::<Vec<_>>()
        })
        .filter(|pts| pts.len() >= 3)
        .max_by(|a, b| signed_area(a).abs().total_cmp(&signed_area(b).abs()))
        .ok_or_else(|| {
            GeometryError::OffsetFailed(format!(
                "offset by {} collapses the polygon",
                distance
            ))
        })?;

    // Restore the caller's winding.
    let mut result = best;
    if signed_area(&result).signum() != signed_area(points).signum() {
        result.reverse();
    }
    Ok(result)
}

fn dedupe_vertices(points: &[Point]) -> Vec<Point> {
    let mut clean: Vec<Point> = Vec::with_capacity(points.len());
    for p in points {
        if clean
            .last()
            .is_some_and(|last| last.distance_to(p) <= DUPLICATE_TOLERANCE)
        {
            continue;
        }
        clean.push(*p);
    }
    if clean.len() > 1 {
        let first = clean[0];
        if clean
            .last()
            .is_some_and(|last| last.distance_to(&first) <= DUPLICATE_TOLERANCE)
        {
            clean.pop();
        }
    }
    clean
}
