//! Fin-and-hole connector along a base edge.
//!
//! Along the edge from `start` to `end` the connector is laid out as:
//!
//! ```text
//!  start        quarter        mid     three quarters      end
//!    |  handle with V valley  |  gap  |   arrow fin   |  gap |
//!    |     [tapered hole]     |
//! ```
//!
//! The fin sits where the mating edge, traversed in the opposite direction,
//! has its hole. Everything protrudes to the side reached by turning the
//! edge direction by −π/2.

use polynet_core::{
    angle_relative_to_origin, line_line_intersection, point_from_polar,
    symmetric_hinge_plot_by_projection_distance, Point,
};
use polynet_path::PathData;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};
use tracing::debug;

use crate::dash::{stroke_dash_path, DashPatternSpec};
use crate::error::{ShapeError, ShapeResult};
use crate::generic::{
    is_non_negative, is_positive, rounded_edge_path_with_retractions, symmetric_rounded_tab,
    CutScore,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseEdgeTabSpec {
    /// Tab depth as a ratio of the base edge length, used by net assembly.
    pub tab_depth_to_base_length: f64,
    pub hole_depth_to_tab_depth: f64,
    /// Radians the hole sides lean in from perpendicular. The fin barbs
    /// flare out by the same angle.
    pub hole_taper: f64,
    /// Hole breadth along the edge as a ratio of half the edge length.
    pub hole_breadth_to_half_width: f64,
    pub fin_depth_to_tab_depth: f64,
    /// Share of the fin depth taken by the converging tip.
    pub fin_tip_depth_to_fin_depth: f64,
    /// Corner rounding as a ratio of the tab depth.
    pub rounding_distance_ratio: f64,
    /// Depth of the V relief notch as a ratio of the tab depth.
    pub handle_valley_dip_to_tab_depth: f64,
    /// Radians each side of the V notch leans from the edge normal.
    pub handle_valley_theta: f64,
    /// Radians between the edge and the handle sides.
    pub handle_taper_angle: f64,
}

impl Default for BaseEdgeTabSpec {
    fn default() -> Self {
        Self {
            tab_depth_to_base_length: 0.15,
            hole_depth_to_tab_depth: 0.5,
            hole_taper: PI / 12.0,
            hole_breadth_to_half_width: 0.5,
            fin_depth_to_tab_depth: 0.8,
            fin_tip_depth_to_fin_depth: 0.5,
            rounding_distance_ratio: 0.1,
            handle_valley_dip_to_tab_depth: 0.3,
            handle_valley_theta: PI / 4.0,
            handle_taper_angle: PI / 3.0,
        }
    }
}

impl BaseEdgeTabSpec {
    pub fn validate(&self) -> ShapeResult<()> {
        let fail = |msg: &str| Err(ShapeError::InvalidParameters(msg.to_string()));

        if !is_positive(self.tab_depth_to_base_length) {
            return fail("tab_depth_to_base_length must be positive");
        }
        if !is_positive(self.hole_depth_to_tab_depth) || !is_positive(self.fin_depth_to_tab_depth) {
            return fail("hole and fin depths must be positive");
        }
        if !is_positive(self.hole_breadth_to_half_width) || self.hole_breadth_to_half_width >= 1.0 {
            return fail("hole_breadth_to_half_width must be between 0 and 1");
        }
        if !is_positive(self.fin_tip_depth_to_fin_depth) || self.fin_tip_depth_to_fin_depth >= 1.0 {
            return fail("fin_tip_depth_to_fin_depth must be between 0 and 1");
        }
        if !is_positive(self.handle_valley_dip_to_tab_depth)
            || self.handle_valley_dip_to_tab_depth >= 1.0
        {
            return fail("handle_valley_dip_to_tab_depth must be between 0 and 1");
        }
        if !(0.0..FRAC_PI_2).contains(&self.hole_taper) {
            return fail("hole_taper must be in [0, pi/2)");
        }
        if !is_positive(self.handle_valley_theta) || self.handle_valley_theta >= FRAC_PI_2 {
            return fail("handle_valley_theta must be in (0, pi/2)");
        }
        if !is_positive(self.handle_taper_angle) || self.handle_taper_angle > FRAC_PI_2 {
            return fail("handle_taper_angle must be in (0, pi/2]");
        }
        if !is_non_negative(self.rounding_distance_ratio) {
            return fail("rounding_distance_ratio must not be negative");
        }
        if self.hole_depth_to_tab_depth >= 1.0 - self.handle_valley_dip_to_tab_depth {
            return fail("handle valley would cut into the hole");
        }
        Ok(())
    }
}

/// Intersections of the two valley rays with the handle edge, ordered
/// from the start side.
fn valley_shoulders(
    dip: Point,
    outward: Point,
    theta: f64,
    edge_a: Point,
    edge_b: Point,
) -> ShapeResult<(Point, Point)> {
    let normal_angle = angle_relative_to_origin(outward);
    let cast = |turn: f64| {
        line_line_intersection(
            dip,
            dip + point_from_polar(normal_angle + turn, 1.0),
            edge_a,
            edge_b,
        )
        .ok_or_else(|| {
            ShapeError::InvalidParameters("handle valley rays miss the handle edge".to_string())
        })
    };
    let first = cast(theta)?;
    let second = cast(-theta)?;

    let along = edge_b - edge_a;
    if (first - edge_a).dot(&along) <= (second - edge_a).dot(&along) {
        Ok((first, second))
    } else {
        Ok((second, first))
    }
}

/// Interlocking handle, hole and fin for the base edge from `start` to `end`.
///
/// The hole is centered under the handle a quarter of the way along the
/// edge and the fin is centered three quarters of the way along. The mating
/// base edge is traversed from `end` to `start`, so its fin lands on this
/// edge's hole and this edge's fin lands on its hole.
pub fn base_edge_connection_tab(
    start: Point,
    end: Point,
    tab_depth: f64,
    spec: &BaseEdgeTabSpec,
    score_dash: &DashPatternSpec,
) -> ShapeResult<CutScore> {
    spec.validate()?;
    let length = start.distance_to(&end);
    if length <= f64::EPSILON || !is_positive(tab_depth) {
        return Err(ShapeError::InvalidParameters(
            "base edge tab needs a positive edge length and tab depth".to_string(),
        ));
    }

    let direction = (end - start).normalized();
    let outward = Point::new(direction.y, -direction.x);
    let at = |t: f64, depth: f64| start + direction * t + outward * depth;

    let half_width = length / 2.0;
    let breadth = spec.hole_breadth_to_half_width * half_width;
    let margin = (half_width - breadth) / 2.0;
    let rounding = spec.rounding_distance_ratio * tab_depth;
    let mid = start.midpoint(&end);

    // Handle over the start half, with the hole centered under its valley.
    let hole_center = half_width / 2.0;
    let hole_start = at(hole_center - breadth / 2.0, 0.0);
    let hole_end = at(hole_center + breadth / 2.0, 0.0);
    let [hole_far_start, hole_far_end] = symmetric_hinge_plot_by_projection_distance(
        hole_start,
        hole_end,
        FRAC_PI_2 - spec.hole_taper,
        spec.hole_depth_to_tab_depth * tab_depth,
    )?;

    let [handle_start, handle_end] = symmetric_hinge_plot_by_projection_distance(
        start,
        mid,
        spec.handle_taper_angle,
        tab_depth,
    )?;
    let dip = at(
        hole_center,
        tab_depth * (1.0 - spec.handle_valley_dip_to_tab_depth),
    );
    let (valley_start, valley_end) = valley_shoulders(
        dip,
        outward,
        spec.handle_valley_theta,
        handle_start,
        handle_end,
    )?;

    let position = |p: Point| (p - start).dot(&direction);
    if position(valley_start) <= position(handle_start)
        || position(valley_end) >= position(handle_end)
    {
        return Err(ShapeError::InvalidParameters(
            "handle valley is wider than the handle".to_string(),
        ));
    }

    let handle = rounded_edge_path_with_retractions(
        &[
            start,
            handle_start,
            valley_start,
            dip,
            valley_end,
            handle_end,
            mid,
        ],
        &[0.0, rounding, 0.0, 0.0, 0.0, rounding, 0.0],
    )?;

    // Arrow fin over the end half: barbs flare out, then the tip converges
    // to half the barb width.
    let fin_depth = spec.fin_depth_to_tab_depth * tab_depth;
    let tip_depth = spec.fin_tip_depth_to_fin_depth * fin_depth;
    let fin_start = at(half_width + margin, 0.0);
    let fin_end = at(half_width + margin + breadth, 0.0);
    let [barb_start, barb_end] = symmetric_hinge_plot_by_projection_distance(
        fin_start,
        fin_end,
        FRAC_PI_2 + spec.hole_taper,
        fin_depth - tip_depth,
    )?;
    let tip_theta = tip_depth.atan2(barb_start.distance_to(&barb_end) / 4.0);
    let tip = symmetric_rounded_tab(barb_start, barb_end, tip_depth, tip_theta, rounding)?;

    let outline = handle
        .line_to(fin_start)?
        .line_to(barb_start)?
        .concat_commands(tip.commands().iter().skip(1).copied())?
        .line_to(fin_end)?
        .line_to(end)?;
    let hole = PathData::new()
        .move_to(hole_start)
        .line_to(hole_far_start)?
        .line_to(hole_far_end)?
        .line_to(hole_end)?
        .close()?;

    let score = stroke_dash_path(start, hole_start, score_dash)?
        .concat_path(&stroke_dash_path(hole_end, at(half_width, 0.0), score_dash)?)?
        .concat_path(&stroke_dash_path(fin_start, fin_end, score_dash)?)?;

    debug!(
        "Base edge tab of length {:.3}: depth {:.3}, hole breadth {:.3}",
        length, tab_depth, breadth
    );

    Ok(CutScore {
        cut: outline.concat_path(&hole)?,
        score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn horizontal(spec: &BaseEdgeTabSpec) -> ShapeResult<CutScore> {
        base_edge_connection_tab(
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            15.0,
            spec,
            &DashPatternSpec::solid(),
        )
    }

    fn count(path: &PathData, code: char) -> usize {
        path.commands().iter().filter(|c| c.code() == code).count()
    }

    #[test]
    fn test_outline_runs_start_to_end_with_separate_hole() {
        let tab = horizontal(&BaseEdgeTabSpec::default()).unwrap();
        let points = tab.cut.get_destination_points();
        assert_eq!(points[0], Point::new(0.0, 0.0));
        assert!(points.iter().any(|p| p.approx_eq(&Point::new(100.0, 0.0), 1e-9)));
        assert_eq!(count(&tab.cut, 'M'), 2);
        assert_eq!(count(&tab.cut, 'Z'), 1);
    }

    #[test]
    fn test_everything_protrudes_outward() {
        let tab = horizontal(&BaseEdgeTabSpec::default()).unwrap();
        let points = tab.cut.get_destination_points();
        assert!(points.iter().all(|p| p.y <= 1e-9));
        let handle_top = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        assert!((handle_top + 15.0).abs() < 1e-9, "deepest point {}", handle_top);
    }

    #[test]
    fn test_hole_and_fin_mirror_about_midpoint() {
        let spec = BaseEdgeTabSpec::default();
        let tab = horizontal(&spec).unwrap();
        let hole: Vec<Point> = tab.cut.get_destination_points().into_iter().rev().take(4).collect();
        // Hole centered on the first quarter, fin base on the third.
        let xs: Vec<f64> = hole.iter().map(|p| p.x).collect();
        let center = xs.iter().sum::<f64>() / xs.len() as f64;
        assert!((center - 25.0).abs() < 1e-9);

        let breadth = spec.hole_breadth_to_half_width * 50.0;
        let fin_start = Point::new(50.0 + (50.0 - breadth) / 2.0, 0.0);
        assert!(tab
            .cut
            .get_destination_points()
            .iter()
            .any(|p| p.approx_eq(&fin_start, 1e-9)));
    }

    #[test]
    fn test_valley_is_a_sharp_v() {
        let tab = horizontal(&BaseEdgeTabSpec::default()).unwrap();
        let dip_y = -15.0 * 0.7;
        let dip = tab
            .cut
            .commands()
            .iter()
            .position(|c| c.to().is_some_and(|p| p.approx_eq(&Point::new(25.0, dip_y), 1e-9)))
            .expect("valley dip");
        assert_eq!(tab.cut.commands()[dip].code(), 'L');
        assert_eq!(tab.cut.commands()[dip + 1].code(), 'L');
    }

    #[test]
    fn test_score_has_three_strokes() {
        let tab = horizontal(&BaseEdgeTabSpec::default()).unwrap();
        assert_eq!(count(&tab.score, 'M'), 3);
        assert!(tab
            .score
            .get_destination_points()
            .iter()
            .all(|p| p.y.abs() < 1e-9));
    }

    #[test]
    fn test_rejects_valley_reaching_hole() {
        let spec = BaseEdgeTabSpec {
            hole_depth_to_tab_depth: 0.8,
            handle_valley_dip_to_tab_depth: 0.3,
            ..Default::default()
        };
        assert!(matches!(
            horizontal(&spec),
            Err(ShapeError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_rejects_valley_wider_than_handle() {
        let spec = BaseEdgeTabSpec {
            handle_valley_dip_to_tab_depth: 0.9,
            hole_depth_to_tab_depth: 0.05,
            handle_valley_theta: 1.5,
            ..Default::default()
        };
        assert!(horizontal(&spec).is_err());
    }
}
