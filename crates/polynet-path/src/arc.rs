//! Elliptical arc to cubic bezier conversion (endpoint parameterization).

use polynet_core::Point;
use std::f64::consts::{FRAC_PI_2, TAU};

/// Control points and end point of one cubic segment.
pub type CubicSegment = [Point; 3];

/// Parameters of an elliptical arc in path-data form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcParams {
    pub rx: f64,
    pub ry: f64,
    /// Degrees.
    pub x_axis_rotation: f64,
    pub large_arc_flag: bool,
    pub sweep_flag: bool,
}

fn angle_between(u: Point, v: Point) -> f64 {
    u.cross(&v).atan2(u.dot(&v))
}

/// Convert the arc from `from` to `to` into cubic segments spanning at most
/// 90 degrees each.
///
/// Coincident endpoints produce no segments. A zero radius produces a single
/// straight cubic.
pub fn arc_to_cubics(from: Point, to: Point, arc: ArcParams) -> Vec<CubicSegment> {
    if from == to {
        return Vec::new();
    }

    let mut rx = arc.rx.abs();
    let mut ry = arc.ry.abs();
    if rx < f64::EPSILON || ry < f64::EPSILON {
        return vec![[from, to, to]];
    }

    let (sin_phi, cos_phi) = arc.x_axis_rotation.to_radians().sin_cos();

    // Endpoint midpoint in the ellipse's frame.
    let half = (from - to) * 0.5;
    let x1p = cos_phi * half.x + sin_phi * half.y;
    let y1p = -sin_phi * half.x + cos_phi * half.y;

    // Scale radii up if they cannot span the endpoints.
    let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
    if lambda > 1.0 {
        let scale = lambda.sqrt();
        rx *= scale;
        ry *= scale;
    }

    let rx2 = rx * rx;
    let ry2 = ry * ry;
    let denom = rx2 * y1p * y1p + ry2 * x1p * x1p;
    if denom.abs() < f64::EPSILON {
        return vec![[from, to, to]];
    }
    let numer = (rx2 * ry2 - rx2 * y1p * y1p - ry2 * x1p * x1p).max(0.0);

    let sign = if arc.large_arc_flag == arc.sweep_flag {
        -1.0
    } else {
        1.0
    };
    let coef = sign * (numer / denom).sqrt();
    let cxp = coef * (rx * y1p / ry);
    let cyp = coef * (-ry * x1p / rx);

    let mid = from.midpoint(&to);
    let center = Point::new(
        cos_phi * cxp - sin_phi * cyp + mid.x,
        sin_phi * cxp + cos_phi * cyp + mid.y,
    );

    let u = Point::new((x1p - cxp) / rx, (y1p - cyp) / ry);
    let v = Point::new((-x1p - cxp) / rx, (-y1p - cyp) / ry);
    let mut theta = angle_between(Point::new(1.0, 0.0), u);
    let mut delta = angle_between(u, v);
    if !arc.sweep_flag && delta > 0.0 {
        delta -= TAU;
    } else if arc.sweep_flag && delta < 0.0 {
        delta += TAU;
    }

    let segment_count = ((delta.abs() / FRAC_PI_2).ceil() as usize).max(1);
    let delta_seg = delta / segment_count as f64;
    let k = 4.0 / 3.0 * (delta_seg / 4.0).tan();

    let on_ellipse = |ux: f64, uy: f64| {
        Point::new(
            center.x + cos_phi * (rx * ux) - sin_phi * (ry * uy),
            center.y + sin_phi * (rx * ux) + cos_phi * (ry * uy),
        )
    };

    let mut cubics = Vec::with_capacity(segment_count);
    for i in 0..segment_count {
        let t1 = theta + delta_seg;
        let (s0, c0) = theta.sin_cos();
        let (s1, c1) = t1.sin_cos();

        let ctrl1 = on_ellipse(c0 - k * s0, s0 + k * c0);
        let ctrl2 = on_ellipse(c1 + k * s1, s1 - k * c1);
        // Snap the final end point so the path lands exactly on `to`.
        let end = if i + 1 == segment_count {
            to
        } else {
            on_ellipse(c1, s1)
        };
        cubics.push([ctrl1, ctrl2, end]);
        theta = t1;
    }
    cubics
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(rx: f64, ry: f64, large: bool, sweep: bool) -> ArcParams {
        ArcParams {
            rx,
            ry,
            x_axis_rotation: 0.0,
            large_arc_flag: large,
            sweep_flag: sweep,
        }
    }

    #[test]
    fn test_semicircle_splits_into_two_quarters() {
        let cubics = arc_to_cubics(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            params(5.0, 5.0, false, true),
        );
        assert_eq!(cubics.len(), 2);
        assert_eq!(cubics[1][2], Point::new(10.0, 0.0));
        // Midpoint of a semicircle of radius 5 centered at (5, 0).
        let mid = cubics[0][2];
        assert!((mid.distance_to(&Point::new(5.0, 0.0)) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_sweep_flag_picks_side() {
        let a = arc_to_cubics(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            params(5.0, 5.0, false, true),
        );
        let b = arc_to_cubics(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            params(5.0, 5.0, false, false),
        );
        assert!(a[0][2].y * b[0][2].y < 0.0);
    }

    #[test]
    fn test_small_radii_scaled_up() {
        let cubics = arc_to_cubics(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            params(1.0, 1.0, false, true),
        );
        assert_eq!(cubics.len(), 2);
        assert!((cubics[0][2].distance_to(&Point::new(5.0, 0.0)) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_arcs() {
        let p = Point::new(3.0, 3.0);
        assert!(arc_to_cubics(p, p, params(5.0, 5.0, false, true)).is_empty());

        let line = arc_to_cubics(p, Point::new(4.0, 3.0), params(0.0, 5.0, false, true));
        assert_eq!(line, vec![[p, Point::new(4.0, 3.0), Point::new(4.0, 3.0)]]);
    }
}
