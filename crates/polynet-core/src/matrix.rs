//! 2D affine matrices in the six-value `matrix(a b c d e f)` form.
//!
//! ```text
//! | a c e |
//! | b d f |
//! | 0 0 1 |
//! ```

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{GeometryError, GeometryResult};
use crate::point::Point;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineMatrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for AffineMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl AffineMatrix {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    pub fn scaling(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Rotation by `radians`, clockwise on screen.
    pub fn rotation(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    pub fn to_matrix3(&self) -> Matrix3<f64> {
        Matrix3::new(self.a, self.c, self.e, self.b, self.d, self.f, 0.0, 0.0, 1.0)
    }

    pub fn from_matrix3(m: &Matrix3<f64>) -> Self {
        Self::new(m[(0, 0)], m[(1, 0)], m[(0, 1)], m[(1, 1)], m[(0, 2)], m[(1, 2)])
    }

    /// `self ∘ other`: the result applies `other` first, then `self`.
    pub fn multiply(&self, other: &AffineMatrix) -> AffineMatrix {
        Self::from_matrix3(&(self.to_matrix3() * other.to_matrix3()))
    }

    /// Shorthand for `next.multiply(self)`.
    pub fn then(&self, next: &AffineMatrix) -> AffineMatrix {
        next.multiply(self)
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    pub fn inverse(&self) -> GeometryResult<AffineMatrix> {
        self.to_matrix3()
            .try_inverse()
            .map(|m| Self::from_matrix3(&m))
            .ok_or(GeometryError::SingularMatrix(self.determinant()))
    }

    pub fn apply(&self, p: Point) -> Point {
        let v = self.to_matrix3() * Vector3::new(p.x, p.y, 1.0);
        Point::new(v.x, v.y)
    }

    /// Apply only the linear part (no translation).
    pub fn apply_linear(&self, v: Point) -> Point {
        Point::new(self.a * v.x + self.c * v.y, self.b * v.x + self.d * v.y)
    }

    pub fn approx_eq(&self, other: &AffineMatrix, tolerance: f64) -> bool {
        [
            self.a - other.a,
            self.b - other.b,
            self.c - other.c,
            self.d - other.d,
            self.e - other.e,
            self.f - other.f,
        ]
        .iter()
        .all(|delta| delta.abs() <= tolerance)
    }

    pub fn to_svg_string(&self) -> String {
        format!(
            "matrix({} {} {} {} {} {})",
            self.a, self.b, self.c, self.d, self.e, self.f
        )
    }
}

impl fmt::Display for AffineMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_svg_string())
    }
}

/// Decomposed transform as edited by a user: scale and rotate about
/// `origin`, then translate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformObject {
    #[serde(default)]
    pub origin: Point,
    #[serde(default)]
    pub translate: Point,
    /// Degrees, clockwise on screen.
    #[serde(default)]
    pub rotate: f64,
    #[serde(default = "default_scale")]
    pub scale: f64,
}

fn default_scale() -> f64 {
    1.0
}

impl Default for TransformObject {
    fn default() -> Self {
        Self {
            origin: Point::ORIGIN,
            translate: Point::ORIGIN,
            rotate: 0.0,
            scale: 1.0,
        }
    }
}

impl TransformObject {
    pub fn to_matrix(&self) -> AffineMatrix {
        AffineMatrix::translation(-self.origin.x, -self.origin.y)
            .then(&AffineMatrix::scaling(self.scale, self.scale))
            .then(&AffineMatrix::rotation(self.rotate.to_radians()))
            .then(&AffineMatrix::translation(
                self.origin.x + self.translate.x,
                self.origin.y + self.translate.y,
            ))
    }

    /// Move the origin without moving the rendered result.
    pub fn with_origin(&self, new_origin: Point) -> TransformObject {
        TransformObject {
            origin: new_origin,
            translate: translation_for_origin_change(
                &self.to_matrix(),
                self.translate,
                self.origin,
                new_origin,
            ),
            ..*self
        }
    }
}

/// Translation that keeps `x -> M(x - o) + o + t` fixed when `o` moves from
/// `old_origin` to `new_origin`: `t' = t + (M − I)(new − old)`.
pub fn translation_for_origin_change(
    matrix: &AffineMatrix,
    translate: Point,
    old_origin: Point,
    new_origin: Point,
) -> Point {
    let delta = new_origin - old_origin;
    translate + matrix.apply_linear(delta) - delta
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_identity_apply() {
        let p = Point::new(3.0, -4.0);
        assert_eq!(AffineMatrix::identity().apply(p), p);
    }

    #[test]
    fn test_multiply_order() {
        let scale = AffineMatrix::scaling(2.0, 2.0);
        let shift = AffineMatrix::translation(10.0, 0.0);
        // Scale first, then shift.
        let m = shift.multiply(&scale);
        assert!(m.apply(Point::new(1.0, 1.0)).approx_eq(&Point::new(12.0, 2.0), EPS));
        assert_eq!(scale.then(&shift), m);
    }

    #[test]
    fn test_rotation_is_clockwise_on_screen() {
        let p = AffineMatrix::rotation(FRAC_PI_2).apply(Point::new(1.0, 0.0));
        assert!(p.approx_eq(&Point::new(0.0, 1.0), EPS));
    }

    #[test]
    fn test_inverse_round_trip() {
        let m = AffineMatrix::new(2.0, 0.5, -1.0, 3.0, 7.0, -2.0);
        let inv = m.inverse().unwrap();
        assert!(m.multiply(&inv).approx_eq(&AffineMatrix::identity(), EPS));
    }

    #[test]
    fn test_singular_inverse() {
        let m = AffineMatrix::scaling(0.0, 1.0);
        assert!(matches!(m.inverse(), Err(GeometryError::SingularMatrix(_))));
    }

    #[test]
    fn test_svg_string() {
        assert_eq!(
            AffineMatrix::translation(5.0, -1.5).to_svg_string(),
            "matrix(1 0 0 1 5 -1.5)"
        );
    }

    #[test]
    fn test_transform_object_rotates_about_origin() {
        let t = TransformObject {
            origin: Point::new(5.0, 5.0),
            rotate: 90.0,
            ..Default::default()
        };
        let m = t.to_matrix();
        assert!(m.apply(Point::new(5.0, 5.0)).approx_eq(&Point::new(5.0, 5.0), EPS));
        assert!(m.apply(Point::new(6.0, 5.0)).approx_eq(&Point::new(5.0, 6.0), EPS));
    }

    #[test]
    fn test_origin_change_preserves_result() {
        let t = TransformObject {
            origin: Point::new(1.0, 2.0),
            translate: Point::new(3.0, -1.0),
            rotate: 30.0,
            scale: 1.5,
        };
        let moved = t.with_origin(Point::new(-4.0, 9.0));
        assert!(moved.to_matrix().approx_eq(&t.to_matrix(), 1e-9));
    }
}
