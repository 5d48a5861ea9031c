//! Error types for the geometry core.
//!
//! Geometric impossibility is reported through [`GeometryError`]. Line
//! intersection is the one computation that signals "no unique answer" with
//! `Option` instead; see [`crate::geom::line_line_intersection`].

use thiserror::Error;

/// Errors raised by geometry primitives.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// The three side lengths cannot form a triangle.
    #[error("Degenerate triangle: sides {a}, {b}, {c} violate the triangle inequality")]
    DegenerateTriangle {
        /// First side length.
        a: f64,
        /// Second side length.
        b: f64,
        /// Third side length.
        c: f64,
    },

    /// Two parallel input sequences have different lengths.
    #[error("Length mismatch: {angles} angles for {sides} sides")]
    LengthMismatch {
        /// Number of angles supplied.
        angles: usize,
        /// Number of sides supplied.
        sides: usize,
    },

    /// A construction needed the intersection of two parallel lines.
    #[error("Parallel lines: {0}")]
    ParallelLines(String),

    /// Polygon offsetting produced no usable polygon.
    #[error("Polygon offset failed: {0}")]
    OffsetFailed(String),

    /// A matrix has no inverse.
    #[error("Singular matrix: determinant {0}")]
    SingularMatrix(f64),

    /// Input is outside the domain of the operation.
    #[error("Invalid geometry input: {0}")]
    InvalidInput(String),
}

/// Result type alias for geometry operations.
pub type GeometryResult<T> = Result<T, GeometryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_error_display() {
        let err = GeometryError::DegenerateTriangle {
            a: 1.0,
            b: 2.0,
            c: 5.0,
        };
        assert_eq!(
            err.to_string(),
            "Degenerate triangle: sides 1, 2, 5 violate the triangle inequality"
        );

        let err = GeometryError::LengthMismatch { angles: 3, sides: 4 };
        assert_eq!(err.to_string(), "Length mismatch: 3 angles for 4 sides");

        let err = GeometryError::ParallelLines("hinge ray".to_string());
        assert_eq!(err.to_string(), "Parallel lines: hinge ray");
    }
}
