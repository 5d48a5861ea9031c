//! Error types for shape generation.

use polynet_core::GeometryError;
use polynet_path::PathError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    /// The apex angles of all faces add up to more than a full turn.
    #[error("Too many faces: {face_count} faces with apex angle {apex_angle:.4} rad exceed a full turn")]
    TooManyFaces { face_count: usize, apex_angle: f64 },

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Path(#[from] PathError),
}

pub type ShapeResult<T> = Result<T, ShapeError>;
