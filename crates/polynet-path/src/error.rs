//! Error types for path construction and parsing.

use thiserror::Error;

/// Errors raised when a command would break the path's structural invariants
/// or when path data cannot be parsed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    /// A drawing command was issued before any `M`.
    #[error("Cannot apply '{command}' to an empty path: start with a move")]
    EmptyPath {
        /// Letter of the rejected command.
        command: char,
    },

    /// A smooth bezier followed a command it cannot reflect a control point from.
    #[error("Smooth bezier '{command}' cannot follow '{previous}'")]
    IncompatibleSmoothBezier {
        /// Letter of the rejected command.
        command: char,
        /// Letter of the preceding command.
        previous: char,
    },

    /// Path data could not be parsed.
    #[error("Path parse error at token {position}: {reason}")]
    Parse {
        /// Index of the offending token.
        position: usize,
        /// What went wrong.
        reason: String,
    },
}

/// Result type alias for path operations.
pub type PathResult<T> = Result<T, PathError>;
