//! # Polynet Path
//!
//! Immutable path model used for every cut and score line of a dieline.
//!
//! [`PathData`] holds absolute drawing commands and grows only through
//! validating builder calls that return new values. Paths can be reversed,
//! transformed by affine matrices or user transform objects, serialized to
//! path data with [`PathData::get_d`] and parsed back with [`parse_path`].

pub mod arc;
pub mod command;
pub mod error;
pub mod parse;
pub mod path_data;

pub use arc::{arc_to_cubics, ArcParams};
pub use command::Command;
pub use error::{PathError, PathResult};
pub use parse::parse_path;
pub use path_data::PathData;
