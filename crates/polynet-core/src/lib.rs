//! # Polynet Core
//!
//! Geometry primitives shared by the path model and the dieline generators:
//!
//! - **Points**: value-type point/vector arithmetic and interpolation
//! - **Plotting**: polar conversion, hinge plotting, line intersection
//! - **Triangles and polygons**: law of cosines, polygon walks, parallel offsets
//! - **Matrices**: six-value affine matrices and user-facing transform objects
//!
//! All functions are pure. Coordinates follow SVG conventions (y down), so a
//! positive turn angle is clockwise on screen.

pub mod error;
pub mod geom;
pub mod matrix;
pub mod point;
pub mod polygon;

pub use error::{GeometryError, GeometryResult};
pub use geom::{
    angle_relative_to_origin, hinged_plot, hinged_plot_by_projection_distance, hinged_plot_lerp,
    line_line_intersection, point_from_polar, polygon_points_given_angles_and_sides,
    symmetric_hinge_plot_by_projection_distance, triangle_angles_given_sides,
};
pub use matrix::{translation_for_origin_change, AffineMatrix, TransformObject};
pub use point::Point;
pub use polygon::{offset_polygon_points, signed_area, BoundingBox};
