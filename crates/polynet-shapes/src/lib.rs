//! # Polynet Shapes
//!
//! Dieline generators built on the path model:
//!
//! - **Dash strokes**: perforated score lines from a relative dash pattern
//! - **Edge tabs**: male tabs and female holes for ascendant edges, and the
//!   handle, hole and fin connector for base edges
//! - **Rounding**: polylines with quadratic-rounded corners
//! - **Pyramid nets**: radial face layout, closing flap, border inset and
//!   face decorations
//!
//! Every generator is a pure function of its parameters and returns cut and
//! score paths separately.

pub mod ascendant_tabs;
pub mod base_tab;
pub mod dash;
pub mod error;
pub mod generic;
pub mod intervals;
pub mod pyramid_net;

pub use ascendant_tabs::{
    ascendant_edge_connection_tabs, AscendantEdgeTabs, AscendantEdgeTabsSpec, TabIntervals,
};
pub use base_tab::{base_edge_connection_tab, BaseEdgeTabSpec};
pub use dash::{
    dash_pattern, stroke_dash_path, stroke_dash_path_ratios, validate_dash_patterns, DashPattern,
    DashPatternSpec, DASH_PATTERNS, MAX_DASH_REPETITIONS,
};
pub use error::{ShapeError, ShapeResult};
pub use generic::{
    rounded_edge_path, rounded_edge_path_with_retractions, symmetric_rounded_tab, CutScore,
};
pub use intervals::{subtract_intervals, Interval};
pub use pyramid_net::{
    border_inset_matrix, pyramid_net, FaceDecoration, PolyhedronSpec, PyramidNet, PyramidNetSpec,
    TexturePattern, FLAP_APEX_IMPINGE_MARGIN,
};
