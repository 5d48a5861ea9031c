//! # Polynet
//!
//! Generates dielines for pyramid-shaped polyhedra: cut and score paths for
//! a net of triangular faces joined by interlocking tabs, ready for a laser
//! cutter or plotter.
//!
//! ## Architecture
//!
//! Polynet is organized as a workspace with multiple crates:
//!
//! 1. **polynet-core** - Points, hinge plotting, triangles, polygon offsets, affine matrices
//! 2. **polynet-path** - Immutable path model, path data parsing and serialization
//! 3. **polynet-shapes** - Dash strokes, edge tabs and pyramid net assembly
//! 4. **polynet-settings** - JSON/TOML dieline configuration
//! 5. **polynet** - Facade and the `polynet` binary that renders SVG

pub use polynet_core as geometry;
pub use polynet_path as path;
pub use polynet_settings as settings;
pub use polynet_shapes as shapes;

pub use polynet_core::{AffineMatrix, BoundingBox, GeometryError, Point, TransformObject};
pub use polynet_path::{parse_path, Command, PathData, PathError};
pub use polynet_settings::{DielineConfig, SettingsError};
pub use polynet_shapes::{
    pyramid_net, AscendantEdgeTabsSpec, BaseEdgeTabSpec, DashPatternSpec, FaceDecoration,
    PolyhedronSpec, PyramidNet, PyramidNetSpec, ShapeError, TexturePattern,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Generate the SVG document for a config, including its face decoration.
pub fn render_svg(config: &DielineConfig) -> anyhow::Result<String> {
    let net = pyramid_net(&config.to_net_spec()?)?;
    Ok(net.to_svg_document_with_decoration(config.face_decoration.as_ref()))
}

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - RUST_LOG environment variable support, INFO by default
/// - Output on stderr, leaving stdout for the SVG document
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_default_config() {
        let svg = render_svg(&DielineConfig::default()).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_render_rejects_invalid_config() {
        let mut config = DielineConfig::default();
        config.polyhedron.face_count = 9;
        assert!(render_svg(&config).is_err());
    }

    #[test]
    fn test_build_metadata() {
        assert!(!VERSION.is_empty());
        assert!(!BUILD_DATE.is_empty());
    }
}
