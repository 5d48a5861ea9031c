//! Pyramid net assembly.
//!
//! Faces are laid out radially around the apex at the origin. Face `k` spans
//! from ring vertex `k` to `k + 1`. The first ascendant edge carries the male
//! tabs, the last one carries the female holes on a flap that folds under the
//! first face, and every base edge gets an interlocking tab.

mod decoration;
mod types;

pub use decoration::{FaceDecoration, TexturePattern};
pub use types::{PolyhedronSpec, PyramidNet, PyramidNetSpec};

use polynet_core::{
    hinged_plot, hinged_plot_by_projection_distance, offset_polygon_points, AffineMatrix,
    BoundingBox, Point,
};
use polynet_path::{Command, PathData};
use std::f64::consts::{FRAC_PI_2, PI, TAU};
use tracing::{debug, info, warn};

use crate::ascendant_tabs::ascendant_edge_connection_tabs;
use crate::base_tab::base_edge_connection_tab;
use crate::dash::stroke_dash_path;
use crate::error::{ShapeError, ShapeResult};
use crate::generic::{is_non_negative, rounded_edge_path};

/// Smallest gap kept between the flap and the first face at the apex.
pub const FLAP_APEX_IMPINGE_MARGIN: f64 = PI / 12.0;

/// Slack for apex angles that sum to a full turn up to rounding.
const FULL_TURN_TOLERANCE: f64 = 1e-9;

/// Points closer than this are treated as the same pen position.
const JOIN_TOLERANCE: f64 = 1e-9;

/// Append `piece`, dropping its leading move when the pen is already there.
fn append_continuing(path: PathData, piece: &PathData) -> ShapeResult<PathData> {
    let commands = piece.commands();
    let continues = match (path.get_last_position(), commands.first()) {
        (Some(last), Some(Command::Move { to })) => last.approx_eq(to, JOIN_TOLERANCE),
        _ => false,
    };
    let skip = usize::from(continues);
    Ok(path.concat_commands(commands[skip..].iter().copied())?)
}

/// Affine map from the face boundary's bounds onto the bounds of the
/// boundary inset by `distance`.
///
/// Scaling is uniform, using the ratio of the inset width to the original
/// width.
pub fn border_inset_matrix(boundary: &[Point], distance: f64) -> ShapeResult<AffineMatrix> {
    if !is_non_negative(distance) {
        return Err(ShapeError::InvalidParameters(format!(
            "border inset distance must be non-negative, got {}",
            distance
        )));
    }
    let outer = BoundingBox::from_points(boundary).ok_or_else(|| {
        ShapeError::InvalidParameters("face boundary has no points".to_string())
    })?;
    let inset = offset_polygon_points(boundary, -distance)?;
    let inner = BoundingBox::from_points(&inset).ok_or_else(|| {
        ShapeError::InvalidParameters("border inset left nothing of the face".to_string())
    })?;
    if outer.width() <= f64::EPSILON {
        return Err(ShapeError::InvalidParameters(
            "face boundary has zero width".to_string(),
        ));
    }

    let scale = inner.width() / outer.width();
    Ok(AffineMatrix::translation(-outer.min.x, -outer.min.y)
        .then(&AffineMatrix::scaling(scale, scale))
        .then(&AffineMatrix::translation(inner.min.x, inner.min.y)))
}

/// Apex angle of the flap on the female edge.
///
/// Stays `FLAP_APEX_IMPINGE_MARGIN` clear of the first face, never exceeds a
/// right angle, and never drops below the angle at which the flap's top edge
/// would fold back past the middle of the edge.
fn flap_apex_angle(remainder: f64, flap_depth: f64, edge_length: f64) -> f64 {
    let minimum = flap_depth.atan2(edge_length / 2.0);
    let preferred = (remainder - FLAP_APEX_IMPINGE_MARGIN).min(FRAC_PI_2);
    if preferred < minimum {
        warn!(
            "Flap apex angle {:.4} rad leaves too little room, clamping to {:.4} rad",
            preferred, minimum
        );
        return minimum;
    }
    preferred
}

/// Generate the cut and score paths for one pyramid net.
///
/// Fails with [`ShapeError::TooManyFaces`] when `face_count` apex angles
/// add up to more than a full turn.
pub fn pyramid_net(spec: &PyramidNetSpec) -> ShapeResult<PyramidNet> {
    let polyhedron = &spec.polyhedron;
    polyhedron.validate()?;
    spec.ascendant_edge_tabs.validate()?;
    spec.base_edge_tab.validate()?;
    if !is_non_negative(spec.border_inset_ratio) || spec.border_inset_ratio >= 0.5 {
        return Err(ShapeError::InvalidParameters(format!(
            "border inset ratio must be in [0, 0.5), got {}",
            spec.border_inset_ratio
        )));
    }

    let face_count = polyhedron.face_count;
    let apex_angle = polyhedron.apex_angle()?;
    let remainder = TAU - face_count as f64 * apex_angle;
    if remainder < -FULL_TURN_TOLERANCE {
        return Err(ShapeError::TooManyFaces {
            face_count,
            apex_angle,
        });
    }

    let face_boundary = polyhedron.face_boundary_points()?;
    let [ascendant_length, base_length, _] = polyhedron.face_edge_lengths()?;
    let apex = Point::ORIGIN;

    let mut ring = vec![Point::new(ascendant_length, 0.0)];
    for k in 0..face_count {
        ring.push(hinged_plot(ring[k], apex, apex_angle, ascendant_length));
    }
    let last = ring[face_count];

    let tabs_spec = &spec.ascendant_edge_tabs;
    let intervals = tabs_spec.interval_ratios();
    let male = ascendant_edge_connection_tabs(
        apex,
        ring[0],
        tabs_spec,
        &spec.score_dash,
        &intervals.tab_interval_ratios,
        &intervals.tab_gap_interval_ratios,
    )?
    .male;
    let female = ascendant_edge_connection_tabs(
        apex,
        last,
        tabs_spec,
        &spec.score_dash,
        &intervals.tab_interval_ratios,
        &intervals.tab_gap_interval_ratios,
    )?
    .female;

    let base_tab_depth = spec.base_edge_tab.tab_depth_to_base_length * base_length;
    let mut cut = male.cut;
    let mut score = male.score;
    for k in 0..face_count {
        let tab = base_edge_connection_tab(
            ring[k],
            ring[k + 1],
            base_tab_depth,
            &spec.base_edge_tab,
            &spec.score_dash,
        )?;
        cut = append_continuing(cut, &tab.cut)?;
        score = score.concat_path(&tab.score)?;
    }

    let flap_depth = tabs_spec.tab_depth_to_traversal_length * ascendant_length;
    let flap_apex = flap_apex_angle(remainder, flap_depth, ascendant_length);
    let flap_base_corner = hinged_plot_by_projection_distance(
        apex,
        last,
        -(FRAC_PI_2 - tabs_spec.hole_flap_taper_angle),
        flap_depth,
    )?;
    let flap_apex_corner = hinged_plot_by_projection_distance(last, apex, flap_apex, flap_depth)?;
    let flap = rounded_edge_path(
        &[last, flap_base_corner, flap_apex_corner, apex],
        tabs_spec.flap_rounding_distance_ratio * flap_depth,
    )?;
    cut = append_continuing(cut, &flap)?;
    cut = cut.concat_path(&female.cut)?;

    for spoke in &ring[1..face_count] {
        score = score.concat_path(&stroke_dash_path(apex, *spoke, &spec.score_dash)?)?;
    }
    score = score.concat_path(&female.score)?;

    let border_inset =
        border_inset_matrix(&face_boundary, spec.border_inset_ratio * ascendant_length)?;

    debug!(
        "Flap apex {:.4} rad, remainder {:.4} rad, base tab depth {:.3}",
        flap_apex, remainder, base_tab_depth
    );
    info!(
        "Assembled pyramid net: {} faces, apex angle {:.4} rad, {} cut and {} score commands",
        face_count,
        apex_angle,
        cut.len(),
        score.len()
    );

    Ok(PyramidNet {
        cut,
        score,
        face_boundary,
        border_inset,
        face_count,
        apex_angle,
        copies_needed: polyhedron.copies_needed,
    })
}
