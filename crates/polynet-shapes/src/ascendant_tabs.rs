//! Interlocking tabs along the slanted edges shared by neighbouring faces.
//!
//! The male edge is one continuous cut threading through a row of
//! trapezoidal tabs. The female edge gets one tapered hole per tab on the
//! opposite side, each its own closed sub-path.

use polynet_core::{hinged_plot, symmetric_hinge_plot_by_projection_distance, Point};
use polynet_path::PathData;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};
use tracing::debug;

use crate::dash::{intervals_path, stroke_dash_path_ratios, DashPatternSpec};
use crate::error::{ShapeError, ShapeResult};
use crate::generic::{is_non_negative, is_positive, CutScore};
use crate::intervals::{complement_intervals, subtract_intervals, Interval};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AscendantEdgeTabsSpec {
    /// Corner rounding of the female flap, as a ratio of the tab depth.
    pub flap_rounding_distance_ratio: f64,
    /// Radians the hole sides lean in from perpendicular.
    pub hole_flap_taper_angle: f64,
    pub hole_reach_to_tab_depth: f64,
    /// Hole width as a ratio of the tab base width.
    pub hole_width_ratio: f64,
    pub tab_depth_to_traversal_length: f64,
    /// How far each apex corner is pulled in, as a ratio of the tab base width.
    pub tab_edge_endpoints_indentation: f64,
    /// Bezier handle length as a ratio of the tab side length.
    pub tab_control_points_protrusion: f64,
    /// Radians the bezier handles turn away from the tab side.
    pub tab_control_points_angle: f64,
    pub tabs_count: usize,
    /// Share of the edge covered by tabs when spacing them evenly.
    pub tab_wideness: f64,
}

impl Default for AscendantEdgeTabsSpec {
    fn default() -> Self {
        Self {
            flap_rounding_distance_ratio: 0.3,
            hole_flap_taper_angle: PI / 10.0,
            hole_reach_to_tab_depth: 0.95,
            hole_width_ratio: 0.9,
            tab_depth_to_traversal_length: 0.04,
            tab_edge_endpoints_indentation: 0.1,
            tab_control_points_protrusion: 0.4,
            tab_control_points_angle: PI / 6.0,
            tabs_count: 3,
            tab_wideness: 0.6,
        }
    }
}

/// Tab intervals and the gaps around them.
#[derive(Debug, Clone, PartialEq)]
pub struct TabIntervals {
    pub tab_interval_ratios: Vec<Interval>,
    pub tab_gap_interval_ratios: Vec<Interval>,
}

impl AscendantEdgeTabsSpec {
    pub fn validate(&self) -> ShapeResult<()> {
        let fail = |msg: &str| Err(ShapeError::InvalidParameters(msg.to_string()));

        if self.tabs_count == 0 {
            return fail("tabs_count must be at least 1");
        }
        if !is_positive(self.tab_wideness) || self.tab_wideness >= 1.0 {
            return fail("tab_wideness must be between 0 and 1");
        }
        if !is_positive(self.tab_depth_to_traversal_length) {
            return fail("tab_depth_to_traversal_length must be positive");
        }
        if !(0.0..0.5).contains(&self.tab_edge_endpoints_indentation) {
            return fail("tab_edge_endpoints_indentation must be in [0, 0.5)");
        }
        if !(0.0..FRAC_PI_2).contains(&self.hole_flap_taper_angle) {
            return fail("hole_flap_taper_angle must be in [0, pi/2)");
        }
        if !is_positive(self.hole_reach_to_tab_depth) || !is_positive(self.hole_width_ratio) {
            return fail("hole_reach_to_tab_depth and hole_width_ratio must be positive");
        }
        if !is_non_negative(self.tab_control_points_protrusion) {
            return fail("tab_control_points_protrusion must not be negative");
        }
        if !is_non_negative(self.flap_rounding_distance_ratio) {
            return fail("flap_rounding_distance_ratio must not be negative");
        }
        Ok(())
    }

    /// `tabs_count` evenly spaced tabs, each centered in an equal share of
    /// the edge and `tab_wideness` of that share wide.
    pub fn interval_ratios(&self) -> TabIntervals {
        let count = self.tabs_count.max(1) as f64;
        let half_width = self.tab_wideness / (2.0 * count);
        let tab_interval_ratios: Vec<Interval> = (0..self.tabs_count)
            .map(|i| {
                let center = (i as f64 + 0.5) / count;
                [center - half_width, center + half_width]
            })
            .collect();
        let tab_gap_interval_ratios = complement_intervals(&tab_interval_ratios);
        TabIntervals {
            tab_interval_ratios,
            tab_gap_interval_ratios,
        }
    }
}

/// Cut and score paths for both sides of an ascendant edge.
#[derive(Debug, Clone, PartialEq)]
pub struct AscendantEdgeTabs {
    pub male: CutScore,
    pub female: CutScore,
}

/// Bezier controls bulging a tab side from `a` to `b`.
fn side_controls(a: Point, b: Point, protrusion: f64, angle: f64) -> (Point, Point) {
    let handle = a.distance_to(&b) * protrusion;
    (hinged_plot(b, a, -angle, handle), hinged_plot(a, b, angle, handle))
}

fn check_intervals(intervals: &[Interval], count: usize) -> ShapeResult<()> {
    if intervals.len() < count {
        return Err(ShapeError::InvalidParameters(format!(
            "{} tab intervals given for {} tabs",
            intervals.len(),
            count
        )));
    }
    let tabs = &intervals[..count];
    if let Some(bad) = tabs
        .iter()
        .find(|[a, b]| !(0.0 <= *a && a < b && *b <= 1.0))
    {
        return Err(ShapeError::InvalidParameters(format!(
            "tab interval {:?} is not an increasing range within [0, 1]",
            bad
        )));
    }
    // Tabs are cut in order along the edge, so they may touch but not overlap.
    if let Some(pair) = tabs.windows(2).find(|pair| pair[0][1] > pair[1][0]) {
        return Err(ShapeError::InvalidParameters(format!(
            "tab intervals {:?} and {:?} overlap or are out of order",
            pair[0], pair[1]
        )));
    }
    Ok(())
}

/// Male tabs and female holes for the edge from `start` to `end`.
///
/// Tabs protrude to the side reached by turning the edge direction by −π/2
/// and holes are cut on the other side. The male score creases across each
/// tab base; the female score creases the fold between holes.
pub fn ascendant_edge_connection_tabs(
    start: Point,
    end: Point,
    spec: &AscendantEdgeTabsSpec,
    score_dash: &DashPatternSpec,
    tab_interval_ratios: &[Interval],
    tab_gap_interval_ratios: &[Interval],
) -> ShapeResult<AscendantEdgeTabs> {
    spec.validate()?;
    check_intervals(tab_interval_ratios, spec.tabs_count)?;

    let length = start.distance_to(&end);
    if length <= f64::EPSILON {
        return Err(ShapeError::InvalidParameters(
            "ascendant edge has zero length".to_string(),
        ));
    }
    let tab_depth = spec.tab_depth_to_traversal_length * length;
    let hole_depth = spec.hole_reach_to_tab_depth * tab_depth;
    let hole_theta = FRAC_PI_2 - spec.hole_flap_taper_angle;
    let tabs = &tab_interval_ratios[..spec.tabs_count];

    let mut male_cut = PathData::new().move_to(start);
    let mut female_cut = PathData::new();

    for [r0, r1] in tabs {
        let base0 = start.lerp(&end, *r0);
        let base1 = start.lerp(&end, *r1);
        let base_width = base0.distance_to(&base1);

        let theta = if spec.tab_edge_endpoints_indentation > 0.0 {
            tab_depth.atan2(spec.tab_edge_endpoints_indentation * base_width)
        } else {
            FRAC_PI_2
        };
        let [apex0, apex1] =
            symmetric_hinge_plot_by_projection_distance(base0, base1, theta, tab_depth)?;

        let (rise1, rise2) = side_controls(
            base0,
            apex0,
            spec.tab_control_points_protrusion,
            spec.tab_control_points_angle,
        );
        let (fall1, fall2) = side_controls(
            apex1,
            base1,
            spec.tab_control_points_protrusion,
            spec.tab_control_points_angle,
        );
        male_cut = male_cut
            .line_to(base0)?
            .cubic_bezier(rise1, rise2, apex0)?
            .line_to(apex1)?
            .cubic_bezier(fall1, fall2, base1)?;

        let center = base0.midpoint(&base1);
        let half_hole = (base1 - base0).normalized() * (spec.hole_width_ratio * base_width / 2.0);
        let hole_start = center - half_hole;
        let hole_end = center + half_hole;
        let [reach_end, reach_start] =
            symmetric_hinge_plot_by_projection_distance(hole_end, hole_start, hole_theta, hole_depth)?;
        female_cut = female_cut
            .move_to(hole_start)
            .line_to(reach_start)?
            .line_to(reach_end)?
            .line_to(hole_end)?
            .close()?;
    }
    male_cut = male_cut.line_to(end)?;

    let dashes = stroke_dash_path_ratios(start, end, score_dash)?;
    let male_score = intervals_path(start, end, &subtract_intervals(&dashes, tab_gap_interval_ratios))?;
    let female_score = intervals_path(start, end, &subtract_intervals(&dashes, tabs))?;

    debug!(
        "Ascendant edge of length {:.3}: {} tabs, depth {:.3}",
        length, spec.tabs_count, tab_depth
    );

    Ok(AscendantEdgeTabs {
        male: CutScore {
            cut: male_cut,
            score: male_score,
        },
        female: CutScore {
            cut: female_cut,
            score: female_score,
        },
    })
}
