//! Type definitions for pyramid net assembly

use polynet_core::{
    polygon_points_given_angles_and_sides, triangle_angles_given_sides, AffineMatrix,
    BoundingBox, Point,
};
use polynet_path::PathData;
use serde::{Deserialize, Serialize};

use crate::ascendant_tabs::AscendantEdgeTabsSpec;
use crate::base_tab::BaseEdgeTabSpec;
use crate::dash::DashPatternSpec;
use crate::error::{ShapeError, ShapeResult};
use crate::generic::is_positive;

use super::decoration::FaceDecoration;

/// Relative tolerance for the two ascendant edges of a face to count as equal.
const EDGE_MATCH_TOLERANCE: f64 = 1e-9;

/// A pyramid made of `face_count` identical triangles meeting at an apex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolyhedronSpec {
    /// Distinct relative edge lengths referenced by `face_edge_indices`.
    pub unique_face_edge_lengths: Vec<f64>,
    /// Face edges as `[apex to base0, base0 to base1, base1 to apex]`.
    pub face_edge_indices: [usize; 3],
    /// Scale: the ascendant edges come out at half the diameter.
    pub diameter: f64,
    pub face_count: usize,
    /// Number of nets to cut to build the whole polyhedron.
    pub copies_needed: usize,
}

impl Default for PolyhedronSpec {
    /// Square pyramid with equilateral faces; two copies make an octahedron.
    fn default() -> Self {
        Self {
            unique_face_edge_lengths: vec![1.0],
            face_edge_indices: [0, 0, 0],
            diameter: 300.0,
            face_count: 4,
            copies_needed: 2,
        }
    }
}

impl PolyhedronSpec {
    pub fn validate(&self) -> ShapeResult<()> {
        if self.unique_face_edge_lengths.is_empty()
            || !self.unique_face_edge_lengths.iter().all(|len| is_positive(*len))
        {
            return Err(ShapeError::InvalidParameters(
                "face edge lengths must be positive".to_string(),
            ));
        }
        if let Some(index) = self
            .face_edge_indices
            .iter()
            .find(|i| **i >= self.unique_face_edge_lengths.len())
        {
            return Err(ShapeError::InvalidParameters(format!(
                "face edge index {} out of range for {} lengths",
                index,
                self.unique_face_edge_lengths.len()
            )));
        }
        if !is_positive(self.diameter) {
            return Err(ShapeError::InvalidParameters(
                "diameter must be positive".to_string(),
            ));
        }
        if self.face_count < 3 {
            return Err(ShapeError::InvalidParameters(
                "a pyramid needs at least 3 faces".to_string(),
            ));
        }
        if self.copies_needed == 0 {
            return Err(ShapeError::InvalidParameters(
                "copies_needed must be at least 1".to_string(),
            ));
        }

        let [first, _, last] = self.raw_face_edge_lengths();
        if (first - last).abs() > EDGE_MATCH_TOLERANCE * first.max(last) {
            return Err(ShapeError::InvalidParameters(format!(
                "ascendant edges differ: {} and {}",
                first, last
            )));
        }
        Ok(())
    }

    fn raw_face_edge_lengths(&self) -> [f64; 3] {
        self.face_edge_indices
            .map(|i| self.unique_face_edge_lengths.get(i).copied().unwrap_or(0.0))
    }

    /// Face edge lengths scaled so the ascendant edges are half the diameter.
    pub fn face_edge_lengths(&self) -> ShapeResult<[f64; 3]> {
        self.validate()?;
        let raw = self.raw_face_edge_lengths();
        let scale = self.diameter / 2.0 / raw[0];
        Ok(raw.map(|len| len * scale))
    }

    /// Interior angle opposite each face edge: at base1, at the apex, at base0.
    pub fn face_interior_angles(&self) -> ShapeResult<[f64; 3]> {
        Ok(triangle_angles_given_sides(self.face_edge_lengths()?)?)
    }

    pub fn apex_angle(&self) -> ShapeResult<f64> {
        Ok(self.face_interior_angles()?[1])
    }

    /// `[apex, base0, base1]` with the apex at the origin and base0 on the
    /// positive x axis.
    pub fn face_boundary_points(&self) -> ShapeResult<Vec<Point>> {
        let sides = self.face_edge_lengths()?;
        let angles = triangle_angles_given_sides(sides)?;
        Ok(polygon_points_given_angles_and_sides(&angles, &sides)?)
    }
}

/// Everything needed to lay out one pyramid net.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PyramidNetSpec {
    pub polyhedron: PolyhedronSpec,
    #[serde(default)]
    pub ascendant_edge_tabs: AscendantEdgeTabsSpec,
    #[serde(default)]
    pub base_edge_tab: BaseEdgeTabSpec,
    #[serde(default)]
    pub score_dash: DashPatternSpec,
    /// Texture margin inside each face, as a ratio of the ascendant edge.
    #[serde(default)]
    pub border_inset_ratio: f64,
}

/// Generated dieline for one pyramid net.
#[derive(Debug, Clone, PartialEq)]
pub struct PyramidNet {
    pub cut: PathData,
    pub score: PathData,
    /// Outline of the first face; the others are rotations about the apex.
    pub face_boundary: Vec<Point>,
    /// Maps face coordinates into the inset texture area.
    pub border_inset: AffineMatrix,
    pub face_count: usize,
    pub apex_angle: f64,
    pub copies_needed: usize,
}

const CUT_STROKE: &str = "#FF0000";
const SCORE_STROKE: &str = "#0000FF";

impl PyramidNet {
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        match (self.cut.bounding_box(), self.score.bounding_box()) {
            (Some(a), Some(b)) => Some(a.union(&b)),
            (a, b) => a.or(b),
        }
    }

    /// Rotation placing the first face onto face `index`.
    pub fn face_rotation(&self, index: usize) -> AffineMatrix {
        AffineMatrix::rotation(self.apex_angle * index as f64)
    }

    /// Standalone SVG document with red cut and blue score strokes.
    pub fn to_svg_document(&self) -> String {
        self.to_svg_document_with_decoration(None)
    }

    /// [`Self::to_svg_document`] with `decoration` placed on every face.
    pub fn to_svg_document_with_decoration(&self, decoration: Option<&FaceDecoration>) -> String {
        let bounds = self
            .bounding_box()
            .map(|b| b.expanded(b.width().max(b.height()) * 0.02));
        let (min_x, min_y, width, height) = bounds
            .map(|b| (b.min.x, b.min.y, b.width(), b.height()))
            .unwrap_or((0.0, 0.0, 0.0, 0.0));
        let stroke_width = (width.max(height) / 500.0).max(0.1);

        let mut svg = String::new();
        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" viewBox="{} {} {} {}">"#,
            min_x, min_y, width, height
        ));
        svg.push('\n');

        if let Some(decoration) = decoration {
            let placement = decoration.placement_matrix(&self.border_inset);
            for face in 0..self.face_count {
                let matrix = placement.then(&self.face_rotation(face));
                svg.push_str("  ");
                svg.push_str(&decoration.to_svg_fragment(&matrix));
                svg.push('\n');
            }
        }

        svg.push_str(&format!(
            r#"  <path d="{}" fill="none" stroke="{}" stroke-width="{}"/>"#,
            self.score.get_d(),
            SCORE_STROKE,
            stroke_width
        ));
        svg.push('\n');
        svg.push_str(&format!(
            r#"  <path d="{}" fill="none" stroke="{}" stroke-width="{}"/>"#,
            self.cut.get_d(),
            CUT_STROKE,
            stroke_width
        ));
        svg.push_str("\n</svg>\n");
        svg
    }
}
