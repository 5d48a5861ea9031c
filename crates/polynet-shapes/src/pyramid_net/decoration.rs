//! Artwork placed on every face of a net.

use polynet_core::{AffineMatrix, TransformObject};
use polynet_path::PathData;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Source artwork for a texture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TexturePattern {
    Image {
        href: String,
        width: f64,
        height: f64,
    },
    Vector {
        #[serde(serialize_with = "serialize_path", deserialize_with = "deserialize_path")]
        d: PathData,
    },
}

/// What gets drawn inside each face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FaceDecoration {
    /// Path already drawn in face coordinates.
    Path {
        #[serde(serialize_with = "serialize_path", deserialize_with = "deserialize_path")]
        d: PathData,
    },
    /// Pattern positioned by a user transform before the border inset.
    Texture {
        pattern: TexturePattern,
        #[serde(default)]
        transform: TransformObject,
    },
}

impl FaceDecoration {
    /// Matrix taking decoration coordinates into the first face's inset area.
    pub fn placement_matrix(&self, border_inset: &AffineMatrix) -> AffineMatrix {
        match self {
            FaceDecoration::Path { .. } => *border_inset,
            FaceDecoration::Texture { transform, .. } => transform.to_matrix().then(border_inset),
        }
    }

    /// SVG element drawing this decoration under `matrix`.
    pub fn to_svg_fragment(&self, matrix: &AffineMatrix) -> String {
        let transform = matrix.to_svg_string();
        match self {
            FaceDecoration::Path { d } => format!(
                r##"<path d="{}" transform="{}" fill="none" stroke="#000000"/>"##,
                d.get_d(),
                transform
            ),
            FaceDecoration::Texture {
                pattern: TexturePattern::Vector { d },
                ..
            } => format!(
                r##"<path d="{}" transform="{}" fill="#000000"/>"##,
                d.get_d(),
                transform
            ),
            FaceDecoration::Texture {
                pattern: TexturePattern::Image { href, width, height },
                ..
            } => format!(
                r#"<image href="{}" width="{}" height="{}" transform="{}"/>"#,
                escape_attribute(href),
                width,
                height,
                transform
            ),
        }
    }
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn serialize_path<S>(path: &PathData, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&path.get_d())
}

fn deserialize_path<'de, D>(deserializer: D) -> Result<PathData, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.parse::<PathData>().map_err(serde::de::Error::custom)
}
