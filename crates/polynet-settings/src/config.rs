//! Dieline configuration
//!
//! A [`DielineConfig`] gathers everything needed to generate one pyramid net:
//! the polyhedron, both tab styles, the score line dash pattern and an
//! optional face decoration. Configs are stored as JSON or TOML, chosen by
//! file extension, and are validated whenever they are loaded or saved.

use polynet_shapes::{
    dash_pattern, AscendantEdgeTabsSpec, BaseEdgeTabSpec, DashPatternSpec, FaceDecoration,
    PolyhedronSpec, PyramidNetSpec, MAX_DASH_REPETITIONS,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{SettingsError, SettingsResult};

/// Supported on-disk formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// Pick the format from the file extension.
    pub fn from_path(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(SettingsError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

/// Complete dieline configuration
///
/// Scalar settings come before the nested sections so the TOML form keeps
/// them at the top level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DielineConfig {
    /// Id of a built-in dash pattern used for score lines.
    pub dash_pattern_id: String,
    /// Length covered by one repetition of the dash pattern.
    pub stroke_dash_length: f64,
    /// Dash offset in units of the whole edge.
    pub stroke_dash_offset_ratio: f64,
    /// Texture margin inside each face, relative to the ascendant edge.
    pub border_inset_ratio: f64,
    pub polyhedron: PolyhedronSpec,
    pub ascendant_edge_tabs: AscendantEdgeTabsSpec,
    pub base_edge_tab: BaseEdgeTabSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub face_decoration: Option<FaceDecoration>,
}

impl Default for DielineConfig {
    fn default() -> Self {
        Self {
            dash_pattern_id: "long".to_string(),
            stroke_dash_length: 11.0,
            stroke_dash_offset_ratio: 0.0,
            border_inset_ratio: 0.05,
            polyhedron: PolyhedronSpec::default(),
            ascendant_edge_tabs: AscendantEdgeTabsSpec::default(),
            base_edge_tab: BaseEdgeTabSpec::default(),
            face_decoration: None,
        }
    }
}

fn invalid(key: &str, reason: impl Into<String>) -> SettingsError {
    SettingsError::InvalidSetting {
        key: key.to_string(),
        reason: reason.into(),
    }
}

impl DielineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: Self = match format {
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::info!("Loaded dieline config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;
        let format = ConfigFormat::from_path(path)?;

        let content = match format {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        std::fs::write(path, content)?;
        tracing::info!("Saved dieline config to {}", path.display());
        Ok(())
    }

    /// Check every setting, including the shape parameters.
    pub fn validate(&self) -> SettingsResult<()> {
        dash_pattern(&self.dash_pattern_id)?;

        if !(self.stroke_dash_length.is_finite() && self.stroke_dash_length > 0.0) {
            return Err(invalid("stroke_dash_length", "must be a positive number"));
        }
        if !(0.0..1.0).contains(&self.stroke_dash_offset_ratio) {
            return Err(invalid("stroke_dash_offset_ratio", "must be in [0, 1)"));
        }
        if !(0.0..0.5).contains(&self.border_inset_ratio) {
            return Err(invalid("border_inset_ratio", "must be in [0, 0.5)"));
        }

        self.polyhedron.validate()?;
        let longest_edge = self
            .polyhedron
            .face_edge_lengths()?
            .into_iter()
            .fold(0.0, f64::max);
        let shortest_dash = longest_edge / MAX_DASH_REPETITIONS as f64;
        if self.stroke_dash_length < shortest_dash {
            return Err(invalid(
                "stroke_dash_length",
                format!("must be at least {:.4} for this polyhedron", shortest_dash),
            ));
        }
        self.ascendant_edge_tabs.validate()?;
        self.base_edge_tab.validate()?;
        Ok(())
    }

    /// Resolve the catalog dash pattern into a stroke spec.
    pub fn dash_spec(&self) -> SettingsResult<DashPatternSpec> {
        let pattern = dash_pattern(&self.dash_pattern_id)?;
        Ok(DashPatternSpec::from_pattern(
            pattern,
            self.stroke_dash_length,
            self.stroke_dash_offset_ratio,
        ))
    }

    /// Parameters for [`polynet_shapes::pyramid_net`].
    pub fn to_net_spec(&self) -> SettingsResult<PyramidNetSpec> {
        self.validate()?;
        Ok(PyramidNetSpec {
            polyhedron: self.polyhedron.clone(),
            ascendant_edge_tabs: self.ascendant_edge_tabs.clone(),
            base_edge_tab: self.base_edge_tab.clone(),
            score_dash: self.dash_spec()?,
            border_inset_ratio: self.border_inset_ratio,
        })
    }
}
