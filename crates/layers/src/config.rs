use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::MapError;

/// Styling and output knobs for map assembly.
///
/// Every field has a default, so a config file only lists what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub selected_fill: String,
    pub selected_stroke: String,
    pub selected_stroke_width: f64,
    pub city_fill: String,
    pub city_stroke: String,
    pub city_stroke_width: f64,
    /// Marker radius in projected units.
    pub marker_radius: f64,
    /// Added on every side of the data bounds.
    pub viewport_padding: f64,
    /// Decimal places of coordinates in path data.
    pub coordinate_precision: u32,
    /// Property read as the feature id; overrides an explicit `id`.
    pub fallback_id_key: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            selected_fill: "#c0e0c0".to_string(),
            selected_stroke: "#a0a0a0".to_string(),
            selected_stroke_width: 0.1,
            city_fill: "#008000".to_string(),
            city_stroke: "#008000".to_string(),
            city_stroke_width: 0.0,
            marker_radius: 0.5,
            viewport_padding: 0.0,
            coordinate_precision: 3,
            fallback_id_key: "wb_a2".to_string(),
        }
    }
}

impl MapConfig {
    pub fn from_json_str(payload: &str) -> Result<Self, MapError> {
        let config: MapConfig =
            serde_json::from_str(payload).map_err(|e| MapError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let path = path.as_ref();
        let payload = fs::read_to_string(path)
            .map_err(|e| MapError::Config(format!("read {}: {e}", path.display())))?;
        Self::from_json_str(&payload)
    }

    fn validate(&self) -> Result<(), MapError> {
        if !(self.marker_radius.is_finite() && self.marker_radius >= 0.0) {
            return Err(MapError::Config(format!(
                "marker_radius must be a non-negative number, got {}",
                self.marker_radius
            )));
        }
        if !(self.viewport_padding.is_finite() && self.viewport_padding >= 0.0) {
            return Err(MapError::Config(format!(
                "viewport_padding must be a non-negative number, got {}",
                self.viewport_padding
            )));
        }
        if self.coordinate_precision > 12 {
            return Err(MapError::Config(format!(
                "coordinate_precision must be at most 12, got {}",
                self.coordinate_precision
            )));
        }
        Ok(())
    }
}
