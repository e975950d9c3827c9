//! Configuration for a heatmap instance.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::color::{default_gradient, resolve_stops, ColorStop};
use crate::error::{HeatmapError, HeatmapResult};

/// Opacity cap used when no (or a zero) opacity is configured.
pub const DEFAULT_OPACITY_CAP: u8 = 180;

/// Configuration for a heatmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapConfig {
    /// Stamping radius in pixels.
    #[serde(default = "default_radius")]
    pub radius: u32,

    /// Surface width in pixels, 0 to take the host's width.
    #[serde(default)]
    pub width: u32,

    /// Surface height in pixels, 0 to take the host's height.
    #[serde(default)]
    pub height: u32,

    /// Gradient stops mapping intensity to color.
    #[serde(default = "default_gradient")]
    pub gradient: Vec<ColorStop>,

    /// Maximum displayed opacity in percent (0-100).
    #[serde(default)]
    pub opacity: Option<f32>,

    /// Whether the display surface is shown.
    #[serde(default = "default_true")]
    pub visible: bool,

    /// Optional legend configuration
    #[serde(default)]
    pub legend: Option<LegendConfig>,

    /// What happens to the running maximum when the heatmap is cleared.
    #[serde(default)]
    pub max_on_clear: MaxResetPolicy,
}

fn default_radius() -> u32 {
    40
}

fn default_true() -> bool {
    true
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            radius: default_radius(),
            width: 0,
            height: 0,
            gradient: default_gradient(),
            opacity: None,
            visible: true,
            legend: None,
            max_on_clear: MaxResetPolicy::default(),
        }
    }
}

/// Behavior of the running maximum on `clear()`.
///
/// `Persist` keeps the last maximum so later points are colored on the old
/// scale. That is what the library has always done, although it may be a
/// latent defect; `Reset` starts over at 1 like a freshly created store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxResetPolicy {
    #[default]
    Persist,
    Reset,
}

/// Legend configuration. Its presence enables the legend scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendConfig {
    /// Stored with the exported legend strip
    #[serde(default = "default_legend_title")]
    pub title: String,
}

fn default_legend_title() -> String {
    "Legend".to_string()
}

impl Default for LegendConfig {
    fn default() -> Self {
        Self {
            title: default_legend_title(),
        }
    }
}

impl HeatmapConfig {
    /// Parse configuration from a JSON string.
    pub fn from_json(json: &str) -> HeatmapResult<Self> {
        serde_json::from_str(json).map_err(|e| HeatmapError::InvalidConfig(e.to_string()))
    }

    /// Load configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> HeatmapResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Override fields from `HEATMAP_*` environment variables that are set
    /// and parse; anything else is left alone.
    pub fn apply_env(&mut self) {
        if let Ok(val) = std::env::var("HEATMAP_RADIUS") {
            if let Ok(radius) = val.parse() {
                self.radius = radius;
            }
        }

        if let Ok(val) = std::env::var("HEATMAP_WIDTH") {
            if let Ok(width) = val.parse() {
                self.width = width;
            }
        }

        if let Ok(val) = std::env::var("HEATMAP_HEIGHT") {
            if let Ok(height) = val.parse() {
                self.height = height;
            }
        }

        if let Ok(val) = std::env::var("HEATMAP_OPACITY") {
            if let Ok(opacity) = val.parse() {
                self.opacity = Some(opacity);
            }
        }

        if let Ok(val) = std::env::var("HEATMAP_VISIBLE") {
            self.visible = val.to_lowercase() == "true" || val == "1";
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> HeatmapResult<()> {
        if self.radius == 0 {
            return Err(HeatmapError::InvalidConfig("radius must be > 0".to_string()));
        }

        if let Some(opacity) = self.opacity {
            if !opacity.is_finite() || opacity <= 0.0 || opacity > 100.0 {
                return Err(HeatmapError::InvalidConfig(format!(
                    "opacity must be in (0, 100], got {}",
                    opacity
                )));
            }
        }

        resolve_stops(&self.gradient)
            .map_err(|e| HeatmapError::InvalidConfig(format!("gradient: {}", e)))?;

        Ok(())
    }

    /// Maximum alpha (0-255) any displayed pixel may reach.
    pub fn opacity_cap(&self) -> u8 {
        let cap = match self.opacity {
            Some(pct) if pct.is_finite() && pct > 0.0 => (255.0 / (100.0 / pct)).min(255.0) as u8,
            _ => 0,
        };
        if cap == 0 {
            DEFAULT_OPACITY_CAP
        } else {
            cap
        }
    }

    /// Surface dimensions, taking the host's size for any zero dimension.
    pub fn resolve_size(&self, host_width: u32, host_height: u32) -> HeatmapResult<(u32, u32)> {
        let width = if self.width == 0 { host_width } else { self.width };
        let height = if self.height == 0 { host_height } else { self.height };
        if width == 0 || height == 0 {
            return Err(HeatmapError::InvalidConfig(format!(
                "surface size {}x{} is empty",
                width, height
            )));
        }
        Ok((width, height))
    }
}
