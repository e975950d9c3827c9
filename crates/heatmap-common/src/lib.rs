//! Common types shared across the heatmap crates.

pub mod color;
pub mod config;
pub mod dataset;
pub mod error;

pub use color::{default_gradient, resolve_stops, Color, ColorStop};
pub use config::{HeatmapConfig, LegendConfig, MaxResetPolicy, DEFAULT_OPACITY_CAP};
pub use dataset::{DataPoint, DataSet};
pub use error::{HeatmapError, HeatmapResult};
