//! Persisted heatmap dataset format.
//!
//! ```json
//! { "max": 12, "data": [{ "x": 10, "y": 20, "count": 3 }] }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{HeatmapError, HeatmapResult};

/// A single weighted point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: u32,
    pub y: u32,
    pub count: f64,
}

impl DataPoint {
    pub fn new(x: u32, y: u32, count: f64) -> Self {
        Self { x, y, count }
    }
}

/// Interchange shape for save/restore of a heatmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSet {
    /// Maximum count used as the color scale's upper bound.
    pub max: f64,

    /// Points in no particular order.
    pub data: Vec<DataPoint>,
}

impl DataSet {
    pub fn new(max: f64, data: Vec<DataPoint>) -> Self {
        Self { max, data }
    }

    /// Parse a dataset from a JSON string.
    pub fn from_json(json: &str) -> HeatmapResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a dataset from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> HeatmapResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Serialize the dataset to JSON.
    pub fn to_json(&self) -> HeatmapResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Reject datasets that would corrupt the surfaces.
    ///
    /// Counts must be positive; absent cells are simply left out. An empty
    /// point list is valid (it is what an empty heatmap exports).
    pub fn validate(&self) -> HeatmapResult<()> {
        if !self.max.is_finite() || self.max <= 0.0 {
            return Err(HeatmapError::InvalidInput(format!(
                "dataset max must be a positive number, got {}",
                self.max
            )));
        }

        if let Some(point) = self
            .data
            .iter()
            .find(|p| !p.count.is_finite() || p.count <= 0.0)
        {
            return Err(HeatmapError::InvalidInput(format!(
                "point ({}, {}) has invalid count {}",
                point.x, point.y, point.count
            )));
        }

        Ok(())
    }

    /// Largest count among the points, if any.
    pub fn largest_count(&self) -> Option<f64> {
        self.data.iter().map(|p| p.count).reduce(f64::max)
    }
}
