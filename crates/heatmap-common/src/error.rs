//! Error types for the heatmap crates.

use thiserror::Error;

/// Result type alias using HeatmapError.
pub type HeatmapResult<T> = Result<T, HeatmapError>;

/// Primary error type for heatmap operations.
#[derive(Debug, Error)]
pub enum HeatmapError {
    // === Input Errors ===
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // === Rendering Errors ===
    #[error("Surface error: {0}")]
    Surface(String),

    #[error("Image encoding failed: {0}")]
    Encode(String),

    // === Infrastructure Errors ===
    #[error("IO error: {0}")]
    Io(String),
}

impl HeatmapError {
    /// Whether the error was caused by caller-supplied data rather than the host.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            HeatmapError::InvalidInput(_)
                | HeatmapError::InvalidColor(_)
                | HeatmapError::InvalidConfig(_)
        )
    }
}

// Conversion from common error types
impl From<std::io::Error> for HeatmapError {
    fn from(err: std::io::Error) -> Self {
        HeatmapError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for HeatmapError {
    fn from(err: serde_json::Error) -> Self {
        HeatmapError::InvalidInput(format!("JSON error: {}", err))
    }
}
