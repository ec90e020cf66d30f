//! Error types for the NutriSculpt calculators
//!
//! Formula functions never fail (they return sentinels); these errors cover
//! the export/share pipeline, preference persistence and input validation.

use thiserror::Error;

/// Failures while turning a result card into an image
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    /// The card to capture is not attached; raised before any async work
    #[error("Shareable card ref not found")]
    TargetMissing,

    #[error("Rasterization failed: {0}")]
    Rasterization(String),

    #[error("Failed to generate image blob: {0}")]
    Encoding(String),
}

/// Failures while handing a result to a share surface
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShareError {
    /// The user dismissed the share sheet; never retried
    #[error("Share aborted by user")]
    Aborted,

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Share surface error: {0}")]
    Surface(String),

    #[error("Invalid share URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid file name: {0}")]
    FileName(String),
}

/// Preference persistence errors
#[derive(Error, Debug)]
pub enum PreferenceError {
    #[error("Preference storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Preference serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Input validation errors (form/CLI input, not formula output)
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    Fields(#[from] validator::ValidationErrors),
}
