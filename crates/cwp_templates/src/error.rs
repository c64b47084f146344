//! Error types for template resolution.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Errors that can occur while resolving or unpacking a template.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Package manifest not found: {0}")]
    ManifestNotFound(PathBuf),

    #[error("Invalid package manifest {path}: {message}")]
    InvalidManifest { path: PathBuf, message: String },

    #[error("Could not extract template archive {source_ref}: {message}")]
    ExtractionFailed { source_ref: String, message: String },

    #[error("Download failed: {0}")]
    Download(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}
