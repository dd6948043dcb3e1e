//! Error types for Rotadiff core.

use thiserror::Error;

/// Errors that can occur while loading, diffing or producing workbooks
#[derive(Error, Debug)]
pub enum RotadiffError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read workbook {which}: {message}")]
    Workbook { which: String, message: String },

    #[error("Failed to read sheet '{sheet}': {message}")]
    Sheet { sheet: String, message: String },

    #[error("Solver error: {0}")]
    Solver(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RotadiffError>;
