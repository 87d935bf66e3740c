//! Error types and handling for the command line and session layers
//!
//! The lookup core itself never fails; these errors come from loading data,
//! validating caller input and writing exports.

use crate::store::StoreError;
use serde::Serialize;
use std::fmt;

/// Longest query accepted from callers, in characters
pub const MAX_QUERY_CHARS: usize = 500;

/// Application error types
#[derive(Debug, Serialize)]
pub enum AppError {
    InvalidInput(String),
    NotFound(String),
    DataLoadFailed(String),
    ExportFailed(String),
    ConfigError(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::DataLoadFailed(msg) => write!(f, "Data load failed: {}", msg),
            AppError::ExportFailed(msg) => write!(f, "Export failed: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Config error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// Get the error code for session responses
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "invalid_input",
            AppError::NotFound(_) => "not_found",
            AppError::DataLoadFailed(_) => "data_load_failed",
            AppError::ExportFailed(_) => "export_failed",
            AppError::ConfigError(_) => "config_error",
            AppError::Internal(_) => "internal_error",
        }
    }

    /// Process exit code for CLI mode
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::InvalidInput(_) | AppError::ConfigError(_) => 1,
            AppError::NotFound(_) => 3,
            AppError::DataLoadFailed(_) => 4,
            AppError::ExportFailed(_) | AppError::Internal(_) => 5,
        }
    }

    /// Get the error message
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Convert anyhow::Error to AppError
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Convert serde_json::Error to AppError
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

/// Convert std::io::Error to AppError
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::ExportFailed(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::DataLoadFailed(err.to_string())
    }
}

pub fn validate_query(query: &str) -> Result<(), AppError> {
    if query.chars().count() > MAX_QUERY_CHARS {
        return Err(AppError::InvalidInput(format!(
            "Query too long, maximum {} characters",
            MAX_QUERY_CHARS
        )));
    }

    Ok(())
}

/// Normalize text using Unicode NFKC and trim surrounding whitespace
pub fn normalize_text(text: &str) -> String {
    use unicode_normalization::UnicodeNormalization;
    text.nfkc().collect::<String>().trim().to_string()
}
