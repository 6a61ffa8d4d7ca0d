//! Error handling module for shorts-mixer

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Main error type for application-level operations
#[derive(Error, Debug)]
pub enum ShortsError {
    /// Domain rule violated or generation rejected
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Configuration file missing
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Configuration or project file could not be parsed
    #[error("Failed to parse {path}: {message}")]
    ParseError { path: String, message: String },

    /// Configuration value out of range
    #[error("Invalid configuration value: {key} = {value}")]
    InvalidConfig { key: String, value: String },

    /// Project file is structurally fine but describes an unusable session
    #[error("Invalid project {path}: {message}")]
    ProjectError { path: String, message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for shorts-mixer operations
pub type ShortsResult<T> = std::result::Result<T, ShortsError>;
