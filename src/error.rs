// src/error.rs

//! Crate-wide error type

use thiserror::Error;

use crate::manifest::{EditError, ParseError};

/// Errors returned by manifest, backend and configuration operations
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse manifest: {0}")]
    Parse(#[from] ParseError),

    #[error("Failed to edit manifest: {0}")]
    Edit(#[from] EditError),

    #[error("Failed to parse config file: {0}")]
    Config(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No supported package manager found (dpkg, rpm or pacman)")]
    UnsupportedPackageManager,

    #[error("Package query failed: {0}")]
    QueryFailed(String),

    #[error("Command `{command}` failed: {reason}")]
    CommandFailed { command: String, reason: String },
}

/// Result type for crate operations
pub type Result<T> = std::result::Result<T, Error>;
