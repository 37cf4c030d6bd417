//! Error types for the gridkeys application

use std::path::PathBuf;

use gridkeys_core::KeyError;
use thiserror::Error;

/// Errors that can occur in the gridkeys application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Scenario {}: {message}", .path.display())]
    Scenario { path: PathBuf, message: String },

    #[error("Invalid key '{key}': {message}")]
    InvalidKey { key: String, message: String },

    #[error(transparent)]
    Key(#[from] KeyError),
}

pub type Result<T> = std::result::Result<T, AppError>;
