use thiserror::Error;

use crate::config::ConfigError;
use crate::io::ImportError;

#[derive(Error, Debug)]
pub enum OrbatError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error (JSON): {0}")]
    Json(#[from] serde_json::Error),

    #[error("No file name set for this document")]
    NoFileName,

    #[error("Clipboard unavailable: {0}")]
    Clipboard(String),
}

pub type OrbatResult<T> = Result<T, OrbatError>;
