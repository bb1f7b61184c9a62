// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchError {
    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Glob error: {0}")]
    Glob(#[from] globset::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Import blocked: {source_module} (tier {source_tier}) cannot import {target_module} (tier {target_tier})")]
    ImportBlocked {
        source_module: String,
        source_tier: u32,
        target_module: String,
        target_tier: u32,
    },

    #[error("Template error: {0}")]
    Template(String),

    #[error("Generic error: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, ArchError>;

// Allow `?` on std::io::Error by converting to ArchError::Io with unknown path.
impl From<std::io::Error> for ArchError {
    fn from(source: std::io::Error) -> Self {
        ArchError::Io {
            source,
            path: PathBuf::from("<unknown>"),
        }
    }
}

// Gracefully convert WalkDir errors
impl From<walkdir::Error> for ArchError {
    fn from(e: walkdir::Error) -> Self {
        ArchError::Other(e.to_string())
    }
}
