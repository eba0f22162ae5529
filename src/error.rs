use std::path::PathBuf;
use thiserror::Error;

/// The main error type for boxcount operations.
#[derive(Debug, Error)]
pub enum BoxCountError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("{entry} not found in the ZIP archive {path}")]
    MissingEntry { path: PathBuf, entry: String },

    #[error("Failed to read ZIP archive {path}: {message}")]
    ArchiveRead { path: PathBuf, message: String },

    #[error("Invalid XML file format in {path}: {message}")]
    MalformedXml { path: PathBuf, message: String },

    #[error("No image tags found in the XML ({path})")]
    NoFrames { path: PathBuf },

    #[error("No file loaded")]
    NoDocument,

    #[error("Failed to parse config {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Failed to write config {path}: {message}")]
    ConfigWrite { path: PathBuf, message: String },
}
