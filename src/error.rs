//! Error types for the file organiser

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for file organiser operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the file organiser
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid glob pattern \"{pattern}\": {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Could not create file enumerator at path {path}: {message}")]
    EnumerationFailed { path: PathBuf, message: String },

    #[error("Directory traversal error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Could not determine resource type of {path}: {source}")]
    UnknownResourceType {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Could not read creation date of {path}")]
    UnknownCreationDate { path: PathBuf },

    #[error("{path}: {reason}")]
    EmbeddedDate {
        path: PathBuf,
        reason: EmbeddedDateFailure,
    },

    #[error("Invalid file name: {path}")]
    InvalidFileName { path: PathBuf },

    #[error("Failed to {operation} {source_path} to {destination}: {error}")]
    Transfer {
        operation: &'static str,
        source_path: PathBuf,
        destination: PathBuf,
        #[source]
        error: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Reasons an embedded capture date could not be used
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmbeddedDateFailure {
    #[error("file is not a readable image")]
    NotAnImage,

    #[error("could not read Exif metadata")]
    NoExifProperties,

    #[error("exif metadata did not contain a capture date")]
    NoCaptureDate,

    #[error("capture date \"{0}\" was not parsable")]
    UnparsableCaptureDate(String),
}
