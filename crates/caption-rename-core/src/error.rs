//! Error types for the caption-rename pipeline.
//!
//! Errors are split by how far they reach: configuration errors abort a run
//! before any file is touched, while caption and file-operation errors stay
//! attached to the single task that produced them.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for library operations.
#[derive(Error, Debug)]
pub enum RenameError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Caption provider errors outside of a task (e.g. provider setup)
    #[error("Caption error: {0}")]
    Caption(#[from] CaptionError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Fatal, pre-run configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// Both `--in-place` and `--output-path` were given
    #[error("--in-place and --output-path are mutually exclusive")]
    ConflictingModes,

    /// Neither `--in-place` nor `--output-path` was given
    #[error("one of --in-place or --output-path is required")]
    NoModeSelected,

    /// Input directory does not exist
    #[error("Input path does not exist: {0}")]
    InputNotFound(PathBuf),

    /// Input path exists but is not a directory
    #[error("Input path is not a directory: {0}")]
    InputNotDirectory(PathBuf),

    /// Output directory resolves to the input directory
    #[error("Output path {0} is the input directory; use --in-place instead")]
    OutputIsInput(PathBuf),

    /// Output directory could not be created or inspected
    #[error("Cannot prepare output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure to obtain a caption for one image.
///
/// Covers malformed image data as well as provider runtime failures.
#[derive(Error, Debug)]
pub enum CaptionError {
    /// Image decoding failed
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Unsupported image format
    #[error("Unsupported format for {path}: {format}")]
    UnsupportedFormat { path: PathBuf, format: String },

    /// File exceeds size limit
    #[error("File too large: {path} ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge {
        path: PathBuf,
        size_mb: u64,
        max_mb: u64,
    },

    /// Image dimensions exceed limit
    #[error("Image too large: {path} ({width}x{height} > {max_dim})")]
    ImageTooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
        max_dim: u32,
    },

    /// Decoding did not finish in time
    #[error("Timeout decoding {path} after {timeout_ms}ms")]
    Timeout { path: PathBuf, timeout_ms: u64 },

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// The caption provider failed
    #[error("{provider} error: {message}")]
    Provider {
        provider: String,
        message: String,
        status_code: Option<u16>,
    },
}

impl CaptionError {
    /// Build a provider error without an HTTP status.
    pub fn provider(provider: &str, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.to_string(),
            message: message.into(),
            status_code: None,
        }
    }
}

/// A per-task failure. Recorded in the run report, never propagated.
#[derive(Error, Debug)]
pub enum TaskError {
    /// No caption could be produced
    #[error(transparent)]
    Caption(#[from] CaptionError),

    /// The copy or rename failed
    #[error("{op} failed for {path}: {source}")]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for library results.
pub type Result<T> = std::result::Result<T, RenameError>;
