//! Run planning: turn raw invocation options into a validated plan.
//!
//! Validation never touches the filesystem beyond reading metadata, so a
//! rejected configuration leaves every file as it was.

use std::path::{Path, PathBuf};

use crate::caption::Device;
use crate::error::ConfigError;
use crate::pipeline::FileOperation;

/// Raw options as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Directory containing the images
    pub input: PathBuf,
    /// Rename within the input directory
    pub in_place: bool,
    /// Copy renamed files into this directory
    pub output_path: Option<PathBuf>,
    /// Requested inference device (None = GPU if available)
    pub device: Option<Device>,
}

/// Where renamed files end up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// Rename inside the input directory
    InPlace { dir: PathBuf },
    /// Copy into a separate output directory
    CopyTo { dir: PathBuf },
}

impl RunMode {
    /// Directory destinations are resolved in.
    pub fn dest_dir(&self) -> &Path {
        match self {
            RunMode::InPlace { dir } | RunMode::CopyTo { dir } => dir,
        }
    }

    /// File operation used for this mode.
    pub fn operation(&self) -> FileOperation {
        match self {
            RunMode::InPlace { .. } => FileOperation::Rename,
            RunMode::CopyTo { .. } => FileOperation::Copy,
        }
    }
}

/// A validated, immutable description of one batch run.
#[derive(Debug, Clone)]
pub struct RunPlan {
    /// Canonical input directory
    pub input_dir: PathBuf,
    /// Output mode
    pub mode: RunMode,
    /// Requested inference device, passed through to the provider
    pub device: Option<Device>,
}

impl RunPlan {
    /// Validate options into a plan.
    ///
    /// Exactly one of `in_place` / `output_path` must be set and the input must
    /// be an existing directory.
    pub fn from_options(options: &RunOptions) -> Result<Self, ConfigError> {
        let output_path = match (options.in_place, &options.output_path) {
            (true, Some(_)) => return Err(ConfigError::ConflictingModes),
            (false, None) => return Err(ConfigError::NoModeSelected),
            (_, output) => output.clone(),
        };

        let input = &options.input;
        if !input.exists() {
            return Err(ConfigError::InputNotFound(input.clone()));
        }
        if !input.is_dir() {
            return Err(ConfigError::InputNotDirectory(input.clone()));
        }
        let input_dir = input
            .canonicalize()
            .map_err(|_| ConfigError::InputNotFound(input.clone()))?;

        let mode = match output_path {
            None => RunMode::InPlace {
                dir: input_dir.clone(),
            },
            Some(out) => {
                let dir = absolutize(&out).map_err(|source| ConfigError::OutputDir {
                    path: out.clone(),
                    source,
                })?;
                if dir == input_dir {
                    return Err(ConfigError::OutputIsInput(out));
                }
                if dir.exists() && !dir.is_dir() {
                    return Err(ConfigError::OutputDir {
                        path: out,
                        source: std::io::Error::new(
                            std::io::ErrorKind::AlreadyExists,
                            "exists and is not a directory",
                        ),
                    });
                }
                RunMode::CopyTo { dir }
            }
        };

        Ok(Self {
            input_dir,
            mode,
            device: options.device,
        })
    }

    /// Create the output directory if needed. The only mutation before tasks run.
    pub fn prepare(&self) -> Result<(), ConfigError> {
        if let RunMode::CopyTo { dir } = &self.mode {
            if !dir.exists() {
                tracing::info!("Creating output directory {:?}", dir);
            }
            std::fs::create_dir_all(dir).map_err(|source| ConfigError::OutputDir {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

/// Canonicalize an existing path, or anchor a not-yet-existing one at the cwd.
fn absolutize(path: &Path) -> std::io::Result<PathBuf> {
    if path.exists() {
        path.canonicalize()
    } else if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
