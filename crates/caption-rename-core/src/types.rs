//! Core data types for the caption-rename pipeline.
//!
//! A run moves each file through these shapes in order:
//!
//! ```text
//! ImageTask → caption (String) → CandidateName → ResolvedDestination → FileOutcome
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// One discovered input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTask {
    /// Path to the source image
    pub source_path: PathBuf,

    /// Extension as found on disk, without the dot (case preserved)
    pub extension: String,
}

impl ImageTask {
    /// Build a task from a path, if it has a UTF-8 extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_string();
        Some(Self {
            source_path: path.to_path_buf(),
            extension,
        })
    }

    /// File name of the source, lossily converted for display.
    pub fn file_name(&self) -> String {
        display_name(&self.source_path)
    }
}

/// A sanitized base name paired with the original extension.
///
/// Not guaranteed unique until the collision policy resolves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateName {
    /// Sanitized base name (may be empty)
    pub base: String,

    /// Extension without the dot
    pub extension: String,
}

impl CandidateName {
    pub fn new(base: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            extension: extension.into(),
        }
    }
}

/// A candidate bound to a concrete, unclaimed path in the target directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDestination {
    /// Full destination path
    pub path: PathBuf,

    /// Final file name (`base.ext`, possibly with a numeric suffix)
    pub file_name: String,
}

/// Why a task was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The caption-derived name equals the current name
    NameUnchanged,
    /// The run was stopped before this task started
    Interrupted,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NameUnchanged => write!(f, "name unchanged"),
            SkipReason::Interrupted => write!(f, "run interrupted"),
        }
    }
}

/// Terminal state of one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The file was renamed or copied to `destination`
    Success { destination: PathBuf },
    /// Nothing was done
    Skipped { reason: SkipReason },
    /// Captioning or the file operation failed
    Failed { error: String },
}

/// The outcome of one task, as recorded in the run report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileOutcome {
    /// Source file the task was created for
    pub source_path: PathBuf,

    /// Raw caption returned by the provider, if one was produced
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,

    #[serde(flatten)]
    pub outcome: Outcome,
}

impl FileOutcome {
    /// One-line, human-readable description of the outcome.
    pub fn summary_line(&self) -> String {
        let source = display_name(&self.source_path);
        match &self.outcome {
            Outcome::Success { destination } => {
                format!("{source} -> {}", display_name(destination))
            }
            Outcome::Skipped { reason } => format!("{source}: skipped ({reason})"),
            Outcome::Failed { error } => format!("{source}: failed ({error})"),
        }
    }
}

/// Ordered per-file outcomes of one batch run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    /// One entry per discovered task, in processing order
    pub outcomes: Vec<FileOutcome>,

    /// Whether the run was stopped early
    pub interrupted: bool,

    /// Wall-clock duration of the run
    #[serde(with = "duration_secs")]
    pub elapsed: Duration,
}

impl RunReport {
    /// Aggregate counts for the summary.
    pub fn stats(&self) -> RunStats {
        let mut stats = RunStats::default();
        for entry in &self.outcomes {
            match entry.outcome {
                Outcome::Success { .. } => stats.succeeded += 1,
                Outcome::Skipped { .. } => stats.skipped += 1,
                Outcome::Failed { .. } => stats.failed += 1,
            }
        }
        stats.total_seconds = self.elapsed.as_secs_f64();
        stats
    }
}

/// Summary counts for a batch run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    /// Files renamed or copied
    pub succeeded: usize,

    /// Files that failed
    pub failed: usize,

    /// Files skipped (unchanged name or interrupted run)
    pub skipped: usize,

    /// Total run time in seconds
    pub total_seconds: f64,
}

impl RunStats {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed + self.skipped
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(d)?;
        Ok(Duration::try_from_secs_f64(secs).unwrap_or_default())
    }
}
