//! caption-rename core - caption images with a vision model and name files after them.
//!
//! Each image in a directory is captioned, the caption is sanitized into a
//! filesystem-safe base name, collisions are resolved with numeric suffixes,
//! and the file is renamed in place or copied to an output directory.
//!
//! # Architecture
//!
//! ```text
//! Discover → Validate → Decode → Caption → Sanitize → Resolve → Rename/Copy → Report
//! ```
//!
//! Files are processed one at a time. A failure on one file is recorded in
//! the [`RunReport`] and the batch moves on.
//!
//! # Usage
//!
//! ```rust,ignore
//! use caption_rename_core::caption::{resolve_device, gpu_available, CaptionProviderFactory};
//! use caption_rename_core::{BatchOrchestrator, Config, FileDiscovery, RunOptions, RunPlan};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let plan = RunPlan::from_options(&RunOptions {
//!         input: "./photos".into(),
//!         in_place: true,
//!         ..Default::default()
//!     })?;
//!     plan.prepare()?;
//!
//!     let device = resolve_device(plan.device, gpu_available());
//!     let provider = CaptionProviderFactory::create(
//!         &config.caption.provider, &config.caption, None, device)?;
//!
//!     let tasks = FileDiscovery::new(config.processing.clone()).discover(&plan.input_dir);
//!     let report = BatchOrchestrator::new(&config, &plan, provider.as_ref())
//!         .run(tasks, &CancellationToken::new())
//!         .await;
//!     println!("{} renamed", report.stats().succeeded);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod caption;
pub mod config;
pub mod error;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod plan;
pub mod types;

// Re-exports for convenient access
pub use caption::{CaptionProvider, Device};
pub use config::Config;
pub use error::{CaptionError, ConfigError, RenameError, Result, TaskError};
pub use output::{OutputFormat, OutputWriter};
pub use pipeline::{BatchOrchestrator, FileDiscovery};
pub use plan::{RunMode, RunOptions, RunPlan};
pub use types::{FileOutcome, ImageTask, Outcome, RunReport, RunStats, SkipReason};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
