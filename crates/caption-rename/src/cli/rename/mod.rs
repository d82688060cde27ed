//! The `caption-rename rename` command.

mod batch;
mod setup;
pub mod types;

pub use types::{DeviceArg, ProviderArg, ReportFormat};

use caption_rename_core::Config;
use clap::{ArgGroup, Args};
use std::path::PathBuf;

use batch::run_batch;
use setup::build_context;

/// Arguments for the `rename` command.
#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("mode")
        .required(true)
        .args(["in_place", "output_path"]),
))]
pub struct RenameArgs {
    /// Directory of images to caption
    #[arg(required = true)]
    pub input: PathBuf,

    /// Rename files inside the input directory
    #[arg(long)]
    pub in_place: bool,

    /// Copy renamed files into this directory (created if missing)
    #[arg(short, long, value_name = "DIR")]
    pub output_path: Option<PathBuf>,

    /// Inference device [default: gpu if available]
    #[arg(long, value_enum)]
    pub device: Option<DeviceArg>,

    /// Caption provider (overrides caption.provider)
    #[arg(long, value_enum)]
    pub provider: Option<ProviderArg>,

    /// Model name (provider-specific, overrides the configured model)
    #[arg(long)]
    pub model: Option<String>,

    /// Write a run report to this file
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Run report format
    #[arg(long, value_enum, default_value = "json")]
    pub report_format: ReportFormat,
}

/// Manual Default impl for constructing RenameArgs outside of clap.
///
/// Values match the clap `#[arg(default_value = ...)]` annotations above.
impl Default for RenameArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            in_place: false,
            output_path: None,
            device: None,
            provider: None,
            model: None,
            report: None,
            report_format: ReportFormat::Json,
        }
    }
}

/// Execute the rename command.
pub async fn execute(args: RenameArgs) -> anyhow::Result<()> {
    let config = Config::load()?;
    let ctx = build_context(&args, config)?;
    run_batch(ctx, &args).await
}
