//! CLI enum types for the rename command: device, provider, report format.

use caption_rename_core::{Device, OutputFormat};
use clap::ValueEnum;

/// Inference device preference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DeviceArg {
    /// Run the model on the CPU
    Cpu,
    /// Run the model on a GPU (falls back to CPU if none is found)
    Gpu,
}

impl From<DeviceArg> for Device {
    fn from(arg: DeviceArg) -> Self {
        match arg {
            DeviceArg::Cpu => Device::Cpu,
            DeviceArg::Gpu => Device::Gpu,
        }
    }
}

/// Supported caption providers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ProviderArg {
    /// Local Ollama instance
    Ollama,
    /// OpenAI-compatible Chat Completions API
    Openai,
}

impl std::fmt::Display for ProviderArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderArg::Ollama => write!(f, "ollama"),
            ProviderArg::Openai => write!(f, "openai"),
        }
    }
}

/// Run report formats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Single JSON document
    #[default]
    Json,
    /// One JSON object per file (newline-delimited)
    Jsonl,
}

impl From<ReportFormat> for OutputFormat {
    fn from(format: ReportFormat) -> Self {
        match format {
            ReportFormat::Json => OutputFormat::Json,
            ReportFormat::Jsonl => OutputFormat::JsonLines,
        }
    }
}
