//! Inference device preference.
//!
//! The pipeline never interprets the device itself; it is resolved once at
//! startup and passed through to the caption provider.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Where caption inference should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    Cpu,
    Gpu,
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => write!(f, "cpu"),
            Device::Gpu => write!(f, "gpu"),
        }
    }
}

/// Pick the device to use.
///
/// With no explicit request, GPU is preferred. A GPU request on a machine
/// without one falls back to CPU with a warning.
pub fn resolve_device(requested: Option<Device>, gpu_available: bool) -> Device {
    match requested {
        Some(Device::Cpu) => Device::Cpu,
        Some(Device::Gpu) | None if gpu_available => Device::Gpu,
        Some(Device::Gpu) => {
            tracing::warn!("GPU requested but none detected; falling back to CPU");
            Device::Cpu
        }
        None => {
            tracing::warn!("No GPU detected; captioning on CPU");
            Device::Cpu
        }
    }
}

/// Best-effort check for a usable accelerator on this machine.
pub fn gpu_available() -> bool {
    if cfg!(target_os = "macos") {
        // Metal is always present on supported macOS versions
        return true;
    }
    if let Ok(visible) = std::env::var("CUDA_VISIBLE_DEVICES") {
        let visible = visible.trim();
        if visible.is_empty() || visible == "-1" {
            return false;
        }
    }
    ["/dev/nvidia0", "/dev/kfd", "/dev/dxg"]
        .iter()
        .any(|node| Path::new(node).exists())
}
