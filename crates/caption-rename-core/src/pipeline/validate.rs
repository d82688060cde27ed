//! Cheap pre-flight checks, run before a file is read in full.
//!
//! A file that fails here never reaches the decoder or the caption provider.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::config::LimitsConfig;
use crate::error::CaptionError;

const MB: u64 = 1024 * 1024;

/// Rejects missing, oversized and non-image files.
pub struct Validator {
    limits: LimitsConfig,
}

impl Validator {
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Check size against `limits.max_file_size_mb` and sniff the header for
    /// a JPEG, PNG or WebP signature.
    pub fn validate(&self, path: &Path) -> Result<(), CaptionError> {
        let size = std::fs::metadata(path)
            .map_err(|e| io_error(path, "Cannot read metadata", e))?
            .len();

        if size > self.limits.max_file_size_mb.saturating_mul(MB) {
            return Err(CaptionError::FileTooLarge {
                path: path.to_path_buf(),
                size_mb: size / MB,
                max_mb: self.limits.max_file_size_mb,
            });
        }

        let mut header = Vec::with_capacity(12);
        File::open(path)
            .and_then(|f| f.take(12).read_to_end(&mut header))
            .map_err(|e| io_error(path, "Cannot read header", e))?;

        match sniff_format(&header) {
            Some(_) => Ok(()),
            None => Err(CaptionError::UnsupportedFormat {
                path: path.to_path_buf(),
                format: "unrecognized content (invalid magic bytes)".to_string(),
            }),
        }
    }
}

/// Identify a supported image format from its leading bytes.
fn sniff_format(header: &[u8]) -> Option<&'static str> {
    match header {
        [0xFF, 0xD8, 0xFF, ..] => Some("jpeg"),
        [0x89, b'P', b'N', b'G', ..] => Some("png"),
        // RIFF is shared with WAV/AVI; only the WEBP form type counts
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some("webp"),
        _ => None,
    }
}

fn io_error(path: &Path, context: &str, e: io::Error) -> CaptionError {
    match e.kind() {
        io::ErrorKind::NotFound => CaptionError::FileNotFound(path.to_path_buf()),
        _ => CaptionError::Decode {
            path: path.to_path_buf(),
            message: format!("{context}: {e}"),
        },
    }
}
