//! Image loading for the caption provider.
//!
//! The file is read once, fully decoded off the async runtime to prove it is a
//! real image, and handed on with its original bytes. Providers send those
//! bytes as-is; nothing is re-encoded.

use image::{GenericImageView, ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::LimitsConfig;
use crate::error::CaptionError;

/// Decodes images within configured dimension and time limits.
pub struct ImageDecoder {
    limits: LimitsConfig,
}

/// A verified image, as handed to a caption provider.
pub struct DecodedImage {
    /// Source file
    pub path: PathBuf,
    /// Encoded bytes exactly as read from disk
    pub bytes: Vec<u8>,
    /// Format detected from content
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

impl DecodedImage {
    /// Short lowercase format name ("jpeg", "png", "webp", ...).
    pub fn format_name(&self) -> &'static str {
        match self.format {
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Png => "png",
            ImageFormat::WebP => "webp",
            ImageFormat::Gif => "gif",
            ImageFormat::Bmp => "bmp",
            _ => "unknown",
        }
    }
}

impl ImageDecoder {
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Read and decode `path`.
    ///
    /// Decoding runs on the blocking pool and is abandoned after
    /// `limits.decode_timeout_ms`.
    pub async fn decode(&self, path: &Path) -> Result<DecodedImage, CaptionError> {
        let bytes = tokio::fs::read(path).await.map_err(|e| CaptionError::Decode {
            path: path.to_path_buf(),
            message: format!("Cannot read file: {e}"),
        })?;

        let owned = path.to_path_buf();
        let budget = Duration::from_millis(self.limits.decode_timeout_ms);
        let job = tokio::task::spawn_blocking(move || decode_bytes(bytes, owned));

        let decoded = match tokio::time::timeout(budget, job).await {
            Err(_) => {
                return Err(CaptionError::Timeout {
                    path: path.to_path_buf(),
                    timeout_ms: self.limits.decode_timeout_ms,
                })
            }
            Ok(Err(join)) => {
                return Err(CaptionError::Decode {
                    path: path.to_path_buf(),
                    message: format!("Decoder task failed: {join}"),
                })
            }
            Ok(Ok(result)) => result?,
        };

        let max_dim = self.limits.max_image_dimension;
        if decoded.width > max_dim || decoded.height > max_dim {
            return Err(CaptionError::ImageTooLarge {
                path: decoded.path,
                width: decoded.width,
                height: decoded.height,
                max_dim,
            });
        }
        Ok(decoded)
    }
}

/// Detect the format from content and decode. Blocking.
fn decode_bytes(bytes: Vec<u8>, path: PathBuf) -> Result<DecodedImage, CaptionError> {
    let decode_err = |message: String| CaptionError::Decode {
        path: path.clone(),
        message,
    };

    let reader = ImageReader::new(Cursor::new(bytes.as_slice()))
        .with_guessed_format()
        .map_err(|e| decode_err(format!("Cannot detect image format: {e}")))?;
    let Some(format) = reader.format() else {
        return Err(CaptionError::UnsupportedFormat {
            path: path.clone(),
            format: path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("unknown")
                .to_string(),
        });
    };
    let (width, height) = reader
        .decode()
        .map_err(|e| decode_err(e.to_string()))?
        .dimensions();

    Ok(DecodedImage {
        path,
        bytes,
        format,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    #[test]
    fn test_format_detected_by_content() {
        // A PNG saved under a .jpg name is still detected as PNG
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("real.png");
        ImageBuffer::from_pixel(4, 3, Rgb([10u8, 20, 30]))
            .save(&png)
            .unwrap();
        let misnamed = dir.path().join("misnamed.jpg");
        std::fs::rename(&png, &misnamed).unwrap();

        let bytes = std::fs::read(&misnamed).unwrap();
        let result = decode_bytes(bytes, misnamed.clone()).unwrap();
        assert_eq!(result.format, ImageFormat::Png);
        assert_eq!((result.width, result.height), (4, 3));
        assert_eq!(result.path, misnamed);
        assert_eq!(result.format_name(), "png");
    }

    #[tokio::test]
    async fn test_decode_rejects_oversized_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.png");
        ImageBuffer::from_pixel(64, 2, Rgb([0u8, 0, 0]))
            .save(&path)
            .unwrap();

        let limits = LimitsConfig {
            max_image_dimension: 32,
            ..LimitsConfig::default()
        };
        let err = ImageDecoder::new(limits).decode(&path).await.err().unwrap();
        assert!(matches!(err, CaptionError::ImageTooLarge { width: 64, .. }));
    }

    #[tokio::test]
    async fn test_decode_truncated_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0]).unwrap();

        let decoder = ImageDecoder::new(LimitsConfig::default());
        assert!(decoder.decode(&path).await.is_err());
    }
}
