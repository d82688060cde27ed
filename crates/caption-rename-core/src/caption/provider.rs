//! Caption provider trait and request types.
//!
//! Defines the narrow interface the pipeline uses to obtain captions, plus the
//! factory that creates the right provider from CLI flags and config.

use async_trait::async_trait;
use base64::Engine;
use std::time::Duration;

use super::device::Device;
use crate::config::CaptionConfig;
use crate::error::CaptionError;
use crate::pipeline::DecodedImage;

/// Base64-encoded image ready to send to a model server.
#[derive(Debug, Clone)]
pub struct ImageInput {
    /// Base64-encoded image bytes
    pub data: String,
    /// MIME type (e.g., "image/jpeg", "image/png")
    pub media_type: String,
}

impl ImageInput {
    /// Create an `ImageInput` from raw bytes and format string.
    ///
    /// The format is the image format identifier (e.g., "jpeg", "png", "webp").
    pub fn from_bytes(bytes: &[u8], format: &str) -> Self {
        let media_type = match format {
            "jpeg" | "jpg" => "image/jpeg",
            "png" => "image/png",
            "webp" => "image/webp",
            "gif" => "image/gif",
            other => {
                tracing::warn!("Unknown image format '{other}', defaulting to image/jpeg");
                "image/jpeg"
            }
        };

        Self {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            media_type: media_type.to_string(),
        }
    }

    /// Build from a decoded image, reusing its original encoded bytes.
    pub fn from_decoded(image: &DecodedImage) -> Self {
        Self::from_bytes(&image.bytes, image.format_name())
    }

    /// Return a data URL suitable for OpenAI-style APIs.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

/// Generation settings shared by every request of a run.
#[derive(Debug, Clone)]
pub struct CaptionOptions {
    /// Instruction sent along with the image
    pub prompt: String,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Per-request HTTP timeout
    pub timeout: Duration,
}

impl CaptionOptions {
    pub fn from_config(config: &CaptionConfig) -> Self {
        Self {
            prompt: config.prompt.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            timeout: Duration::from_millis(config.timeout_ms),
        }
    }
}

/// Something that turns an image into a caption.
///
/// The pipeline calls [`caption`](CaptionProvider::caption) at most once per
/// file and never reuses a result for another file. Uses `async_trait` so the
/// trait stays object-safe (`Box<dyn CaptionProvider>`).
#[async_trait]
pub trait CaptionProvider: Send + Sync {
    /// Provider name for logging (e.g., "ollama").
    fn name(&self) -> &str;

    /// Generate a caption for `image`.
    async fn caption(&self, image: &DecodedImage) -> Result<String, CaptionError>;
}

/// Reduce a model reply to a single caption line.
///
/// Vision models sometimes add a preamble line or trailing explanation; only the
/// first non-empty line is kept.
pub fn clean_caption(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok().filter(|v| !v.is_empty())
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Factory that creates the appropriate provider from CLI flags and config.
pub struct CaptionProviderFactory;

impl CaptionProviderFactory {
    /// Create a caption provider.
    ///
    /// # Arguments
    /// * `provider` - Provider identifier ("ollama", "openai")
    /// * `config` - The caption config section
    /// * `model_override` - Optional model name that overrides the config default
    /// * `device` - Resolved inference device, forwarded where the backend supports it
    pub fn create(
        provider: &str,
        config: &CaptionConfig,
        model_override: Option<&str>,
        device: Device,
    ) -> Result<Box<dyn CaptionProvider>, CaptionError> {
        let options = CaptionOptions::from_config(config);
        match provider {
            "ollama" => {
                let cfg = &config.ollama;
                let model = model_override.unwrap_or(&cfg.model);
                Ok(Box::new(super::ollama::OllamaProvider::new(
                    &cfg.endpoint,
                    model,
                    device,
                    options,
                )))
            }
            "openai" => {
                let cfg = &config.openai;
                let api_key = resolve_env_var(&cfg.api_key).ok_or_else(|| {
                    CaptionError::provider(
                        "openai",
                        "API key not set. Set OPENAI_API_KEY or caption.openai.api_key.",
                    )
                })?;
                let model = model_override.unwrap_or(&cfg.model);
                if device == Device::Cpu {
                    tracing::debug!("--device is ignored by the openai provider (remote inference)");
                }
                Ok(Box::new(super::openai::OpenAiProvider::new(
                    &cfg.endpoint,
                    &api_key,
                    model,
                    options,
                )))
            }
            other => Err(CaptionError::provider(
                other,
                format!("Unknown caption provider: {other}"),
            )),
        }
    }
}
