//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};

/// Input selection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Supported input extensions (matched case-insensitively)
    pub supported_formats: Vec<String>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            supported_formats: vec![
                "jpg".to_string(),
                "jpeg".to_string(),
                "png".to_string(),
                "webp".to_string(),
            ],
        }
    }
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum file size in megabytes
    pub max_file_size_mb: u64,

    /// Maximum image dimension (width or height)
    pub max_image_dimension: u32,

    /// Decode timeout in milliseconds
    pub decode_timeout_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 100,
            max_image_dimension: 10000,
            decode_timeout_ms: 5000,
        }
    }
}

/// Filename generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Base name used when a caption sanitizes to nothing
    pub placeholder: String,

    /// Maximum length of a generated base name, in bytes
    pub max_base_len: usize,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            placeholder: "untitled".to_string(),
            max_base_len: 120,
        }
    }
}

/// Caption provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionConfig {
    /// Provider name: "ollama" or "openai"
    pub provider: String,

    /// Instruction sent along with each image
    pub prompt: String,

    /// Maximum tokens to generate per caption
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// HTTP request timeout in milliseconds
    pub timeout_ms: u64,

    /// Ollama (local) configuration
    pub ollama: OllamaConfig,

    /// OpenAI-compatible endpoint configuration
    pub openai: OpenAiConfig,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            prompt: "Write a short caption for this image in at most ten words. \
                     Reply with the caption only."
                .to_string(),
            max_tokens: 40,
            temperature: 0.0,
            timeout_ms: 120_000,
            ollama: OllamaConfig::default(),
            openai: OpenAiConfig::default(),
        }
    }
}

/// Ollama configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    /// Ollama API endpoint
    pub endpoint: String,

    /// Model name
    pub model: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434".to_string(),
            model: "llama3.2-vision".to_string(),
        }
    }
}

/// OpenAI-compatible Chat Completions configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// Chat Completions endpoint
    pub endpoint: String,

    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Model name
    pub model: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            api_key: "${OPENAI_API_KEY}".to_string(),
            model: "gpt-4o-mini".to_string(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
