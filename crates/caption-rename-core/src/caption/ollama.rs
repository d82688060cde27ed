//! Ollama caption provider for local vision model inference.
//!
//! Talks to a local Ollama instance via its HTTP API.
//! No authentication required, just needs Ollama running locally.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::device::Device;
use super::provider::{clean_caption, CaptionOptions, CaptionProvider, ImageInput};
use crate::error::CaptionError;
use crate::pipeline::DecodedImage;

/// Ollama provider for local vision model inference.
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    device: Device,
    options: CaptionOptions,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(endpoint: &str, model: &str, device: Device, options: CaptionOptions) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            device,
            options,
            client: reqwest::Client::new(),
        }
    }

    fn request_body(&self, image: ImageInput) -> OllamaRequest {
        OllamaRequest {
            model: self.model.clone(),
            prompt: self.options.prompt.clone(),
            images: vec![image.data],
            stream: false,
            options: OllamaOptions {
                temperature: self.options.temperature,
                num_predict: self.options.max_tokens,
                // 0 offloaded layers keeps inference on the CPU
                num_gpu: (self.device == Device::Cpu).then_some(0),
            },
        }
    }
}

/// Ollama /api/generate request body.
#[derive(Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    images: Vec<String>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_gpu: Option<u32>,
}

/// Ollama /api/generate response.
#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
}

#[async_trait]
impl CaptionProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn caption(&self, image: &DecodedImage) -> Result<String, CaptionError> {
        let url = format!("{}/api/generate", self.endpoint);
        let start = Instant::now();
        let body = self.request_body(ImageInput::from_decoded(image));

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .timeout(self.options.timeout)
            .send()
            .await
            .map_err(|e| CaptionError::provider("ollama", format!("request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(CaptionError::Provider {
                provider: "ollama".to_string(),
                message: format!("HTTP {status}: {text}"),
                status_code: Some(status.as_u16()),
            });
        }

        let ollama_resp: OllamaResponse = resp.json().await.map_err(|e| {
            CaptionError::provider("ollama", format!("failed to parse response: {e}"))
        })?;

        tracing::debug!(
            "ollama captioned {:?} in {}ms",
            image.path,
            start.elapsed().as_millis()
        );
        Ok(clean_caption(&ollama_resp.response))
    }
}
