//! OpenAI-compatible caption provider using the Chat Completions API.
//!
//! Sends the image via data URL in the user message content array. Works with
//! any server exposing the same endpoint shape.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::provider::{clean_caption, CaptionOptions, CaptionProvider, ImageInput};
use crate::error::CaptionError;
use crate::pipeline::DecodedImage;

/// OpenAI provider using Chat Completions API.
pub struct OpenAiProvider {
    endpoint: String,
    api_key: String,
    model: String,
    options: CaptionOptions,
    client: reqwest::Client,
}

impl OpenAiProvider {
    pub fn new(endpoint: &str, api_key: &str, model: &str, options: CaptionOptions) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            options,
            client: reqwest::Client::new(),
        }
    }

    fn request_body(&self, image: &ImageInput) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            max_tokens: self.options.max_tokens,
            temperature: self.options.temperature,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: vec![
                    ChatContent::ImageUrl {
                        image_url: ImageUrl {
                            url: image.data_url(),
                        },
                    },
                    ChatContent::Text {
                        text: self.options.prompt.clone(),
                    },
                ],
            }],
        }
    }
}

// --- Request types ---

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: Vec<ChatContent>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ChatContent {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

// --- Response types ---

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[async_trait]
impl CaptionProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn caption(&self, image: &DecodedImage) -> Result<String, CaptionError> {
        let start = Instant::now();
        let body = self.request_body(&ImageInput::from_decoded(image));

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .timeout(self.options.timeout)
            .send()
            .await
            .map_err(|e| CaptionError::provider("openai", format!("request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(CaptionError::Provider {
                provider: "openai".to_string(),
                message: format!("HTTP {status}: {text}"),
                status_code: Some(status.as_u16()),
            });
        }

        let chat_resp: ChatResponse = resp.json().await.map_err(|e| {
            CaptionError::provider("openai", format!("failed to parse response: {e}"))
        })?;

        let text = chat_resp
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| CaptionError::provider("openai", "empty choices array"))?;

        tracing::debug!(
            "openai captioned {:?} in {}ms",
            image.path,
            start.elapsed().as_millis()
        );
        Ok(clean_caption(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_request_body_shape() {
        let provider = OpenAiProvider::new(
            "https://api.openai.com/v1/chat/completions",
            "sk-test",
            "gpt-4o-mini",
            CaptionOptions {
                prompt: "caption this".to_string(),
                max_tokens: 40,
                temperature: 0.0,
                timeout: Duration::from_secs(5),
            },
        );
        let body = provider.request_body(&ImageInput::from_bytes(&[1, 2, 3], "jpeg"));
        let json = serde_json::to_value(&body).unwrap();

        let content = &json["messages"][0]["content"];
        assert_eq!(content[0]["type"], "image_url");
        assert_eq!(
            content[0]["image_url"]["url"],
            "data:image/jpeg;base64,AQID"
        );
        assert_eq!(content[1]["type"], "text");
        assert_eq!(content[1]["text"], "caption this");
        assert_eq!(json["model"], "gpt-4o-mini");
    }

    #[test]
    fn test_response_parsing_tolerates_null_content() {
        let resp: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(resp.choices[0].message.content.is_none());
    }
}
