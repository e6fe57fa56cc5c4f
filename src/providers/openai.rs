use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use super::{ImageGenerator, ImageRequest, SpeechSynthesizer, TextGenerator};
use crate::config::OpenAiConfig;
use crate::Result;

/// Hard input ceiling of the OpenAI speech endpoint
pub const SPEECH_INPUT_LIMIT: usize = 4096;

/// OpenAI client covering chat, speech and image generation
pub struct OpenAiClient {
    client: Client,
    base_url: Url,
    chat_model: String,
    temperature: f32,
    speech_model: String,
    image_model: String,
}

impl OpenAiClient {
    pub fn new(config: &OpenAiConfig, api_key: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let auth = format!("Bearer {}", api_key.trim());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth).context("Invalid OpenAI API key")?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to build OpenAI HTTP client")?;

        // Url::join drops the last path segment unless the base ends with '/'
        let mut base = config.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)
            .map_err(|_| anyhow::anyhow!("Invalid OpenAI base URL: {}", config.base_url))?;

        Ok(Self {
            client,
            base_url,
            chat_model: config.chat_model.clone(),
            temperature: config.temperature,
            speech_model: config.speech_model.clone(),
            image_model: config.image_model.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .with_context(|| format!("Invalid OpenAI endpoint: {}", path))
    }

    async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Response> {
        let url = self.endpoint(path)?;
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to call OpenAI {}", path))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            anyhow::bail!("OpenAI returned {}: {}", status, text);
        }

        Ok(response)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

#[derive(Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
}

#[derive(Serialize)]
struct ImageGenerationRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    size: &'a str,
    quality: &'a str,
    n: u8,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    url: Option<String>,
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn complete(&self, system_instruction: &str, user_prompt: &str) -> Result<String> {
        let body = ChatRequest {
            model: &self.chat_model,
            temperature: self.temperature,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_instruction,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
        };

        let parsed: ChatResponse = self
            .post("chat/completions", &body)
            .await?
            .json()
            .await
            .context("Failed to parse OpenAI chat response")?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| anyhow::anyhow!("OpenAI chat response contained no message"))
    }
}

#[async_trait]
impl SpeechSynthesizer for OpenAiClient {
    async fn speak(&self, text: &str, voice: &str) -> Result<Vec<u8>> {
        let body = SpeechRequest {
            model: &self.speech_model,
            voice,
            input: text,
        };

        let audio = self
            .post("audio/speech", &body)
            .await?
            .bytes()
            .await
            .context("Failed to read OpenAI speech payload")?;

        Ok(audio.to_vec())
    }

    fn max_input_chars(&self) -> usize {
        SPEECH_INPUT_LIMIT
    }
}

#[async_trait]
impl ImageGenerator for OpenAiClient {
    async fn generate(&self, request: &ImageRequest) -> Result<Vec<String>> {
        let body = ImageGenerationRequest {
            model: &self.image_model,
            prompt: &request.prompt,
            size: &request.size,
            quality: &request.quality,
            n: request.count,
        };

        let parsed: ImageResponse = self
            .post("images/generations", &body)
            .await?
            .json()
            .await
            .context("Failed to parse OpenAI image response")?;

        Ok(parsed.data.into_iter().filter_map(|image| image.url).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> OpenAiConfig {
        OpenAiConfig {
            base_url: base_url.to_string(),
            ..OpenAiConfig::default()
        }
    }

    #[test]
    fn test_endpoint_keeps_version_prefix() {
        let client = OpenAiClient::new(&config("https://api.openai.com/v1"), "sk-test").unwrap();
        assert_eq!(
            client.endpoint("chat/completions").unwrap().as_str(),
            "https://api.openai.com/v1/chat/completions"
        );

        let client = OpenAiClient::new(&config("http://localhost:8080/v1/"), "sk-test").unwrap();
        assert_eq!(
            client.endpoint("audio/speech").unwrap().as_str(),
            "http://localhost:8080/v1/audio/speech"
        );
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(OpenAiClient::new(&config("not a url"), "sk-test").is_err());
    }

    #[test]
    fn test_rejects_unprintable_api_key() {
        assert!(OpenAiClient::new(&config("https://api.openai.com/v1"), "sk-\u{7}bad").is_err());
    }

    #[test]
    fn test_chat_request_shape() {
        let body = ChatRequest {
            model: "gpt-4o",
            temperature: 0.5,
            messages: [
                ChatMessage {
                    role: "system",
                    content: "be brief",
                },
                ChatMessage {
                    role: "user",
                    content: "hi",
                },
            ],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4o");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hi");
    }

    #[test]
    fn test_image_response_skips_missing_urls() {
        let parsed: ImageResponse = serde_json::from_str(
            r#"{"created": 1, "data": [{"url": "https://img/1.png"}, {"b64_json": "AAAA"}]}"#,
        )
        .unwrap();
        let urls: Vec<String> = parsed.data.into_iter().filter_map(|i| i.url).collect();
        assert_eq!(urls, vec!["https://img/1.png".to_string()]);
    }
}
