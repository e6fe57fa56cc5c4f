use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod openai;

pub use openai::OpenAiClient;

use crate::Result;

/// Chat-style text generation
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Complete a system instruction plus user prompt into free text
    async fn complete(&self, system_instruction: &str, user_prompt: &str) -> Result<String>;
}

/// Text-to-speech synthesis
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` with `voice` into raw encoded audio
    async fn speak(&self, text: &str, voice: &str) -> Result<Vec<u8>>;

    /// Largest input, in characters, accepted by a single `speak` call
    fn max_input_chars(&self) -> usize;
}

/// Text-to-image generation
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate images and return their hosted URLs
    async fn generate(&self, request: &ImageRequest) -> Result<Vec<String>>;
}

/// Parameters for an image generation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRequest {
    pub prompt: String,

    /// Pixel size such as `1792x1024`
    pub size: String,

    /// Quality tier such as `standard` or `hd`
    pub quality: String,

    /// Number of images to generate
    pub count: u8,
}
