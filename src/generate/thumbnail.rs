use std::sync::Arc;

use super::{prompts, truncate_chars};
use crate::providers::{ImageGenerator, ImageRequest, TextGenerator};
use crate::NarratorError;

/// Two-step thumbnail generation: art-direction prompt, then image
#[derive(Clone)]
pub struct ThumbnailGenerator {
    llm: Arc<dyn TextGenerator>,
    images: Arc<dyn ImageGenerator>,
    max_input_chars: usize,
    size: String,
    quality: String,
}

impl ThumbnailGenerator {
    pub fn new(
        llm: Arc<dyn TextGenerator>,
        images: Arc<dyn ImageGenerator>,
        max_input_chars: usize,
        size: impl Into<String>,
        quality: impl Into<String>,
    ) -> Self {
        Self {
            llm,
            images,
            max_input_chars,
            size: size.into(),
            quality: quality.into(),
        }
    }

    /// Returns the hosted URL of the generated image
    pub async fn generate(&self, script: &str, overlay_text: &str) -> Result<String, NarratorError> {
        let excerpt = truncate_chars(script, self.max_input_chars);

        tracing::info!("Generating thumbnail prompt for overlay '{}'", overlay_text);
        let prompt = self
            .llm
            .complete(
                prompts::THUMBNAIL_SYSTEM,
                &prompts::thumbnail_user(excerpt, overlay_text),
            )
            .await
            .map_err(|e| NarratorError::ThumbnailFailed(format!("{:#}", e)))?;

        let request = ImageRequest {
            prompt,
            size: self.size.clone(),
            quality: self.quality.clone(),
            count: 1,
        };

        tracing::info!("Generating {} thumbnail ({})", request.size, request.quality);
        let urls = self
            .images
            .generate(&request)
            .await
            .map_err(|e| NarratorError::ThumbnailFailed(format!("{:#}", e)))?;

        urls.into_iter()
            .next()
            .ok_or_else(|| NarratorError::ThumbnailFailed("no image was returned".to_string()))
    }
}
