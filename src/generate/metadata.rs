use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{prompts, truncate_chars};
use crate::providers::TextGenerator;

pub const FALLBACK_TITLE: &str = "Error generating metadata";
pub const FALLBACK_TAGS: &str = "video, summary";
pub const FALLBACK_THUMBNAIL_TEXT: &str = "Video Summary";

/// Upload metadata derived from a script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: String,
    pub description: String,
    pub tags: String,
    pub thumbnail_text: String,
}

impl VideoMetadata {
    /// Placeholder record carrying `raw` as the description
    pub fn fallback(raw: impl Into<String>) -> Self {
        Self {
            title: FALLBACK_TITLE.to_string(),
            description: raw.into(),
            tags: FALLBACK_TAGS.to_string(),
            thumbnail_text: FALLBACK_THUMBNAIL_TEXT.to_string(),
        }
    }

    /// Strip code fences and decode the four-field JSON object
    pub fn parse(raw: &str) -> serde_json::Result<Self> {
        let cleaned = raw.replace("```json", "").replace("```", "");
        serde_json::from_str(cleaned.trim())
    }
}

/// Generates title, description, tags and thumbnail phrase; never fails
#[derive(Clone)]
pub struct MetadataGenerator {
    llm: Arc<dyn TextGenerator>,
    max_input_chars: usize,
}

impl MetadataGenerator {
    pub fn new(llm: Arc<dyn TextGenerator>, max_input_chars: usize) -> Self {
        Self {
            llm,
            max_input_chars,
        }
    }

    pub async fn generate(&self, script: &str) -> VideoMetadata {
        let excerpt = truncate_chars(script, self.max_input_chars);
        tracing::info!("Generating metadata");

        let raw = match self
            .llm
            .complete(prompts::METADATA_SYSTEM, &prompts::metadata_user(excerpt))
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Metadata request failed, using placeholders: {:#}", e);
                return VideoMetadata::fallback(format!("{:#}", e));
            }
        };

        match VideoMetadata::parse(&raw) {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::warn!("Metadata response was not valid JSON, using placeholders: {}", e);
                VideoMetadata::fallback(raw)
            }
        }
    }
}
