use std::sync::Arc;

use super::{prompts, truncate_chars};
use crate::providers::TextGenerator;
use crate::NarratorError;

/// Rewrites a transcript into a long-form Korean narration script
#[derive(Clone)]
pub struct ScriptGenerator {
    llm: Arc<dyn TextGenerator>,
    max_input_chars: usize,
}

impl ScriptGenerator {
    pub fn new(llm: Arc<dyn TextGenerator>, max_input_chars: usize) -> Self {
        Self {
            llm,
            max_input_chars,
        }
    }

    /// Returns the model's reply as-is; section markers are requested but not checked
    pub async fn generate(&self, transcript: &str) -> Result<String, NarratorError> {
        let excerpt = truncate_chars(transcript, self.max_input_chars);
        tracing::info!("Generating script from {} transcript characters", excerpt.chars().count());

        self.llm
            .complete(prompts::SCRIPT_SYSTEM, &prompts::script_user(excerpt))
            .await
            .map_err(|e| NarratorError::GenerationFailed(format!("{:#}", e)))
    }
}
