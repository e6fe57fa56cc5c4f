use std::sync::Arc;

pub mod pronunciation;

pub use pronunciation::PronunciationNormalizer;

use crate::providers::SpeechSynthesizer;
use crate::NarratorError;

/// Split `text` into contiguous slices of at most `max_chars` characters.
///
/// The slices cover the input exactly once and in order; boundaries always fall on
/// character boundaries.
pub fn split_into_chunks(text: &str, max_chars: usize) -> Vec<&str> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::with_capacity(text.len() / max_chars + 1);
    let mut start = 0;
    let mut count = 0;

    for (idx, _) in text.char_indices() {
        if count == max_chars {
            chunks.push(&text[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }

    if start < text.len() {
        chunks.push(&text[start..]);
    }

    chunks
}

/// Turns a script into one narration track through a size-limited speech service
#[derive(Clone)]
pub struct AudioSynthesizer {
    speech: Arc<dyn SpeechSynthesizer>,
    normalizer: PronunciationNormalizer,
    max_chunk_chars: usize,
}

impl AudioSynthesizer {
    /// `max_chunk_chars` is capped at the synthesizer's own input limit
    pub fn new(
        speech: Arc<dyn SpeechSynthesizer>,
        normalizer: PronunciationNormalizer,
        max_chunk_chars: usize,
    ) -> Self {
        let limit = speech.max_input_chars();
        if max_chunk_chars > limit {
            tracing::warn!(
                "Chunk size {} exceeds speech input limit, using {}",
                max_chunk_chars,
                limit
            );
        }

        Self {
            max_chunk_chars: max_chunk_chars.clamp(1, limit.max(1)),
            speech,
            normalizer,
        }
    }

    pub fn max_chunk_chars(&self) -> usize {
        self.max_chunk_chars
    }

    /// Normalize, chunk and synthesize `text`, concatenating the audio in chunk order.
    ///
    /// Whitespace-only chunks are skipped. The first failing chunk aborts the call.
    pub async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, NarratorError> {
        let normalized = self.normalizer.normalize(text);
        let chunks = split_into_chunks(&normalized, self.max_chunk_chars);

        tracing::info!(
            "Synthesizing {} characters in {} chunk(s) with voice {}",
            normalized.chars().count(),
            chunks.len(),
            voice
        );

        let mut audio = Vec::new();
        for (index, chunk) in chunks.iter().enumerate() {
            if chunk.trim().is_empty() {
                tracing::debug!("Skipping blank chunk {}", index + 1);
                continue;
            }

            let bytes = self.speech.speak(chunk, voice).await.map_err(|e| {
                NarratorError::AudioFailed(format!(
                    "chunk {}/{}: {:#}",
                    index + 1,
                    chunks.len(),
                    e
                ))
            })?;

            tracing::debug!("Chunk {}/{} returned {} bytes", index + 1, chunks.len(), bytes.len());
            audio.extend_from_slice(&bytes);
        }

        Ok(audio)
    }
}
