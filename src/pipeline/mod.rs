use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::audio::{AudioSynthesizer, PronunciationNormalizer};
use crate::config::Config;
use crate::extractors::youtube::YoutubeTranscriptSource;
use crate::extractors::{resolve_video_id, Transcript, TranscriptFetcher, TranscriptSource};
use crate::generate::{MetadataGenerator, ScriptGenerator, ThumbnailGenerator, VideoMetadata};
use crate::providers::{ImageGenerator, OpenAiClient, SpeechSynthesizer, TextGenerator};
use crate::{NarratorError, Result};

/// Artifacts of a successful pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutput {
    /// Source captions
    pub transcript: Transcript,

    /// Generated narration script
    pub script: String,

    /// Encoded narration audio, held in memory only and left out of serialized output
    #[serde(skip)]
    pub audio: Vec<u8>,
}

/// Outcome of [`ContentPipeline::process`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PipelineResult {
    Completed(PipelineOutput),
    Failed { error: String },
}

impl PipelineResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, PipelineResult::Completed(_))
    }

    pub fn into_result(self) -> std::result::Result<PipelineOutput, String> {
        match self {
            PipelineResult::Completed(output) => Ok(output),
            PipelineResult::Failed { error } => Err(error),
        }
    }
}

/// Collaborators shared by every pipeline stage
#[derive(Clone)]
pub struct Collaborators {
    pub transcripts: Arc<dyn TranscriptSource>,
    pub text: Arc<dyn TextGenerator>,
    pub speech: Arc<dyn SpeechSynthesizer>,
    pub images: Arc<dyn ImageGenerator>,
}

impl Collaborators {
    /// yt-dlp captions plus one OpenAI client for every generation service
    pub fn from_config(config: &Config) -> Result<Self> {
        let openai = Arc::new(OpenAiClient::new(&config.openai, config.api_key()?)?);
        let transcripts: Arc<dyn TranscriptSource> = Arc::new(YoutubeTranscriptSource::new(
            config.app.yt_dlp_path.clone(),
            config.app.transcript_languages.clone(),
        ));

        Ok(Self {
            transcripts,
            text: openai.clone(),
            speech: openai.clone(),
            images: openai,
        })
    }
}

/// Main narration pipeline: URL → transcript → script → audio
#[derive(Clone)]
pub struct ContentPipeline {
    transcripts: TranscriptFetcher,
    scripts: ScriptGenerator,
    audio: AudioSynthesizer,
    metadata: MetadataGenerator,
    thumbnails: ThumbnailGenerator,
    voice: String,
}

impl ContentPipeline {
    /// Create a pipeline backed by yt-dlp and OpenAI
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self::with_collaborators(
            config,
            Collaborators::from_config(config)?,
        ))
    }

    pub fn with_collaborators(config: &Config, collaborators: Collaborators) -> Self {
        let pipeline = &config.pipeline;
        let normalizer = PronunciationNormalizer::with_rules(&pipeline.pronunciations);

        Self {
            transcripts: TranscriptFetcher::new(collaborators.transcripts),
            scripts: ScriptGenerator::new(collaborators.text.clone(), pipeline.script_char_limit),
            audio: AudioSynthesizer::new(
                collaborators.speech,
                normalizer,
                pipeline.tts_chunk_chars,
            ),
            metadata: MetadataGenerator::new(
                collaborators.text.clone(),
                pipeline.metadata_char_limit,
            ),
            thumbnails: ThumbnailGenerator::new(
                collaborators.text,
                collaborators.images,
                pipeline.thumbnail_char_limit,
                pipeline.image_size.clone(),
                pipeline.image_quality.clone(),
            ),
            voice: pipeline.voice.clone(),
        }
    }

    /// Use `voice` instead of the configured narration voice
    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    pub fn voice(&self) -> &str {
        &self.voice
    }

    /// Run every stage, stopping at the first failure
    pub async fn run(&self, url: &str) -> std::result::Result<PipelineOutput, NarratorError> {
        let video_id = resolve_video_id(url)?;
        tracing::info!("Processing video {}", video_id);

        let transcript = self.transcripts.fetch(&video_id).await?;
        let script = self.scripts.generate(&transcript.text).await?;
        let audio = self.audio.synthesize(&script, &self.voice).await?;

        tracing::info!(
            "Finished {}: {} script characters, {} audio bytes",
            video_id,
            script.chars().count(),
            audio.len()
        );

        Ok(PipelineOutput {
            transcript,
            script,
            audio,
        })
    }

    /// Like [`run`](Self::run), with any stage failure reduced to its message
    pub async fn process(&self, url: &str) -> PipelineResult {
        match self.run(url).await {
            Ok(output) => PipelineResult::Completed(output),
            Err(e) => {
                tracing::warn!("Pipeline failed for {}: {}", url, e);
                PipelineResult::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    pub async fn generate_metadata(&self, script: &str) -> VideoMetadata {
        self.metadata.generate(script).await
    }

    pub async fn generate_thumbnail(
        &self,
        script: &str,
        overlay_text: &str,
    ) -> std::result::Result<String, NarratorError> {
        self.thumbnails.generate(script, overlay_text).await
    }

    /// Synthesize arbitrary text with the pipeline's voice and pronunciation rules
    pub async fn narrate(&self, text: &str) -> std::result::Result<Vec<u8>, NarratorError> {
        self.audio.synthesize(text, &self.voice).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::{MockTranscriptSource, TranscriptSegment};
    use crate::providers::{MockImageGenerator, MockSpeechSynthesizer, MockTextGenerator};

    const URL: &str = "https://www.youtube.com/watch?v=jNQXAC9IVRw";

    fn segments() -> Vec<TranscriptSegment> {
        ["Hello", "world"]
            .iter()
            .enumerate()
            .map(|(i, text)| TranscriptSegment {
                text: text.to_string(),
                start: i as f64,
                duration: 1.0,
            })
            .collect()
    }

    fn speech() -> MockSpeechSynthesizer {
        let mut speech = MockSpeechSynthesizer::new();
        speech.expect_max_input_chars().return_const(4096usize);
        speech
    }

    fn pipeline(
        transcripts: MockTranscriptSource,
        text: MockTextGenerator,
        speech: MockSpeechSynthesizer,
    ) -> ContentPipeline {
        ContentPipeline::with_collaborators(
            &Config::default(),
            Collaborators {
                transcripts: Arc::new(transcripts),
                text: Arc::new(text),
                speech: Arc::new(speech),
                images: Arc::new(MockImageGenerator::new()),
            },
        )
    }

    #[tokio::test]
    async fn test_process_runs_every_stage() {
        let mut transcripts = MockTranscriptSource::new();
        transcripts.expect_source_name().return_const("stub");
        transcripts
            .expect_fetch_segments()
            .withf(|id| id == "jNQXAC9IVRw")
            .times(1)
            .returning(|_| Ok(segments()));

        let mut text = MockTextGenerator::new();
        text.expect_complete()
            .withf(|_, user| user.contains("\"Hello world\""))
            .times(1)
            .returning(|_, _| Ok("[Intro] AI 이야기".to_string()));

        let mut speech = speech();
        speech
            .expect_speak()
            .withf(|input, voice| input == "[Intro] 에이아이 이야기" && voice == "onyx")
            .times(1)
            .returning(|_, _| Ok(vec![1, 2, 3]));

        let output = pipeline(transcripts, text, speech)
            .process(URL)
            .await
            .into_result()
            .unwrap();

        assert_eq!(output.transcript.text, "Hello world");
        assert_eq!(output.script, "[Intro] AI 이야기");
        assert_eq!(output.audio, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_transcript_failure_short_circuits() {
        let mut transcripts = MockTranscriptSource::new();
        transcripts.expect_source_name().return_const("stub");
        transcripts
            .expect_fetch_segments()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("Subtitles are disabled for this video")));

        let mut text = MockTextGenerator::new();
        text.expect_complete().times(0);
        let mut speech = speech();
        speech.expect_speak().times(0);

        let result = pipeline(transcripts, text, speech).process(URL).await;
        match result {
            PipelineResult::Failed { error } => {
                assert!(error.contains("Could not retrieve transcript"));
                assert!(error.contains("Subtitles are disabled"));
            }
            PipelineResult::Completed(_) => panic!("expected failure"),
        }
    }

    #[tokio::test]
    async fn test_invalid_url_touches_nothing() {
        let mut transcripts = MockTranscriptSource::new();
        transcripts.expect_fetch_segments().times(0);
        let mut text = MockTextGenerator::new();
        text.expect_complete().times(0);
        let mut speech = speech();
        speech.expect_speak().times(0);

        let pipeline = pipeline(transcripts, text, speech);
        let err = pipeline.run("https://example.com/about").await.unwrap_err();
        assert!(matches!(err, NarratorError::NotFound(_)));

        let result = pipeline.process("https://example.com/about").await;
        assert!(!result.is_ok());
    }

    #[tokio::test]
    async fn test_audio_failure_returns_no_partial_result() {
        let mut transcripts = MockTranscriptSource::new();
        transcripts.expect_source_name().return_const("stub");
        transcripts
            .expect_fetch_segments()
            .returning(|_| Ok(segments()));

        let mut text = MockTextGenerator::new();
        text.expect_complete()
            .returning(|_, _| Ok("대본".to_string()));

        let mut speech = speech();
        speech
            .expect_speak()
            .returning(|_, _| Err(anyhow::anyhow!("OpenAI returned 429")));

        let result = pipeline(transcripts, text, speech).process(URL).await;
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json.as_object().map(|o| o.len()), Some(1));
        assert!(json["error"]
            .as_str()
            .unwrap()
            .starts_with("Audio generation failed"));
    }

    #[tokio::test]
    async fn test_with_voice_overrides_config() {
        let mut transcripts = MockTranscriptSource::new();
        transcripts.expect_source_name().return_const("stub");
        transcripts
            .expect_fetch_segments()
            .returning(|_| Ok(segments()));
        let mut text = MockTextGenerator::new();
        text.expect_complete()
            .returning(|_, _| Ok("script".to_string()));
        let mut speech = speech();
        speech
            .expect_speak()
            .withf(|_, voice| voice == "nova")
            .times(1)
            .returning(|_, _| Ok(vec![0]));

        let pipeline = pipeline(transcripts, text, speech).with_voice("nova");
        assert!(pipeline.process(URL).await.is_ok());
    }

    #[test]
    fn test_completed_result_serializes_without_audio() {
        let result = PipelineResult::Completed(PipelineOutput {
            transcript: Transcript::from_segments(
                resolve_video_id(URL).unwrap(),
                segments(),
            ),
            script: "script".to_string(),
            audio: vec![1, 2, 3],
        });

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["script"], "script");
        assert_eq!(json["transcript"]["text"], "Hello world");
        assert!(json.get("audio").is_none());

        let failed = serde_json::to_value(PipelineResult::Failed {
            error: "Invalid YouTube URL: nope".to_string(),
        })
        .unwrap();
        assert_eq!(failed, serde_json::json!({"error": "Invalid YouTube URL: nope"}));
    }
}
