//! TubeNarrator - turn a YouTube video into a narrated Korean script
//!
//! This library fetches a video's captions, rewrites them into a long-form script with an
//! OpenAI chat model, synthesizes narration with OpenAI TTS and can derive upload metadata
//! and a thumbnail image from the script.

pub mod audio;
pub mod cli;
pub mod config;
pub mod extractors;
pub mod generate;
pub mod output;
pub mod pipeline;
pub mod providers;
pub mod utils;

pub use cli::{Cli, Commands, OutputFormat};
pub use config::Config;
pub use extractors::{resolve_video_id, Transcript, TranscriptSegment, VideoReference};
pub use generate::VideoMetadata;
pub use pipeline::{Collaborators, ContentPipeline, PipelineOutput, PipelineResult};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Failure kinds surfaced by the pipeline stages
#[derive(thiserror::Error, Debug)]
pub enum NarratorError {
    #[error("Invalid YouTube URL: {0}")]
    NotFound(String),

    #[error("Could not retrieve transcript: {0}")]
    TranscriptUnavailable(String),

    #[error("Script generation failed: {0}")]
    GenerationFailed(String),

    #[error("Thumbnail generation failed: {0}")]
    ThumbnailFailed(String),

    #[error("Audio generation failed: {0}")]
    AudioFailed(String),
}
