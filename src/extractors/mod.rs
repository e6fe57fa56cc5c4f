use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, OnceLock};

pub mod youtube;

use crate::{NarratorError, Result};

/// Identifier of a video as recognized by the caption source
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoReference(String);

impl VideoReference {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn video_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?:v=|/)([0-9A-Za-z_-]{11})").expect("video id pattern is valid")
    })
}

/// Extract the 11-character video id following `v=` or a path separator.
///
/// The first match wins and nothing beyond the pattern is checked; an unknown id is
/// rejected later by the caption source.
pub fn resolve_video_id(url: &str) -> std::result::Result<VideoReference, NarratorError> {
    video_id_pattern()
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| VideoReference(m.as_str().to_string()))
        .ok_or_else(|| NarratorError::NotFound(url.to_string()))
}

/// A single timed caption line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Caption text
    pub text: String,

    /// Start offset in seconds
    pub start: f64,

    /// Duration in seconds
    pub duration: f64,
}

/// Captions of one video, flattened for generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub video_id: VideoReference,

    /// Segments in caption-source order
    pub segments: Vec<TranscriptSegment>,

    /// Segment texts joined with single spaces
    pub text: String,
}

impl Transcript {
    pub fn from_segments(video_id: VideoReference, segments: Vec<TranscriptSegment>) -> Self {
        let text = segments
            .iter()
            .map(|segment| segment.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        Self {
            video_id,
            segments,
            text,
        }
    }
}

/// Source of timed captions for a video id
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Fetch caption segments in playback order
    async fn fetch_segments(&self, video_id: &str) -> Result<Vec<TranscriptSegment>>;

    /// Get the name of this source
    fn source_name(&self) -> &'static str;
}

/// Fetches and flattens transcripts, collapsing every source failure into one kind
#[derive(Clone)]
pub struct TranscriptFetcher {
    source: Arc<dyn TranscriptSource>,
}

impl TranscriptFetcher {
    pub fn new(source: Arc<dyn TranscriptSource>) -> Self {
        Self { source }
    }

    pub async fn fetch(
        &self,
        video_id: &VideoReference,
    ) -> std::result::Result<Transcript, NarratorError> {
        tracing::info!(
            "Fetching transcript for {} from {}",
            video_id,
            self.source.source_name()
        );

        let segments = self
            .source
            .fetch_segments(video_id.as_str())
            .await
            .map_err(|e| NarratorError::TranscriptUnavailable(format!("{:#}", e)))?;

        tracing::debug!("Fetched {} transcript segments", segments.len());

        Ok(Transcript::from_segments(video_id.clone(), segments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(text: &str, start: f64) -> TranscriptSegment {
        TranscriptSegment {
            text: text.to_string(),
            start,
            duration: 1.5,
        }
    }

    #[test]
    fn test_resolve_watch_url() {
        let id = resolve_video_id("https://www.youtube.com/watch?v=jNQXAC9IVRw").unwrap();
        assert_eq!(id.as_str(), "jNQXAC9IVRw");
    }

    #[test]
    fn test_resolve_path_forms() {
        assert_eq!(
            resolve_video_id("https://youtu.be/dQw4w9WgXcQ").unwrap().as_str(),
            "dQw4w9WgXcQ"
        );
        assert_eq!(
            resolve_video_id("https://www.youtube.com/embed/dQw4w9WgXcQ?start=10")
                .unwrap()
                .as_str(),
            "dQw4w9WgXcQ"
        );
        assert_eq!(
            resolve_video_id("https://m.youtube.com/watch?feature=share&v=a-B_c1D2e3F&t=42")
                .unwrap()
                .as_str(),
            "a-B_c1D2e3F"
        );
    }

    #[test]
    fn test_resolve_first_match_wins() {
        // "/shorts" is not 11 characters, the id after it is the first full token
        let id = resolve_video_id("https://www.youtube.com/shorts/abcdefghijk").unwrap();
        assert_eq!(id.as_str(), "abcdefghijk");
    }

    #[test]
    fn test_resolve_not_found() {
        assert!(matches!(
            resolve_video_id("not a url"),
            Err(NarratorError::NotFound(_))
        ));
        assert!(matches!(
            resolve_video_id("https://www.youtube.com/watch?v=short"),
            Err(NarratorError::NotFound(_))
        ));
        assert!(resolve_video_id("").is_err());
    }

    #[test]
    fn test_transcript_joins_with_single_space() {
        let id = resolve_video_id("https://youtu.be/jNQXAC9IVRw").unwrap();
        let transcript =
            Transcript::from_segments(id, vec![segment("Hello", 0.0), segment("world", 1.5)]);
        assert_eq!(transcript.text, "Hello world");
        assert_eq!(transcript.segments.len(), 2);
    }

    #[tokio::test]
    async fn test_fetcher_flattens_segments() {
        let mut source = MockTranscriptSource::new();
        source.expect_source_name().return_const("stub");
        source
            .expect_fetch_segments()
            .withf(|id| id == "jNQXAC9IVRw")
            .times(1)
            .returning(|_| Ok(vec![segment("Hello", 0.0), segment("world", 1.5)]));

        let fetcher = TranscriptFetcher::new(Arc::new(source));
        let id = resolve_video_id("https://www.youtube.com/watch?v=jNQXAC9IVRw").unwrap();
        let transcript = fetcher.fetch(&id).await.unwrap();

        assert_eq!(transcript.text, "Hello world");
        assert_eq!(transcript.video_id, id);
    }

    #[tokio::test]
    async fn test_fetcher_wraps_source_error() {
        let mut source = MockTranscriptSource::new();
        source.expect_source_name().return_const("stub");
        source
            .expect_fetch_segments()
            .returning(|_| Err(anyhow::anyhow!("Subtitles are disabled for this video")));

        let fetcher = TranscriptFetcher::new(Arc::new(source));
        let id = resolve_video_id("https://youtu.be/jNQXAC9IVRw").unwrap();
        let err = fetcher.fetch(&id).await.unwrap_err();

        assert!(matches!(err, NarratorError::TranscriptUnavailable(_)));
        assert!(err.to_string().contains("Subtitles are disabled"));
    }
}
