use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tempfile::TempDir;
use tokio::process::Command;

use super::{TranscriptSegment, TranscriptSource};
use crate::Result;

/// YouTube caption source using yt-dlp
pub struct YoutubeTranscriptSource {
    yt_dlp_path: String,
    languages: Vec<String>,
}

/// yt-dlp "json3" caption track
#[derive(Debug, Deserialize)]
struct CaptionTrack {
    #[serde(default)]
    events: Vec<CaptionEvent>,
}

#[derive(Debug, Deserialize)]
struct CaptionEvent {
    #[serde(rename = "tStartMs", default)]
    start_ms: u64,
    #[serde(rename = "dDurationMs", default)]
    duration_ms: u64,
    segs: Option<Vec<CaptionSeg>>,
}

#[derive(Debug, Deserialize)]
struct CaptionSeg {
    #[serde(default)]
    utf8: String,
}

impl YoutubeTranscriptSource {
    pub fn new(yt_dlp_path: impl Into<String>, languages: Vec<String>) -> Self {
        Self {
            yt_dlp_path: yt_dlp_path.into(),
            languages,
        }
    }

    /// Check if yt-dlp is available
    pub async fn check_availability(&self) -> bool {
        Command::new(&self.yt_dlp_path)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .await
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    /// Download caption tracks for the video into `dir`
    async fn download_captions(&self, video_id: &str, dir: &Path) -> Result<()> {
        let url = format!("https://www.youtube.com/watch?v={}", video_id);
        let template = dir.join("%(id)s.%(ext)s").to_string_lossy().into_owned();
        let langs = self.languages.join(",");

        tracing::debug!("Downloading captions for {} ({})", url, langs);

        let output = Command::new(&self.yt_dlp_path)
            .args([
                "--skip-download",
                "--write-subs",
                "--write-auto-subs",
                "--sub-format",
                "json3",
                "--sub-langs",
                langs.as_str(),
                "--no-playlist",
                "--output",
                template.as_str(),
                url.as_str(),
            ])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .with_context(|| {
                format!(
                    "Failed to run {}. Please install yt-dlp: https://github.com/yt-dlp/yt-dlp",
                    self.yt_dlp_path
                )
            })?;

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("yt-dlp failed: {}", error.trim());
        }

        Ok(())
    }

    /// Pick the caption file matching the earliest preferred language
    fn select_caption_file(&self, dir: &Path) -> Result<PathBuf> {
        let mut candidates: Vec<PathBuf> = fs_err::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json3"))
            .collect();
        candidates.sort();

        for lang in &self.languages {
            let suffix = format!(".{}.json3", lang);
            if let Some(path) = candidates
                .iter()
                .find(|path| path.to_string_lossy().ends_with(&suffix))
            {
                return Ok(path.clone());
            }
        }

        candidates
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("No captions available for this video"))
    }
}

/// Convert a json3 caption track into ordered segments
fn parse_caption_track(json: &str) -> Result<Vec<TranscriptSegment>> {
    let track: CaptionTrack =
        serde_json::from_str(json).context("Failed to parse caption track")?;

    let segments = track
        .events
        .into_iter()
        .filter_map(|event| {
            let text = event
                .segs?
                .into_iter()
                .map(|seg| seg.utf8)
                .collect::<String>()
                .replace('\n', " ");
            let text = text.trim();
            if text.is_empty() {
                return None;
            }

            Some(TranscriptSegment {
                text: text.to_string(),
                start: event.start_ms as f64 / 1000.0,
                duration: event.duration_ms as f64 / 1000.0,
            })
        })
        .collect();

    Ok(segments)
}

#[async_trait]
impl TranscriptSource for YoutubeTranscriptSource {
    async fn fetch_segments(&self, video_id: &str) -> Result<Vec<TranscriptSegment>> {
        let temp_dir = TempDir::new().context("Failed to create temporary directory")?;
        self.download_captions(video_id, temp_dir.path()).await?;

        let caption_path = self.select_caption_file(temp_dir.path())?;
        tracing::debug!("Using caption file: {}", caption_path.display());

        let content = fs_err::read_to_string(&caption_path)?;
        let segments = parse_caption_track(&content)?;

        if segments.is_empty() {
            anyhow::bail!("Caption track for {} is empty", video_id);
        }

        Ok(segments)
    }

    fn source_name(&self) -> &'static str {
        "YouTube"
    }
}

impl Default for YoutubeTranscriptSource {
    fn default() -> Self {
        Self::new("yt-dlp", vec!["en".to_string(), "en-US".to_string()])
    }
}
