use anyhow::{Context, Result};
use console::style;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::cli::OutputFormat;
use crate::generate::VideoMetadata;
use crate::pipeline::PipelineOutput;

pub const TRANSCRIPT_FILE: &str = "transcript.txt";
pub const SCRIPT_FILE: &str = "script.txt";
pub const AUDIO_FILE: &str = "narration.mp3";
pub const METADATA_FILE: &str = "metadata.json";
pub const THUMBNAIL_FILE: &str = "thumbnail.txt";

/// Files written for one processed video
#[derive(Debug, Clone)]
pub struct SavedArtifacts {
    pub dir: PathBuf,
    pub transcript: PathBuf,
    pub script: PathBuf,
    pub audio: PathBuf,
}

#[derive(Serialize)]
struct MetadataRecord<'a> {
    video_id: Option<&'a str>,
    generated_at: chrono::DateTime<chrono::Utc>,
    #[serde(flatten)]
    metadata: &'a VideoMetadata,
}

/// Write transcript, script and audio into `<root>/<video_id>/`
pub fn save_pipeline_output(output: &PipelineOutput, root: &Path) -> Result<SavedArtifacts> {
    let dir = root.join(output.transcript.video_id.as_str());
    fs_err::create_dir_all(&dir).context("Failed to create output directory")?;

    let artifacts = SavedArtifacts {
        transcript: dir.join(TRANSCRIPT_FILE),
        script: dir.join(SCRIPT_FILE),
        audio: dir.join(AUDIO_FILE),
        dir,
    };

    fs_err::write(&artifacts.transcript, &output.transcript.text)?;
    fs_err::write(&artifacts.script, &output.script)?;
    fs_err::write(&artifacts.audio, &output.audio)?;

    Ok(artifacts)
}

/// Save metadata as JSON next to the other artifacts
pub fn save_metadata(
    metadata: &VideoMetadata,
    video_id: Option<&str>,
    dir: &Path,
) -> Result<PathBuf> {
    let record = MetadataRecord {
        video_id,
        generated_at: chrono::Utc::now(),
        metadata,
    };
    let path = dir.join(METADATA_FILE);
    let json = serde_json::to_string_pretty(&record).context("Failed to serialize metadata")?;
    fs_err::write(&path, json)?;
    Ok(path)
}

/// Save the thumbnail URL
pub fn save_thumbnail_url(url: &str, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(THUMBNAIL_FILE);
    fs_err::write(&path, format!("{}\n", url))?;
    Ok(path)
}

/// Render metadata for the console
pub fn format_metadata(metadata: &VideoMetadata, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(metadata).context("Failed to serialize metadata")
        }
        OutputFormat::Text => Ok(format!(
            "{}\n{}\n\n{}\n{}\n\n{}\n{}\n\n{}\n{}",
            style("Title").bold().cyan(),
            metadata.title,
            style("Description").bold().cyan(),
            metadata.description,
            style("Tags").bold().cyan(),
            metadata.tags,
            style("Thumbnail Text").bold().cyan(),
            metadata.thumbnail_text,
        )),
    }
}

/// Print metadata to console
pub fn print_metadata(metadata: &VideoMetadata, format: &OutputFormat) -> Result<()> {
    println!("{}", format_metadata(metadata, format)?);
    Ok(())
}
