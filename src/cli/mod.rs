use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "tubenarrator",
    about = "TubeNarrator - Turn a YouTube video into a narrated Korean script",
    version,
    long_about = "Fetches a YouTube video's captions, rewrites them into a long-form Korean script with OpenAI, synthesizes narration with OpenAI TTS and can generate upload metadata and a thumbnail."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the transcript, write the script and synthesize narration
    Process {
        /// YouTube URL (watch, youtu.be, embed or shorts link)
        #[arg(value_name = "URL")]
        url: String,

        /// Output directory (defaults to app.output_dir from the config)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Narration voice (defaults to pipeline.voice from the config)
        #[arg(long, value_name = "VOICE")]
        voice: Option<String>,

        /// Also generate title, description, tags and thumbnail text
        #[arg(long)]
        metadata: bool,

        /// Also generate a thumbnail image (implies --metadata)
        #[arg(long)]
        thumbnail: bool,
    },

    /// Generate upload metadata from a script file
    Metadata {
        /// Script file produced by `process`
        #[arg(value_name = "SCRIPT_FILE")]
        script: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Generate a thumbnail image from a script file
    Thumbnail {
        /// Script file produced by `process`
        #[arg(value_name = "SCRIPT_FILE")]
        script: PathBuf,

        /// Phrase rendered inside the image
        #[arg(short, long, value_name = "TEXT")]
        text: String,
    },

    /// Synthesize narration for a text file
    Narrate {
        /// Text file to read aloud
        #[arg(value_name = "TEXT_FILE")]
        input: PathBuf,

        /// Audio file to write
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Narration voice (defaults to pipeline.voice from the config)
        #[arg(long, value_name = "VOICE")]
        voice: Option<String>,
    },

    /// Print the video id found in a URL
    Resolve {
        #[arg(value_name = "URL")]
        url: String,
    },

    /// Show or locate the configuration
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,
    },
}

#[derive(ValueEnum, Clone, Debug)]
pub enum OutputFormat {
    /// Human readable text
    Text,
    /// JSON object
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
