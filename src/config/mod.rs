use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::providers::openai::SPEECH_INPUT_LIMIT;

/// Environment variable that overrides `openai.api_key`
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// OpenAI configuration
    pub openai: OpenAiConfig,

    /// Generation and synthesis settings
    pub pipeline: PipelineConfig,

    /// Application settings
    pub app: AppConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// API key (prefer the OPENAI_API_KEY environment variable)
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// API base URL
    pub base_url: String,

    /// Chat model used for script, metadata and image prompts
    pub chat_model: String,

    /// Sampling temperature for every chat call
    pub temperature: f32,

    /// Text-to-speech model
    pub speech_model: String,

    /// Image generation model
    pub image_model: String,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Transcript characters sent for script generation
    pub script_char_limit: usize,

    /// Script characters sent for metadata generation
    pub metadata_char_limit: usize,

    /// Script characters sent for thumbnail prompt generation
    pub thumbnail_char_limit: usize,

    /// Characters per speech request
    pub tts_chunk_chars: usize,

    /// Default narration voice
    pub voice: String,

    /// Thumbnail size
    pub image_size: String,

    /// Thumbnail quality tier
    pub image_quality: String,

    /// Extra pronunciation rules, applied after the built-in table
    pub pronunciations: Vec<PronunciationRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PronunciationRule {
    pub term: String,
    pub replacement: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory receiving per-video output folders
    pub output_dir: PathBuf,

    /// yt-dlp executable
    pub yt_dlp_path: String,

    /// Caption languages in order of preference
    pub transcript_languages: Vec<String>,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            chat_model: "gpt-4o".to_string(),
            temperature: 0.7,
            speech_model: "tts-1".to_string(),
            image_model: "dall-e-3".to_string(),
            request_timeout_secs: 300,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            script_char_limit: 30_000,
            metadata_char_limit: 10_000,
            thumbnail_char_limit: 3_000,
            tts_chunk_chars: 4_000,
            voice: "onyx".to_string(),
            image_size: "1792x1024".to_string(),
            image_quality: "standard".to_string(),
            pronunciations: Vec::new(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            yt_dlp_path: "yt-dlp".to_string(),
            transcript_languages: vec!["en".to_string(), "en-US".to_string()],
        }
    }
}

impl Config {
    /// Load configuration from file or create default
    pub async fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            let content = fs_err::read_to_string(&config_path)
                .context("Failed to read config file")?;

            serde_yaml::from_str::<Config>(&content).context("Failed to parse config file")?
        } else {
            let config = Self::default();
            config.save().await?;
            config
        };

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                config.openai.api_key = Some(key);
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;

        fs_err::write(&config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Get configuration file path
    pub fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir().context("Could not determine config directory")?;

        Ok(config_dir.join("tubenarrator").join("config.yaml"))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let pipeline = &self.pipeline;

        if pipeline.tts_chunk_chars == 0 || pipeline.tts_chunk_chars > SPEECH_INPUT_LIMIT {
            anyhow::bail!(
                "pipeline.tts_chunk_chars must be between 1 and {}",
                SPEECH_INPUT_LIMIT
            );
        }

        if pipeline.script_char_limit == 0
            || pipeline.metadata_char_limit == 0
            || pipeline.thumbnail_char_limit == 0
        {
            anyhow::bail!("Character limits must be greater than zero");
        }

        if pipeline.voice.trim().is_empty() {
            anyhow::bail!("pipeline.voice must not be empty");
        }

        if pipeline.pronunciations.iter().any(|rule| rule.term.is_empty()) {
            anyhow::bail!("Pronunciation rules need a non-empty term");
        }

        Ok(())
    }

    /// API key from the environment or config file
    pub fn api_key(&self) -> Result<&str> {
        self.openai
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .with_context(|| {
                format!(
                    "Missing OpenAI API key: set {} or openai.api_key in {}",
                    API_KEY_ENV,
                    Self::config_path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|_| "config.yaml".to_string())
                )
            })
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        if let Ok(path) = Self::config_path() {
            println!("  Config File: {}", path.display());
        }
        println!(
            "  API Key: {}",
            if self.openai.api_key.is_some() { "set" } else { "not set" }
        );
        println!("  Base URL: {}", self.openai.base_url);
        println!(
            "  Chat Model: {} (temperature {})",
            self.openai.chat_model, self.openai.temperature
        );
        println!("  Speech Model: {}", self.openai.speech_model);
        println!("  Image Model: {}", self.openai.image_model);
        println!("  Voice: {}", self.pipeline.voice);
        println!("  TTS Chunk Size: {} chars", self.pipeline.tts_chunk_chars);
        println!("  Output Directory: {}", self.app.output_dir.display());
        println!(
            "  Caption Languages: {}",
            self.app.transcript_languages.join(", ")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.pipeline.tts_chunk_chars, 4_000);
        assert_eq!(config.pipeline.voice, "onyx");
    }

    #[test]
    fn test_rejects_chunk_above_speech_limit() {
        let mut config = Config::default();
        config.pipeline.tts_chunk_chars = SPEECH_INPUT_LIMIT + 1;
        assert!(config.validate().is_err());

        config.pipeline.tts_chunk_chars = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml =
            "pipeline:\n  voice: nova\n  pronunciations:\n    - term: Rust\n      replacement: 러스트\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.pipeline.voice, "nova");
        assert_eq!(config.pipeline.tts_chunk_chars, 4_000);
        assert_eq!(config.openai.chat_model, "gpt-4o");
        assert_eq!(config.pipeline.pronunciations.len(), 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_api_key_is_not_serialized() {
        let mut config = Config::default();
        config.openai.api_key = Some("sk-secret".to_string());
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(!yaml.contains("sk-secret"));
        assert!(config.api_key().is_ok());
    }

    #[test]
    fn test_missing_api_key() {
        let config = Config::default();
        assert!(config.api_key().is_err());
    }
}
