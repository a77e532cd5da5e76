use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::parser::BulletGlyphs;
use crate::InsightError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Transcription provider settings
    pub assemblyai: AssemblyAiConfig,

    /// Narrative analysis settings
    pub lemur: LemurConfig,

    /// Audio extraction settings
    pub extractor: ExtractorConfig,

    /// Response parser settings
    pub parser: ParserConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyAiConfig {
    /// API key; `ASSEMBLYAI_API_KEY` takes precedence when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// API root, without a trailing path
    pub base_url: String,

    /// Language of the spoken audio
    pub language_code: String,

    /// Summarization model requested alongside the transcript
    pub summary_model: String,

    /// Summary shape
    pub summary_type: String,

    /// Seconds between transcript status checks
    pub poll_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LemurConfig {
    /// Model answering the analysis prompts
    pub final_model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// yt-dlp executable
    pub yt_dlp_path: String,

    /// yt-dlp format selector
    pub format: String,

    /// yt-dlp audio quality (0 best - 10 worst)
    pub audio_quality: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Characters accepted as bullet markers, one per entry
    pub bullet_glyphs: Vec<String>,
}

impl Default for AssemblyAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.assemblyai.com".to_string(),
            language_code: "en".to_string(),
            summary_model: "informative".to_string(),
            summary_type: "bullets_verbose".to_string(),
            poll_interval_secs: 3,
        }
    }
}

impl Default for LemurConfig {
    fn default() -> Self {
        Self {
            final_model: "anthropic/claude-3-5-sonnet".to_string(),
        }
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            yt_dlp_path: "yt-dlp".to_string(),
            format: "bestaudio".to_string(),
            audio_quality: "5".to_string(),
        }
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            bullet_glyphs: BulletGlyphs::DEFAULT.iter().map(char::to_string).collect(),
        }
    }
}

impl Config {
    pub const API_KEY_ENV: &'static str = "ASSEMBLYAI_API_KEY";

    /// Load configuration from file (or defaults), then apply the environment
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = match Self::find_config_file(explicit_path)? {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path.display());
                let content = fs_err::read_to_string(&path)
                    .context("Failed to read config file")?;
                Self::from_yaml(&content)?
            }
            None => Self::default(),
        };

        config.apply_api_key(std::env::var(Self::API_KEY_ENV).ok());
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)
            .context("Failed to parse config file")?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)
            .context("Failed to serialize config")?;

        fs_err::write(path, content)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Configuration file to read, if any exists
    fn find_config_file(explicit_path: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit_path {
            if !path.exists() {
                return Err(InsightError::ConfigError(format!(
                    "Config file not found: {}",
                    path.display()
                ))
                .into());
            }
            return Ok(Some(path.to_path_buf()));
        }

        // Current directory first for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(Some(local_config));
        }

        let user_config = Self::default_path()?;
        Ok(user_config.exists().then_some(user_config))
    }

    /// Per-user configuration file location
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?;

        Ok(config_dir.join("video-insight").join("config.yaml"))
    }

    /// A non-blank key overrides whatever the file provided
    pub fn apply_api_key(&mut self, key: Option<String>) {
        if let Some(key) = key.filter(|key| !key.trim().is_empty()) {
            self.assemblyai.api_key = Some(key);
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let base_url = Url::parse(&self.assemblyai.base_url).map_err(|_| {
            InsightError::ConfigError(format!(
                "Invalid AssemblyAI base URL: {}",
                self.assemblyai.base_url
            ))
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(InsightError::ConfigError(
                "AssemblyAI base URL must use HTTP or HTTPS".to_string(),
            )
            .into());
        }

        if self.assemblyai.poll_interval_secs == 0 {
            return Err(InsightError::ConfigError(
                "poll_interval_secs must be greater than zero".to_string(),
            )
            .into());
        }

        if self.extractor.yt_dlp_path.trim().is_empty() {
            return Err(InsightError::ConfigError("yt_dlp_path must not be empty".to_string()).into());
        }

        if let Some(glyph) = self
            .parser
            .bullet_glyphs
            .iter()
            .find(|glyph| glyph.chars().count() != 1)
        {
            return Err(InsightError::ConfigError(format!(
                "Bullet glyph must be a single character, got {:?}",
                glyph
            ))
            .into());
        }

        Ok(())
    }

    /// API key or a typed error naming the variable to set
    pub fn api_key(&self) -> Result<&str> {
        self.assemblyai
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| InsightError::MissingApiKey(Self::API_KEY_ENV).into())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.assemblyai.poll_interval_secs)
    }

    /// Bullet markers for the section parser
    pub fn bullet_glyphs(&self) -> BulletGlyphs {
        BulletGlyphs::new(
            self.parser
                .bullet_glyphs
                .iter()
                .filter_map(|glyph| glyph.chars().next()),
        )
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  AssemblyAI URL: {}", self.assemblyai.base_url);
        println!(
            "  API Key: {}",
            if self.api_key().is_ok() { "set" } else { "not set" }
        );
        println!("  Language: {}", self.assemblyai.language_code);
        println!(
            "  Summary: {} / {}",
            self.assemblyai.summary_model, self.assemblyai.summary_type
        );
        println!("  Poll Interval: {}s", self.assemblyai.poll_interval_secs);
        println!("  LeMUR Model: {}", self.lemur.final_model);
        println!(
            "  yt-dlp: {} (-f {} --audio-quality {})",
            self.extractor.yt_dlp_path, self.extractor.format, self.extractor.audio_quality
        );
        println!("  Bullet Glyphs: {}", self.parser.bullet_glyphs.join(" "));
    }
}
