use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::notes::DEFAULT_SLIDE_LABEL;

// @module: Application configuration
// Loading, environment overrides and validation of the settings the tool
// needs at startup.

/// Environment variables checked for the API key, in order
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Revision service config
    #[serde(default)]
    pub reviser: ReviserConfig,

    /// Markdown formatting config
    #[serde(default)]
    pub format: FormatConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// How the instruction and document are laid out in the request
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStyle {
    /// Instruction as system instruction, document as the only user turn
    #[default]
    SystemInstruction,
    /// Instruction as a priming user turn, then the document turn
    Primed,
}

impl std::fmt::Display for ConversationStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SystemInstruction => write!(f, "system_instruction"),
            Self::Primed => write!(f, "primed"),
        }
    }
}

impl std::str::FromStr for ConversationStyle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "system_instruction" | "system" => Ok(Self::SystemInstruction),
            "primed" => Ok(Self::Primed),
            _ => Err(anyhow!("Invalid conversation style: {}", s)),
        }
    }
}

/// Revision service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ReviserConfig {
    /// Model name (e.g., "gemini-2.5-flash")
    #[serde(default = "default_model")]
    pub model: String,

    /// API key for the service
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Service endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Temperature parameter for text generation (0.0 to 2.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Instructional preamble sent with every revision
    #[serde(default = "default_instruction")]
    pub instruction: String,

    /// Request layout
    #[serde(default)]
    pub conversation: ConversationStyle,
}

impl Default for ReviserConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: String::new(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
            instruction: default_instruction(),
            conversation: ConversationStyle::default(),
        }
    }
}

/// Markdown formatting configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FormatConfig {
    /// Word used in slide headings (`## Slide 1`)
    #[serde(default = "default_slide_label")]
    pub slide_label: String,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            slide_label: default_slide_label(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_temperature() -> f32 {
    0.7
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_slide_label() -> String {
    DEFAULT_SLIDE_LABEL.to_string()
}

fn default_instruction() -> String {
    "You are an excellent presentation assistant. \
Analyze the following speaker notes, which are separated per slide in markdown format. \
Your task is to summarize the key points and reformat them into a more polished, concise version. \
For each slide, provide a short summary and bullet points highlighting the main ideas. \
Keep a professional and clear tone."
        .to_string()
}

impl Config {
    /// Load configuration from `path`, falling back to defaults when the file is absent
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::warn!("Config file not found at '{}', using defaults.", path.display());
            return Ok(Self::default());
        }

        let file = File::open(path)
            .context(format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Override the API key from the first non-empty environment variable
    pub fn apply_env(&mut self) {
        self.apply_env_with(|name| std::env::var(name).ok());
    }

    /// Same as [`Config::apply_env`] with an injectable lookup
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| lookup(name))
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty());

        if let Some(key) = key {
            self.reviser.api_key = key;
        }
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.reviser.api_key.trim().is_empty() {
            return Err(anyhow!(
                "No API key configured. Set {} (or {}) or add reviser.api_key to the config file.",
                API_KEY_ENV_VARS[0],
                API_KEY_ENV_VARS[1]
            ));
        }

        if self.reviser.model.trim().is_empty() {
            return Err(anyhow!("reviser.model must not be empty"));
        }

        url::Url::parse(&self.reviser.endpoint)
            .context(format!("Invalid reviser endpoint: {}", self.reviser.endpoint))?;

        if self.reviser.timeout_secs == 0 {
            return Err(anyhow!("reviser.timeout_secs must be greater than zero"));
        }

        if !(0.0..=2.0).contains(&self.reviser.temperature) {
            return Err(anyhow!(
                "reviser.temperature must be between 0.0 and 2.0, got {}",
                self.reviser.temperature
            ));
        }

        Ok(())
    }
}
