//! # Application Configuration
//!
//! Defines the configuration of the `studytutor` CLI and loads it from an
//! optional YAML file and environment variables. The API credential is read
//! once here, at start.

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use studytutor::providers::factory::ProviderKind;
use tracing::info;

/// The configuration file looked up in the working directory when no
/// explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "studytutor.yml";

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// Indicates an explicitly requested configuration file was not found.
    NotFound(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure, mapping directly to `studytutor.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The completion provider family ("openai" or "gemini").
    #[serde(default = "default_provider")]
    pub provider: String,
    /// The provider endpoint. Derived from `provider` when unset.
    #[serde(default)]
    pub api_url: Option<String>,
    /// The API credential. Falls back to `OPENAI_API_KEY` / `GEMINI_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,
    /// The model answers are requested from.
    #[serde(default = "default_model")]
    pub model: String,
    /// Seconds before an external call is abandoned.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// OCR settings.
    #[serde(default)]
    pub ocr: OcrConfig,
    /// Prompt template overrides.
    #[serde(default)]
    pub prompts: PromptConfig,
}

impl AppConfig {
    /// The provider family in use. A blank `provider` is inferred from
    /// `model`.
    pub fn provider_kind(&self) -> Result<ProviderKind, ConfigError> {
        if self.provider.trim().is_empty() {
            return Ok(ProviderKind::infer_from_model(&self.model));
        }
        self.provider
            .parse::<ProviderKind>()
            .map_err(|e: studytutor::ProviderError| ConfigError::General(e.to_string()))
    }
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_model() -> String {
    studytutor::constants::DEFAULT_MODEL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    studytutor::constants::DEFAULT_REQUEST_TIMEOUT_SECS
}

/// Which OCR engine reads homework photos.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OcrEngineKind {
    #[default]
    Tesseract,
    Vision,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OcrConfig {
    #[serde(default)]
    pub engine: OcrEngineKind,
    /// The Tesseract executable.
    #[serde(default = "default_tesseract_binary")]
    pub binary: String,
    /// The Tesseract language code.
    #[serde(default = "default_ocr_language")]
    pub language: String,
    /// The vision model. Defaults to the answer model.
    #[serde(default)]
    pub model: Option<String>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            engine: OcrEngineKind::default(),
            binary: default_tesseract_binary(),
            language: default_ocr_language(),
            model: None,
        }
    }
}

fn default_tesseract_binary() -> String {
    studytutor::constants::DEFAULT_TESSERACT_BINARY.to_string()
}

fn default_ocr_language() -> String {
    studytutor::constants::DEFAULT_OCR_LANGUAGE.to_string()
}

/// Optional replacements for the default tutoring templates.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct PromptConfig {
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub user_prompt: Option<String>,
}

// Helper to read a file, substitute env vars, and return its content.
// Returns Ok(None) if the file does not exist, or an error if it fails to read.
fn read_and_substitute(path: &Path) -> Result<Option<String>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path).map_err(|e| {
        ConfigError::General(format!(
            "Failed to read config file '{}': {e}",
            path.display()
        ))
    })?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}")
        .map_err(|e| ConfigError::General(e.to_string()))?;
    let expanded_content = re.replace_all(&content, |caps: &regex::Captures| {
        let var_name = &caps["var"];
        env::var(var_name).unwrap_or_default()
    });

    Ok(Some(expanded_content.to_string()))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Loads the application configuration from a file and environment variables.
///
/// Layers, lowest first:
/// - serde defaults;
/// - the YAML file at `config_path_override`, or `studytutor.yml` in the
///   working directory if it exists, with `${VAR}` substitution;
/// - `STUDYTUTOR_...` variables, `__` separating nested keys
///   (e.g. `STUDYTUTOR_OCR__LANGUAGE`).
///
/// The provider is then resolved once and stored back in canonical form. If no
/// key is set, that provider's conventional variable (`OPENAI_API_KEY` or
/// `GEMINI_API_KEY`) is used. Blank keys count as unset.
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = ConfigBuilder::builder();

    match config_path_override {
        Some(path) => {
            let content = read_and_substitute(Path::new(path))?.ok_or_else(|| {
                ConfigError::NotFound(format!("Config file not found at '{path}'."))
            })?;
            info!("Loading configuration from '{path}'.");
            builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
        }
        None => {
            if let Some(content) = read_and_substitute(Path::new(DEFAULT_CONFIG_FILE))? {
                info!("Loading configuration from '{DEFAULT_CONFIG_FILE}'.");
                builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
            }
        }
    }

    let settings = builder
        .add_source(
            Environment::with_prefix("STUDYTUTOR")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    let mut config: AppConfig = settings.try_deserialize()?;

    config.api_key = non_empty(config.api_key.take());
    config.api_url = non_empty(config.api_url.take());
    let kind = config.provider_kind()?;
    config.provider = kind.to_string();
    if config.api_key.is_none() {
        config.api_key = non_empty(env::var(kind.api_key_env_var()).ok());
    }

    Ok(config)
}
