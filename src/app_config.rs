use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::language_utils;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO), or `auto`
    pub source_language: String,

    /// Target language code (ISO)
    pub target_language: String,

    /// Translation config
    pub translation: TranslationConfig,

    /// Output PDF layout
    #[serde(default)]
    pub pdf: PdfConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Google Translate web endpoint
    #[default]
    Google,
    // @provider: Ollama
    Ollama,
    // @provider: OpenAI
    OpenAI,
    // @provider: Anthropic
    Anthropic,
    // @provider: LM Studio (OpenAI-compatible local server)
    LMStudio,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Google => "Google Translate",
            Self::Ollama => "Ollama",
            Self::OpenAI => "OpenAI",
            Self::Anthropic => "Anthropic",
            Self::LMStudio => "LM Studio",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Google => "google".to_string(),
            Self::Ollama => "ollama".to_string(),
            Self::OpenAI => "openai".to_string(),
            Self::Anthropic => "anthropic".to_string(),
            Self::LMStudio => "lmstudio".to_string(),
        }
    }

    /// Whether this provider needs an API key to work
    pub fn requires_api_key(&self) -> bool {
        matches!(self, Self::OpenAI | Self::Anthropic)
    }
}

impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name (unused by google)
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Max chars per request, the chunk size limit
    #[serde(default = "default_max_chars_per_request")]
    pub max_chars_per_request: usize,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: TranslationProvider) -> Self {
        Self {
            provider_type: provider_type.to_lowercase_string(),
            model: default_model(&provider_type),
            api_key: String::new(),
            endpoint: default_endpoint(&provider_type),
            max_chars_per_request: default_max_chars_for(&provider_type),
            timeout_secs: default_timeout_for(&provider_type),
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Available translation providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

/// Common translation settings applicable to all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// System prompt template for LLM providers
    /// Placeholders: {source_language}, {target_language}
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Retry count for failed chunk requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Fixed delay between attempts, in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Temperature parameter for LLM providers (0.0 to 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Abort the document when a chunk runs out of retries instead of
    /// keeping the untranslated chunk
    #[serde(default)]
    pub fail_fast: bool,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            retry_count: default_retry_count(),
            retry_delay_ms: default_retry_delay_ms(),
            temperature: default_temperature(),
            fail_fast: false,
        }
    }
}

/// Layout of the generated PDF
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PdfConfig {
    /// Font size in points
    #[serde(default = "default_font_size")]
    pub font_size: f32,

    /// Line height as a multiple of the font size
    #[serde(default = "default_line_spacing")]
    pub line_spacing: f32,

    /// Page margin in points, applied on all four sides
    #[serde(default = "default_margin")]
    pub margin: f32,

    /// Replacement for characters the built-in font cannot show
    #[serde(default = "default_placeholder")]
    pub placeholder: char,

    /// Optional document title stored in the PDF info dictionary
    #[serde(default)]
    pub title: Option<String>,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            font_size: default_font_size(),
            line_spacing: default_line_spacing(),
            margin: default_margin(),
            placeholder: default_placeholder(),
            title: None,
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

impl From<&LogLevel> for log::LevelFilter {
    fn from(level: &LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_max_chars_per_request() -> usize {
    2000
}

fn default_google_max_chars_per_request() -> usize {
    // The web endpoint rejects requests over 5000 characters
    4500
}

fn default_max_chars_for(provider: &TranslationProvider) -> usize {
    match provider {
        TranslationProvider::Google => default_google_max_chars_per_request(),
        _ => default_max_chars_per_request(),
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_llm_timeout_secs() -> u64 {
    120
}

fn default_timeout_for(provider: &TranslationProvider) -> u64 {
    match provider {
        TranslationProvider::Google => default_timeout_secs(),
        _ => default_llm_timeout_secs(),
    }
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1500
}

fn default_temperature() -> f32 {
    0.3
}

fn default_font_size() -> f32 {
    11.0
}

fn default_line_spacing() -> f32 {
    1.4
}

fn default_margin() -> f32 {
    // 15 mm
    42.5
}

fn default_placeholder() -> char {
    '?'
}

fn default_endpoint(provider: &TranslationProvider) -> String {
    match provider {
        TranslationProvider::Google => "https://translate.googleapis.com",
        TranslationProvider::Ollama => "http://localhost:11434",
        TranslationProvider::OpenAI => "https://api.openai.com/v1",
        TranslationProvider::Anthropic => "https://api.anthropic.com",
        // LM Studio default server (OpenAI compatible) runs on port 1234 under /v1
        TranslationProvider::LMStudio => "http://localhost:1234/v1",
    }
    .to_string()
}

fn default_model(provider: &TranslationProvider) -> String {
    match provider {
        TranslationProvider::Google => "",
        TranslationProvider::Ollama => "llama3.2:3b",
        TranslationProvider::OpenAI => "gpt-4o-mini",
        TranslationProvider::Anthropic => "claude-3-haiku-20240307",
        // Placeholder; users should set to the loaded model name in LM Studio
        TranslationProvider::LMStudio => "local-model",
    }
    .to_string()
}

fn default_system_prompt() -> String {
    "You are a professional translator. Translate the following text from {source_language} to {target_language}. Preserve line breaks and the original meaning. Only respond with the translated text, without any explanations or notes.".to_string()
}

impl Config {
    /// Load the configuration file, creating it with defaults if missing
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        language_utils::validate_source_language(&self.source_language)
            .context("Invalid source language")?;
        language_utils::validate_language_code(&self.target_language)
            .context("Invalid target language")?;

        if self.translation.provider.requires_api_key() && self.translation.get_api_key().is_empty() {
            return Err(anyhow!(
                "Translation API key is required for {} provider",
                self.translation.provider.display_name()
            ));
        }

        if self.translation.get_max_chars_per_request() == 0 {
            return Err(anyhow!("max_chars_per_request must be greater than zero"));
        }

        if !(self.pdf.font_size > 0.0) || !(self.pdf.line_spacing > 0.0) || self.pdf.margin < 0.0 {
            return Err(anyhow!("PDF font size and line spacing must be positive, margin non-negative"));
        }

        if crate::pdf::encoding::encode_char(self.pdf.placeholder).is_none() {
            return Err(anyhow!(
                "PDF placeholder '{}' cannot be shown by the built-in font",
                self.pdf.placeholder
            ));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: "en".to_string(),
            target_language: "sw".to_string(),
            translation: TranslationConfig::default(),
            pdf: PdfConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl TranslationConfig {
    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        self.get_provider_config(&self.provider)
    }

    /// Get a specific provider configuration by type
    pub fn get_provider_config(&self, provider_type: &TranslationProvider) -> Option<&ProviderConfig> {
        let provider_str = provider_type.to_lowercase_string();
        self.available_providers.iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Mutable access to the active provider entry, inserting defaults if absent
    pub fn active_provider_config_mut(&mut self) -> &mut ProviderConfig {
        let provider_str = self.provider.to_lowercase_string();
        let index = match self.available_providers.iter().position(|p| p.provider_type == provider_str) {
            Some(index) => index,
            None => {
                self.available_providers.push(ProviderConfig::new(self.provider.clone()));
                self.available_providers.len() - 1
            }
        };
        &mut self.available_providers[index]
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.model.is_empty() {
                return provider_config.model.clone();
            }
        }
        default_model(&self.provider)
    }

    /// Get the API key for the active provider
    pub fn get_api_key(&self) -> String {
        self.get_active_provider_config()
            .map(|p| p.api_key.clone())
            .unwrap_or_default()
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }
        default_endpoint(&self.provider)
    }

    /// Get the max chars per request for the active provider
    pub fn get_max_chars_per_request(&self) -> usize {
        self.get_active_provider_config()
            .map(|p| p.max_chars_per_request)
            .unwrap_or_else(|| default_max_chars_for(&self.provider))
    }

    /// Get the request timeout for the active provider
    pub fn get_timeout_secs(&self) -> u64 {
        self.get_active_provider_config()
            .map(|p| p.timeout_secs)
            .unwrap_or_else(|| default_timeout_for(&self.provider))
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            available_providers: vec![
                ProviderConfig::new(TranslationProvider::Google),
                ProviderConfig::new(TranslationProvider::Ollama),
                ProviderConfig::new(TranslationProvider::OpenAI),
                ProviderConfig::new(TranslationProvider::Anthropic),
                ProviderConfig::new(TranslationProvider::LMStudio),
            ],
            common: TranslationCommonConfig::default(),
        }
    }
}
