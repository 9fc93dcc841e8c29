/*!
 * Provider implementations for different translation services.
 *
 * This module contains client implementations for the supported services:
 * - Google: the keyless Google Translate web endpoint (default)
 * - Ollama: Local LLM server
 * - OpenAI: OpenAI API integration, also used for LM Studio
 * - Anthropic: Anthropic API integration
 * - Mock: deterministic fake for tests
 */

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use url::Url;

use crate::app_config::{TranslationConfig, TranslationProvider};
use crate::errors::ProviderError;
use crate::language_utils;

/// Common trait for all translation providers
///
/// A provider translates one chunk per call. Failures are reported as
/// `ProviderError` and classified with `ProviderError::is_transient`; the
/// chunked translator decides whether to retry.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Short provider name for logs
    fn name(&self) -> &str;

    /// Translate a single chunk of text
    ///
    /// # Arguments
    /// * `text` - The chunk to translate, never empty
    /// * `source_language` - ISO code of the text, or `auto`
    /// * `target_language` - ISO code to translate into
    async fn translate_chunk(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError>;
}

pub mod anthropic;
pub mod google;
pub mod mock;
pub mod ollama;
pub mod openai;

/// Build the provider selected by the configuration
pub fn create_provider(config: &TranslationConfig) -> Result<Arc<dyn Provider>> {
    let endpoint = config.get_endpoint();
    let timeout = Duration::from_secs(config.get_timeout_secs());
    let model = config.get_model();
    let prompt = config.common.system_prompt.clone();
    let temperature = config.common.temperature;

    let provider: Arc<dyn Provider> = match config.provider {
        TranslationProvider::Google => Arc::new(google::Google::new(&endpoint, timeout)?),
        TranslationProvider::Ollama => Arc::new(
            ollama::Ollama::new(&endpoint, model, timeout)?
                .with_prompt(prompt, temperature),
        ),
        TranslationProvider::OpenAI => Arc::new(
            openai::OpenAI::new(&endpoint, config.get_api_key(), model, timeout)?
                .with_prompt(prompt, temperature),
        ),
        TranslationProvider::LMStudio => {
            // LM Studio often doesn't require an API key; use a default if empty
            let api_key = {
                let k = config.get_api_key();
                if k.is_empty() { "lm-studio".to_string() } else { k }
            };
            Arc::new(
                openai::OpenAI::new(&endpoint, api_key, model, timeout)?
                    .with_prompt(prompt, temperature)
                    .named("lmstudio"),
            )
        }
        TranslationProvider::Anthropic => Arc::new(
            anthropic::Anthropic::new(&endpoint, config.get_api_key(), model, timeout)?
                .with_prompt(prompt, temperature),
        ),
    };

    Ok(provider)
}

/// Build an HTTP client with the given request timeout
pub(crate) fn http_client(timeout: Duration) -> Result<Client, ProviderError> {
    Client::builder()
        .timeout(timeout)
        .pool_idle_timeout(Duration::from_secs(90))
        .build()
        .map_err(|e| ProviderError::RequestFailed(format!("Failed to build HTTP client: {}", e)))
}

/// Resolve an API path against a configured base endpoint
///
/// The base is treated as a directory, so `https://api.openai.com/v1` and
/// `https://api.openai.com/v1/` both resolve `chat/completions` under `/v1/`.
pub(crate) fn endpoint_url(base: &str, path: &str) -> Result<Url> {
    let base = base.trim();
    if base.is_empty() {
        return Err(anyhow!("Endpoint cannot be empty"));
    }

    let with_scheme = if base.starts_with("http://") || base.starts_with("https://") {
        base.to_string()
    } else {
        format!("http://{}", base)
    };
    let directory = format!("{}/", with_scheme.trim_end_matches('/'));

    let url = Url::parse(&directory)
        .with_context(|| format!("Invalid endpoint: {}", base))?
        .join(path.trim_start_matches('/'))
        .with_context(|| format!("Invalid API path {} for endpoint {}", path, base))?;
    Ok(url)
}

/// Map a transport-level reqwest error onto a provider error
pub(crate) fn classify_request_error(error: reqwest::Error) -> ProviderError {
    if error.is_timeout() || error.is_connect() {
        ProviderError::ConnectionError(error.to_string())
    } else if error.is_decode() {
        ProviderError::ParseError(error.to_string())
    } else {
        ProviderError::RequestFailed(error.to_string())
    }
}

/// Map a non-success HTTP status and body onto a provider error
pub(crate) fn classify_status(status: StatusCode, body: String) -> ProviderError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::AuthenticationError(body),
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimitExceeded(body),
        _ => ProviderError::ApiError {
            status_code: status.as_u16(),
            message: body,
        },
    }
}

/// Fill the `{source_language}` and `{target_language}` placeholders of a
/// system prompt with English language names
pub(crate) fn render_system_prompt(
    template: &str,
    source_language: &str,
    target_language: &str,
) -> Result<String, ProviderError> {
    let source = language_utils::describe_language(source_language)
        .map_err(|e| ProviderError::UnsupportedLanguage(e.to_string()))?;
    let target = language_utils::get_language_name(target_language)
        .map_err(|e| ProviderError::UnsupportedLanguage(e.to_string()))?;

    Ok(template
        .replace("{source_language}", &source)
        .replace("{target_language}", &target))
}

/// Reject empty model output, which is never a valid translation of a
/// non-empty chunk
pub(crate) fn non_empty(text: String, provider: &str) -> Result<String, ProviderError> {
    if text.trim().is_empty() {
        Err(ProviderError::ParseError(format!("{} returned an empty translation", provider)))
    } else {
        Ok(text)
    }
}
