use anyhow::Result;
use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use super::{classify_request_error, classify_status, endpoint_url, http_client, non_empty, render_system_prompt, Provider};
use crate::errors::ProviderError;

/// Ollama client for interacting with a local Ollama server
#[derive(Debug)]
pub struct Ollama {
    /// HTTP client for making requests
    client: Client,
    /// Resolved `/api/generate` URL
    url: Url,
    /// Model name to use for generation
    model: String,
    /// System prompt template
    system_prompt: String,
    /// Temperature for generation
    temperature: f32,
}

/// Generate request for the Ollama API
#[derive(Debug, Serialize)]
pub struct GenerationRequest {
    /// Model name to use for generation
    model: String,
    /// Prompt to generate from
    prompt: String,
    /// System message to guide the model
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    /// Additional model parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerationOptions>,
    /// Whether to stream the response
    stream: bool,
}

/// Generation options for the Ollama API
#[derive(Debug, Serialize)]
pub struct GenerationOptions {
    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Generation response from the Ollama API
#[derive(Debug, Deserialize)]
pub struct GenerationResponse {
    /// Model name
    #[serde(default)]
    pub model: String,
    /// Generated text
    pub response: String,
    /// Whether the generation is complete
    #[serde(default)]
    pub done: bool,
}

impl GenerationRequest {
    /// Create a new non-streaming generation request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system: None,
            options: None,
            stream: false,
        }
    }

    /// Set the system prompt
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options = Some(GenerationOptions {
            temperature: Some(temperature),
        });
        self
    }
}

impl Ollama {
    /// Create a new Ollama client for the given server and model
    pub fn new(endpoint: &str, model: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            url: endpoint_url(endpoint, "api/generate")?,
            model: model.into(),
            system_prompt: String::new(),
            temperature: 0.3,
        })
    }

    /// Set the system prompt template and temperature
    pub fn with_prompt(mut self, system_prompt: impl Into<String>, temperature: f32) -> Self {
        self.system_prompt = system_prompt.into();
        self.temperature = temperature;
        self
    }

    /// Send a generation request
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, ProviderError> {
        let response = self.client.post(self.url.clone())
            .json(request)
            .send()
            .await
            .map_err(classify_request_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Ollama API error ({}): {}", status, error_text);
            return Err(classify_status(status, error_text));
        }

        response.json::<GenerationResponse>().await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse Ollama API response: {}", e)))
    }
}

#[async_trait]
impl Provider for Ollama {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn translate_chunk(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let system = render_system_prompt(&self.system_prompt, source_language, target_language)?;
        let request = GenerationRequest::new(&self.model, text)
            .system(system)
            .temperature(self.temperature);

        let response = self.generate(&request).await?;
        if !response.done {
            return Err(ProviderError::ParseError("Ollama returned an incomplete generation".to_string()));
        }
        non_empty(response.response.trim().to_string(), "Ollama")
    }
}
