use anyhow::Result;
use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use super::{classify_request_error, classify_status, endpoint_url, http_client, non_empty, render_system_prompt, Provider};
use crate::errors::ProviderError;

/// Client for OpenAI-compatible chat completion APIs (OpenAI, LM Studio)
#[derive(Debug)]
pub struct OpenAI {
    /// HTTP client for API requests
    client: Client,
    /// Resolved `/chat/completions` URL
    url: Url,
    /// API key for bearer authentication
    api_key: String,
    /// Model name
    model: String,
    /// System prompt template
    system_prompt: String,
    /// Sampling temperature
    temperature: f32,
    /// Name reported in logs
    name: String,
}

/// Chat completion request
#[derive(Debug, Serialize)]
pub struct OpenAIRequest {
    /// The model to use
    model: String,
    /// The conversation
    messages: Vec<OpenAIMessage>,
    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Message in a chat completion request or response
#[derive(Debug, Serialize, Deserialize)]
pub struct OpenAIMessage {
    /// Role of the sender (system, user, assistant)
    pub role: String,
    /// Message text
    #[serde(default)]
    pub content: String,
}

/// Chat completion response
#[derive(Debug, Deserialize)]
pub struct OpenAIResponse {
    /// Generated choices
    pub choices: Vec<OpenAIChoice>,
}

/// Single completion choice
#[derive(Debug, Deserialize)]
pub struct OpenAIChoice {
    /// The generated message
    pub message: OpenAIMessage,
}

impl OpenAIRequest {
    /// Create a new request for the given model
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            temperature: None,
        }
    }

    /// Add a message to the request
    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(OpenAIMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

impl OpenAI {
    /// Create a new client
    pub fn new(
        endpoint: &str,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            url: endpoint_url(endpoint, "chat/completions")?,
            api_key: api_key.into(),
            model: model.into(),
            system_prompt: String::new(),
            temperature: 0.3,
            name: "openai".to_string(),
        })
    }

    /// Set the system prompt template and temperature
    pub fn with_prompt(mut self, system_prompt: impl Into<String>, temperature: f32) -> Self {
        self.system_prompt = system_prompt.into();
        self.temperature = temperature;
        self
    }

    /// Override the name reported in logs
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Send a chat completion request
    pub async fn complete(&self, request: &OpenAIRequest) -> Result<OpenAIResponse, ProviderError> {
        let response = self.client.post(self.url.clone())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(classify_request_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("{} API error ({}): {}", self.name, status, error_text);
            return Err(classify_status(status, error_text));
        }

        response.json::<OpenAIResponse>().await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse {} response: {}", self.name, e)))
    }

    /// Extract the text of the first choice
    pub fn extract_text(response: &OpenAIResponse) -> Option<String> {
        response.choices.first().map(|choice| choice.message.content.trim().to_string())
    }
}

#[async_trait]
impl Provider for OpenAI {
    fn name(&self) -> &str {
        &self.name
    }

    async fn translate_chunk(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let system = render_system_prompt(&self.system_prompt, source_language, target_language)?;
        let request = OpenAIRequest::new(&self.model)
            .add_message("system", system)
            .add_message("user", text)
            .temperature(self.temperature);

        let response = self.complete(&request).await?;
        let translated = Self::extract_text(&response)
            .ok_or_else(|| ProviderError::ParseError(format!("{} returned no choices", self.name)))?;
        non_empty(translated, &self.name)
    }
}
