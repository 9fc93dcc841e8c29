use anyhow::Result;
use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use super::{classify_request_error, classify_status, endpoint_url, http_client, non_empty, render_system_prompt, Provider};
use crate::errors::ProviderError;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic client for interacting with the Anthropic messages API
#[derive(Debug)]
pub struct Anthropic {
    /// HTTP client for API requests
    client: Client,
    /// Resolved `/v1/messages` URL
    url: Url,
    /// API key for authentication
    api_key: String,
    /// Model name
    model: String,
    /// System prompt template
    system_prompt: String,
    /// Sampling temperature
    temperature: f32,
    /// Maximum number of tokens to generate
    max_tokens: u32,
}

/// Anthropic message request
#[derive(Debug, Serialize)]
pub struct AnthropicRequest {
    /// The model to use
    model: String,

    /// The messages for the conversation
    messages: Vec<AnthropicMessage>,

    /// System prompt to guide the AI
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,

    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,

    /// Maximum number of tokens to generate
    max_tokens: u32,
}

/// Anthropic message format
#[derive(Debug, Serialize, Deserialize)]
pub struct AnthropicMessage {
    /// Role of the message sender (user, assistant)
    pub role: String,

    /// Content of the message
    pub content: String,
}

/// Anthropic response
#[derive(Debug, Deserialize)]
pub struct AnthropicResponse {
    /// The content of the response
    pub content: Vec<AnthropicContent>,
}

/// Individual content block in an Anthropic response
#[derive(Debug, Deserialize)]
pub struct AnthropicContent {
    /// The type of content
    #[serde(rename = "type")]
    pub content_type: String,

    /// The actual text content
    #[serde(default)]
    pub text: String,
}

impl AnthropicRequest {
    /// Create a new Anthropic request
    pub fn new(model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            system: None,
            temperature: None,
            max_tokens,
        }
    }

    /// Add a message to the request
    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(AnthropicMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }

    /// Set the system prompt
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

impl Anthropic {
    /// Create a new Anthropic client
    pub fn new(
        endpoint: &str,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            url: endpoint_url(endpoint, "v1/messages")?,
            api_key: api_key.into(),
            model: model.into(),
            system_prompt: String::new(),
            temperature: 0.3,
            max_tokens: 4096,
        })
    }

    /// Set the system prompt template and temperature
    pub fn with_prompt(mut self, system_prompt: impl Into<String>, temperature: f32) -> Self {
        self.system_prompt = system_prompt.into();
        self.temperature = temperature;
        self
    }

    /// Complete a messages request
    pub async fn complete(&self, request: &AnthropicRequest) -> Result<AnthropicResponse, ProviderError> {
        let response = self.client.post(self.url.clone())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(request)
            .send()
            .await
            .map_err(classify_request_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Anthropic API error ({}): {}", status, error_text);
            return Err(classify_status(status, error_text));
        }

        response.json::<AnthropicResponse>().await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse Anthropic API response: {}", e)))
    }

    /// Extract text from Anthropic response
    pub fn extract_text(response: &AnthropicResponse) -> String {
        response.content.iter()
            .filter(|c| c.content_type == "text")
            .map(|c| c.text.as_str())
            .collect::<String>()
            .trim()
            .to_string()
    }
}

#[async_trait]
impl Provider for Anthropic {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn translate_chunk(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let system = render_system_prompt(&self.system_prompt, source_language, target_language)?;
        let request = AnthropicRequest::new(&self.model, self.max_tokens)
            .system(system)
            .add_message("user", text)
            .temperature(self.temperature);

        let response = self.complete(&request).await?;
        non_empty(Self::extract_text(&response), "Anthropic")
    }
}
