use anyhow::Result;
use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use super::{classify_request_error, classify_status, endpoint_url, http_client, Provider};
use crate::errors::ProviderError;
use crate::language_utils;

/// Client for the keyless Google Translate web endpoint (`client=gtx`)
#[derive(Debug)]
pub struct Google {
    /// HTTP client for API requests
    client: Client,
    /// Fully resolved `translate_a/single` URL
    url: Url,
}

impl Google {
    /// Create a new client against the given base endpoint
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            url: endpoint_url(endpoint, "translate_a/single")?,
        })
    }

    /// Map an ISO code onto what the endpoint expects: two letters where
    /// one exists, `auto` passed through
    fn language_param(code: &str) -> Result<String, ProviderError> {
        if language_utils::is_auto_detect(code) {
            return Ok(language_utils::AUTO_DETECT.to_string());
        }
        language_utils::normalize_to_part1_or_part2t(code)
            .map_err(|e| ProviderError::UnsupportedLanguage(e.to_string()))
    }

    /// Extract the translation from the nested-array response body
    ///
    /// The body looks like `[[["Habari","Hello",null,null,10],...],null,"en",...]`;
    /// the translation is the concatenation of the first element of every
    /// segment in the first array.
    pub fn parse_response(body: &str) -> Result<String, ProviderError> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| ProviderError::ParseError(format!("Invalid JSON from Google: {}", e)))?;

        let segments = value
            .get(0)
            .and_then(Value::as_array)
            .ok_or_else(|| ProviderError::ParseError("Google response has no translation segments".to_string()))?;

        let translated: String = segments
            .iter()
            .filter_map(|segment| segment.get(0).and_then(Value::as_str))
            .collect();

        super::non_empty(translated, "Google")
    }
}

#[async_trait]
impl Provider for Google {
    fn name(&self) -> &str {
        "google"
    }

    async fn translate_chunk(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let source = Self::language_param(source_language)?;
        let target = Self::language_param(target_language)?;

        debug!("Google request: {} chars ({} -> {})", text.chars().count(), source, target);

        let response = self.client.post(self.url.clone())
            .query(&[("client", "gtx"), ("sl", source.as_str()), ("tl", target.as_str()), ("dt", "t")])
            .form(&[("q", text)])
            .send()
            .await
            .map_err(classify_request_error)?;

        let status = response.status();
        let body = response.text().await.map_err(classify_request_error)?;

        if !status.is_success() {
            error!("Google Translate error ({}): {}", status, body);
            return Err(classify_status(status, body));
        }

        Self::parse_response(&body)
    }
}
