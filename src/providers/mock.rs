/*!
 * Mock provider implementations for testing.
 *
 * This module provides a mock provider that simulates different behaviors:
 * - `MockProvider::working()` - Always succeeds with a tagged translation
 * - `MockProvider::failing()` - Always fails with a transient error
 * - `MockProvider::fail_first(n)` - Fails the first `n` calls, then succeeds
 * - `MockProvider::rejecting()` - Fails with a non-transient error
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds
    Working,
    /// Fails the first `n` requests with a transient error
    FailFirst(usize),
    /// Always fails with a transient error
    Failing,
    /// Always fails with an authentication error
    Rejecting,
    /// Returns an empty translation
    Empty,
    /// Succeeds after a delay
    Slow { delay_ms: u64 },
}

/// Mock provider for testing translation behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Number of `translate_chunk` calls so far
    request_count: Arc<AtomicUsize>,
    /// Every chunk received, in call order
    requests: Arc<Mutex<Vec<String>>>,
    /// Chunks matching this predicate always fail transiently
    fail_when: Option<fn(&str) -> bool>,
    /// Custom response generator
    custom_response: Option<fn(&str, &str) -> String>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
            fail_when: None,
            custom_response: None,
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock provider that always fails transiently
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock provider that fails the first `n` calls
    pub fn fail_first(n: usize) -> Self {
        Self::new(MockBehavior::FailFirst(n))
    }

    /// Create a mock provider that fails with a non-transient error
    pub fn rejecting() -> Self {
        Self::new(MockBehavior::Rejecting)
    }

    /// Create a mock that returns empty responses
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Create a mock that sleeps before answering
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Fail every chunk for which `predicate` returns true
    pub fn with_fail_when(mut self, predicate: fn(&str) -> bool) -> Self {
        self.fail_when = Some(predicate);
        self
    }

    /// Set a custom response generator taking `(text, target_language)`
    pub fn with_custom_response(mut self, generator: fn(&str, &str) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of calls made so far, shared between clones
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Chunks received so far, in call order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    /// The translation the working behavior produces for `text`
    pub fn translated(text: &str, target_language: &str) -> String {
        format!("[{}] {}", target_language, text)
    }

    fn respond(&self, text: &str, target_language: &str) -> String {
        match self.custom_response {
            Some(generator) => generator(text, target_language),
            None => Self::translated(text, target_language),
        }
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
            requests: Arc::clone(&self.requests),
            fail_when: self.fail_when,
            custom_response: self.custom_response,
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn translate_chunk(
        &self,
        text: &str,
        _source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(text.to_string());

        if let Some(predicate) = self.fail_when {
            if predicate(text) {
                return Err(ProviderError::ConnectionError(format!(
                    "Simulated failure for request #{}",
                    count + 1
                )));
            }
        }

        match self.behavior {
            MockBehavior::Working => Ok(self.respond(text, target_language)),

            MockBehavior::FailFirst(n) => {
                if count < n {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated outage (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    Ok(self.respond(text, target_language))
                }
            }

            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated provider failure".to_string(),
                status_code: 500,
            }),

            MockBehavior::Rejecting => Err(ProviderError::AuthenticationError(
                "Simulated invalid API key".to_string(),
            )),

            MockBehavior::Empty => Err(ProviderError::ParseError(
                "mock returned an empty translation".to_string(),
            )),

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(self.respond(text, target_language))
            }
        }
    }
}
