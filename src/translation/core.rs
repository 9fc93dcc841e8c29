/*!
 * Chunked translation with per-chunk retry and best-effort fallback.
 */

use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::TranslationConfig;
use crate::errors::{ProviderError, TranslationError};
use crate::language_utils;
use crate::providers::Provider;

use super::chunking::{join_chunks, split_into_chunks};

/// Tuning knobs for a translation run
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationOptions {
    /// Maximum characters per provider request
    pub max_chunk_size: usize,
    /// Extra attempts after the first failed one
    pub max_retries: u32,
    /// Fixed wait between attempts
    pub retry_delay: Duration,
    /// Fail the run instead of keeping untranslated text
    pub fail_fast: bool,
}

impl Default for TranslationOptions {
    fn default() -> Self {
        Self {
            max_chunk_size: 4500,
            max_retries: 3,
            retry_delay: Duration::from_millis(1500),
            fail_fast: false,
        }
    }
}

impl TranslationOptions {
    /// Options for the active provider of a translation config
    pub fn from_config(config: &TranslationConfig) -> Self {
        Self {
            max_chunk_size: config.get_max_chars_per_request(),
            max_retries: config.common.retry_count,
            retry_delay: Duration::from_millis(config.common.retry_delay_ms),
            fail_fast: config.common.fail_fast,
        }
    }
}

/// Outcome for a single chunk
#[derive(Debug, Clone, PartialEq)]
pub struct TranslatedChunk {
    /// Text sent to the provider
    pub source: String,
    /// Translation, or `source` again when every attempt failed
    pub text: String,
    /// Whether `text` came from the provider
    pub translated: bool,
    /// Number of provider calls made for this chunk
    pub attempts: u32,
}

/// Per-chunk record of a translation run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationReport {
    pub chunks: Vec<TranslatedChunk>,
}

impl TranslationReport {
    /// The translated document
    pub fn text(&self) -> String {
        let parts: Vec<&str> = self.chunks.iter().map(|c| c.text.as_str()).collect();
        join_chunks(&parts)
    }

    /// Indices of chunks that kept their original text
    pub fn failed_indices(&self) -> Vec<usize> {
        self.chunks
            .iter()
            .enumerate()
            .filter(|(_, chunk)| !chunk.translated)
            .map(|(index, _)| index)
            .collect()
    }

    /// Number of chunks that kept their original text
    pub fn fallback_count(&self) -> usize {
        self.chunks.iter().filter(|c| !c.translated).count()
    }

    /// Total provider calls over the run
    pub fn total_attempts(&self) -> u32 {
        self.chunks.iter().map(|c| c.attempts).sum()
    }
}

/// Translates long text chunk by chunk through a [`Provider`]
#[derive(Debug, Clone)]
pub struct ChunkedTranslator {
    provider: Arc<dyn Provider>,
    options: TranslationOptions,
}

impl ChunkedTranslator {
    pub fn new(provider: Arc<dyn Provider>, options: TranslationOptions) -> Self {
        Self { provider, options }
    }

    /// Translate `text`, keeping the original wording of any chunk that
    /// fails every attempt
    pub async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, TranslationError> {
        self.translate_with_progress(text, source_language, target_language, |_, _| {})
            .await
    }

    /// Same as [`translate`](Self::translate), calling `progress(done, total)`
    /// after every chunk
    pub async fn translate_with_progress<F>(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
        progress: F,
    ) -> Result<String, TranslationError>
    where
        F: Fn(usize, usize) + Send + Sync,
    {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        let report = self
            .translate_with_report(text, source_language, target_language, progress)
            .await?;
        Ok(report.text())
    }

    /// Translate and return the per-chunk outcome
    pub async fn translate_with_report<F>(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
        progress: F,
    ) -> Result<TranslationReport, TranslationError>
    where
        F: Fn(usize, usize) + Send + Sync,
    {
        if text.trim().is_empty() {
            return Ok(TranslationReport::default());
        }

        self.validate(source_language, target_language)?;

        let chunks = split_into_chunks(text, self.options.max_chunk_size);
        let total = chunks.len();
        let start_time = Instant::now();
        info!(
            "Translating {} chars in {} chunk(s) with {} ({} -> {})",
            text.chars().count(),
            total,
            self.provider.name(),
            source_language,
            target_language
        );

        let mut report = TranslationReport {
            chunks: Vec::with_capacity(total),
        };
        for (index, chunk) in chunks.into_iter().enumerate() {
            let outcome = self
                .translate_one(index, total, chunk, source_language, target_language)
                .await?;
            report.chunks.push(outcome);
            progress(index + 1, total);
        }

        let fallbacks = report.fallback_count();
        if fallbacks > 0 {
            warn!(
                "{} of {} chunk(s) left untranslated: {:?}",
                fallbacks,
                total,
                report.failed_indices()
            );
        }
        debug!(
            "Translation finished in {:?} ({} provider calls)",
            start_time.elapsed(),
            report.total_attempts()
        );

        Ok(report)
    }

    fn validate(&self, source_language: &str, target_language: &str) -> Result<(), TranslationError> {
        if self.options.max_chunk_size == 0 {
            return Err(TranslationError::InvalidOptions(
                "max_chunk_size must be greater than zero".to_string(),
            ));
        }
        language_utils::validate_source_language(source_language)
            .map_err(|e| TranslationError::InvalidLanguage(e.to_string()))?;
        language_utils::validate_language_code(target_language)
            .map_err(|e| TranslationError::InvalidLanguage(e.to_string()))?;
        Ok(())
    }

    async fn translate_one(
        &self,
        index: usize,
        total: usize,
        chunk: String,
        source_language: &str,
        target_language: &str,
    ) -> Result<TranslatedChunk, TranslationError> {
        let max_attempts = self.options.max_retries.saturating_add(1);
        let mut attempts = 0;

        loop {
            attempts += 1;
            let result = self
                .provider
                .translate_chunk(&chunk, source_language, target_language)
                .await;

            let error: ProviderError = match result {
                Ok(text) => {
                    debug!("Chunk {}/{} translated on attempt {}", index + 1, total, attempts);
                    return Ok(TranslatedChunk {
                        source: chunk,
                        text,
                        translated: true,
                        attempts,
                    });
                }
                Err(e) if !e.is_transient() => {
                    error!("Chunk {}/{} failed permanently: {}", index + 1, total, e);
                    return Err(TranslationError::Provider(e));
                }
                Err(e) => e,
            };

            if attempts >= max_attempts {
                if self.options.fail_fast {
                    return Err(TranslationError::ChunkFailed {
                        index,
                        source: error,
                    });
                }
                warn!(
                    "Chunk {}/{} failed after {} attempt(s), keeping original text: {}",
                    index + 1,
                    total,
                    attempts,
                    error
                );
                return Ok(TranslatedChunk {
                    text: chunk.clone(),
                    source: chunk,
                    translated: false,
                    attempts,
                });
            }

            warn!(
                "Chunk {}/{} attempt {}/{} failed: {}. Retrying in {:?}",
                index + 1,
                total,
                attempts,
                max_attempts,
                error,
                self.options.retry_delay
            );
            if !self.options.retry_delay.is_zero() {
                tokio::time::sleep(self.options.retry_delay).await;
            }
        }
    }
}
