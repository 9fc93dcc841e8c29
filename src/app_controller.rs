use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::app_config::Config;
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::pdf::{PdfWriter, TextExtractor};
use crate::providers::{self, Provider};
use crate::translation::{ChunkedTranslator, TranslationOptions, TranslationReport};

// @module: Application controller for the extract / translate / convert pipeline

/// Main application controller shared by the CLI and the terminal shell
#[derive(Debug, Clone)]
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Chunked translator over the configured provider
    translator: ChunkedTranslator,
    extractor: TextExtractor,
    writer: PdfWriter,
    // @field: Draw an indicatif bar while translating
    show_progress: bool,
}

impl Controller {
    // @method: Create a controller with the provider selected by the configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let provider = providers::create_provider(&config.translation)?;
        info!("Using the {} translation provider", config.translation.provider);
        Ok(Self::with_provider(config, provider))
    }

    // @method: Create a controller around an existing provider
    pub fn with_provider(config: Config, provider: Arc<dyn Provider>) -> Self {
        let options = TranslationOptions::from_config(&config.translation);
        Self {
            translator: ChunkedTranslator::new(provider, options),
            extractor: TextExtractor::new(),
            writer: PdfWriter::new(config.pdf.clone()),
            show_progress: false,
            config,
        }
    }

    /// Toggle the terminal progress bar
    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Where `convert` writes when no output path is given
    pub fn default_output_path(&self, input: &Path) -> PathBuf {
        FileManager::generate_output_path(input, &self.config.target_language)
    }

    /// Extract the text of a PDF
    pub fn extract(&self, input: &Path) -> Result<String, AppError> {
        if FileManager::file_exists(input) && !FileManager::is_pdf(input) {
            warn!("{} does not look like a PDF, trying anyway", input.display());
        }

        let text = self.extractor.extract(input)?;
        if text.is_empty() {
            warn!("No text extracted from {}", input.display());
        } else if log::log_enabled!(log::Level::Debug) {
            let pages = self.extractor.page_count(input).unwrap_or(0);
            debug!(
                "Extracted {} chars from {} page(s) of {}",
                text.chars().count(),
                pages,
                input.display()
            );
        }
        Ok(text)
    }

    /// Extract and translate a PDF
    pub async fn translate(&self, input: &Path) -> Result<String, AppError> {
        self.translate_with_progress(input, |_, _| {}).await
    }

    /// Extract and translate a PDF, reporting `(done, total)` chunks
    pub async fn translate_with_progress<F>(&self, input: &Path, progress: F) -> Result<String, AppError>
    where
        F: Fn(usize, usize) + Send + Sync,
    {
        let text = self.extract(input)?;
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        let report = self.translate_text(&text, progress).await?;
        Ok(report.text())
    }

    /// Extract, translate and write a PDF; returns the output path
    pub async fn convert(&self, input: &Path, output: Option<&Path>) -> Result<PathBuf, AppError> {
        self.convert_with_progress(input, output, |_, _| {}).await
    }

    /// Same as [`convert`](Self::convert), reporting `(done, total)` chunks
    pub async fn convert_with_progress<F>(
        &self,
        input: &Path,
        output: Option<&Path>,
        progress: F,
    ) -> Result<PathBuf, AppError>
    where
        F: Fn(usize, usize) + Send + Sync,
    {
        let start_time = Instant::now();

        let text = self.extract(input)?;
        if text.trim().is_empty() {
            return Err(AppError::NoText(input.to_path_buf()));
        }

        let report = self.translate_text(&text, progress).await?;
        let fallbacks = report.fallback_count();
        if fallbacks > 0 {
            warn!(
                "{} of {} chunk(s) were kept in the source language",
                fallbacks,
                report.chunks.len()
            );
        }

        let output_path = match output {
            Some(path) => path.to_path_buf(),
            None => self.default_output_path(input),
        };
        let written = self.writer.write(&report.text(), &output_path)?;

        info!(
            "Converted {} in {}",
            input.display(),
            Self::format_duration(start_time.elapsed())
        );
        Ok(written)
    }

    async fn translate_text<F>(&self, text: &str, progress: F) -> Result<TranslationReport, AppError>
    where
        F: Fn(usize, usize) + Send + Sync,
    {
        let bar = self.show_progress.then(Self::progress_bar);

        let report = self
            .translator
            .translate_with_report(
                text,
                &self.config.source_language,
                &self.config.target_language,
                |done, total| {
                    if let Some(bar) = &bar {
                        bar.set_length(total as u64);
                        bar.set_position(done as u64);
                    }
                    progress(done, total);
                },
            )
            .await;

        if let Some(bar) = &bar {
            bar.finish_and_clear();
        }
        Ok(report?)
    }

    fn progress_bar() -> ProgressBar {
        let progress_bar = ProgressBar::new(0);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%) {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        progress_bar
    }

    // @formats: Duration as `1m 05s` or `4.2s`
    fn format_duration(duration: std::time::Duration) -> String {
        let secs = duration.as_secs();
        if secs >= 60 {
            format!("{}m {:02}s", secs / 60, secs % 60)
        } else {
            format!("{:.1}s", duration.as_secs_f64())
        }
    }
}
