/*!
 * # pdfswahili - PDF English to Swahili translator
 *
 * A Rust library and CLI that pulls the text layer out of a PDF, translates
 * it chunk by chunk, and writes the translation into a new PDF.
 *
 * ## Features
 *
 * - Extract page text from PDF files
 * - Translate using various providers:
 *   - Google Translate web endpoint (default, no key)
 *   - Ollama (local LLM)
 *   - OpenAI API and LM Studio
 *   - Anthropic API
 * - Chunking within the provider's request limit
 * - Per-chunk retry; chunks that keep failing stay in the source language
 * - Plain-text PDF output with the built-in Courier font
 * - ISO 639-1 and ISO 639-2 language code support
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `pdf`: PDF reading (`pdf::extractor`) and writing (`pdf::writer`)
 * - `translation`: Chunking and the retrying chunked translator
 * - `providers`: Client implementations for the translation services
 * - `app_controller`: The extract / translate / convert pipeline
 * - `gui`: Interactive terminal shell
 * - `file_utils`: File system operations
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod gui;
pub mod language_utils;
pub mod pdf;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use errors::AppError;
pub use translation::{ChunkedTranslator, TranslationOptions};
