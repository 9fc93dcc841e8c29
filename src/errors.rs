/*!
 * Error types for the pdfswahili application.
 *
 * This module contains custom error types for each stage of the pipeline,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when talking to a translation provider
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The provider rejected the language pair
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),
}

impl ProviderError {
    /// Whether another attempt at the same request may succeed.
    ///
    /// Network faults, timeouts, rate limits, malformed responses and
    /// server-side errors are transient. Authentication problems, rejected
    /// languages and other client errors are not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RequestFailed(_)
            | Self::ParseError(_)
            | Self::ConnectionError(_)
            | Self::RateLimitExceeded(_) => true,
            Self::ApiError { status_code, .. } => {
                *status_code >= 500 || *status_code == 408 || *status_code == 429
            }
            Self::AuthenticationError(_) | Self::UnsupportedLanguage(_) => false,
        }
    }
}

/// Errors that can occur while reading text out of a PDF
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The input path does not point at a file
    #[error("PDF not found: {0}")]
    NotFound(PathBuf),

    /// The file exists but could not be read
    #[error("Failed to read PDF {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a PDF lopdf can parse
    #[error("Failed to parse PDF {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Encrypted documents are not supported
    #[error("PDF is encrypted: {0}")]
    Encrypted(PathBuf),
}

/// Non-recoverable translation errors
#[derive(Error, Debug)]
pub enum TranslationError {
    /// A source or target language code is not a known ISO 639 code
    #[error("Invalid language code: {0}")]
    InvalidLanguage(String),

    /// Translation options that cannot work, such as a zero chunk size
    #[error("Invalid translation options: {0}")]
    InvalidOptions(String),

    /// Error from the provider API that retrying cannot fix
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// A chunk ran out of retries while fail-fast mode was on
    #[error("Chunk {index} failed after all retries: {source}")]
    ChunkFailed {
        index: usize,
        #[source]
        source: ProviderError,
    },
}

/// Errors that can occur while producing the output PDF
#[derive(Error, Debug)]
pub enum WriteError {
    /// Nothing to render
    #[error("No translated text provided")]
    EmptyText,

    /// The output location is not writable
    #[error("Failed to write PDF {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// lopdf could not serialise the document
    #[error("Failed to build PDF: {0}")]
    Pdf(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from text extraction
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Error from PDF generation
    #[error("Write error: {0}")]
    Write(#[from] WriteError),

    /// The input PDF had no extractable text to convert
    #[error("No text extracted from the PDF: {0}")]
    NoText(PathBuf),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl AppError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::NoText(_) => 2,
            _ => 1,
        }
    }
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
