/*!
 * Translation of extracted document text.
 *
 * - `chunking`: splitting text into provider-sized chunks
 * - `core`: the chunked translator with retry and fallback
 */

// Re-export main types for easier usage
pub use self::chunking::{join_chunks, split_into_chunks};
pub use self::core::{ChunkedTranslator, TranslatedChunk, TranslationOptions, TranslationReport};

// Submodules
pub mod chunking;
pub mod core;
