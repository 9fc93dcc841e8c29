use log::{debug, info, warn};
use lopdf::Document;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use crate::errors::ExtractionError;

/// Spaces or tabs left dangling at the end of a line
static TRAILING_BLANKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+\n").unwrap());

/// Reads the text layer of PDF documents
#[derive(Debug, Default, Clone, Copy)]
pub struct TextExtractor;

impl TextExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract the whole document as one text, pages joined with `\n`
    ///
    /// Returns an empty string when no page has any extractable text.
    pub fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        let pages = self.extract_pages(path)?;
        let text = pages.join("\n");

        if text.trim().is_empty() {
            info!("No extractable text in {}", path.display());
            return Ok(String::new());
        }

        debug!("Extracted {} chars from {} page(s)", text.chars().count(), pages.len());
        Ok(text)
    }

    /// Extract the text of every page, in page order
    ///
    /// A page whose text cannot be decoded contributes an empty string.
    pub fn extract_pages(&self, path: &Path) -> Result<Vec<String>, ExtractionError> {
        let doc = Self::load(path)?;
        let pages = doc.get_pages();
        let mut texts = Vec::with_capacity(pages.len());

        for page_number in pages.keys() {
            let text = match doc.extract_text(&[*page_number]) {
                Ok(raw) => Self::clean_page(&raw),
                Err(e) => {
                    warn!("Page {} of {}: text not extractable ({})", page_number, path.display(), e);
                    String::new()
                }
            };
            if text.is_empty() {
                debug!("Page {} has no text layer (scanned image or unsupported font)", page_number);
            }
            texts.push(text);
        }

        Ok(texts)
    }

    /// Number of pages in the document
    pub fn page_count(&self, path: &Path) -> Result<usize, ExtractionError> {
        Ok(Self::load(path)?.get_pages().len())
    }

    fn load(path: &Path) -> Result<Document, ExtractionError> {
        if !path.is_file() {
            return Err(ExtractionError::NotFound(path.to_path_buf()));
        }

        let bytes = std::fs::read(path).map_err(|source| ExtractionError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let doc = Document::load_mem(&bytes).map_err(|e| ExtractionError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        if doc.is_encrypted() {
            return Err(ExtractionError::Encrypted(path.to_path_buf()));
        }

        Ok(doc)
    }

    /// Strip trailing blanks from every line and from the page as a whole
    fn clean_page(raw: &str) -> String {
        let normalized = raw.replace("\r\n", "\n");
        TRAILING_BLANKS
            .replace_all(&normalized, "\n")
            .trim_end()
            .to_string()
    }
}
