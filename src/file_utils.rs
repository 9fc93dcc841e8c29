use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::language_utils;

// @module: File and directory utilities

/// Magic bytes at the start of every PDF file
const PDF_MAGIC: &[u8] = b"%PDF-";

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @generates: Output path next to the input, `<stem>_<language>.pdf`
    // @params: input_file, target_language
    pub fn generate_output_path<P: AsRef<Path>>(input_file: P, target_language: &str) -> PathBuf {
        let input_file = input_file.as_ref();
        let stem = input_file.file_stem().unwrap_or_default().to_string_lossy();

        // "sw" -> "swahili"; unknown codes are used as given
        let suffix = language_utils::get_language_name(target_language)
            .map(|name| name.to_lowercase().replace(' ', "_"))
            .unwrap_or_else(|_| target_language.trim().to_lowercase());

        let file_name = format!("{}_{}.pdf", stem, suffix);
        match input_file.parent() {
            Some(dir) => dir.join(file_name),
            None => PathBuf::from(file_name),
        }
    }

    // @checks: PDF signature, falling back to the extension for unreadable files
    pub fn is_pdf<P: AsRef<Path>>(path: P) -> bool {
        let path = path.as_ref();
        match Self::read_header(path) {
            Ok(header) => header.starts_with(PDF_MAGIC),
            Err(_) => path
                .extension()
                .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("pdf"))
                .unwrap_or(false),
        }
    }

    fn read_header(path: &Path) -> Result<Vec<u8>> {
        let mut header = Vec::with_capacity(PDF_MAGIC.len());
        File::open(path)
            .with_context(|| format!("Failed to open file: {:?}", path))?
            .take(PDF_MAGIC.len() as u64)
            .read_to_end(&mut header)
            .with_context(|| format!("Failed to read file: {:?}", path))?;
        Ok(header)
    }
}
