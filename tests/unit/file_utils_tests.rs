/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use std::path::{Path, PathBuf};
use pdfswahili::file_utils::FileManager;
use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_fileExists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "test_file_exists.tmp", "test content")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::file_exists(temp_dir.path()));
    Ok(())
}

#[test]
fn test_fileExists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.tmp"));
}

#[test]
fn test_ensureDir_shouldCreateNestedDirectories() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("a").join("b");

    FileManager::ensure_dir(&nested)?;
    assert!(FileManager::dir_exists(&nested));

    // Second call is a no-op
    FileManager::ensure_dir(&nested)?;
    Ok(())
}

#[test]
fn test_generateOutputPath_shouldAppendSwahiliSuffix() {
    let output = FileManager::generate_output_path(Path::new("/tmp/input/report.pdf"), "sw");
    assert_eq!(output, PathBuf::from("/tmp/input/report_swahili.pdf"));
}

#[test]
fn test_generateOutputPath_withOtherTarget_shouldUseThatLanguage() {
    let output = FileManager::generate_output_path(Path::new("notes.v2.pdf"), "fr");
    assert_eq!(output, PathBuf::from("notes.v2_french.pdf"));
}

#[test]
fn test_isPdf_shouldCheckSignature() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let real = common::create_text_pdf(temp_dir.path(), "renamed.bin", &["Hello"])?;
    let fake = common::create_test_file(temp_dir.path(), "fake.pdf", "just text")?;

    assert!(FileManager::is_pdf(&real));
    assert!(!FileManager::is_pdf(&fake));
    Ok(())
}

#[test]
fn test_isPdf_withMissingFile_shouldFallBackToExtension() {
    assert!(FileManager::is_pdf("missing/report.PDF"));
    assert!(!FileManager::is_pdf("missing/report.txt"));
}
