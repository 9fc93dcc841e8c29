/*!
 * Tests for PDF generation
 */

use anyhow::Result;
use lopdf::{Document, Object};
use pdfswahili::app_config::PdfConfig;
use pdfswahili::errors::WriteError;
use pdfswahili::pdf::{PdfWriter, TextExtractor};
use crate::common;

#[test]
fn test_render_shouldProduceLoadablePdf() -> Result<()> {
    let bytes = PdfWriter::default().render("Habari ya asubuhi")?;

    assert!(bytes.starts_with(b"%PDF-"));
    let doc = Document::load_mem(&bytes)?;
    assert_eq!(doc.get_pages().len(), 1);
    Ok(())
}

#[test]
fn test_write_thenExtract_shouldRoundTripText() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let output = temp_dir.path().join("out.pdf");
    let text = "Habari ya asubuhi.\n\nKaribu sana, rafiki yangu.";

    let written = PdfWriter::default().write(text, &output)?;
    assert_eq!(written, output);

    let extracted = TextExtractor::new().extract(&output)?;
    assert!(extracted.contains("Habari ya asubuhi."), "got {:?}", extracted);
    assert!(extracted.contains("Karibu sana, rafiki yangu."), "got {:?}", extracted);
    Ok(())
}

#[test]
fn test_render_withLongText_shouldAddPages() -> Result<()> {
    let writer = PdfWriter::default();
    let lines_per_page = writer.layout().lines_per_page;
    let text: Vec<String> = (0..lines_per_page * 2 + 1).map(|i| format!("mstari {}", i)).collect();

    let bytes = writer.render(&text.join("\n"))?;

    let doc = Document::load_mem(&bytes)?;
    assert_eq!(doc.get_pages().len(), 3);
    Ok(())
}

#[test]
fn test_render_withLongLine_shouldWrapWithinMargins() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let output = temp_dir.path().join("wrapped.pdf");
    let words = vec!["neno"; 100].join(" ");

    PdfWriter::default().write(&words, &output)?;

    let extracted = TextExtractor::new().extract(&output)?;
    let width = PdfWriter::default().layout().chars_per_line;
    assert!(extracted.lines().count() > 1);
    assert!(extracted.lines().all(|line| line.chars().count() <= width));
    assert_eq!(extracted.split_whitespace().count(), 100);
    Ok(())
}

#[test]
fn test_write_withUnsupportedCharacter_shouldUsePlaceholder() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let output = temp_dir.path().join("placeholder.pdf");

    PdfWriter::default().write("Ng'ombe ŋombe café", &output)?;

    let extracted = TextExtractor::new().extract(&output)?;
    assert!(extracted.contains("?ombe"), "got {:?}", extracted);
    assert!(extracted.contains("café"), "got {:?}", extracted);
    Ok(())
}

#[test]
fn test_write_shouldCreateMissingDirectories() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let output = temp_dir.path().join("a").join("b").join("out.pdf");

    PdfWriter::default().write("Habari", &output)?;

    assert!(output.is_file());
    Ok(())
}

#[test]
fn test_write_shouldReplaceExistingFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let output = common::create_test_file(temp_dir.path(), "out.pdf", "old content")?;

    PdfWriter::default().write("Habari mpya", &output)?;

    let extracted = TextExtractor::new().extract(&output)?;
    assert!(extracted.contains("Habari mpya"));
    Ok(())
}

#[test]
fn test_write_withEmptyText_shouldFailWithoutCreatingFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let output = temp_dir.path().join("empty.pdf");

    let result = PdfWriter::default().write("  \n\t", &output);

    assert!(matches!(result, Err(WriteError::EmptyText)));
    assert!(!output.exists());
    Ok(())
}

#[test]
fn test_render_withTitle_shouldSetInfoDictionary() -> Result<()> {
    let config = PdfConfig {
        title: Some("Ripoti".to_string()),
        ..PdfConfig::default()
    };

    let bytes = PdfWriter::new(config).render("Habari")?;

    let doc = Document::load_mem(&bytes)?;
    let info_id = doc.trailer.get(b"Info")?.as_reference()?;
    let info = doc.get_dictionary(info_id)?;
    match info.get(b"Title")? {
        Object::String(bytes, _) => assert_eq!(bytes.as_slice(), b"Ripoti"),
        other => panic!("unexpected title object {:?}", other),
    }
    Ok(())
}

#[test]
fn test_pageLayout_withLargerFont_shouldFitFewerCharacters() {
    let small = PdfWriter::default().layout();
    let large = PdfWriter::new(PdfConfig {
        font_size: 16.0,
        ..PdfConfig::default()
    })
    .layout();

    assert!(large.chars_per_line < small.chars_per_line);
    assert!(large.lines_per_page < small.lines_per_page);
}

#[test]
fn test_write_withTabIndentedLine_shouldKeepIndentation() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let output = temp_dir.path().join("indented.pdf");

    PdfWriter::default().write("Orodha:\n\tKwanza\n\tPili", &output)?;

    let extracted = TextExtractor::new().extract(&output)?;
    assert!(extracted.contains("    Kwanza"), "got {:?}", extracted);
    assert!(extracted.contains("    Pili"), "got {:?}", extracted);
    Ok(())
}
