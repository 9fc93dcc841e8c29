use log::{debug, info, warn};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::app_config::PdfConfig;
use crate::errors::WriteError;

use super::encoding::encode_text;

/// A4 in PDF points
const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;

/// Advance width of every Courier glyph, as a fraction of the font size
const COURIER_ADVANCE: f32 = 0.6;

const FONT_NAME: &str = "F1";

/// Page geometry derived from a [`PdfConfig`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    pub margin: f32,
    pub font_size: f32,
    pub line_height: f32,
    pub chars_per_line: usize,
    pub lines_per_page: usize,
}

impl PageLayout {
    pub fn from_config(config: &PdfConfig) -> Self {
        let line_height = config.font_size * config.line_spacing;
        let usable_width = (PAGE_WIDTH - 2.0 * config.margin).max(0.0);
        let usable_height = (PAGE_HEIGHT - 2.0 * config.margin).max(0.0);

        Self {
            margin: config.margin,
            font_size: config.font_size,
            line_height,
            chars_per_line: ((usable_width / (config.font_size * COURIER_ADVANCE)) as usize).max(1),
            lines_per_page: ((usable_height / line_height) as usize).max(1),
        }
    }

    /// Baseline of the first line on a page
    fn top_baseline(&self) -> f32 {
        PAGE_HEIGHT - self.margin - self.font_size
    }
}

/// Renders plain text into a PDF using the built-in Courier font
#[derive(Debug, Clone, Default)]
pub struct PdfWriter {
    config: PdfConfig,
}

impl PdfWriter {
    pub fn new(config: PdfConfig) -> Self {
        Self { config }
    }

    pub fn layout(&self) -> PageLayout {
        PageLayout::from_config(&self.config)
    }

    /// Render `text` and save it to `output_path`
    ///
    /// The document is written to a temporary file next to the target and
    /// renamed into place. Missing parent directories are created.
    pub fn write(&self, text: &str, output_path: &Path) -> Result<PathBuf, WriteError> {
        let bytes = self.render(text)?;

        let io_error = |source| WriteError::Io {
            path: output_path.to_path_buf(),
            source,
        };

        let dir = match output_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(io_error)?;

        let mut temp = NamedTempFile::new_in(dir).map_err(io_error)?;
        temp.write_all(&bytes).map_err(io_error)?;
        temp.as_file().sync_all().map_err(io_error)?;
        temp.persist(output_path).map_err(|e| io_error(e.error))?;

        info!("Wrote {} ({} bytes)", output_path.display(), bytes.len());
        Ok(output_path.to_path_buf())
    }

    /// Render `text` into the bytes of a PDF document
    pub fn render(&self, text: &str) -> Result<Vec<u8>, WriteError> {
        if text.trim().is_empty() {
            return Err(WriteError::EmptyText);
        }

        let layout = self.layout();
        let lines = wrap_lines(text, layout.chars_per_line);

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                FONT_NAME => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        let mut replaced = 0;
        for page_lines in lines.chunks(layout.lines_per_page) {
            let (page_id, page_replaced) =
                self.add_page(&mut doc, pages_id, resources_id, &layout, page_lines)?;
            kids.push(page_id.into());
            replaced += page_replaced;
        }

        let page_count = kids.len();
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => Object::Integer(page_count as i64),
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    PAGE_WIDTH.into(),
                    PAGE_HEIGHT.into(),
                ],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        if let Some(title) = &self.config.title {
            let info_id = doc.add_object(dictionary! {
                "Title" => Object::string_literal(encode_text(title, self.config.placeholder).bytes),
                "Producer" => Object::string_literal("pdfswahili"),
            });
            doc.trailer.set("Info", info_id);
        }

        if replaced > 0 {
            warn!(
                "{} character(s) not supported by the PDF font were replaced with '{}'",
                replaced, self.config.placeholder
            );
        }

        doc.compress();
        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| WriteError::Pdf(e.to_string()))?;

        debug!("Rendered {} line(s) on {} page(s)", lines.len(), page_count);
        Ok(buffer)
    }

    /// Add one page of lines; returns its id and the number of replaced chars
    fn add_page(
        &self,
        doc: &mut Document,
        pages_id: ObjectId,
        resources_id: ObjectId,
        layout: &PageLayout,
        lines: &[String],
    ) -> Result<(ObjectId, usize), WriteError> {
        let mut operations = Vec::new();
        let mut replaced = 0;

        for (row, line) in lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let encoded = encode_text(line, self.config.placeholder);
            replaced += encoded.replaced;

            // one text object per line so readers see the line breaks
            let baseline = layout.top_baseline() - row as f32 * layout.line_height;
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec![FONT_NAME.into(), layout.font_size.into()]));
            operations.push(Operation::new("Td", vec![layout.margin.into(), baseline.into()]));
            operations.push(Operation::new("Tj", vec![Object::string_literal(encoded.bytes)]));
            operations.push(Operation::new("ET", vec![]));
        }

        let content = Content { operations };
        let stream = content
            .encode()
            .map_err(|e| WriteError::Pdf(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, stream));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });

        Ok((page_id, replaced))
    }
}

/// Word-wrap `text` to `width` characters per line
///
/// Source line breaks and blank lines are kept; words longer than a line are
/// split. Tabs count as four spaces and leading indentation is kept on the
/// first wrapped line of each source line. Trailing blank lines are dropped.
pub fn wrap_lines(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n").replace('\t', "    ");
    let mut lines = Vec::new();

    for source_line in normalized.split('\n') {
        let indent = source_line
            .chars()
            .take_while(|c| *c == ' ')
            .count()
            .min(width - 1);
        let mut current = " ".repeat(indent);
        let mut current_len = indent;
        let mut has_word = false;

        for word in source_line.split_whitespace() {
            let word_len = word.chars().count();

            if word_len > width {
                if has_word {
                    lines.push(std::mem::take(&mut current));
                }
                let chars: Vec<char> = word.chars().collect();
                let mut pieces = chars.chunks(width).peekable();
                while let Some(piece) = pieces.next() {
                    let piece: String = piece.iter().collect();
                    if pieces.peek().is_some() {
                        lines.push(piece);
                    } else {
                        current_len = piece.chars().count();
                        current = piece;
                    }
                }
                has_word = true;
                continue;
            }

            if !has_word {
                // indentation that leaves no room for the word is dropped
                if current_len + word_len > width {
                    current.clear();
                    current_len = 0;
                }
                current.push_str(word);
                current_len += word_len;
                has_word = true;
            } else if current_len + 1 + word_len <= width {
                current.push(' ');
                current.push_str(word);
                current_len += 1 + word_len;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
                current_len = word_len;
            }
        }

        if has_word {
            lines.push(current);
        } else {
            lines.push(String::new());
        }
    }

    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines
}
