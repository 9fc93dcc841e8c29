/*!
 * Reading and writing PDF documents with lopdf.
 */

pub use self::extractor::TextExtractor;
pub use self::writer::{PageLayout, PdfWriter};

pub mod encoding;
pub mod extractor;
pub mod writer;
