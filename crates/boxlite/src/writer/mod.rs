//! Writer implementations for different output formats

pub mod docx;
pub mod html;
pub mod text;

pub use docx::DocxWriter;
pub use html::HtmlWriter;
pub use text::TextWriter;

use crate::common::{Format, FormatWriter};

/// Create a writer instance based on the specified format
pub fn create_writer(format: Format) -> Box<dyn FormatWriter> {
    match format {
        Format::Html => Box::new(html::HtmlWriter::new()),
        Format::Text => Box::new(text::TextWriter::new()),
        Format::Docx => Box::new(docx::DocxWriter::new()),
    }
}

pub struct WriterFactory;

impl WriterFactory {
    pub fn create(format: Format) -> Box<dyn FormatWriter> {
        create_writer(format)
    }
}
