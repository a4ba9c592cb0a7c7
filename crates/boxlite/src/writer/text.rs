//! Text writer implementation - produces plain text output
//!
//! Walks the document model directly, never the rendered HTML, and never
//! touches the asset resolver: marks and assets are dropped entirely.

use ecow::EcoString;

use crate::assets::ConversionContext;
use crate::common::FormatWriter;
use crate::error::RenderError;
use crate::ir::{Block, Document, Inline};

/// Flatten blocks to their plain-text transcript, for targets that have to
/// degrade a structure to text.
pub(crate) fn blocks_to_plain_text(blocks: &[Block]) -> EcoString {
    let mut output = EcoString::new();
    for block in blocks {
        TextWriter::write_block(block, &mut output);
    }
    output
}

/// Text writer implementation
#[derive(Default)]
pub struct TextWriter {}

impl TextWriter {
    pub fn new() -> Self {
        Self {}
    }

    pub(crate) fn write_block(block: &Block, output: &mut EcoString) {
        match block {
            Block::Paragraph(inlines) | Block::Heading {
                content: inlines, ..
            } => {
                Self::write_inlines(inlines, output);
                output.push('\n');
            }
            Block::BulletList(items) | Block::OrderedList { items, .. } => {
                for item in items {
                    for child in &item.content {
                        Self::write_block(child, output);
                    }
                }
            }
            Block::Checklist(items) => {
                for item in items {
                    output.push_str(if item.checked { "[x] " } else { "[ ] " });
                    Self::write_inlines(&item.content, output);
                    output.push('\n');
                }
            }
            Block::Table(table) => {
                for row in &table.rows {
                    for cell in &row.cells {
                        Self::write_blocks_inline(&cell.content, output);
                        output.push(' ');
                    }
                    output.push('\n');
                }
            }
            Block::CodeBlock { content, .. } => {
                output.push_str(content);
                if !content.ends_with('\n') {
                    output.push('\n');
                }
            }
            Block::BlockQuote(content) => {
                for child in content {
                    Self::write_block(child, output);
                }
            }
            // Assets are dropped; this writer performs no resolution.
            Block::Image(_) => {}
            Block::ThematicBreak => output.push('\n'),
            Block::Unknown(unknown) => {
                if !unknown.text.is_empty() {
                    output.push_str(&unknown.text);
                    output.push('\n');
                }
            }
        }
    }

    /// Write blocks without block separators, for table cells.
    fn write_blocks_inline(blocks: &[Block], output: &mut EcoString) {
        let mut inner = EcoString::new();
        for block in blocks {
            Self::write_block(block, &mut inner);
        }
        let mut first = true;
        for line in inner.split('\n').filter(|line| !line.is_empty()) {
            if !first {
                output.push(' ');
            }
            output.push_str(line);
            first = false;
        }
    }

    fn write_inlines(inlines: &[Inline], output: &mut EcoString) {
        for inline in inlines {
            match inline {
                Inline::Text { content, .. } => output.push_str(content),
                Inline::Mention { display_name, .. } => {
                    output.push('@');
                    output.push_str(display_name);
                }
                Inline::HardBreak => output.push('\n'),
            }
        }
    }
}

impl FormatWriter for TextWriter {
    fn write_eco(
        &mut self,
        document: &Document,
        _ctx: &mut ConversionContext,
        output: &mut EcoString,
    ) -> Result<(), RenderError> {
        let mut buffer = EcoString::new();
        for block in &document.blocks {
            Self::write_block(block, &mut buffer);
        }
        // Newlines separate blocks; the final block is not terminated.
        output.push_str(buffer.strip_suffix('\n').unwrap_or(&buffer));
        Ok(())
    }

    fn write_vec(
        &mut self,
        document: &Document,
        ctx: &mut ConversionContext,
    ) -> Result<Vec<u8>, RenderError> {
        let mut output = EcoString::new();
        self.write_eco(document, ctx, &mut output)?;
        Ok(output.as_str().as_bytes().to_vec())
    }
}
