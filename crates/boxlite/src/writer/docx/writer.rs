//! DOCX document writer implementation

use std::io::Cursor;

use docx_rs::*;
use ecow::EcoString;
use log::warn;

use crate::assets::ConversionContext;
use crate::common::FormatWriter;
use crate::diagnostics::Warning;
use crate::error::RenderError;
use crate::ir::{
    Block, ChecklistItem, Document, ImageBlock, Inline, ListItem, MarkSet, Table as IrTable,
};
use crate::writer::text::blocks_to_plain_text;

use super::image::DocxImageProcessor;
use super::numbering::{DocxNumbering, ListKind};
use super::styles::DocxStyles;

/// DOCX writer that assembles the package directly from the document model
pub struct DocxWriter {
    styles: DocxStyles,
    numbering: DocxNumbering,
    images: DocxImageProcessor,
    /// Current list nesting depth. Tracked explicitly so nested lists get
    /// the right indent level even when numbering definitions differ.
    list_level: usize,
}

impl Default for DocxWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl DocxWriter {
    pub fn new() -> Self {
        Self {
            styles: DocxStyles::new(),
            numbering: DocxNumbering::new(),
            images: DocxImageProcessor::new(),
            list_level: 0,
        }
    }

    /// Build a styled run for one text span.
    fn run_for_text(content: &str, marks: &MarkSet) -> Run {
        let mut run = Run::new();
        if marks.bold {
            run = run.bold();
        }
        if marks.italic {
            run = run.italic();
        }
        if marks.underline {
            run = run.underline("single");
        }
        if marks.strikethrough {
            run = run.strike();
        }
        if marks.highlight.is_some() {
            // The DOCX highlight palette is a fixed set of names; arbitrary
            // colors degrade to yellow.
            run = run.highlight("yellow");
        }
        run.add_text(content)
    }

    /// Assemble inline runs into a paragraph. Linked spans become external
    /// hyperlinks, which live at paragraph level in the package format.
    fn process_inlines(&self, mut para: Paragraph, inlines: &[Inline]) -> Paragraph {
        for inline in inlines {
            match inline {
                Inline::Text { content, marks } => {
                    if let Some(url) = &marks.link {
                        let run = Self::run_for_text(content, marks).style("Hyperlink");
                        let hyperlink =
                            Hyperlink::new(url, HyperlinkType::External).add_run(run);
                        para = para.add_hyperlink(hyperlink);
                    } else {
                        para = para.add_run(Self::run_for_text(content, marks));
                    }
                }
                Inline::Mention { display_name, .. } => {
                    let run = Run::new()
                        .style("Mention")
                        .add_text(format!("@{display_name}"));
                    para = para.add_run(run);
                }
                Inline::HardBreak => {
                    para = para.add_run(Run::new().add_break(BreakType::TextWrapping));
                }
            }
        }
        para
    }

    /// Process a paragraph-shaped inline sequence and add it to the document
    fn process_paragraph(
        &self,
        docx: Docx,
        inlines: &[Inline],
        style: Option<&str>,
    ) -> Result<Docx, RenderError> {
        let mut para = Paragraph::new();
        if let Some(style_name) = style {
            para = para.style(style_name);
        }

        para = self.process_inlines(para, inlines);
        if para.children.is_empty() {
            return Ok(docx);
        }
        Ok(docx.add_paragraph(para))
    }

    /// Process a block node and add it to the document
    fn process_block(
        &mut self,
        mut docx: Docx,
        block: &Block,
        ctx: &mut ConversionContext,
    ) -> Result<Docx, RenderError> {
        match block {
            Block::Paragraph(inlines) => {
                docx = self.process_paragraph(docx, inlines, None)?;
            }
            Block::Heading { level, content } => {
                let style_name = match level {
                    1 => "Heading1",
                    2 => "Heading2",
                    3 => "Heading3",
                    4 => "Heading4",
                    5 => "Heading5",
                    _ => "Heading6",
                };
                docx = self.process_paragraph(docx, content, Some(style_name))?;
            }
            Block::BulletList(items) => {
                docx = self.process_list(docx, items, ListKind::Bullet, ctx)?;
            }
            Block::OrderedList { items, .. } => {
                docx = self.process_list(docx, items, ListKind::Ordered, ctx)?;
            }
            Block::Checklist(items) => {
                docx = self.process_checklist(docx, items)?;
            }
            Block::Table(table) => {
                docx = self.process_table(docx, table)?;
            }
            Block::CodeBlock { language, content } => {
                if let Some(lang) = language {
                    if !lang.is_empty() {
                        let lang_para = Paragraph::new()
                            .style("CodeBlock")
                            .add_run(Run::new().add_text(lang.as_str()));
                        docx = docx.add_paragraph(lang_para);
                    }
                }

                // Line by line, preserving line breaks.
                for line in content.split('\n') {
                    let code_para = Paragraph::new()
                        .style("CodeBlock")
                        .add_run(Run::new().add_text(line));
                    docx = docx.add_paragraph(code_para);
                }
            }
            Block::BlockQuote(content) => {
                for child in content {
                    if let Block::Paragraph(inlines) = child {
                        docx = self.process_paragraph(docx, inlines, Some("Blockquote"))?;
                    } else {
                        docx = self.process_block(docx, child, ctx)?;
                    }
                }
            }
            Block::Image(image) => {
                docx = self.process_image(docx, image, ctx);
            }
            Block::ThematicBreak => {
                let hr_para = Paragraph::new()
                    .style("HorizontalLine")
                    .add_run(Run::new().add_text(""));
                docx = docx.add_paragraph(hr_para);
            }
            Block::Unknown(unknown) => {
                // Never dropped silently: the visible text survives, and an
                // empty passthrough leaves only its recorded warning.
                if unknown.text.is_empty() {
                    warn!("skipping empty unrecognized node {:?}", unknown.kind);
                } else {
                    let para =
                        Paragraph::new().add_run(Run::new().add_text(unknown.text.as_str()));
                    docx = docx.add_paragraph(para);
                }
            }
        }

        Ok(docx)
    }

    /// Process a bullet or ordered list with a fresh numbering definition
    fn process_list(
        &mut self,
        mut docx: Docx,
        items: &[ListItem],
        kind: ListKind,
        ctx: &mut ConversionContext,
    ) -> Result<Docx, RenderError> {
        self.list_level += 1;
        let current_level = self.list_level - 1;

        let (doc, num_id) = self.numbering.create_numbering(docx, kind);
        docx = doc;

        for item in items {
            docx = self.process_list_item_content(docx, &item.content, num_id, current_level, ctx)?;
        }

        self.list_level -= 1;
        Ok(docx)
    }

    fn process_list_item_content(
        &mut self,
        mut docx: Docx,
        content: &[Block],
        num_id: usize,
        level: usize,
        ctx: &mut ConversionContext,
    ) -> Result<Docx, RenderError> {
        if content.is_empty() {
            let empty_para = Paragraph::new()
                .numbering(NumberingId::new(num_id), IndentLevel::new(level))
                .add_run(Run::new().add_text(""));
            return Ok(docx.add_paragraph(empty_para));
        }

        for block in content {
            match block {
                Block::Paragraph(inlines) => {
                    let para = Paragraph::new()
                        .numbering(NumberingId::new(num_id), IndentLevel::new(level));
                    let para = self.process_inlines(para, inlines);
                    docx = docx.add_paragraph(para);
                }
                // Nested lists recurse and pick up their own numbering.
                _ => {
                    docx = self.process_block(docx, block, ctx)?;
                }
            }
        }

        Ok(docx)
    }

    /// Checklists render as the textual fallback, since the package format
    /// offers no plain checkbox construct.
    fn process_checklist(
        &self,
        mut docx: Docx,
        items: &[ChecklistItem],
    ) -> Result<Docx, RenderError> {
        for item in items {
            let marker = if item.checked { "[x] " } else { "[ ] " };
            let para = Paragraph::new().add_run(Run::new().add_text(marker));
            let para = self.process_inlines(para, &item.content);
            docx = docx.add_paragraph(para);
        }
        Ok(docx)
    }

    /// Process a table, honoring column spans and row spans
    fn process_table(&self, mut docx: Docx, table: &IrTable) -> Result<Docx, RenderError> {
        let columns = table.columns();
        if table.rows.is_empty() || columns == 0 {
            return Ok(docx);
        }

        let mut grid = Table::new(vec![]).style("Table");
        // Pending vertical merges per grid column.
        let mut vmerge = vec![0usize; columns];

        for row in &table.rows {
            let mut cells = Vec::new();
            let mut col_index = 0;
            let mut cell_iter = row.cells.iter();

            while col_index < columns {
                if vmerge[col_index] > 0 {
                    cells.push(TableCell::new().vertical_merge(VMergeType::Continue));
                    vmerge[col_index] -= 1;
                    col_index += 1;
                    continue;
                }

                if let Some(cell) = cell_iter.next() {
                    let mut table_cell = self.build_table_cell(&cell.content);
                    if cell.colspan > 1 {
                        table_cell = table_cell.grid_span(cell.colspan);
                    }
                    if cell.rowspan > 1 {
                        table_cell = table_cell.vertical_merge(VMergeType::Restart);
                        for offset in 0..cell.colspan {
                            if col_index + offset < columns {
                                vmerge[col_index + offset] =
                                    vmerge[col_index + offset].max(cell.rowspan - 1);
                            }
                        }
                    }
                    cells.push(table_cell);
                    col_index += cell.colspan;
                } else {
                    cells.push(TableCell::new());
                    col_index += 1;
                }
            }

            grid = grid.add_row(TableRow::new(cells));
        }

        docx = docx.add_table(grid);
        Ok(docx)
    }

    fn build_table_cell(&self, content: &[Block]) -> TableCell {
        let mut table_cell = TableCell::new();

        for block in content {
            match block {
                Block::Paragraph(inlines) => {
                    let para = self.process_inlines(Paragraph::new(), inlines);
                    if !para.children.is_empty() {
                        table_cell = table_cell.add_paragraph(para);
                    }
                }
                // Nested structure inside a cell degrades to its transcript.
                other => {
                    let text = blocks_to_plain_text(std::slice::from_ref(other));
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        let para = Paragraph::new().add_run(Run::new().add_text(trimmed));
                        table_cell = table_cell.add_paragraph(para);
                    }
                }
            }
        }

        table_cell
    }

    /// Resolve and embed an image; failures degrade to a placeholder.
    fn process_image(&self, docx: Docx, image: &ImageBlock, ctx: &mut ConversionContext) -> Docx {
        match ctx.resolve(&image.asset) {
            Ok(asset) => {
                let alt = if image.alt.is_empty() {
                    None
                } else {
                    Some(image.alt.as_str())
                };
                self.images.process_image_data(
                    docx,
                    &asset.bytes,
                    alt,
                    (image.width, image.height),
                )
            }
            Err(err) => {
                warn!("skipping asset {}: {err}", image.asset.display_name());
                ctx.warnings().push(Warning::AssetSkipped {
                    id: image.asset.id.clone(),
                    file_name: image.asset.file_name.clone(),
                    reason: err,
                });
                let placeholder = format!("[image unavailable: {}]", image.asset.display_name());
                let para = Paragraph::new().add_run(Run::new().add_text(placeholder));
                docx.add_paragraph(para)
            }
        }
    }

    /// Generate the packed DOCX document
    pub fn generate_docx(
        &mut self,
        document: &Document,
        ctx: &mut ConversionContext,
    ) -> Result<Vec<u8>, RenderError> {
        let mut docx = Docx::new();
        docx = self.styles.initialize_styles(docx);

        for block in &document.blocks {
            docx = self.process_block(docx, block, ctx)?;
        }

        let built = docx.build();
        let mut buffer = Vec::new();
        built
            .pack(&mut Cursor::new(&mut buffer))
            .map_err(|err| RenderError::Package(err.to_string()))?;

        Ok(buffer)
    }
}

impl FormatWriter for DocxWriter {
    fn write_eco(
        &mut self,
        _document: &Document,
        _ctx: &mut ConversionContext,
        _output: &mut EcoString,
    ) -> Result<(), RenderError> {
        Err(RenderError::UnsupportedStructure(
            "DOCX output is binary; use write_vec".into(),
        ))
    }

    fn write_vec(
        &mut self,
        document: &Document,
        ctx: &mut ConversionContext,
    ) -> Result<Vec<u8>, RenderError> {
        self.list_level = 0;
        self.numbering = DocxNumbering::new();
        self.generate_docx(document, ctx)
    }
}
