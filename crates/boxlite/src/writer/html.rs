//! HTML writer implementation - produces a self-contained HTML5 fragment

use std::fs;

use base64::Engine;
use ecow::EcoString;
use log::warn;

use crate::assets::ConversionContext;
use crate::common::FormatWriter;
use crate::diagnostics::Warning;
use crate::error::RenderError;
use crate::ir::{Block, ChecklistItem, Document, ImageBlock, Inline, ListItem, Table};

/// HTML writer implementation
#[derive(Default)]
pub struct HtmlWriter {}

impl HtmlWriter {
    pub fn new() -> Self {
        Self {}
    }
}

impl FormatWriter for HtmlWriter {
    fn write_eco(
        &mut self,
        document: &Document,
        ctx: &mut ConversionContext,
        output: &mut EcoString,
    ) -> Result<(), RenderError> {
        let mut renderer = HtmlRenderer::new(ctx);
        renderer.write_document(document)?;
        output.push_str(&renderer.into_string()?);
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

struct HtmlRenderer<'a> {
    ctx: &'a mut ConversionContext,
    buffer: String,
    tag_opened: bool,
}

impl<'a> HtmlRenderer<'a> {
    fn new(ctx: &'a mut ConversionContext) -> Self {
        Self {
            ctx,
            buffer: String::new(),
            tag_opened: false,
        }
    }

    fn into_string(mut self) -> Result<String, RenderError> {
        self.ensure_tag_closed();
        Ok(self.buffer)
    }

    fn ensure_tag_closed(&mut self) {
        if self.tag_opened {
            self.buffer.push('>');
            self.tag_opened = false;
        }
    }

    fn start_tag(&mut self, tag_name: &str) {
        self.ensure_tag_closed();
        self.buffer.push('<');
        self.buffer.push_str(tag_name);
        self.tag_opened = true;
    }

    fn attribute(&mut self, key: &str, value: &str) -> Result<(), RenderError> {
        if !self.tag_opened {
            return Err(RenderError::Markup(
                "cannot write attribute: no tag is currently open".into(),
            ));
        }
        self.buffer.push(' ');
        self.buffer.push_str(key);
        self.buffer.push_str("=\"");
        self.buffer
            .push_str(html_escape::encode_double_quoted_attribute(value).as_ref());
        self.buffer.push('"');
        Ok(())
    }

    fn finish_tag(&mut self) {
        self.ensure_tag_closed();
    }

    fn finish_self_closing_tag(&mut self) -> Result<(), RenderError> {
        if !self.tag_opened {
            return Err(RenderError::Markup(
                "cannot finish self-closing tag: no tag is currently open".into(),
            ));
        }
        self.buffer.push_str(" />");
        self.tag_opened = false;
        Ok(())
    }

    fn self_closing_tag(&mut self, tag_name: &str) {
        self.ensure_tag_closed();
        self.buffer.push('<');
        self.buffer.push_str(tag_name);
        self.buffer.push_str(" />");
        self.tag_opened = false;
    }

    fn end_tag(&mut self, tag_name: &str) {
        self.ensure_tag_closed();
        self.buffer.push_str("</");
        self.buffer.push_str(tag_name);
        self.buffer.push('>');
    }

    fn text(&mut self, text: &str) {
        self.ensure_tag_closed();
        self.buffer.push_str(html_escape::encode_text(text).as_ref());
    }

    fn raw(&mut self, html: &str) {
        self.ensure_tag_closed();
        self.buffer.push_str(html);
    }

    fn write_document(&mut self, document: &Document) -> Result<(), RenderError> {
        for block in &document.blocks {
            self.write_block(block)?;
        }
        Ok(())
    }

    fn write_block(&mut self, block: &Block) -> Result<(), RenderError> {
        match block {
            Block::Paragraph(inlines) => {
                self.start_tag("p");
                self.finish_tag();
                self.write_inlines(inlines)?;
                self.end_tag("p");
                self.raw("\n");
                Ok(())
            }
            Block::Heading { level, content } => {
                let tag_name = format!("h{}", (*level).clamp(1, 6));
                self.start_tag(&tag_name);
                self.finish_tag();
                self.write_inlines(content)?;
                self.end_tag(&tag_name);
                self.raw("\n");
                Ok(())
            }
            Block::BulletList(items) => {
                self.start_tag("ul");
                self.finish_tag();
                self.raw("\n");
                for item in items {
                    self.write_list_item(item)?;
                }
                self.end_tag("ul");
                self.raw("\n");
                Ok(())
            }
            Block::OrderedList { start, items } => {
                self.start_tag("ol");
                if *start != 1 {
                    self.attribute("start", &start.to_string())?;
                }
                self.finish_tag();
                self.raw("\n");
                for item in items {
                    self.write_list_item(item)?;
                }
                self.end_tag("ol");
                self.raw("\n");
                Ok(())
            }
            Block::Checklist(items) => {
                self.start_tag("ul");
                self.attribute("class", "checklist")?;
                self.finish_tag();
                self.raw("\n");
                for item in items {
                    self.write_checklist_item(item)?;
                }
                self.end_tag("ul");
                self.raw("\n");
                Ok(())
            }
            Block::Table(table) => self.write_table(table),
            Block::CodeBlock { language, content } => {
                self.start_tag("pre");
                self.finish_tag();
                self.start_tag("code");
                if let Some(lang) = language {
                    if !lang.is_empty() {
                        self.attribute("class", &format!("language-{}", lang.trim()))?;
                    }
                }
                self.finish_tag();
                self.text(content);
                self.end_tag("code");
                self.end_tag("pre");
                self.raw("\n");
                Ok(())
            }
            Block::BlockQuote(content) => {
                self.start_tag("blockquote");
                self.finish_tag();
                self.raw("\n");
                for child in content {
                    self.write_block(child)?;
                }
                self.end_tag("blockquote");
                self.raw("\n");
                Ok(())
            }
            Block::Image(image) => self.write_image(image),
            Block::ThematicBreak => {
                self.self_closing_tag("hr");
                self.raw("\n");
                Ok(())
            }
            Block::Unknown(unknown) => {
                // Passthrough nodes degrade to their visible text; an empty
                // one leaves no trace beyond the recorded warning.
                if !unknown.text.is_empty() {
                    self.start_tag("p");
                    self.finish_tag();
                    self.text(&unknown.text);
                    self.end_tag("p");
                    self.raw("\n");
                }
                Ok(())
            }
        }
    }

    fn write_list_item(&mut self, item: &ListItem) -> Result<(), RenderError> {
        self.start_tag("li");
        self.finish_tag();
        for block in &item.content {
            self.write_block(block)?;
        }
        self.end_tag("li");
        self.raw("\n");
        Ok(())
    }

    fn write_checklist_item(&mut self, item: &ChecklistItem) -> Result<(), RenderError> {
        self.start_tag("li");
        self.attribute("class", if item.checked { "checked" } else { "unchecked" })?;
        self.finish_tag();
        self.start_tag("input");
        self.attribute("type", "checkbox")?;
        if item.checked {
            self.attribute("checked", "checked")?;
        }
        self.attribute("disabled", "disabled")?;
        self.finish_self_closing_tag()?;
        self.raw(" ");
        self.write_inlines(&item.content)?;
        self.end_tag("li");
        self.raw("\n");
        Ok(())
    }

    fn write_table(&mut self, table: &Table) -> Result<(), RenderError> {
        self.start_tag("table");
        self.finish_tag();
        self.raw("\n");
        self.start_tag("tbody");
        self.finish_tag();
        self.raw("\n");

        for row in &table.rows {
            self.start_tag("tr");
            self.finish_tag();
            self.raw("\n");
            for cell in &row.cells {
                self.start_tag("td");
                if cell.colspan > 1 {
                    self.attribute("colspan", &cell.colspan.to_string())?;
                }
                if cell.rowspan > 1 {
                    self.attribute("rowspan", &cell.rowspan.to_string())?;
                }
                self.finish_tag();
                for block in &cell.content {
                    self.write_block(block)?;
                }
                self.end_tag("td");
                self.raw("\n");
            }
            self.end_tag("tr");
            self.raw("\n");
        }

        self.end_tag("tbody");
        self.raw("\n");
        self.end_tag("table");
        self.raw("\n");
        Ok(())
    }

    fn write_image(&mut self, image: &ImageBlock) -> Result<(), RenderError> {
        let src = match self.ctx.resolve(&image.asset) {
            Ok(asset) => {
                if self.ctx.embed_assets() {
                    let data = base64::engine::general_purpose::STANDARD.encode(&*asset.bytes);
                    format!("data:{};base64,{data}", asset.mime)
                } else {
                    // Stage the bytes under the work dir and link them by
                    // path. The name is prefixed with the asset id so two
                    // assets sharing a display name cannot overwrite each
                    // other, and a document-supplied name with path
                    // separators cannot escape the work dir.
                    let file_name = image.asset.file_name.as_str();
                    let name = if file_name.is_empty()
                        || file_name.contains(['/', '\\'])
                        || file_name.starts_with('.')
                    {
                        format!("{}.{}", image.asset.id, asset.extension())
                    } else {
                        format!("{}-{}", image.asset.id, file_name)
                    };
                    fs::create_dir_all(self.ctx.work_dir())?;
                    let path = self.ctx.work_dir().join(&name);
                    fs::write(&path, asset.bytes.as_slice())?;
                    path.display().to_string()
                }
            }
            Err(err) => {
                warn!("skipping asset {}: {err}", image.asset.display_name());
                self.ctx.warnings().push(Warning::AssetSkipped {
                    id: image.asset.id.clone(),
                    file_name: image.asset.file_name.clone(),
                    reason: err,
                });
                self.start_tag("span");
                self.attribute("class", "asset-missing")?;
                self.finish_tag();
                self.text(&format!(
                    "[image unavailable: {}]",
                    image.asset.display_name()
                ));
                self.end_tag("span");
                self.raw("\n");
                return Ok(());
            }
        };

        self.start_tag("img");
        self.attribute("src", &src)?;
        self.attribute("alt", &image.alt)?;
        if let Some(width) = image.width {
            self.attribute("width", &width.to_string())?;
        }
        if let Some(height) = image.height {
            self.attribute("height", &height.to_string())?;
        }
        self.finish_self_closing_tag()?;
        self.raw("\n");
        Ok(())
    }

    fn write_inlines(&mut self, inlines: &[Inline]) -> Result<(), RenderError> {
        for inline in inlines {
            self.write_inline(inline)?;
        }
        Ok(())
    }

    fn write_inline(&mut self, inline: &Inline) -> Result<(), RenderError> {
        match inline {
            Inline::Text { content, marks } => {
                // Marks compose in a fixed order so identical mark sets
                // always nest identically: link wraps highlight wraps bold
                // wraps italic wraps underline wraps strikethrough.
                if let Some(href) = &marks.link {
                    self.start_tag("a");
                    self.attribute("href", href)?;
                    self.finish_tag();
                }
                if let Some(color) = &marks.highlight {
                    self.start_tag("mark");
                    self.attribute("style", &format!("background-color: {color}"))?;
                    self.finish_tag();
                }
                if marks.bold {
                    self.start_tag("strong");
                    self.finish_tag();
                }
                if marks.italic {
                    self.start_tag("em");
                    self.finish_tag();
                }
                if marks.underline {
                    self.start_tag("u");
                    self.finish_tag();
                }
                if marks.strikethrough {
                    self.start_tag("del");
                    self.finish_tag();
                }

                self.text(content);

                if marks.strikethrough {
                    self.end_tag("del");
                }
                if marks.underline {
                    self.end_tag("u");
                }
                if marks.italic {
                    self.end_tag("em");
                }
                if marks.bold {
                    self.end_tag("strong");
                }
                if marks.highlight.is_some() {
                    self.end_tag("mark");
                }
                if marks.link.is_some() {
                    self.end_tag("a");
                }
                Ok(())
            }
            Inline::Mention {
                user_id,
                display_name,
            } => {
                self.start_tag("span");
                self.attribute("class", "mention")?;
                self.attribute("data-user-id", user_id)?;
                self.finish_tag();
                self.text(&format!("@{display_name}"));
                self.end_tag("span");
                Ok(())
            }
            Inline::HardBreak => {
                self.self_closing_tag("br");
                self.raw("\n");
                Ok(())
            }
        }
    }
}
