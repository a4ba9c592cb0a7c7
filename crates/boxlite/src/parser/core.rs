//! Box-note parser core, containing the block dispatcher and general
//! JSON access helpers.
//!
//! A box note is a root object carrying a `doc` field whose `content` is an
//! ordered array of typed node objects. Each node has a `type`
//! discriminator plus optional `attrs`, `content`, `text` and `marks`
//! payloads. Attributes outside the recognized set are ignored; an
//! unrecognized `type` becomes a passthrough [`Block::Unknown`] so one
//! future node kind never aborts conversion of the rest of the document.

use ecow::EcoString;
use serde_json::Value;

use crate::diagnostics::{Warning, WarningCollector};
use crate::error::ParseError;
use crate::ir::{Block, Document, UnknownBlock};

use super::inline::InlineParser;
use super::list::ListParser;
use super::media::MediaParser;
use super::table::TableParser;

/// Box-note JSON to IR parser.
pub struct BoxNoteParser {
    pub(crate) warnings: WarningCollector,
}

impl BoxNoteParser {
    pub fn new(warnings: WarningCollector) -> Self {
        Self { warnings }
    }

    /// Parse a raw box note into a document tree.
    pub fn parse(&self, raw: &str) -> Result<Document, ParseError> {
        if raw.trim().is_empty() {
            return Err(ParseError::Malformed("empty input".into()));
        }

        let value: Value = serde_json::from_str(raw)
            .map_err(|err| ParseError::Malformed(err.to_string()))?;

        // Accept both the wrapped shape (`{"doc": {...}}`) and a bare
        // document root; both occur in exported notes.
        let doc = value.get("doc").unwrap_or(&value);
        let content = doc
            .get("content")
            .and_then(Value::as_array)
            .ok_or_else(|| ParseError::Malformed("missing doc.content".into()))?;

        Ok(Document {
            blocks: self.convert_blocks(content),
        })
    }

    pub(crate) fn convert_blocks(&self, nodes: &[Value]) -> Vec<Block> {
        nodes
            .iter()
            .filter_map(|node| self.convert_block(node))
            .collect()
    }

    fn convert_block(&self, node: &Value) -> Option<Block> {
        let kind = node_type(node)?;
        match kind {
            "paragraph" => Some(Block::Paragraph(
                InlineParser::convert_inlines(self, node_content(node)),
            )),
            "heading" => {
                let level = attr_u32(node, "level").unwrap_or(1).clamp(1, 6) as u8;
                Some(Block::Heading {
                    level,
                    content: InlineParser::convert_inlines(self, node_content(node)),
                })
            }
            "bullet_list" => Some(Block::BulletList(ListParser::convert_items(self, node))),
            "ordered_list" => {
                let start = attr_u32(node, "order")
                    .or_else(|| attr_u32(node, "start"))
                    .unwrap_or(1);
                Some(Block::OrderedList {
                    start,
                    items: ListParser::convert_items(self, node),
                })
            }
            "check_list" => Some(Block::Checklist(ListParser::convert_checklist(self, node))),
            "table" => Some(Block::Table(TableParser::convert_table(self, node))),
            "code_block" => {
                let language = attr_str(node, "language")
                    .filter(|lang| !lang.is_empty())
                    .map(EcoString::from);
                Some(Block::CodeBlock {
                    language,
                    content: visible_text(node),
                })
            }
            "blockquote" => Some(Block::BlockQuote(
                self.convert_blocks(node_content(node)),
            )),
            "image" => Some(match MediaParser::convert_image(node) {
                Some(image) => Block::Image(image),
                // An image node without a file identifier cannot be
                // resolved; pass it through like an unrecognized node.
                None => self.unknown_block(kind, node),
            }),
            "horizontal_rule" => Some(Block::ThematicBreak),
            // Inline-only node kinds contribute nothing at block level.
            "hard_break" | "text" => None,
            _ => Some(self.unknown_block(kind, node)),
        }
    }

    fn unknown_block(&self, kind: &str, node: &Value) -> Block {
        self.warnings.push(Warning::UnknownNode { kind: kind.into() });
        Block::Unknown(UnknownBlock {
            kind: kind.into(),
            attrs: node.get("attrs").cloned().unwrap_or(Value::Null),
            text: visible_text(node),
        })
    }
}

/// The `type` discriminator of a node, if present.
pub(crate) fn node_type(node: &Value) -> Option<&str> {
    node.get("type").and_then(Value::as_str)
}

/// The ordered children of a node, defaulting to none.
pub(crate) fn node_content(node: &Value) -> &[Value] {
    node.get("content")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

pub(crate) fn attr_str<'a>(node: &'a Value, key: &str) -> Option<&'a str> {
    node.get("attrs")?.get(key)?.as_str()
}

pub(crate) fn attr_u32(node: &Value, key: &str) -> Option<u32> {
    let attr = node.get("attrs")?.get(key)?;
    // Exported notes carry numeric attributes both as numbers and as
    // stringified numbers.
    attr.as_u64()
        .or_else(|| attr.as_str().and_then(|s| s.parse().ok()))
        .map(|n| n as u32)
}

pub(crate) fn attr_bool(node: &Value, key: &str) -> Option<bool> {
    node.get("attrs")?.get(key)?.as_bool()
}

/// Concatenate the visible text of a node's subtree, in document order.
pub(crate) fn visible_text(node: &Value) -> EcoString {
    let mut out = EcoString::new();
    collect_visible_text(node, &mut out);
    out
}

fn collect_visible_text(node: &Value, out: &mut EcoString) {
    if let Some(text) = node.get("text").and_then(Value::as_str) {
        out.push_str(text);
    }
    for child in node_content(node) {
        collect_visible_text(child, out);
    }
}
