//! Inline parsing module, handling text runs, marks and mentions.

use ecow::EcoString;
use serde_json::Value;

use crate::diagnostics::Warning;
use crate::ir::{Inline, MarkSet};

use super::core::{BoxNoteParser, attr_str, node_content, node_type, visible_text};

/// Inline node parser.
pub struct InlineParser;

impl InlineParser {
    /// Convert a node's children into inline runs.
    pub fn convert_inlines(parser: &BoxNoteParser, nodes: &[Value]) -> Vec<Inline> {
        let mut inlines = Vec::new();
        for node in nodes {
            Self::convert_inline(parser, node, &mut inlines);
        }
        inlines
    }

    fn convert_inline(parser: &BoxNoteParser, node: &Value, out: &mut Vec<Inline>) {
        let Some(kind) = node_type(node) else {
            return;
        };

        match kind {
            "text" => {
                let Some(content) = node.get("text").and_then(Value::as_str) else {
                    return;
                };
                let marks = Self::parse_marks(parser, node);
                out.push(Inline::text(content, marks));
            }
            "mention" => {
                let user_id = attr_str(node, "id").unwrap_or_default();
                let label = attr_str(node, "label").unwrap_or_default();
                // Exported labels usually carry the sigil already; the
                // renderers add their own.
                let display_name = label.strip_prefix('@').unwrap_or(label);
                out.push(Inline::Mention {
                    user_id: user_id.into(),
                    display_name: display_name.into(),
                });
            }
            "hard_break" => out.push(Inline::HardBreak),
            // Some exports wrap text runs in neutral containers; unwrap
            // them rather than flattening to plain text.
            "span" | "inline" => {
                for child in node_content(node) {
                    Self::convert_inline(parser, child, out);
                }
            }
            _ => {
                // Unrecognized inline kinds degrade to their visible text so
                // sibling runs are preserved untouched.
                parser.warnings.push(Warning::UnknownNode { kind: kind.into() });
                let text = visible_text(node);
                if !text.is_empty() {
                    out.push(Inline::plain(text));
                }
            }
        }
    }

    /// Fold a node's `marks` array into a mark set. Duplicate tags collapse
    /// by construction; unknown mark types are ignored.
    fn parse_marks(parser: &BoxNoteParser, node: &Value) -> MarkSet {
        let mut marks = MarkSet::default();
        let Some(entries) = node.get("marks").and_then(Value::as_array) else {
            return marks;
        };

        for entry in entries {
            match node_type(entry) {
                Some("strong") | Some("bold") => marks.bold = true,
                Some("em") | Some("italic") => marks.italic = true,
                Some("underline") => marks.underline = true,
                Some("strikethrough") | Some("strike") => marks.strikethrough = true,
                Some("link") => match attr_str(entry, "href").filter(|href| !href.is_empty()) {
                    Some(href) => marks.link = Some(EcoString::from(href)),
                    None => parser.warnings.push(Warning::EmptyLink),
                },
                Some("highlight") => {
                    let color = attr_str(entry, "color").unwrap_or("yellow");
                    marks.highlight = Some(color.into());
                }
                _ => {}
            }
        }

        marks
    }
}
