//! List parsing module, handling bullet, ordered and check lists.

use serde_json::Value;

use crate::ir::{ChecklistItem, Inline, ListItem};

use super::core::{BoxNoteParser, attr_bool, node_content, node_type};
use super::inline::InlineParser;

/// List node parser.
pub struct ListParser;

impl ListParser {
    /// Convert the `list_item` children of a bullet or ordered list.
    ///
    /// Item content is a block sequence, so nested lists recurse through
    /// the block dispatcher and keep their own numbering.
    pub fn convert_items(parser: &BoxNoteParser, list: &Value) -> Vec<ListItem> {
        let mut items = Vec::new();
        for child in node_content(list) {
            if node_type(child) != Some("list_item") {
                continue;
            }
            let content = parser.convert_blocks(node_content(child));
            if !content.is_empty() {
                items.push(ListItem { content });
            }
        }
        items
    }

    /// Convert the `check_list_item` children of a check list.
    pub fn convert_checklist(parser: &BoxNoteParser, list: &Value) -> Vec<ChecklistItem> {
        let mut items = Vec::new();
        for child in node_content(list) {
            if node_type(child) != Some("check_list_item") {
                continue;
            }
            let checked = attr_bool(child, "checked").unwrap_or(false);
            items.push(ChecklistItem {
                checked,
                content: Self::convert_item_inlines(parser, child),
            });
        }
        items
    }

    /// Checklist item content is inline-only in the IR; paragraphs inside
    /// the item are flattened into one run sequence.
    fn convert_item_inlines(parser: &BoxNoteParser, item: &Value) -> Vec<Inline> {
        let mut inlines = Vec::new();
        for child in node_content(item) {
            if node_type(child) == Some("paragraph") {
                inlines.extend(InlineParser::convert_inlines(parser, node_content(child)));
            } else {
                inlines.extend(InlineParser::convert_inlines(
                    parser,
                    std::slice::from_ref(child),
                ));
            }
        }
        inlines
    }
}
