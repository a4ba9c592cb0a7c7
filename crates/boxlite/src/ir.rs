//! Semantic intermediate representation for boxlite.
//!
//! This IR is the shared document model for all output targets. It is pure
//! data: parsing builds it once per run and the writers only read it.

use ecow::EcoString;
use serde_json::Value;

use crate::assets::AssetRef;

/// A parsed box note.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub blocks: Vec<Block>,
}

/// Block-level elements.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Vec<Inline>),
    Heading {
        level: u8,
        content: Vec<Inline>,
    },
    BulletList(Vec<ListItem>),
    OrderedList {
        start: u32,
        items: Vec<ListItem>,
    },
    Checklist(Vec<ChecklistItem>),
    Table(Table),
    CodeBlock {
        language: Option<EcoString>,
        content: EcoString,
    },
    BlockQuote(Vec<Block>),
    Image(ImageBlock),
    ThematicBreak,
    /// Passthrough for a node type this version does not recognize.
    Unknown(UnknownBlock),
}

/// Inline-level elements.
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Text {
        content: EcoString,
        marks: MarkSet,
    },
    Mention {
        user_id: EcoString,
        display_name: EcoString,
    },
    HardBreak,
}

impl Inline {
    /// Plain text with the given marks.
    pub fn text(content: impl Into<EcoString>, marks: MarkSet) -> Self {
        Inline::Text {
            content: content.into(),
            marks,
        }
    }

    /// Unmarked plain text.
    pub fn plain(content: impl Into<EcoString>) -> Self {
        Self::text(content, MarkSet::default())
    }
}

/// The set of inline style tags on one text run.
///
/// Set semantics hold by construction: each tag is a field, so a run can
/// carry a tag at most once. Writers compose marks in a fixed order
/// (link, highlight, bold, italic, underline, strikethrough) so identical
/// mark sets always produce byte-identical output.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MarkSet {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    /// Non-empty URI; an empty href is rejected at parse time.
    pub link: Option<EcoString>,
    pub highlight: Option<EcoString>,
}

impl MarkSet {
    pub fn is_empty(&self) -> bool {
        *self == MarkSet::default()
    }
}

/// One entry of a bullet or ordered list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    pub content: Vec<Block>,
}

/// One entry of a checklist.
#[derive(Debug, Clone, PartialEq)]
pub struct ChecklistItem {
    pub checked: bool,
    pub content: Vec<Inline>,
}

/// Table block.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub rows: Vec<TableRow>,
}

impl Table {
    /// The width of the table grid, in columns.
    pub fn columns(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.cells.iter().map(|cell| cell.colspan).sum())
            .max()
            .unwrap_or(0)
    }
}

/// A logical row inside a table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

/// A single table cell.
#[derive(Debug, Clone, PartialEq)]
pub struct TableCell {
    pub content: Vec<Block>,
    pub colspan: usize,
    pub rowspan: usize,
}

/// An embedded image, referencing a remote asset.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBlock {
    pub asset: AssetRef,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub alt: EcoString,
}

/// An unrecognized node, preserved rather than rejected. Carries its raw
/// attributes and the concatenated visible text of its subtree.
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownBlock {
    pub kind: EcoString,
    pub attrs: Value,
    pub text: EcoString,
}
