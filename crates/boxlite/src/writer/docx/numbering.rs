//! List numbering management for DOCX conversion
//!
//! Every list gets its own `AbstractNumbering`/`Numbering` pair so that
//! sibling lists restart their numbering instead of continuing a shared
//! counter.

use docx_rs::*;

/// The two list flavors a numbering definition can describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Bullet,
    Ordered,
}

/// List numbering management for DOCX
#[derive(Clone, Debug)]
pub struct DocxNumbering {
    next_id: usize,
}

impl DocxNumbering {
    pub fn new() -> Self {
        Self { next_id: 1 }
    }

    /// Create a list level with the specified parameters
    fn create_list_level(id: usize, format: &str, text: &str, kind: ListKind) -> Level {
        let indent_size = 720 * (id + 1) as i32;
        let hanging_indent = match kind {
            ListKind::Bullet => 360,
            ListKind::Ordered => 420,
        };

        Level::new(
            id,
            Start::new(1),
            NumberFormat::new(format),
            LevelText::new(text),
            LevelJc::new("left"),
        )
        .indent(
            Some(indent_size),
            Some(SpecialIndentType::Hanging(hanging_indent)),
            None,
            None,
        )
    }

    /// Register a fresh numbering definition and return its id.
    pub fn create_numbering(&mut self, docx: Docx, kind: ListKind) -> (Docx, usize) {
        let abstract_id = self.next_id;
        let numbering_id = self.next_id;
        self.next_id += 1;

        let mut definition = AbstractNumbering::new(abstract_id);
        for level in 0..9 {
            definition = definition.add_level(Self::create_level(level, kind));
        }

        let docx = docx
            .add_abstract_numbering(definition)
            .add_numbering(Numbering::new(numbering_id, abstract_id));

        (docx, numbering_id)
    }

    fn create_level(level: usize, kind: ListKind) -> Level {
        match kind {
            ListKind::Bullet => {
                let bullet_text = match level {
                    0 => "•",
                    1 => "○",
                    2 => "▪",
                    3 => "▫",
                    4 => "◆",
                    _ => "◇",
                };
                Self::create_list_level(level, "bullet", bullet_text, kind)
            }
            ListKind::Ordered => {
                let level_text = match level {
                    0 => "%1.",
                    1 => "%2.",
                    2 => "%3.",
                    3 => "%4.",
                    4 => "%5.",
                    5 => "%6.",
                    _ => "%7.",
                };
                let number_format = match level {
                    0 => "decimal",
                    1 => "lowerLetter",
                    2 => "lowerRoman",
                    3 => "upperRoman",
                    4 => "decimal",
                    5 => "lowerLetter",
                    _ => "decimal",
                };

                let mut ordered = Self::create_list_level(level, number_format, level_text, kind);
                if level > 0 {
                    ordered = ordered.level_restart(0_u32);
                }
                ordered
            }
        }
    }
}
