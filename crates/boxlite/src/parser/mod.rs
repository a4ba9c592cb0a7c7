//! Parser implementation for box-note JSON to the boxlite IR.

mod core;
mod inline;
mod list;
mod media;
mod table;

pub use self::core::BoxNoteParser;

use crate::diagnostics::WarningCollector;
use crate::error::ParseError;
use crate::ir::Document;

/// Parse a raw box note into a document tree.
///
/// Pure function of its input: no side effects, and warnings about
/// unrecognized nodes are discarded. Use [`BoxNoteParser`] directly to
/// collect them.
pub fn parse(raw: &str) -> Result<Document, ParseError> {
    BoxNoteParser::new(WarningCollector::default()).parse(raw)
}
