//! Table parsing module, processing the conversion of table grids.

use serde_json::Value;

use crate::ir::{Table, TableCell, TableRow};

use super::core::{BoxNoteParser, attr_u32, node_content, node_type};

/// Table node parser.
pub struct TableParser;

impl TableParser {
    /// Convert a `table` node into the IR grid.
    pub fn convert_table(parser: &BoxNoteParser, table: &Value) -> Table {
        let mut rows = Vec::new();
        for child in node_content(table) {
            if node_type(child) != Some("table_row") {
                continue;
            }
            rows.push(Self::convert_row(parser, child));
        }
        Table { rows }
    }

    fn convert_row(parser: &BoxNoteParser, row: &Value) -> TableRow {
        let mut cells = Vec::new();
        for child in node_content(row) {
            // Header cells are not distinguished in the IR; the grid
            // position carries the meaning.
            if !matches!(node_type(child), Some("table_cell") | Some("table_header")) {
                continue;
            }
            cells.push(TableCell {
                content: parser.convert_blocks(node_content(child)),
                colspan: attr_u32(child, "colspan").unwrap_or(1).max(1) as usize,
                rowspan: attr_u32(child, "rowspan").unwrap_or(1).max(1) as usize,
            });
        }
        TableRow { cells }
    }
}
