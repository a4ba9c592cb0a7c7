//! Common types for the conversion system.

use ecow::EcoString;

use crate::assets::ConversionContext;
use crate::error::RenderError;
use crate::ir::Document;

/// Valid formats for the conversion.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    #[default]
    Html,
    Text,
    Docx,
}

/// A renderer for one output format.
pub trait FormatWriter {
    /// Render the document into a string output.
    fn write_eco(
        &mut self,
        document: &Document,
        ctx: &mut ConversionContext,
        output: &mut EcoString,
    ) -> Result<(), RenderError>;

    /// Render the document into a byte output.
    fn write_vec(
        &mut self,
        document: &Document,
        ctx: &mut ConversionContext,
    ) -> Result<Vec<u8>, RenderError>;
}
