//! # Boxlite
//!
//! Converts a Box note (a JSON-encoded tree of typed content nodes) into
//! HTML, DOCX, or plain text. Parsing builds the document model once; the
//! selected writer walks it and produces the final output. Remote assets
//! referenced by the note are fetched lazily through an authenticated
//! [`assets::ConversionContext`] and cached per run.

pub mod assets;
pub mod common;
pub mod diagnostics;
mod error;
pub mod ir;
pub mod parser;
pub mod writer;

use std::path::PathBuf;

use ecow::EcoString;
use log::warn;

pub use crate::common::Format;
pub use crate::error::*;
pub use crate::parser::parse;

use crate::assets::ConversionContext;
use crate::diagnostics::render_warnings;
use crate::parser::BoxNoteParser;
use crate::writer::WriterFactory;

/// The result type for boxlite.
pub type Result<T, Err = Error> = std::result::Result<T, Err>;

/// Features for the conversion.
#[derive(Debug, Clone)]
pub struct BoxliteFeat {
    /// Access token for fetching remote assets. Absence is valid for
    /// asset-free documents.
    pub token: Option<String>,
    /// Staging directory for fetched assets.
    pub work_dir: PathBuf,
    /// Inline asset bytes into the output instead of staging files.
    pub embed_assets: bool,
}

impl Default for BoxliteFeat {
    fn default() -> Self {
        Self {
            token: None,
            work_dir: PathBuf::from("./output"),
            embed_assets: true,
        }
    }
}

/// A parsed box note, ready for rendering into any target format.
#[derive(Clone)]
pub struct BoxNoteDocument {
    pub doc: ir::Document,
}

impl BoxNoteDocument {
    pub fn new(doc: ir::Document) -> Self {
        Self { doc }
    }

    /// Render the document to an HTML fragment.
    pub fn to_html_string(&self, ctx: &mut ConversionContext) -> Result<EcoString> {
        let mut output = EcoString::new();
        let mut writer = WriterFactory::create(Format::Html);
        writer.write_eco(&self.doc, ctx, &mut output)?;
        Ok(output)
    }

    /// Render the document to a plain-text transcript. Never touches the
    /// asset resolver.
    pub fn to_text_string(&self) -> Result<EcoString> {
        let mut ctx = ConversionContext::new(&BoxliteFeat::default());
        let mut output = EcoString::new();
        let mut writer = WriterFactory::create(Format::Text);
        writer.write_eco(&self.doc, &mut ctx, &mut output)?;
        Ok(output)
    }

    /// Render the document to a DOCX package.
    pub fn to_docx(&self, ctx: &mut ConversionContext) -> Result<Vec<u8>> {
        let mut writer = WriterFactory::create(Format::Docx);
        Ok(writer.write_vec(&self.doc, ctx)?)
    }
}

/// Task builder for converting a box note.
pub struct Boxlite {
    /// The raw box-note JSON to convert.
    source: String,
    /// Features for the conversion.
    feat: BoxliteFeat,
    /// The format to use for the conversion.
    format: Format,
}

impl Boxlite {
    /// Creates a new Boxlite instance from raw box-note JSON.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            feat: BoxliteFeat::default(),
            format: Format::Html,
        }
    }

    /// Sets conversion features
    pub fn with_feature(mut self, feat: BoxliteFeat) -> Self {
        self.feat = feat;
        self
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Convert the content to a string output (HTML or plain text).
    pub fn convert(self) -> Result<EcoString> {
        let mut ctx = ConversionContext::new(&self.feat);
        self.convert_with(&mut ctx)
    }

    /// Convert with a caller-supplied context, so the caller can inspect
    /// the per-run warnings afterwards (or inject its own asset fetcher).
    pub fn convert_with(self, ctx: &mut ConversionContext) -> Result<EcoString> {
        if self.format == Format::Docx {
            return Err(Error::Task(
                "DOCX output is binary; use to_docx".into(),
            ));
        }

        let document = self.convert_doc(ctx)?;
        let mut output = EcoString::new();
        let mut writer = WriterFactory::create(self.format);
        writer.write_eco(&document.doc, ctx, &mut output)?;
        Self::report_warnings(ctx);
        Ok(output)
    }

    /// Convert the content to a DOCX package.
    pub fn to_docx(self) -> Result<Vec<u8>> {
        let mut ctx = ConversionContext::new(&self.feat);
        self.to_docx_with(&mut ctx)
    }

    /// As [`Boxlite::to_docx`], with a caller-supplied context.
    pub fn to_docx_with(self, ctx: &mut ConversionContext) -> Result<Vec<u8>> {
        let document = self.convert_doc(ctx)?;
        let mut writer = WriterFactory::create(Format::Docx);
        let bytes = writer.write_vec(&document.doc, ctx)?;
        Self::report_warnings(ctx);
        Ok(bytes)
    }

    /// Parse the source into a document, recording parse-side warnings in
    /// the run's collector.
    pub fn convert_doc(&self, ctx: &mut ConversionContext) -> Result<BoxNoteDocument> {
        let parser = BoxNoteParser::new(ctx.warnings().clone());
        let doc = parser.parse(&self.source)?;
        Ok(BoxNoteDocument::new(doc))
    }

    fn report_warnings(ctx: &ConversionContext) {
        let warnings = ctx.warnings().snapshot();
        if let Some(rendered) = render_warnings(warnings.iter()) {
            warn!("conversion completed with warnings:\n{rendered}");
        }
    }
}

#[cfg(test)]
mod tests;
