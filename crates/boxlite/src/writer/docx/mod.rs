//! DOCX writer implementation using docx-rs
//!
//! This module is organized into several components:
//! - Writer: walks the document model and assembles the package
//! - Styles: document style management
//! - Numbering: list numbering management
//! - Image: embedded media processing

mod image;
mod numbering;
mod styles;
mod writer;

pub use writer::DocxWriter;
