use ecow::EcoString;
use thiserror::Error;

/// A document-level failure. No output is produced when parsing fails.
#[derive(Debug, Clone, Error)]
pub enum ParseError {
    /// The input is not a well-formed box note.
    #[error("malformed box note: {0}")]
    Malformed(String),
}

/// A per-asset failure. These never abort a conversion: the renderer
/// substitutes a placeholder and records a warning instead.
#[derive(Debug, Clone, Error)]
pub enum AssetError {
    /// The reference requires authentication but no token was supplied.
    #[error("asset {0} requires an access token")]
    Unauthorized(EcoString),
    /// The remote identifier does not resolve.
    #[error("asset {0} was not found")]
    NotFound(EcoString),
    /// Transport failure while fetching the asset.
    #[error("failed to fetch asset {id}: {message}")]
    Network { id: EcoString, message: String },
}

/// A failure while producing output for one target format.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The document contains a shape the target format cannot express.
    #[error("unsupported structure: {0}")]
    UnsupportedStructure(String),
    /// The markup builder was driven into an invalid state.
    #[error("markup writer misuse: {0}")]
    Markup(String),
    /// Assembling the output package failed.
    #[error("failed to assemble document package: {0}")]
    Package(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Umbrella error for the conversion pipeline.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Render(#[from] RenderError),
    /// A task-level misuse of the API, e.g. requesting DOCX output
    /// through the string conversion entry point.
    #[error("{0}")]
    Task(String),
}
