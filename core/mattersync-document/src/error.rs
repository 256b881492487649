//! Error types for the document layer.

use crate::front_matter::FrontMatterSyntax;
use thiserror::Error;

/// Result type for document operations.
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Errors that can occur reading or writing documents.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The front matter block could not be parsed.
    #[error("front matter parse error ({syntax}): {message}")]
    Parse {
        syntax: FrontMatterSyntax,
        message: String,
    },

    /// The metadata tree could not be written back in the document's syntax.
    #[error("front matter render error ({syntax}): {message}")]
    Render {
        syntax: FrontMatterSyntax,
        message: String,
    },

    /// IO error (file system).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a content file.
    #[error("unsupported document: {0}")]
    Unsupported(String),

    /// A data file's content has the wrong shape.
    #[error("invalid data file {id}: {message}")]
    InvalidDataFile { id: String, message: String },
}
