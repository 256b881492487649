//! Error types for the engine.

use mattersync_document::DocumentError;
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while handling a panel or host event.
///
/// None of these escape the engine's message handlers: they are logged and
/// the event becomes a no-op.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The edit's address could not be resolved in the metadata tree.
    #[error("path error: {0}")]
    Path(#[from] PathError),

    /// Reading or writing the active document failed.
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// The panel side of the transport is gone.
    #[error("panel transport closed")]
    TransportClosed,

    /// Slug computation failed.
    #[error("slug error: {0}")]
    Slug(String),

    /// Folder listing failed.
    #[error("folder listing error: {0}")]
    Folders(String),
}

/// Why an edit address could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// A parent on the path holds a scalar or list instead of an object.
    #[error("`{segment}` holds {found}, not an object")]
    NotAContainer {
        segment: String,
        found: &'static str,
    },

    /// A block field holds something other than a list of instances.
    #[error("block field `{field}` holds {found}, not a list")]
    NotAList { field: String, found: &'static str },

    /// The selected block instance does not exist.
    #[error("block index {index} is out of range for `{field}` ({len} instances)")]
    BlockIndexOutOfRange {
        field: String,
        index: usize,
        len: usize,
    },
}

/// Errors loading or validating [`crate::Settings`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid settings: {0}")]
    Invalid(String),
}
