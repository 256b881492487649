//! Metadata resolution and panel synchronization for mattersync.
//!
//! Given a content-type schema and an edit naming a field, possibly deep
//! inside nested objects or block instances, the engine:
//! 1. locates or creates the object the field lives in ([`PathResolver`]),
//! 2. decides the stored value from the field's type ([`FieldCoercer`]),
//! 3. hands the tree back to the document host for persistence,
//! 4. builds and emits the panel's snapshot ([`MetadataBroadcaster`]),
//!    inferring a slug when the document has none ([`SlugInferencer`]).
//!
//! [`MetadataEngine`] drives these steps for the panel requests in
//! [`protocol`] and for editor events (focus, close, panel visibility).
//! Nothing it handles fails outward: errors are logged through `tracing` and
//! the event becomes a no-op.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use mattersync_engine::{ChannelTransport, EditRequest, MetadataEngine, Settings};
//! use mattersync_engine::host::mock::MemoryHost;
//!
//! let (transport, _rx) = ChannelTransport::new();
//! let mut engine = MetadataEngine::new(Settings::default(), MemoryHost::new(), Arc::new(transport));
//! engine.update_metadata(EditRequest::new("title", "Hello".into()));
//! ```

pub mod broadcaster;
pub mod coercer;
pub mod config;
pub mod date;
pub mod engine;
pub mod error;
pub mod host;
pub mod placeholder;
pub mod protocol;
pub mod resolver;
pub mod slug;
pub mod state;
pub mod transport;

pub use broadcaster::{ARTICLE_DETAILS_KEY, FILE_PATH_KEY, MetadataBroadcaster};
pub use coercer::{Coercion, FieldCoercer};
pub use config::{ContentFolder, Settings, SlugSettings};
pub use engine::{EditOutcome, MetadataEngine};
pub use error::{ConfigError, EngineError, EngineResult, PathError};
pub use host::{ActiveDocument, DocumentHost, FolderInfoProvider};
pub use placeholder::{Placeholder, PlaceholderContext};
pub use protocol::{
    BlockFieldData, EditRequest, FileEntry, FolderInfo, PanelMessage, PanelRequest,
    PlaceholderRequest, PlaceholderUpdate, Snapshot,
};
pub use resolver::{FIELD_GROUP_KEY, PathResolver, Resolved};
pub use slug::{SLUG_KEY, SlugGenerator, SlugInferencer, SlugSignals, TitleSlugGenerator, slugify};
pub use state::DocumentState;
pub use transport::{ChannelTransport, PanelTransport};
