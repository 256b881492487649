//! Content-type schema model for mattersync.
//!
//! Defines the schema types every other mattersync crate depends on:
//! - [`FieldDefinition`]: a named, typed, optionally repeatable field
//! - [`ContentType`]: a named, ordered set of fields a document may carry
//! - [`FieldGroup`]: a reusable sub-schema that block instances refer to
//! - [`ContentTypeRegistry`]: resolves the content type of a metadata tree
//! - [`SchemaIndex`]: a borrowed, read-only query view over one schema level
//!
//! Schemas are advisory. Lookups never fail hard: an undeclared field is
//! reported as absent so callers can fall back to generic handling for content
//! types that are still being edited.

mod index;
mod registry;
mod schema;
mod value;

pub use index::{FieldClass, SchemaIndex};
pub use registry::{CONTENT_TYPE_KEY, ContentTypeRegistry, DEFAULT_CONTENT_TYPE};
pub use schema::{ContentType, FieldDefinition, FieldGroup, FieldKind};
pub use value::is_truthy;

/// The front matter of one document: field name to JSON value.
pub type MetadataTree = serde_json::Map<String, serde_json::Value>;
