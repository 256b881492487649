use crate::index::SchemaIndex;
use crate::schema::{ContentType, FieldDefinition, FieldGroup, FieldKind};
use crate::MetadataTree;

/// Front matter key naming a document's content type.
pub const CONTENT_TYPE_KEY: &str = "type";

/// Content type used when a document does not name one.
pub const DEFAULT_CONTENT_TYPE: &str = "default";

/// The workspace's content types and field groups.
///
/// Externally owned configuration: build a fresh registry whenever the
/// settings change rather than caching schema lookups across edits.
#[derive(Debug, Clone, Default)]
pub struct ContentTypeRegistry {
    content_types: Vec<ContentType>,
    field_groups: Vec<FieldGroup>,
}

impl ContentTypeRegistry {
    /// Creates a registry holding exactly the given definitions.
    pub fn new(content_types: Vec<ContentType>, field_groups: Vec<FieldGroup>) -> Self {
        Self {
            content_types,
            field_groups,
        }
    }

    /// Creates a registry, adding the built-in `default` content type unless
    /// one of that name is already declared.
    pub fn with_builtin_default(
        mut content_types: Vec<ContentType>,
        field_groups: Vec<FieldGroup>,
    ) -> Self {
        if !content_types.iter().any(|ct| ct.name == DEFAULT_CONTENT_TYPE) {
            content_types.push(Self::builtin_default());
        }
        Self::new(content_types, field_groups)
    }

    /// The content type every workspace starts with.
    pub fn builtin_default() -> ContentType {
        ContentType::new(
            DEFAULT_CONTENT_TYPE,
            vec![
                FieldDefinition::string("title"),
                FieldDefinition::string("description"),
                FieldDefinition::datetime("date"),
                FieldDefinition::datetime("lastmod"),
                FieldDefinition::image("preview"),
                FieldDefinition::new("draft", FieldKind::Draft),
                FieldDefinition::new("tags", FieldKind::Tags),
                FieldDefinition::new("categories", FieldKind::Categories),
            ],
        )
    }

    pub fn content_types(&self) -> &[ContentType] {
        &self.content_types
    }

    pub fn field_groups(&self) -> &[FieldGroup] {
        &self.field_groups
    }

    pub fn is_empty(&self) -> bool {
        self.content_types.is_empty()
    }

    /// Looks up a content type by name.
    pub fn get(&self, name: &str) -> Option<&ContentType> {
        self.content_types.iter().find(|ct| ct.name == name)
    }

    /// Resolves the content type of a document from its `type` key, falling
    /// back to the `default` content type.
    pub fn resolve(&self, tree: &MetadataTree) -> Option<&ContentType> {
        tree.get(CONTENT_TYPE_KEY)
            .and_then(|v| v.as_str())
            .and_then(|name| self.get(name))
            .or_else(|| self.get(DEFAULT_CONTENT_TYPE))
    }

    /// Builds the top-level query view for a content type.
    pub fn index<'a>(&'a self, content_type: &'a ContentType) -> SchemaIndex<'a> {
        SchemaIndex::new(&content_type.fields, &self.field_groups)
    }
}
