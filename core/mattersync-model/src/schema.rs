use serde::{Deserialize, Serialize};
use std::fmt;

/// A content type: the schema of the front matter a document may carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentType {
    /// Unique within the workspace.
    pub name: String,
    pub fields: Vec<FieldDefinition>,
    /// Documents of this type live in their own folder (`<slug>/index.md`).
    #[serde(default)]
    pub page_bundle: bool,
}

impl ContentType {
    /// Creates a content type from its fields.
    pub fn new(name: impl Into<String>, fields: Vec<FieldDefinition>) -> Self {
        Self {
            name: name.into(),
            fields,
            page_bundle: false,
        }
    }
}

/// A reusable sub-schema. Block instances name the group they follow in
/// their `fieldGroup` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldGroup {
    pub id: String,
    /// Field whose value labels an instance in the panel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_field: Option<String>,
    pub fields: Vec<FieldDefinition>,
}

impl FieldGroup {
    pub fn new(id: impl Into<String>, fields: Vec<FieldDefinition>) -> Self {
        Self {
            id: id.into(),
            label_field: None,
            fields,
        }
    }
}

/// One field of a content type.
///
/// `fields` makes this a recursive tree: a `fields` kind nests a plain
/// object, a `block` kind nests the sub-schema of each repeated instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    /// The value is a list rather than a scalar.
    #[serde(default)]
    pub multiple: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldDefinition>,
    /// Field groups a block field accepts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub field_group: Vec<String>,
}

impl FieldDefinition {
    /// Creates a scalar, optional field of the given kind.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            title: None,
            kind,
            multiple: false,
            required: false,
            default: None,
            fields: Vec::new(),
            field_group: Vec::new(),
        }
    }

    /// Shorthand for a string field.
    pub fn string(name: &str) -> Self {
        Self::new(name, FieldKind::String)
    }

    /// Shorthand for a datetime field.
    pub fn datetime(name: &str) -> Self {
        Self::new(name, FieldKind::DateTime)
    }

    /// Shorthand for an image field.
    pub fn image(name: &str) -> Self {
        Self::new(name, FieldKind::Image)
    }

    /// Shorthand for a file field.
    pub fn file(name: &str) -> Self {
        Self::new(name, FieldKind::File)
    }

    /// Shorthand for a slug field.
    pub fn slug(name: &str) -> Self {
        Self::new(name, FieldKind::Slug)
    }

    /// Shorthand for a nested object field.
    pub fn object(name: &str, fields: Vec<FieldDefinition>) -> Self {
        Self::new(name, FieldKind::Fields).with_fields(fields)
    }

    /// Shorthand for a block field with its own instance sub-schema.
    pub fn block(name: &str, fields: Vec<FieldDefinition>) -> Self {
        Self::new(name, FieldKind::Block).with_fields(fields)
    }

    /// Marks the field as holding a list.
    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    /// Marks the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the nested sub-schema.
    pub fn with_fields(mut self, fields: Vec<FieldDefinition>) -> Self {
        self.fields = fields;
        self
    }

    /// Sets the field groups a block field accepts.
    pub fn with_field_groups(mut self, groups: &[&str]) -> Self {
        self.field_group = groups.iter().map(|g| g.to_string()).collect();
        self
    }

    /// Display title, falling back to the field name.
    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(self.name.as_str())
    }
}

/// The kind of a field.
///
/// Serialized as the plain string used in content-type definitions. Kinds
/// the engine does not special-case are kept verbatim in [`FieldKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    /// Also accepted as `"date"`.
    DateTime,
    Image,
    File,
    Slug,
    Block,
    /// A nested plain object with its own sub-fields.
    Fields,
    Choice,
    Tags,
    Categories,
    Taxonomy,
    Draft,
    List,
    DataFile,
    Json,
    Other(String),
}

impl FieldKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::DateTime => "datetime",
            Self::Image => "image",
            Self::File => "file",
            Self::Slug => "slug",
            Self::Block => "block",
            Self::Fields => "fields",
            Self::Choice => "choice",
            Self::Tags => "tags",
            Self::Categories => "categories",
            Self::Taxonomy => "taxonomy",
            Self::Draft => "draft",
            Self::List => "list",
            Self::DataFile => "dataFile",
            Self::Json => "json",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for FieldKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "string" => Self::String,
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            "datetime" | "date" => Self::DateTime,
            "image" => Self::Image,
            "file" => Self::File,
            "slug" => Self::Slug,
            "block" => Self::Block,
            "fields" => Self::Fields,
            "choice" => Self::Choice,
            "tags" => Self::Tags,
            "categories" => Self::Categories,
            "taxonomy" => Self::Taxonomy,
            "draft" => Self::Draft,
            "list" => Self::List,
            "dataFile" => Self::DataFile,
            "json" => Self::Json,
            _ => Self::Other(s),
        }
    }
}

impl From<FieldKind> for String {
    fn from(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
