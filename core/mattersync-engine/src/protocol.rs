//! Messages exchanged with the metadata panel.
//!
//! Inbound requests arrive as `{"command": ..., "data": ...}` and outbound
//! messages leave as `{"command": ..., "payload": ...}`. The engine does not
//! wait for the panel to acknowledge anything.

use mattersync_model::MetadataTree;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Number of most recently modified files listed per content folder.
pub const FOLDER_FILE_LIMIT: usize = 10;

/// A request sent by the panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", content = "data", rename_all = "camelCase")]
pub enum PanelRequest {
    /// Read-only broadcast of the current metadata plus a folder listing.
    GetData,

    /// Edit one field and broadcast the result.
    UpdateMetadata(EditRequest),

    /// Expand placeholders in a field's default value.
    UpdatePlaceholder(PlaceholderRequest),

    /// Read the entries of a data file, by id.
    GetDataEntries(String),
}

/// A single field edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditRequest {
    pub field: String,
    #[serde(default)]
    pub value: Value,
    /// Nested object containers to descend through, outermost first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_data: Option<BlockFieldData>,
}

impl EditRequest {
    /// Creates an edit of a top-level field.
    pub fn new(field: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.into(),
            value,
            parents: Vec::new(),
            block_data: None,
        }
    }

    /// Sets the parent chain.
    pub fn with_parents(mut self, parents: &[&str]) -> Self {
        self.parents = parents.iter().map(|p| p.to_string()).collect();
        self
    }

    /// Addresses the edit into a block field.
    pub fn with_block(mut self, block: BlockFieldData) -> Self {
        self.block_data = Some(block);
        self
    }
}

/// Addresses a block instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockFieldData {
    /// Field chain leading to the block field, outermost first.
    pub parent_fields: Vec<String>,
    /// Field group of a newly appended instance.
    pub block_type: String,
    /// Existing instance to edit; `None` appends a new one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_index: Option<usize>,
}

impl BlockFieldData {
    /// Appends a new `block_type` instance under the given chain.
    pub fn new(parent_fields: &[&str], block_type: impl Into<String>) -> Self {
        Self {
            parent_fields: parent_fields.iter().map(|p| p.to_string()).collect(),
            block_type: block_type.into(),
            selected_index: None,
        }
    }

    /// Targets the existing instance at `index` instead.
    pub fn selected(mut self, index: usize) -> Self {
        self.selected_index = Some(index);
        self
    }
}

/// Placeholder expansion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceholderRequest {
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub title: String,
}

/// A message sent to the panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", content = "payload", rename_all = "camelCase")]
pub enum PanelMessage {
    /// The current metadata; `None` means no document is active.
    Metadata(Option<Snapshot>),

    /// Content folders and their most recent files.
    FolderInfo(Vec<FolderInfo>),

    /// Result of a placeholder expansion.
    UpdatePlaceholder(PlaceholderUpdate),

    /// Entries of a data file.
    DataFileEntries(Vec<Value>),
}

/// Outward-facing view of a document's metadata.
///
/// Serializes as the bare map. Built fresh for every broadcast and never
/// written back to the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(MetadataTree);

impl Snapshot {
    pub fn new(map: MetadataTree) -> Self {
        Self(map)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &MetadataTree {
        &self.0
    }

    pub(crate) fn as_map_mut(&mut self) -> &mut MetadataTree {
        &mut self.0
    }

    pub fn into_inner(self) -> MetadataTree {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Expanded placeholder value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderUpdate {
    pub field: String,
    pub value: String,
}

/// A content folder and its most recently modified files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderInfo {
    pub title: String,
    /// Total number of content files in the folder.
    pub files: usize,
    pub last_modified: Vec<FileEntry>,
}

/// A content file in a folder listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub file_path: String,
    pub file_name: String,
    /// Milliseconds since the Unix epoch.
    pub mtime: u64,
}
