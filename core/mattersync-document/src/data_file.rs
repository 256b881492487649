//! Data files: JSON or YAML lists of entries that `dataFile` fields pick from.

use crate::error::{DocumentError, DocumentResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Prefix a data file path may use to anchor itself at the workspace root.
pub const WORKSPACE_PLACEHOLDER: &str = "[[workspace]]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataFileKind {
    Json,
    Yaml,
}

/// A registered data file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFile {
    pub id: String,
    pub title: String,
    /// Workspace-relative path.
    pub file: String,
    pub file_type: DataFileKind,
    /// Entry key shown as the entry's label.
    pub label_field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// The file holds one object rather than a list.
    #[serde(default)]
    pub single_entry: bool,
}

/// Looks up data files registered for a workspace.
#[derive(Debug, Clone)]
pub struct DataFileCatalog {
    root: PathBuf,
    files: Vec<DataFile>,
}

impl DataFileCatalog {
    pub fn new(root: impl Into<PathBuf>, files: Vec<DataFile>) -> Self {
        Self {
            root: root.into(),
            files,
        }
    }

    pub fn get(&self, id: &str) -> Option<&DataFile> {
        self.files.iter().find(|f| f.id == id)
    }

    /// Absolute location of a data file.
    pub fn path_of(&self, file: &DataFile) -> PathBuf {
        let relative = file
            .file
            .strip_prefix(WORKSPACE_PLACEHOLDER)
            .unwrap_or(file.file.as_str())
            .trim_start_matches(['/', '\\']);
        self.root.join(Path::new(relative))
    }

    /// Reads the entries of a data file. Unknown ids yield `None`.
    pub fn entries(&self, id: &str) -> DocumentResult<Option<Vec<Value>>> {
        let Some(file) = self.get(id) else {
            debug!("No data file registered as {}", id);
            return Ok(None);
        };

        let path = self.path_of(file);
        let text = std::fs::read_to_string(&path)?;
        let invalid = |message: String| DocumentError::InvalidDataFile {
            id: id.to_string(),
            message,
        };

        let value: Value = match file.file_type {
            DataFileKind::Json => serde_json::from_str(&text).map_err(|e| invalid(e.to_string()))?,
            DataFileKind::Yaml => serde_yaml::from_str(&text).map_err(|e| invalid(e.to_string()))?,
        };

        match value {
            Value::Array(items) => Ok(Some(items)),
            obj @ Value::Object(_) if file.single_entry => Ok(Some(vec![obj])),
            _ => Err(invalid(format!(
                "expected a list of entries in {}",
                path.display()
            ))),
        }
    }
}
