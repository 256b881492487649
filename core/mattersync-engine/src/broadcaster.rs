//! Builds the panel's view of a document's metadata and emits it.
//!
//! A snapshot is a copy of the tree with comma-separated fields split into
//! lists and the file path and article details attached. Building one never
//! mutates the tree it was built from.
//!
//! Every emit reaches the transport, even when the payload equals the last
//! one. The last emitted payload is kept until the active document changes.

use crate::error::EngineResult;
use crate::protocol::{PanelMessage, Snapshot};
use crate::transport::PanelTransport;
use mattersync_document::ArticleDetails;
use mattersync_model::MetadataTree;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Snapshot key holding the active document's path.
pub const FILE_PATH_KEY: &str = "filePath";

/// Snapshot key holding the document-level details.
pub const ARTICLE_DETAILS_KEY: &str = "articleDetails";

pub struct MetadataBroadcaster {
    comma_separated: Vec<String>,
    transport: Arc<dyn PanelTransport>,
    last_snapshot: Option<Snapshot>,
}

impl MetadataBroadcaster {
    pub fn new(transport: Arc<dyn PanelTransport>) -> Self {
        Self {
            comma_separated: Vec::new(),
            transport,
            last_snapshot: None,
        }
    }

    /// Fields whose string values are shown as lists.
    pub fn with_comma_separated(mut self, fields: Vec<String>) -> Self {
        self.comma_separated = fields;
        self
    }

    pub fn transport(&self) -> &Arc<dyn PanelTransport> {
        &self.transport
    }

    /// Builds the snapshot for `tree`.
    pub fn build_snapshot(
        &self,
        tree: &MetadataTree,
        file_path: Option<&Path>,
        details: Option<ArticleDetails>,
    ) -> Snapshot {
        let mut map = tree.clone();

        for key in &self.comma_separated {
            if let Some(Value::String(joined)) = map.get(key)
                && !joined.is_empty()
            {
                let parts = split_comma_separated(joined);
                map.insert(key.clone(), Value::Array(parts));
            }
        }

        if !map.is_empty()
            && let Some(path) = file_path
        {
            map.insert(
                FILE_PATH_KEY.to_string(),
                Value::String(path.display().to_string()),
            );
        }

        if let Some(details) = details {
            match serde_json::to_value(&details) {
                Ok(value) => {
                    map.insert(ARTICLE_DETAILS_KEY.to_string(), value);
                }
                Err(e) => warn!("Dropping article details: {}", e),
            }
        }

        Snapshot::new(map)
    }

    /// Sends `snapshot` to the panel; `None` tells the panel no document is
    /// active.
    pub fn emit(&mut self, snapshot: Option<Snapshot>) -> EngineResult<()> {
        debug!(
            "Broadcasting metadata ({} keys)",
            snapshot.as_ref().map_or(0, |s| s.as_map().len())
        );
        let result = self.transport.send(PanelMessage::Metadata(snapshot.clone()));
        self.last_snapshot = snapshot;
        result
    }

    /// Forgets the last emitted snapshot.
    pub fn reset(&mut self) {
        self.last_snapshot = None;
    }

    pub fn last_snapshot(&self) -> Option<&Snapshot> {
        self.last_snapshot.as_ref()
    }
}

fn split_comma_separated(joined: &str) -> Vec<Value> {
    joined
        .split(',')
        .map(|part| Value::String(part.trim().to_string()))
        .collect()
}
