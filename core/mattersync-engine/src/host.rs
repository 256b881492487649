//! Collaborators the engine asks about the editor side.

use crate::error::EngineResult;
use crate::protocol::FolderInfo;
use mattersync_document::{ArticleDetails, DocumentResult, ParsedDocument};
use std::path::{Path, PathBuf};

/// The document currently focused in the editor.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveDocument {
    pub path: PathBuf,
    pub document: ParsedDocument,
}

impl ActiveDocument {
    pub fn new(path: impl Into<PathBuf>, document: ParsedDocument) -> Self {
        Self {
            path: path.into(),
            document,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Access to the active document and its persistence.
///
/// The engine asks for the active document again for every event, so an
/// edit never lands in a document the user has already switched away from.
pub trait DocumentHost {
    /// The focused supported document, or `None` when nothing is open.
    fn active_document(&self) -> DocumentResult<Option<ActiveDocument>>;

    /// Persists the document's tree and body.
    fn write(&mut self, document: &ActiveDocument) -> DocumentResult<()>;

    fn workspace_root(&self) -> Option<PathBuf>;

    /// Document-level details shown alongside the metadata.
    fn article_details(&self, document: &ActiveDocument) -> DocumentResult<Option<ArticleDetails>> {
        Ok(Some(ArticleDetails::from_body(&document.document.body)))
    }
}

/// Lists content folders and their most recently modified files.
pub trait FolderInfoProvider {
    fn folder_info(&self, limit: usize) -> EngineResult<Vec<FolderInfo>>;
}

/// In-memory collaborators for testing.
pub mod mock {
    use super::*;

    /// Holds one document in memory and counts writes.
    #[derive(Debug, Clone, Default)]
    pub struct MemoryHost {
        pub active: Option<ActiveDocument>,
        pub root: Option<PathBuf>,
        pub writes: usize,
        pub fail_details: bool,
        pub fail_writes: bool,
    }

    impl MemoryHost {
        pub fn new() -> Self {
            Self::default()
        }

        /// Opens `document` at `path` with the workspace root at `/workspace`.
        pub fn with_document(path: impl Into<PathBuf>, document: ParsedDocument) -> Self {
            Self {
                active: Some(ActiveDocument::new(path, document)),
                root: Some(PathBuf::from("/workspace")),
                ..Default::default()
            }
        }

        pub fn tree(&self) -> Option<&mattersync_model::MetadataTree> {
            self.active.as_ref().map(|a| &a.document.data)
        }
    }

    impl DocumentHost for MemoryHost {
        fn active_document(&self) -> DocumentResult<Option<ActiveDocument>> {
            Ok(self.active.clone())
        }

        fn write(&mut self, document: &ActiveDocument) -> DocumentResult<()> {
            if self.fail_writes {
                return Err(mattersync_document::DocumentError::Io(std::io::Error::other(
                    "read-only",
                )));
            }
            self.writes += 1;
            self.active = Some(document.clone());
            Ok(())
        }

        fn workspace_root(&self) -> Option<PathBuf> {
            self.root.clone()
        }

        fn article_details(
            &self,
            document: &ActiveDocument,
        ) -> DocumentResult<Option<ArticleDetails>> {
            if self.fail_details {
                return Err(mattersync_document::DocumentError::Unsupported(
                    document.path.display().to_string(),
                ));
            }
            Ok(Some(ArticleDetails::from_body(&document.document.body)))
        }
    }

    /// Returns a fixed folder listing.
    #[derive(Debug, Clone, Default)]
    pub struct StaticFolders(pub Vec<FolderInfo>);

    impl FolderInfoProvider for StaticFolders {
        fn folder_info(&self, limit: usize) -> EngineResult<Vec<FolderInfo>> {
            Ok(self
                .0
                .iter()
                .cloned()
                .map(|mut folder| {
                    folder.last_modified.truncate(limit);
                    folder
                })
                .collect())
        }
    }
}
