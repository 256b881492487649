//! Active document tracking.

use std::path::{Path, PathBuf};

/// Per-panel view of the active document.
///
/// `NoDocument → HasDocument { dirty: false }` on open or focus; an edit
/// marks the document dirty until its snapshot has been broadcast; closing or
/// switching to an unsupported file returns to `NoDocument`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DocumentState {
    #[default]
    NoDocument,
    HasDocument { path: PathBuf, dirty: bool },
}

impl DocumentState {
    /// Records that `path` is the active document. Returns true when this
    /// is a different document than before.
    pub fn open(&mut self, path: &Path) -> bool {
        match self {
            Self::HasDocument { path: current, .. } if current.as_path() == path => false,
            _ => {
                *self = Self::HasDocument {
                    path: path.to_path_buf(),
                    dirty: false,
                };
                true
            }
        }
    }

    pub fn close(&mut self) {
        *self = Self::NoDocument;
    }

    pub fn mark_dirty(&mut self) {
        if let Self::HasDocument { dirty, .. } = self {
            *dirty = true;
        }
    }

    pub fn mark_clean(&mut self) {
        if let Self::HasDocument { dirty, .. } = self {
            *dirty = false;
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::HasDocument { .. })
    }

    pub fn is_dirty(&self) -> bool {
        matches!(self, Self::HasDocument { dirty: true, .. })
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::HasDocument { path, .. } => Some(path),
            Self::NoDocument => None,
        }
    }
}
