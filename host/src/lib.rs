//! File-backed host for the mattersync engine.
//!
//! Plays the editor's part for the engine: it owns the active document
//! (a file on disk), lists content folders, and turns JSON lines into engine
//! calls. Panel requests use the engine's wire format; editor events use the
//! same envelope:
//!
//! ```text
//! {"command": "focus", "data": "content/post.md"}
//! {"command": "close"}
//! {"command": "panelVisible", "data": true}
//! {"command": "updateMetadata", "data": {"field": "title", "value": "Hi"}}
//! ```

use mattersync_document::{DocumentResult, ParsedDocument, is_supported};
use mattersync_engine::{
    ActiveDocument, ContentFolder, DocumentHost, EngineError, EngineResult, FileEntry, FolderInfo,
    FolderInfoProvider, MetadataEngine, PanelRequest,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tracing::{debug, info};

/// The workspace on disk and the file the "editor" has open.
#[derive(Debug, Clone)]
pub struct FsWorkspace {
    root: PathBuf,
    active: Option<PathBuf>,
}

impl FsWorkspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            active: None,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Focuses `path`, relative to the workspace root unless absolute.
    pub fn open(&mut self, path: &Path) {
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };
        info!("Focused {}", path.display());
        self.active = Some(path);
    }

    pub fn close(&mut self) {
        self.active = None;
    }

    pub fn active_path(&self) -> Option<&Path> {
        self.active.as_deref()
    }
}

impl DocumentHost for FsWorkspace {
    fn active_document(&self) -> DocumentResult<Option<ActiveDocument>> {
        let Some(path) = &self.active else {
            return Ok(None);
        };
        if !is_supported(path) {
            debug!("{} is not a content file", path.display());
            return Ok(None);
        }
        let document = ParsedDocument::load(path)?;
        Ok(Some(ActiveDocument::new(path.clone(), document)))
    }

    fn write(&mut self, document: &ActiveDocument) -> DocumentResult<()> {
        document.document.save(&document.path)
    }

    fn workspace_root(&self) -> Option<PathBuf> {
        Some(self.root.clone())
    }
}

/// Lists the configured content folders from disk.
#[derive(Debug, Clone)]
pub struct FsFolderInfo {
    root: PathBuf,
    folders: Vec<ContentFolder>,
}

impl FsFolderInfo {
    pub fn new(root: impl Into<PathBuf>, folders: Vec<ContentFolder>) -> Self {
        Self {
            root: root.into(),
            folders,
        }
    }

    fn folder_path(&self, folder: &ContentFolder) -> PathBuf {
        if folder.path.is_absolute() {
            folder.path.clone()
        } else {
            self.root.join(&folder.path)
        }
    }
}

impl FolderInfoProvider for FsFolderInfo {
    fn folder_info(&self, limit: usize) -> EngineResult<Vec<FolderInfo>> {
        let mut info = Vec::with_capacity(self.folders.len());
        for folder in &self.folders {
            let path = self.folder_path(folder);
            if !path.is_dir() {
                debug!("Skipping missing content folder {}", path.display());
                continue;
            }

            let mut files = Vec::new();
            collect_content_files(&path, &mut files)
                .map_err(|e| EngineError::Folders(format!("{}: {}", path.display(), e)))?;
            files.sort_by(|a, b| b.mtime.cmp(&a.mtime).then_with(|| a.file_path.cmp(&b.file_path)));

            let total = files.len();
            files.truncate(limit);
            info.push(FolderInfo {
                title: folder.title.clone(),
                files: total,
                last_modified: files,
            });
        }
        Ok(info)
    }
}

fn collect_content_files(dir: &Path, out: &mut Vec<FileEntry>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let meta = entry.metadata()?;
        if meta.is_dir() {
            collect_content_files(&path, out)?;
        } else if is_supported(&path) {
            let mtime = meta
                .modified()?
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0);
            out.push(FileEntry {
                file_name: entry.file_name().to_string_lossy().into_owned(),
                file_path: path.display().to_string(),
                mtime,
            });
        }
    }
    Ok(())
}

/// Editor-side events the host reports to the engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "command", content = "data", rename_all = "camelCase")]
pub enum EditorEvent {
    Focus(PathBuf),
    Close,
    PanelVisible(bool),
}

/// One input line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum HostCommand {
    Editor(EditorEvent),
    Panel(PanelRequest),
}

impl HostCommand {
    pub fn parse(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }
}

/// Parses and dispatches one input line. Blank lines are ignored.
pub fn handle_line(engine: &mut MetadataEngine<FsWorkspace>, line: &str) -> anyhow::Result<()> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(());
    }
    match HostCommand::parse(line)? {
        HostCommand::Editor(EditorEvent::Focus(path)) => {
            engine.host_mut().open(&path);
            engine.document_focused();
        }
        HostCommand::Editor(EditorEvent::Close) => {
            engine.host_mut().close();
            engine.document_closed();
        }
        HostCommand::Editor(EditorEvent::PanelVisible(visible)) => {
            engine.set_panel_visible(visible);
        }
        HostCommand::Panel(request) => engine.process(request),
    }
    Ok(())
}
