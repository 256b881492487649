//! The event dispatcher tying resolution, coercion and broadcast together.

use crate::broadcaster::MetadataBroadcaster;
use crate::coercer::{Coercion, FieldCoercer};
use crate::config::Settings;
use crate::error::EngineResult;
use crate::host::{ActiveDocument, DocumentHost, FolderInfoProvider};
use crate::placeholder::{PlaceholderContext, process_all};
use crate::protocol::{
    EditRequest, FOLDER_FILE_LIMIT, PanelMessage, PanelRequest, PlaceholderRequest,
    PlaceholderUpdate,
};
use crate::resolver::PathResolver;
use crate::slug::{SlugGenerator, SlugInferencer, TitleSlugGenerator};
use crate::state::DocumentState;
use crate::transport::PanelTransport;
use chrono::{DateTime, Utc};
use mattersync_document::DataFileCatalog;
use mattersync_model::{ContentTypeRegistry, MetadataTree};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of [`MetadataEngine::update_metadata`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The tree was written and broadcast.
    Applied,
    /// Nothing was written.
    Abandoned,
}

/// Handles panel requests and editor events for one workspace.
///
/// Every event runs to completion before the next one is taken, and none of
/// them fail: problems are logged and the event becomes a no-op.
pub struct MetadataEngine<H: DocumentHost> {
    settings: Settings,
    registry: ContentTypeRegistry,
    host: H,
    broadcaster: MetadataBroadcaster,
    slugs: SlugInferencer,
    folders: Option<Box<dyn FolderInfoProvider>>,
    state: DocumentState,
    panel_visible: bool,
    clock: fn() -> DateTime<Utc>,
}

impl<H: DocumentHost> MetadataEngine<H> {
    pub fn new(settings: Settings, host: H, transport: Arc<dyn PanelTransport>) -> Self {
        let registry = settings.registry();
        let broadcaster = MetadataBroadcaster::new(transport)
            .with_comma_separated(settings.comma_separated_fields.clone());
        let slugs = SlugInferencer::new(Box::new(TitleSlugGenerator::from(&settings.slug)));

        info!(
            "Metadata engine ready ({} content types, {} field groups)",
            registry.content_types().len(),
            registry.field_groups().len()
        );

        Self {
            settings,
            registry,
            host,
            broadcaster,
            slugs,
            folders: None,
            state: DocumentState::default(),
            panel_visible: false,
            clock: Utc::now,
        }
    }

    /// Replaces the title-based slug generator.
    pub fn with_slug_generator(mut self, generator: Box<dyn SlugGenerator>) -> Self {
        self.slugs = SlugInferencer::new(generator);
        self
    }

    /// Enables `folderInfo` replies to `getData`.
    pub fn with_folder_info(mut self, provider: Box<dyn FolderInfoProvider>) -> Self {
        self.folders = Some(provider);
        self
    }

    /// Sets the time source placeholders expand against.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn registry(&self) -> &ContentTypeRegistry {
        &self.registry
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn state(&self) -> &DocumentState {
        &self.state
    }

    pub fn broadcaster(&self) -> &MetadataBroadcaster {
        &self.broadcaster
    }

    pub fn is_panel_visible(&self) -> bool {
        self.panel_visible
    }

    /// Dispatches a panel request.
    pub fn process(&mut self, request: PanelRequest) {
        match request {
            PanelRequest::GetData => self.get_data(),
            PanelRequest::UpdateMetadata(edit) => {
                self.update_metadata(edit);
            }
            PanelRequest::UpdatePlaceholder(request) => self.update_placeholder(request),
            PanelRequest::GetDataEntries(id) => self.get_data_entries(&id),
        }
    }

    // ── Panel requests ──────────────────────────────────────────────

    /// Broadcasts the active document's metadata, or the no-document
    /// signal, followed by the folder listing.
    pub fn get_data(&mut self) {
        match self.host.active_document() {
            Ok(Some(active)) => {
                self.track(&active.path);
                self.push_metadata(&active);
            }
            Ok(None) => {
                self.state.close();
                self.emit_none();
            }
            Err(e) => warn!("Cannot read the active document: {}", e),
        }
        self.push_folders();
    }

    /// Applies one field edit to the active document, writes it and
    /// broadcasts the result.
    pub fn update_metadata(&mut self, edit: EditRequest) -> EditOutcome {
        match self.try_update_metadata(edit) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Abandoning metadata edit: {}", e);
                EditOutcome::Abandoned
            }
        }
    }

    fn try_update_metadata(&mut self, edit: EditRequest) -> EngineResult<EditOutcome> {
        let EditRequest {
            field,
            value,
            parents,
            block_data,
        } = edit;

        if field.is_empty() {
            debug!("Ignoring edit without a field name");
            return Ok(EditOutcome::Abandoned);
        }
        let Some(mut active) = self.host.active_document()? else {
            debug!("Ignoring edit of `{}`: no active document", field);
            return Ok(EditOutcome::Abandoned);
        };
        self.track(&active.path);

        let coercion = {
            let Some(content_type) = self.registry.resolve(&active.document.data) else {
                debug!("Ignoring edit of `{}`: no content type", field);
                return Ok(EditOutcome::Abandoned);
            };
            let schema = self.registry.index(content_type);
            let resolved = PathResolver::resolve(
                &mut active.document.data,
                &parents,
                block_data.as_ref(),
                schema,
            )?;

            // Fields the nested level does not declare are classified at the
            // top level.
            let scope = resolved
                .scope
                .filter(|s| s.declares(&field))
                .unwrap_or(schema);
            FieldCoercer::new(self.settings.date_format()).coerce(
                resolved.target,
                &field,
                value,
                &scope,
            )
        };
        if coercion == Coercion::Skipped {
            debug!("Kept the stored value of `{}`", field);
        }

        self.host.write(&active)?;
        self.state.mark_dirty();
        debug!("Wrote `{}` to {}", field, active.path.display());

        self.push_metadata(&active);
        Ok(EditOutcome::Applied)
    }

    /// Expands placeholders in `request.value` and echoes the result.
    pub fn update_placeholder(&self, request: PlaceholderRequest) {
        let PlaceholderRequest { field, value, title } = request;

        let value = if !field.is_empty() && !value.is_empty() {
            let active_path = match self.host.active_document() {
                Ok(active) => active.map(|a| a.path),
                Err(e) => {
                    warn!("Cannot read the active document: {}", e);
                    None
                }
            };
            let ctx = PlaceholderContext::new(&title, self.settings.date_format(), (self.clock)())
                .with_file_path(active_path.as_deref());
            process_all(&value, &self.settings.placeholders, &ctx)
        } else {
            value
        };

        self.send(PanelMessage::UpdatePlaceholder(PlaceholderUpdate { field, value }));
    }

    /// Sends the entries of a data file; unknown ids send nothing.
    pub fn get_data_entries(&self, id: &str) {
        let Some(root) = self.workspace_root() else {
            debug!("No workspace root, skipping data file `{}`", id);
            return;
        };
        let catalog = DataFileCatalog::new(root, self.settings.data_files.clone());
        match catalog.entries(id) {
            Ok(Some(entries)) => self.send(PanelMessage::DataFileEntries(entries)),
            Ok(None) => debug!("Unknown data file `{}`", id),
            Err(e) => warn!("Cannot read data file `{}`: {}", id, e),
        }
    }

    // ── Editor events ───────────────────────────────────────────────

    /// Records whether the panel is showing. Becoming visible refreshes it.
    pub fn set_panel_visible(&mut self, visible: bool) {
        self.panel_visible = visible;
        if visible {
            self.document_focused();
        }
    }

    /// The editor focused a different document, or the same one again.
    pub fn document_focused(&mut self) {
        match self.host.active_document() {
            Ok(Some(active)) => {
                self.track(&active.path);
                let missing = self.required_field_report(&active.document.data);
                if !missing.is_empty() {
                    warn!(
                        "{} is missing required fields: {}",
                        active.path.display(),
                        missing.join(", ")
                    );
                }
                if self.panel_visible {
                    self.push_metadata(&active);
                }
            }
            Ok(None) => self.document_closed(),
            Err(e) => warn!("Cannot read the active document: {}", e),
        }
    }

    /// The active document was closed, or focus moved to an unsupported file.
    pub fn document_closed(&mut self) {
        if let Some(path) = self.state.path() {
            info!("Closed {}", path.display());
        }
        self.state.close();
        self.broadcaster.reset();
        if self.panel_visible {
            self.emit_none();
        }
    }

    /// Labels of required fields that hold no value, nested ones as
    /// `parent > child`.
    pub fn required_field_report(&self, tree: &MetadataTree) -> Vec<String> {
        let Some(content_type) = self.registry.resolve(tree) else {
            return Vec::new();
        };
        self.registry
            .index(content_type)
            .empty_required_fields(tree)
            .into_iter()
            .map(|path| {
                path.iter()
                    .map(|field| field.label())
                    .collect::<Vec<_>>()
                    .join(" > ")
            })
            .collect()
    }

    // ── Internals ───────────────────────────────────────────────────

    /// Builds and emits the snapshot of `active`.
    pub fn push_metadata(&mut self, active: &ActiveDocument) {
        let details = match self.host.article_details(active) {
            Ok(details) => details,
            Err(e) => {
                warn!("Article details unavailable: {}", e);
                None
            }
        };

        let mut snapshot =
            self.broadcaster
                .build_snapshot(&active.document.data, Some(active.path()), details);

        let root = self.workspace_root();
        let schema = self
            .registry
            .resolve(snapshot.as_map())
            .map(|ct| self.registry.index(ct));
        self.slugs.infer(
            &mut snapshot,
            schema.as_ref(),
            root.as_deref(),
            Some(active.path()),
        );

        if let Err(e) = self.broadcaster.emit(Some(snapshot)) {
            warn!("Metadata broadcast failed: {}", e);
        }
        self.state.mark_clean();
    }

    fn emit_none(&mut self) {
        if let Err(e) = self.broadcaster.emit(None) {
            warn!("Metadata broadcast failed: {}", e);
        }
    }

    fn push_folders(&self) {
        let Some(folders) = &self.folders else {
            return;
        };
        match folders.folder_info(FOLDER_FILE_LIMIT) {
            Ok(info) => self.send(PanelMessage::FolderInfo(info)),
            Err(e) => warn!("Folder listing failed: {}", e),
        }
    }

    fn send(&self, message: PanelMessage) {
        if let Err(e) = self.broadcaster.transport().send(message) {
            warn!("Dropping panel message: {}", e);
        }
    }

    fn workspace_root(&self) -> Option<PathBuf> {
        self.settings
            .workspace_root
            .clone()
            .or_else(|| self.host.workspace_root())
    }

    /// Follows the active document; a switch forgets the last snapshot.
    fn track(&mut self, path: &Path) {
        if self.state.open(path) {
            info!("Active document: {}", path.display());
            self.broadcaster.reset();
        }
    }
}
