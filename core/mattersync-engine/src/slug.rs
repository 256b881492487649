//! Slug inference for documents that carry no slug of their own.

use crate::error::EngineResult;
use crate::protocol::Snapshot;
use mattersync_model::{SchemaIndex, is_truthy};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, warn};

/// Snapshot key the inferred slug is written to.
pub const SLUG_KEY: &str = "slug";

/// File stem that names its parent folder instead of itself.
const INDEX_STEM: &str = "index";

/// Inputs a slug can be derived from.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlugSignals<'a> {
    pub title: Option<&'a str>,
    pub file_path: Option<&'a Path>,
}

impl<'a> SlugSignals<'a> {
    /// Reads the title from a snapshot.
    pub fn from_snapshot(snapshot: &'a Snapshot, file_path: Option<&'a Path>) -> Self {
        Self {
            title: snapshot.get("title").and_then(Value::as_str),
            file_path,
        }
    }
}

/// Computes a slug from the available signals.
pub trait SlugGenerator: Send + Sync {
    /// Returns `Ok(None)` when no signal is usable.
    fn generate(&self, signals: &SlugSignals<'_>) -> EngineResult<Option<String>>;
}

/// Slugifies the title, falling back to the file name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleSlugGenerator {
    prefix: String,
    suffix: String,
    stop_words: Vec<String>,
}

impl TitleSlugGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Words left out of title slugs, compared case-insensitively.
    pub fn with_stop_words(mut self, words: Vec<String>) -> Self {
        self.stop_words = words;
        self
    }

    fn from_file(path: &Path) -> Option<String> {
        let stem = path.file_stem()?.to_str()?;
        if stem == INDEX_STEM {
            let folder = path.parent()?.file_name()?.to_str()?;
            return Some(folder.to_string());
        }
        Some(stem.to_string())
    }
}

impl SlugGenerator for TitleSlugGenerator {
    fn generate(&self, signals: &SlugSignals<'_>) -> EngineResult<Option<String>> {
        if let Some(title) = signals.title {
            let slug = slugify(title, &self.stop_words);
            if !slug.is_empty() {
                return Ok(Some(format!("{}{}{}", self.prefix, slug, self.suffix)));
            }
        }
        Ok(signals.file_path.and_then(Self::from_file))
    }
}

/// Lowercases `text` and joins its alphanumeric runs with `-`, leaving out
/// stop words.
pub fn slugify(text: &str, stop_words: &[String]) -> String {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .filter(|word| !stop_words.iter().any(|s| s.to_lowercase() == *word))
        .collect::<Vec<_>>()
        .join("-")
}

/// Fills the snapshot's slug key when the document has no slug of its own.
pub struct SlugInferencer {
    generator: Box<dyn SlugGenerator>,
}

impl SlugInferencer {
    pub fn new(generator: Box<dyn SlugGenerator>) -> Self {
        Self { generator }
    }

    /// Writes an inferred slug into `snapshot`, returning it.
    ///
    /// Runs only when the content type resolved, the workspace root is known,
    /// the content type declares no slug-typed field and the snapshot has no
    /// slug value. Generator failures are logged and leave the snapshot as it
    /// was.
    pub fn infer(
        &self,
        snapshot: &mut Snapshot,
        schema: Option<&SchemaIndex<'_>>,
        workspace_root: Option<&Path>,
        file_path: Option<&Path>,
    ) -> Option<String> {
        let schema = schema?;
        if workspace_root.is_none() || snapshot.is_empty() || schema.slug_field().is_some() {
            return None;
        }
        if snapshot.get(SLUG_KEY).is_some_and(is_truthy) {
            return None;
        }

        let signals = SlugSignals::from_snapshot(snapshot, file_path);
        match self.generator.generate(&signals) {
            Ok(Some(slug)) => {
                debug!("Inferred slug `{}`", slug);
                snapshot
                    .as_map_mut()
                    .insert(SLUG_KEY.to_string(), Value::String(slug.clone()));
                Some(slug)
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Slug inference failed: {}", e);
                None
            }
        }
    }
}

impl Default for SlugInferencer {
    fn default() -> Self {
        Self::new(Box::new(TitleSlugGenerator::default()))
    }
}
