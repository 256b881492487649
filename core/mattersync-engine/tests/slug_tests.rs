use mattersync_engine::{
    EngineError, EngineResult, SLUG_KEY, SlugGenerator, SlugInferencer, SlugSignals, Snapshot,
    TitleSlugGenerator, slugify,
};
use mattersync_model::{FieldDefinition, MetadataTree, SchemaIndex};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::path::Path;

fn snapshot(value: Value) -> Snapshot {
    Snapshot::new(value.as_object().cloned().expect("fixture must be an object"))
}

struct Failing;

impl SlugGenerator for Failing {
    fn generate(&self, _signals: &SlugSignals<'_>) -> EngineResult<Option<String>> {
        Err(EngineError::Slug("no slug today".into()))
    }
}

// ── slugify ──────────────────────────────────────────────────────

#[test]
fn slugify_lowercases_and_joins() {
    assert_eq!(slugify("Hello, World!", &[]), "hello-world");
    assert_eq!(slugify("  Rust  2024 -- edition ", &[]), "rust-2024-edition");
}

#[test]
fn slugify_removes_stop_words() {
    let stop = vec!["a".to_string(), "The".to_string()];
    assert_eq!(slugify("The Art of a Slug", &stop), "art-of-slug");
}

#[test]
fn slugify_of_punctuation_is_empty() {
    assert_eq!(slugify("!?", &[]), "");
}

// ── TitleSlugGenerator ───────────────────────────────────────────

#[test]
fn title_gets_prefix_and_suffix() {
    let generator = TitleSlugGenerator::new().with_prefix("blog-").with_suffix("-v1");
    let signals = SlugSignals {
        title: Some("My Post"),
        file_path: None,
    };
    assert_eq!(generator.generate(&signals).unwrap(), Some("blog-my-post-v1".into()));
}

#[test]
fn file_stem_is_the_fallback() {
    let generator = TitleSlugGenerator::new().with_prefix("blog-");
    let signals = SlugSignals {
        title: None,
        file_path: Some(Path::new("/site/content/first-post.md")),
    };
    assert_eq!(generator.generate(&signals).unwrap(), Some("first-post".into()));
}

#[test]
fn index_file_uses_folder_name() {
    let signals = SlugSignals {
        title: Some("!!"),
        file_path: Some(Path::new("/site/content/bundle/index.md")),
    };
    assert_eq!(
        TitleSlugGenerator::new().generate(&signals).unwrap(),
        Some("bundle".into())
    );
}

#[test]
fn no_signals_no_slug() {
    assert_eq!(
        TitleSlugGenerator::new().generate(&SlugSignals::default()).unwrap(),
        None
    );
}

// ── SlugInferencer ───────────────────────────────────────────────

#[test]
fn infers_slug_from_title() {
    let fields = vec![FieldDefinition::string("title")];
    let schema = SchemaIndex::new(&fields, &[]);
    let mut snap = snapshot(json!({"title": "Hello World"}));
    let slug = SlugInferencer::default().infer(
        &mut snap,
        Some(&schema),
        Some(Path::new("/site")),
        Some(Path::new("/site/hello.md")),
    );
    assert_eq!(slug.as_deref(), Some("hello-world"));
    assert_eq!(snap.get(SLUG_KEY), Some(&json!("hello-world")));
}

#[test]
fn slug_field_in_schema_disables_inference() {
    let fields = vec![FieldDefinition::string("title"), FieldDefinition::slug("permalink")];
    let schema = SchemaIndex::new(&fields, &[]);
    let mut snap = snapshot(json!({"title": "Hello"}));
    let slug = SlugInferencer::default().infer(&mut snap, Some(&schema), Some(Path::new("/site")), None);
    assert!(slug.is_none());
    assert!(snap.get(SLUG_KEY).is_none());
    assert!(snap.get("permalink").is_none());
}

#[test]
fn existing_slug_is_kept() {
    let fields = vec![FieldDefinition::string("title")];
    let schema = SchemaIndex::new(&fields, &[]);
    let mut snap = snapshot(json!({"title": "Hello", "slug": "custom"}));
    SlugInferencer::default().infer(&mut snap, Some(&schema), Some(Path::new("/site")), None);
    assert_eq!(snap.get(SLUG_KEY), Some(&json!("custom")));
}

#[test]
fn unknown_workspace_or_content_type_skips() {
    let fields = vec![FieldDefinition::string("title")];
    let schema = SchemaIndex::new(&fields, &[]);
    let inferencer = SlugInferencer::default();

    let mut snap = snapshot(json!({"title": "Hello"}));
    assert!(inferencer.infer(&mut snap, Some(&schema), None, None).is_none());
    assert!(inferencer
        .infer(&mut snap, None, Some(Path::new("/site")), None)
        .is_none());
    assert!(snap.get(SLUG_KEY).is_none());
}

#[test]
fn empty_snapshot_gets_no_slug() {
    let fields = vec![FieldDefinition::string("title")];
    let schema = SchemaIndex::new(&fields, &[]);
    let mut snap = Snapshot::new(MetadataTree::new());
    SlugInferencer::default().infer(
        &mut snap,
        Some(&schema),
        Some(Path::new("/site")),
        Some(Path::new("/site/post.md")),
    );
    assert!(snap.is_empty());
}

#[test]
fn generator_failure_is_swallowed() {
    let fields = vec![FieldDefinition::string("title")];
    let schema = SchemaIndex::new(&fields, &[]);
    let mut snap = snapshot(json!({"title": "Hello"}));
    let slug = SlugInferencer::new(Box::new(Failing)).infer(
        &mut snap,
        Some(&schema),
        Some(Path::new("/site")),
        None,
    );
    assert!(slug.is_none());
    assert_eq!(snap, snapshot(json!({"title": "Hello"})));
}
