use mattersync_model::{
    CONTENT_TYPE_KEY, ContentType, ContentTypeRegistry, DEFAULT_CONTENT_TYPE, FieldDefinition,
    FieldGroup, FieldKind, MetadataTree,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn tree(value: serde_json::Value) -> MetadataTree {
    value.as_object().cloned().expect("fixture must be an object")
}

// ── FieldDefinition constructors ─────────────────────────────────

#[test]
fn string_field_is_scalar_and_optional() {
    let f = FieldDefinition::string("title");
    assert_eq!(f.name, "title");
    assert_eq!(f.kind, FieldKind::String);
    assert!(!f.multiple);
    assert!(!f.required);
    assert!(f.fields.is_empty());
}

#[test]
fn builder_flags_stack() {
    let f = FieldDefinition::image("gallery").multiple().required();
    assert_eq!(f.kind, FieldKind::Image);
    assert!(f.multiple);
    assert!(f.required);
}

#[test]
fn block_field_carries_sub_schema() {
    let f = FieldDefinition::block("sections", vec![FieldDefinition::string("heading")]);
    assert_eq!(f.kind, FieldKind::Block);
    assert_eq!(f.fields.len(), 1);
    assert_eq!(f.fields[0].name, "heading");
}

#[test]
fn label_falls_back_to_name() {
    let mut f = FieldDefinition::string("title");
    assert_eq!(f.label(), "title");
    f.title = Some("Page title".into());
    assert_eq!(f.label(), "Page title");
}

// ── FieldKind serde ──────────────────────────────────────────────

#[test]
fn field_kind_serializes_as_plain_string() {
    assert_eq!(serde_json::to_string(&FieldKind::DateTime).unwrap(), "\"datetime\"");
    assert_eq!(serde_json::to_string(&FieldKind::DataFile).unwrap(), "\"dataFile\"");
    assert_eq!(serde_json::to_string(&FieldKind::Block).unwrap(), "\"block\"");
}

#[test]
fn field_kind_accepts_date_alias() {
    let kind: FieldKind = serde_json::from_str("\"date\"").unwrap();
    assert_eq!(kind, FieldKind::DateTime);
}

#[test]
fn unknown_field_kind_is_preserved() {
    let kind: FieldKind = serde_json::from_str("\"customColor\"").unwrap();
    assert_eq!(kind, FieldKind::Other("customColor".into()));
    assert_eq!(serde_json::to_string(&kind).unwrap(), "\"customColor\"");
}

// ── ContentType deserialization ──────────────────────────────────

#[test]
fn content_type_deserializes_from_editor_json() {
    let json = r#"{
        "name": "page",
        "pageBundle": true,
        "fields": [
            { "name": "title", "type": "string", "required": true },
            { "name": "published", "type": "datetime" },
            { "name": "gallery", "type": "image", "multiple": true },
            { "name": "seo", "type": "fields", "fields": [
                { "name": "title", "type": "string" }
            ]},
            { "name": "sections", "type": "block", "fieldGroup": ["hero", "cta"] }
        ]
    }"#;
    let ct: ContentType = serde_json::from_str(json).unwrap();

    assert_eq!(ct.name, "page");
    assert!(ct.page_bundle);
    assert_eq!(ct.fields.len(), 5);
    assert!(ct.fields[0].required);
    assert_eq!(ct.fields[1].kind, FieldKind::DateTime);
    assert!(ct.fields[2].multiple);
    assert_eq!(ct.fields[3].fields[0].name, "title");
    assert_eq!(ct.fields[4].field_group, vec!["hero".to_string(), "cta".to_string()]);
}

#[test]
fn content_type_defaults_optional_keys() {
    let ct: ContentType =
        serde_json::from_str(r#"{"name":"note","fields":[{"name":"title","type":"string"}]}"#)
            .unwrap();
    assert!(!ct.page_bundle);
    assert!(!ct.fields[0].multiple);
    assert!(ct.fields[0].default.is_none());
}

// ── ContentTypeRegistry ──────────────────────────────────────────

fn registry() -> ContentTypeRegistry {
    ContentTypeRegistry::with_builtin_default(
        vec![ContentType::new("post", vec![FieldDefinition::string("title")])],
        vec![FieldGroup::new("hero", vec![FieldDefinition::string("heading")])],
    )
}

#[test]
fn builtin_default_is_added_when_missing() {
    let reg = registry();
    assert_eq!(reg.content_types().len(), 2);
    assert!(reg.get(DEFAULT_CONTENT_TYPE).is_some());
}

#[test]
fn declared_default_is_not_replaced() {
    let reg = ContentTypeRegistry::with_builtin_default(
        vec![ContentType::new(DEFAULT_CONTENT_TYPE, vec![])],
        vec![],
    );
    assert_eq!(reg.content_types().len(), 1);
    assert!(reg.get(DEFAULT_CONTENT_TYPE).unwrap().fields.is_empty());
}

#[test]
fn resolve_uses_type_key() {
    let reg = registry();
    let data = tree(json!({ CONTENT_TYPE_KEY: "post" }));
    assert_eq!(reg.resolve(&data).unwrap().name, "post");
}

#[test]
fn resolve_falls_back_to_default() {
    let reg = registry();
    assert_eq!(reg.resolve(&tree(json!({"type": "unknown"}))).unwrap().name, "default");
    assert_eq!(reg.resolve(&tree(json!({}))).unwrap().name, "default");
}

#[test]
fn resolve_without_default_is_absent() {
    let reg = ContentTypeRegistry::new(vec![], vec![]);
    assert!(reg.is_empty());
    assert!(reg.resolve(&tree(json!({"title": "x"}))).is_none());
}

#[test]
fn builtin_default_declares_date_fields() {
    let ct = ContentTypeRegistry::builtin_default();
    let reg = ContentTypeRegistry::new(vec![ct.clone()], vec![]);
    let names: Vec<&str> = reg
        .index(&ct)
        .fields_of_type(&FieldKind::DateTime)
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(names, vec!["date", "lastmod"]);
}
