use mattersync_engine::date::{ISO_FORMAT, format_date, is_valid_format, parse_date};
use mattersync_engine::{Coercion, FieldCoercer};
use mattersync_model::{FieldDefinition, MetadataTree, SchemaIndex};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{Value, json};

fn tree(value: Value) -> MetadataTree {
    value.as_object().cloned().expect("fixture must be an object")
}

fn fields() -> Vec<FieldDefinition> {
    vec![
        FieldDefinition::datetime("date"),
        FieldDefinition::image("images").multiple(),
        FieldDefinition::file("files").multiple(),
        FieldDefinition::image("cover"),
        FieldDefinition::string("title"),
    ]
}

fn coerce(data: &mut MetadataTree, field: &str, raw: Value) -> Coercion {
    let f = fields();
    FieldCoercer::default().coerce(data, field, raw, &SchemaIndex::new(&f, &[]))
}

// ── Dates ────────────────────────────────────────────────────────

#[test]
fn date_only_input_is_utc_midnight() {
    let mut data = MetadataTree::new();
    assert_eq!(coerce(&mut data, "date", json!("2024-01-05")), Coercion::Stored);
    assert_eq!(data["date"], json!("2024-01-05T00:00:00.000Z"));
}

#[test]
fn date_is_a_fixed_point() {
    let mut data = MetadataTree::new();
    coerce(&mut data, "date", json!("2024-01-05"));
    let first = data["date"].clone();
    for _ in 0..3 {
        let again = data["date"].clone();
        coerce(&mut data, "date", again);
    }
    assert_eq!(data["date"], first);
}

#[test]
fn date_with_offset_is_normalized_to_utc() {
    let mut data = MetadataTree::new();
    coerce(&mut data, "date", json!("2024-01-05T10:30:00+02:00"));
    assert_eq!(data["date"], json!("2024-01-05T08:30:00.000Z"));
}

#[test]
fn date_from_epoch_millis() {
    let mut data = MetadataTree::new();
    coerce(&mut data, "date", json!(1704412800000_i64));
    assert_eq!(data["date"], json!("2024-01-05T00:00:00.000Z"));
}

#[test]
fn configured_format_is_used() {
    let f = fields();
    let coercer = FieldCoercer::new(Some("%d/%m/%Y"));
    let mut data = MetadataTree::new();
    coercer.coerce(&mut data, "date", json!("2024-01-05T12:00"), &SchemaIndex::new(&f, &[]));
    assert_eq!(data["date"], json!("05/01/2024"));

    // Its own output parses back.
    let again = data["date"].clone();
    coercer.coerce(&mut data, "date", again, &SchemaIndex::new(&f, &[]));
    assert_eq!(data["date"], json!("05/01/2024"));
}

#[test]
fn falsy_date_is_skipped() {
    let mut data = tree(json!({"date": "2024-01-05T00:00:00.000Z"}));
    assert_eq!(coerce(&mut data, "date", json!("")), Coercion::Skipped);
    assert_eq!(coerce(&mut data, "date", Value::Null), Coercion::Skipped);
    assert_eq!(data["date"], json!("2024-01-05T00:00:00.000Z"));
}

#[test]
fn unparseable_date_is_skipped() {
    let mut data = tree(json!({"date": "2024-01-05T00:00:00.000Z"}));
    assert_eq!(coerce(&mut data, "date", json!("next tuesday")), Coercion::Skipped);
    assert_eq!(data["date"], json!("2024-01-05T00:00:00.000Z"));
}

#[test]
fn invalid_format_falls_back_to_iso() {
    let dt = parse_date(&json!("2024-01-05"), None).unwrap();
    assert!(!is_valid_format("%Q"));
    assert_eq!(format_date(&dt, Some("%Q")), dt.format(ISO_FORMAT).to_string());
}

#[test]
fn space_separated_date_time_parses() {
    let dt = parse_date(&json!("2024-01-05 09:15"), None).unwrap();
    assert_eq!(format_date(&dt, None), "2024-01-05T09:15:00.000Z");
}

// ── Multiple images and files ────────────────────────────────────

#[test]
fn adding_existing_image_keeps_one() {
    let mut data = tree(json!({"images": ["a.png"]}));
    coerce(&mut data, "images", json!("a.png"));
    assert_eq!(data["images"], json!(["a.png"]));
}

#[test]
fn adding_new_image_appends() {
    let mut data = tree(json!({"images": ["a.png"]}));
    coerce(&mut data, "images", json!("b.png"));
    assert_eq!(data["images"], json!(["a.png", "b.png"]));
}

#[test]
fn list_value_replaces() {
    let mut data = tree(json!({"images": ["a.png"]}));
    coerce(&mut data, "images", json!(["b.png"]));
    assert_eq!(data["images"], json!(["b.png"]));
}

#[test]
fn empty_list_clears() {
    let mut data = tree(json!({"files": ["a.pdf"]}));
    coerce(&mut data, "files", json!([]));
    assert_eq!(data["files"], json!([]));
}

#[test]
fn lone_scalar_is_wrapped() {
    let mut data = tree(json!({"files": "a.pdf"}));
    coerce(&mut data, "files", json!("b.pdf"));
    assert_eq!(data["files"], json!(["a.pdf", "b.pdf"]));
}

#[test]
fn missing_value_starts_a_list() {
    let mut data = MetadataTree::new();
    coerce(&mut data, "images", json!("a.png"));
    assert_eq!(data["images"], json!(["a.png"]));
}

#[test]
fn falsy_entries_are_dropped() {
    let mut data = tree(json!({"images": ["", "a.png", null, "a.png"]}));
    coerce(&mut data, "images", json!(""));
    assert_eq!(data["images"], json!(["a.png"]));
}

#[test]
fn single_image_field_is_overwritten() {
    let mut data = tree(json!({"cover": "a.png"}));
    coerce(&mut data, "cover", json!("b.png"));
    assert_eq!(data["cover"], json!("b.png"));
}

// ── Generic fields ───────────────────────────────────────────────

#[test]
fn declared_field_is_overwritten() {
    let mut data = tree(json!({"title": "Old", "draft": true}));
    coerce(&mut data, "title", json!("New"));
    assert_eq!(data, tree(json!({"title": "New", "draft": true})));
}

#[test]
fn undeclared_field_is_written_verbatim() {
    let mut data = MetadataTree::new();
    assert_eq!(coerce(&mut data, "rating", json!({"stars": 4})), Coercion::Stored);
    assert_eq!(data["rating"], json!({"stars": 4}));
}

#[test]
fn key_order_is_kept_on_overwrite() {
    let mut data = tree(json!({"title": "a", "images": ["x.png"], "z": 1}));
    coerce(&mut data, "images", json!("y.png"));
    let keys: Vec<&str> = data.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["title", "images", "z"]);
}

// ── Laws ─────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn merged_list_has_no_duplicates(
        existing in proptest::collection::vec("[a-d]\\.png", 0..6),
        added in "[a-e]\\.png",
    ) {
        let mut data = tree(json!({"images": existing.clone()}));
        coerce(&mut data, "images", json!(added.clone()));

        let merged: Vec<String> = serde_json::from_value(data["images"].clone()).unwrap();
        let mut unique = merged.clone();
        unique.sort();
        unique.dedup();
        prop_assert_eq!(unique.len(), merged.len());
        prop_assert!(merged.contains(&added));
        for item in &existing {
            prop_assert!(merged.contains(item));
        }
    }

    #[test]
    fn merged_list_keeps_first_seen_order(
        existing in proptest::collection::vec("[a-d]\\.png", 0..6),
        added in "[a-e]\\.png",
    ) {
        let mut data = tree(json!({"images": existing.clone()}));
        coerce(&mut data, "images", json!(added.clone()));

        let mut expected: Vec<String> = Vec::new();
        for item in existing.iter().chain(std::iter::once(&added)) {
            if !expected.contains(item) {
                expected.push(item.clone());
            }
        }
        prop_assert_eq!(data["images"].clone(), json!(expected));
    }

    #[test]
    fn date_coercion_is_idempotent(
        year in 1971i32..2100,
        month in 1u32..=12,
        day in 1u32..=28,
    ) {
        let mut data = MetadataTree::new();
        coerce(&mut data, "date", json!(format!("{year:04}-{month:02}-{day:02}")));
        let first = data["date"].clone();
        coerce(&mut data, "date", first.clone());
        prop_assert_eq!(data["date"].clone(), first);
    }
}
