use chrono::{DateTime, TimeZone, Utc};
use mattersync_engine::placeholder::{process_all, process_custom, process_known};
use mattersync_engine::{Placeholder, PlaceholderContext};
use pretty_assertions::assert_eq;
use std::path::Path;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 2).unwrap()
}

// ── Known tokens ─────────────────────────────────────────────────

#[test]
fn title_and_slug() {
    let ctx = PlaceholderContext::new("Hello World", None, now());
    assert_eq!(process_known("{{title}} / {{slug}}", &ctx), "Hello World / hello-world");
}

#[test]
fn date_parts_are_zero_padded() {
    let ctx = PlaceholderContext::new("", None, now());
    assert_eq!(
        process_known("{{year}}-{{month}}-{{day}} {{hour}}:{{minute}}:{{second}}", &ctx),
        "2024-03-07 09:05:02"
    );
}

#[test]
fn now_uses_date_format() {
    let iso = PlaceholderContext::new("", None, now());
    assert_eq!(process_known("{{now}}", &iso), "2024-03-07T09:05:02.000Z");

    let custom = PlaceholderContext::new("", Some("%d.%m.%Y"), now());
    assert_eq!(process_known("{{now}}", &custom), "07.03.2024");
}

#[test]
fn unknown_tokens_are_left() {
    let ctx = PlaceholderContext::new("T", None, now());
    assert_eq!(process_known("{{nope}} {{title}}", &ctx), "{{nope}} T");
}

// ── Custom placeholders ──────────────────────────────────────────

#[test]
fn custom_value_is_expanded() {
    let placeholders = vec![
        Placeholder::new("author", "Jane"),
        Placeholder::new("stamp", "{{year}}-{{title}}"),
    ];
    let ctx = PlaceholderContext::new("Post", None, now());
    assert_eq!(
        process_custom("{{author}} {{stamp}}", &placeholders, &ctx),
        "Jane 2024-Post"
    );
}

#[test]
fn file_path_token() {
    let ctx = PlaceholderContext::new("", None, now())
        .with_file_path(Some(Path::new("/site/post.md")));
    assert_eq!(process_custom("at {{filePath}}", &[], &ctx), "at /site/post.md");

    let without = PlaceholderContext::new("", None, now());
    assert_eq!(process_custom("at {{filePath}}", &[], &without), "at ");
}

#[test]
fn all_runs_known_then_custom() {
    let placeholders = vec![Placeholder::new("section", "blog")];
    let ctx = PlaceholderContext::new("My Post", None, now());
    assert_eq!(
        process_all("/{{section}}/{{year}}/{{slug}}", &placeholders, &ctx),
        "/blog/2024/my-post"
    );
}
