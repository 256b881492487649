//! `{{token}}` substitution for field default values.

use crate::date::format_date;
use crate::slug::slugify;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Token expanded to the active document's path.
pub const FILE_PATH_TOKEN: &str = "{{filePath}}";

/// A user-defined placeholder: `{{id}}` expands to `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placeholder {
    pub id: String,
    pub value: String,
}

impl Placeholder {
    pub fn new(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
        }
    }

    fn token(&self) -> String {
        format!("{{{{{}}}}}", self.id)
    }
}

/// Everything a placeholder may expand to.
#[derive(Debug, Clone, Copy)]
pub struct PlaceholderContext<'a> {
    pub title: &'a str,
    pub date_format: Option<&'a str>,
    pub now: DateTime<Utc>,
    pub file_path: Option<&'a Path>,
}

impl<'a> PlaceholderContext<'a> {
    pub fn new(title: &'a str, date_format: Option<&'a str>, now: DateTime<Utc>) -> Self {
        Self {
            title,
            date_format,
            now,
            file_path: None,
        }
    }

    pub fn with_file_path(mut self, path: Option<&'a Path>) -> Self {
        self.file_path = path;
        self
    }
}

/// Expands the built-in tokens: title, slug, now and the date parts.
pub fn process_known(value: &str, ctx: &PlaceholderContext<'_>) -> String {
    if !value.contains("{{") {
        return value.to_string();
    }
    let now = &ctx.now;
    value
        .replace("{{title}}", ctx.title)
        .replace("{{slug}}", &slugify(ctx.title, &[]))
        .replace("{{now}}", &format_date(now, ctx.date_format))
        .replace("{{year}}", &now.format("%Y").to_string())
        .replace("{{month}}", &now.format("%m").to_string())
        .replace("{{day}}", &now.format("%d").to_string())
        .replace("{{hour}}", &now.format("%H").to_string())
        .replace("{{minute}}", &now.format("%M").to_string())
        .replace("{{second}}", &now.format("%S").to_string())
}

/// Expands configured placeholders, then `{{filePath}}`.
///
/// A placeholder's own value is run through [`process_known`] before it is
/// substituted.
pub fn process_custom(
    value: &str,
    placeholders: &[Placeholder],
    ctx: &PlaceholderContext<'_>,
) -> String {
    let mut out = value.to_string();
    for placeholder in placeholders {
        let token = placeholder.token();
        if out.contains(&token) {
            let expanded = process_known(&placeholder.value, ctx);
            out = out.replace(&token, &expanded);
        }
    }
    if out.contains(FILE_PATH_TOKEN) {
        let path = ctx
            .file_path
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        out = out.replace(FILE_PATH_TOKEN, &path);
    }
    out
}

/// Known tokens first, then the configured ones.
pub fn process_all(value: &str, placeholders: &[Placeholder], ctx: &PlaceholderContext<'_>) -> String {
    process_custom(&process_known(value, ctx), placeholders, ctx)
}
