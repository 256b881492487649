//! Workspace settings (`mattersync.toml`).

use crate::date::is_valid_format;
use crate::error::ConfigError;
use crate::placeholder::Placeholder;
use crate::slug::TitleSlugGenerator;
use mattersync_document::DataFile;
use mattersync_model::{ContentType, ContentTypeRegistry, FieldDefinition, FieldGroup};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Everything the engine reads from configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Workspace root; the host's working directory when unset.
    pub workspace_root: Option<PathBuf>,
    /// chrono strftime format for date fields; ISO-8601 when unset.
    pub date_format: Option<String>,
    /// Fields whose string values the panel shows as lists.
    pub comma_separated_fields: Vec<String>,
    pub content_folders: Vec<ContentFolder>,
    pub content_types: Vec<ContentType>,
    pub field_groups: Vec<FieldGroup>,
    pub placeholders: Vec<Placeholder>,
    pub data_files: Vec<DataFile>,
    pub slug: SlugSettings,
}

/// A folder holding content files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentFolder {
    pub title: String,
    /// Workspace-relative or absolute path.
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlugSettings {
    pub prefix: String,
    pub suffix: String,
    pub stop_words: Vec<String>,
}

impl Settings {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Checks the constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(format) = &self.date_format
            && !is_valid_format(format)
        {
            return Err(ConfigError::Invalid(format!(
                "date_format `{format}` is not a valid strftime format"
            )));
        }

        let mut names = HashSet::new();
        for ct in &self.content_types {
            if ct.name.is_empty() {
                return Err(ConfigError::Invalid("content type name is required".into()));
            }
            if !names.insert(ct.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "content type `{}` is declared twice",
                    ct.name
                )));
            }
            check_siblings(&ct.name, &ct.fields)?;
        }

        let mut groups = HashSet::new();
        for group in &self.field_groups {
            if !groups.insert(group.id.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "field group `{}` is declared twice",
                    group.id
                )));
            }
            check_siblings(&group.id, &group.fields)?;
        }

        let mut ids = HashSet::new();
        for file in &self.data_files {
            if !ids.insert(file.id.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "data file `{}` is declared twice",
                    file.id
                )));
            }
        }

        if self.content_folders.iter().any(|f| f.path.as_os_str().is_empty()) {
            return Err(ConfigError::Invalid("content folder path is required".into()));
        }
        Ok(())
    }

    /// Content types and field groups, with the built-in default added.
    pub fn registry(&self) -> ContentTypeRegistry {
        ContentTypeRegistry::with_builtin_default(
            self.content_types.clone(),
            self.field_groups.clone(),
        )
    }

    /// The configured date format, if chrono can use it.
    pub fn date_format(&self) -> Option<&str> {
        self.date_format.as_deref().filter(|f| is_valid_format(f))
    }
}

impl From<&SlugSettings> for TitleSlugGenerator {
    fn from(settings: &SlugSettings) -> Self {
        TitleSlugGenerator::new()
            .with_prefix(settings.prefix.clone())
            .with_suffix(settings.suffix.clone())
            .with_stop_words(settings.stop_words.clone())
    }
}

fn check_siblings(owner: &str, fields: &[FieldDefinition]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for field in fields {
        if field.name.is_empty() {
            return Err(ConfigError::Invalid(format!("`{owner}` has a field without a name")));
        }
        if !seen.insert(field.name.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "`{owner}` declares field `{}` twice",
                field.name
            )));
        }
        check_siblings(&format!("{owner}.{}", field.name), &field.fields)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mattersync_model::FieldKind;

    const SAMPLE: &str = r#"
date_format = "%Y-%m-%d"
comma_separated_fields = ["keywords"]

[[content_folders]]
title = "Blog"
path = "content/blog"

[[content_types]]
name = "post"
pageBundle = true

[[content_types.fields]]
name = "title"
type = "string"
required = true

[[content_types.fields]]
name = "sections"
type = "block"
fieldGroup = ["hero"]

[[field_groups]]
id = "hero"

[[field_groups.fields]]
name = "heading"
type = "string"

[[placeholders]]
id = "author"
value = "Jane"

[slug]
prefix = "blog-"
stop_words = ["a", "the"]
"#;

    #[test]
    fn parse_sample() {
        let s = Settings::from_toml_str(SAMPLE).unwrap();
        assert_eq!(s.date_format(), Some("%Y-%m-%d"));
        assert_eq!(s.comma_separated_fields, vec!["keywords"]);
        assert_eq!(s.content_folders[0].title, "Blog");
        assert_eq!(s.content_types[0].fields[1].kind, FieldKind::Block);
        assert_eq!(s.content_types[0].fields[1].field_group, vec!["hero"]);
        assert_eq!(s.field_groups[0].fields[0].name, "heading");
        assert_eq!(s.placeholders[0], Placeholder::new("author", "Jane"));
        assert_eq!(s.slug.prefix, "blog-");
        assert!(s.workspace_root.is_none());
    }

    #[test]
    fn empty_settings_are_valid() {
        let s = Settings::from_toml_str("").unwrap();
        assert_eq!(s, Settings::default());
        assert!(s.date_format().is_none());
    }

    #[test]
    fn registry_adds_default_type() {
        let s = Settings::from_toml_str(SAMPLE).unwrap();
        let registry = s.registry();
        assert!(registry.get("post").is_some());
        assert!(registry.get("default").is_some());
    }

    #[test]
    fn validate_bad_date_format() {
        let err = Settings::from_toml_str(r#"date_format = "%Q""#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn validate_duplicate_content_type() {
        let s = Settings {
            content_types: vec![ContentType::new("post", vec![]), ContentType::new("post", vec![])],
            ..Default::default()
        };
        assert!(s.validate().is_err());
    }

    #[test]
    fn validate_duplicate_sibling_fields() {
        let s = Settings {
            content_types: vec![ContentType::new(
                "post",
                vec![FieldDefinition::object(
                    "seo",
                    vec![FieldDefinition::string("title"), FieldDefinition::string("title")],
                )],
            )],
            ..Default::default()
        };
        assert!(s.validate().is_err());
    }

    #[test]
    fn same_name_at_different_levels_is_fine() {
        let s = Settings {
            content_types: vec![ContentType::new(
                "post",
                vec![
                    FieldDefinition::string("title"),
                    FieldDefinition::object("seo", vec![FieldDefinition::string("title")]),
                ],
            )],
            ..Default::default()
        };
        assert!(s.validate().is_ok());
    }

    #[test]
    fn parse_error_is_reported() {
        let err = Settings::from_toml_str("content_types = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
