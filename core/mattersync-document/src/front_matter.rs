//! Front matter detection, parsing and rendering.
//!
//! A content file starts with a delimiter line (`---` YAML, `+++` TOML,
//! `;;;` JSON), the serialized metadata, and the same delimiter again. The
//! rest of the file is the body and is carried through untouched.

use crate::error::{DocumentError, DocumentResult};
use mattersync_model::MetadataTree;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;

/// File extensions the editor treats as content files.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["md", "markdown", "mdx"];

/// Whether a path names a content file.
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.iter().any(|s| s.eq_ignore_ascii_case(ext)))
}

/// Serialization format of a front matter block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrontMatterSyntax {
    #[default]
    Yaml,
    Toml,
    Json,
}

impl FrontMatterSyntax {
    pub fn delimiter(self) -> &'static str {
        match self {
            Self::Yaml => "---",
            Self::Toml => "+++",
            Self::Json => ";;;",
        }
    }

    fn from_delimiter(line: &str) -> Option<Self> {
        match line {
            "---" => Some(Self::Yaml),
            "+++" => Some(Self::Toml),
            ";;;" => Some(Self::Json),
            _ => None,
        }
    }
}

impl fmt::Display for FrontMatterSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Yaml => "yaml",
            Self::Toml => "toml",
            Self::Json => "json",
        })
    }
}

/// A content file split into its metadata tree and body.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    pub syntax: FrontMatterSyntax,
    pub data: MetadataTree,
    pub body: String,
    has_front_matter: bool,
}

impl ParsedDocument {
    /// Creates a YAML document from its parts.
    pub fn new(data: MetadataTree, body: impl Into<String>) -> Self {
        Self {
            syntax: FrontMatterSyntax::Yaml,
            data,
            body: body.into(),
            has_front_matter: true,
        }
    }

    fn without_front_matter(body: String) -> Self {
        Self {
            syntax: FrontMatterSyntax::Yaml,
            data: MetadataTree::new(),
            body,
            has_front_matter: false,
        }
    }

    /// Splits file content into front matter and body.
    ///
    /// Content without an opening delimiter on its first line, or without a
    /// closing delimiter, has an empty tree and the whole text as body.
    pub fn parse(text: &str) -> DocumentResult<Self> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut lines = text.split_inclusive('\n');

        let Some(first) = lines.next() else {
            return Ok(Self::without_front_matter(String::new()));
        };
        let Some(syntax) = FrontMatterSyntax::from_delimiter(first.trim_end()) else {
            return Ok(Self::without_front_matter(text.to_string()));
        };

        let content_start = first.len();
        let mut offset = content_start;
        for line in lines {
            if line.trim_end() == syntax.delimiter() {
                let data = parse_block(&text[content_start..offset], syntax)?;
                return Ok(Self {
                    syntax,
                    data,
                    body: text[offset + line.len()..].to_string(),
                    has_front_matter: true,
                });
            }
            offset += line.len();
        }

        Ok(Self::without_front_matter(text.to_string()))
    }

    /// Serializes the document back to file content.
    ///
    /// A document that had no front matter and still has no metadata renders
    /// as its body alone.
    pub fn render(&self) -> DocumentResult<String> {
        if !self.has_front_matter && self.data.is_empty() {
            return Ok(self.body.clone());
        }
        let delimiter = self.syntax.delimiter();
        let block = render_block(&self.data, self.syntax)?;
        if block.is_empty() {
            Ok(format!("{delimiter}\n{delimiter}\n{}", self.body))
        } else {
            Ok(format!("{delimiter}\n{block}\n{delimiter}\n{}", self.body))
        }
    }

    /// Reads and parses a file.
    pub fn load(path: &Path) -> DocumentResult<Self> {
        if !is_supported(path) {
            return Err(DocumentError::Unsupported(path.display().to_string()));
        }
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Renders and writes the document to a file.
    pub fn save(&self, path: &Path) -> DocumentResult<()> {
        let text = self.render()?;
        std::fs::write(path, text)?;
        Ok(())
    }

    pub fn has_front_matter(&self) -> bool {
        self.has_front_matter
    }

    /// The document's `title` value, when it is a string.
    pub fn title(&self) -> Option<&str> {
        self.data.get("title").and_then(|v| v.as_str())
    }
}

fn parse_block(content: &str, syntax: FrontMatterSyntax) -> DocumentResult<MetadataTree> {
    if content.trim().is_empty() {
        return Ok(MetadataTree::new());
    }
    let parse_err = |message: String| DocumentError::Parse { syntax, message };

    let value = match syntax {
        FrontMatterSyntax::Yaml => {
            serde_yaml::from_str::<Value>(content).map_err(|e| parse_err(e.to_string()))?
        }
        FrontMatterSyntax::Json => {
            serde_json::from_str::<Value>(content).map_err(|e| parse_err(e.to_string()))?
        }
        FrontMatterSyntax::Toml => {
            let table = toml::from_str::<toml::Table>(content).map_err(|e| parse_err(e.to_string()))?;
            toml_to_json(toml::Value::Table(table))
        }
    };

    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(MetadataTree::new()),
        _ => Err(parse_err("front matter must be a mapping".to_string())),
    }
}

fn render_block(data: &MetadataTree, syntax: FrontMatterSyntax) -> DocumentResult<String> {
    if data.is_empty() {
        return Ok(String::new());
    }
    let render_err = |message: String| DocumentError::Render { syntax, message };
    let value = Value::Object(data.clone());

    match syntax {
        FrontMatterSyntax::Yaml => serde_yaml::to_string(&value)
            .map(|text| {
                let trimmed = text.trim_end();
                trimmed.strip_prefix("---\n").unwrap_or(trimmed).to_string()
            })
            .map_err(|e| render_err(e.to_string())),
        FrontMatterSyntax::Json => {
            serde_json::to_string_pretty(&value).map_err(|e| render_err(e.to_string()))
        }
        FrontMatterSyntax::Toml => {
            let table = match json_to_toml(&value).map_err(render_err)? {
                Some(toml::Value::Table(table)) => table,
                _ => toml::Table::new(),
            };
            toml::to_string(&table)
                .map(|text| text.trim_end().to_string())
                .map_err(|e| render_err(e.to_string()))
        }
    }
}

fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

/// TOML has no null: null table entries are dropped, null list items are an error.
/// Strings holding a TOML date or datetime are written back unquoted.
fn json_to_toml(value: &Value) -> Result<Option<toml::Value>, String> {
    Ok(Some(match value {
        Value::Null => return Ok(None),
        Value::Bool(b) => toml::Value::Boolean(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => toml::Value::Integer(i),
            None => toml::Value::Float(n.as_f64().ok_or("unsupported number")?),
        },
        Value::String(s) => match s.parse::<toml::value::Datetime>() {
            Ok(dt) if dt.date.is_some() => toml::Value::Datetime(dt),
            _ => toml::Value::String(s.clone()),
        },
        Value::Array(items) => {
            let mut arr = Vec::with_capacity(items.len());
            for item in items {
                arr.push(json_to_toml(item)?.ok_or("null list items are not supported in TOML")?);
            }
            toml::Value::Array(arr)
        }
        Value::Object(map) => {
            let mut table = toml::Table::new();
            for (key, value) in map {
                if let Some(v) = json_to_toml(value)? {
                    table.insert(key.clone(), v);
                }
            }
            toml::Value::Table(table)
        }
    }))
}
