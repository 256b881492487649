//! Per-type merge rules for a single field edit.

use crate::date::{format_date, parse_date};
use mattersync_model::{FieldClass, MetadataTree, SchemaIndex, is_truthy};
use serde_json::Value;
use tracing::{debug, warn};

/// What [`FieldCoercer::coerce`] did with the edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// A value was written to the target.
    Stored,
    /// The target was left untouched.
    Skipped,
}

/// Decides the value stored for an edited field.
///
/// Rules, first match wins:
/// - date fields store a formatted date; a falsy or unparseable value is
///   skipped,
/// - multiple image and file fields replace on a list and merge a single
///   value into the stored list without duplicates,
/// - everything else is overwritten verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldCoercer<'a> {
    date_format: Option<&'a str>,
}

impl<'a> FieldCoercer<'a> {
    pub fn new(date_format: Option<&'a str>) -> Self {
        Self { date_format }
    }

    /// Applies `raw` to `target[field]` according to how `schema` declares
    /// the field. Sibling fields are never touched.
    pub fn coerce(
        &self,
        target: &mut MetadataTree,
        field: &str,
        raw: Value,
        schema: &SchemaIndex<'_>,
    ) -> Coercion {
        match schema.classify(field) {
            FieldClass::Date => self.store_date(target, field, &raw),
            FieldClass::MultiImage | FieldClass::MultiFile => {
                store_multiple(target, field, raw);
                Coercion::Stored
            }
            FieldClass::Generic => {
                target.insert(field.to_string(), raw);
                Coercion::Stored
            }
        }
    }

    fn store_date(&self, target: &mut MetadataTree, field: &str, raw: &Value) -> Coercion {
        if !is_truthy(raw) {
            debug!("Ignoring empty value for date field `{}`", field);
            return Coercion::Skipped;
        }
        match parse_date(raw, self.date_format) {
            Some(dt) => {
                let formatted = format_date(&dt, self.date_format);
                target.insert(field.to_string(), Value::String(formatted));
                Coercion::Stored
            }
            None => {
                warn!("Cannot interpret {} as a date for `{}`", raw, field);
                Coercion::Skipped
            }
        }
    }
}

fn store_multiple(target: &mut MetadataTree, field: &str, raw: Value) {
    if raw.is_array() {
        target.insert(field.to_string(), raw);
        return;
    }

    let mut items = match target.get(field) {
        Some(Value::Array(items)) => items.clone(),
        Some(single) if is_truthy(single) => vec![single.clone()],
        _ => Vec::new(),
    };
    items.push(raw);

    let mut merged: Vec<Value> = Vec::with_capacity(items.len());
    for item in items {
        if is_truthy(&item) && !merged.contains(&item) {
            merged.push(item);
        }
    }
    target.insert(field.to_string(), Value::Array(merged));
}
