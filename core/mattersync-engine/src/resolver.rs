//! Locates (and creates) the object an edit writes into.
//!
//! Two addressing modes:
//! - a plain parent chain of nested objects, outermost first;
//! - a block chain leading to a block field, then an instance of that block
//!   (selected by index or freshly appended), then whatever parent entries
//!   remain as plain descent inside the instance.
//!
//! The schema is walked in lock-step with the tree so the caller knows which
//! schema level the target object lives in.

use crate::error::PathError;
use crate::protocol::BlockFieldData;
use mattersync_model::{FieldDefinition, FieldKind, MetadataTree, SchemaIndex, is_truthy};
use serde_json::{Map, Value, json};
use tracing::debug;

/// Key a block instance uses to name its field group.
pub const FIELD_GROUP_KEY: &str = "fieldGroup";

/// A resolved write target.
#[derive(Debug)]
pub struct Resolved<'t, 's> {
    /// The object the edited field lives in.
    pub target: &'t mut MetadataTree,
    /// Schema level of `target`, when the path is declared by the schema.
    pub scope: Option<SchemaIndex<'s>>,
}

/// Schema cursor that follows the tree descent.
#[derive(Debug, Clone, Copy)]
struct Cursor<'s> {
    field: Option<&'s FieldDefinition>,
    scope: Option<SchemaIndex<'s>>,
}

impl<'s> Cursor<'s> {
    fn root(schema: SchemaIndex<'s>) -> Self {
        Self {
            field: None,
            scope: Some(schema),
        }
    }

    fn step(self, name: &str) -> Self {
        match self.scope.and_then(|s| s.descend(name)) {
            Some((field, child)) => Self {
                field: Some(field),
                scope: Some(child),
            },
            None => Self {
                field: None,
                scope: None,
            },
        }
    }
}

/// Resolves edit addresses against a metadata tree.
pub struct PathResolver;

impl PathResolver {
    /// Walks `parents` (or the block chain when `block` is present) from the
    /// root of `tree`, creating missing containers on the way.
    ///
    /// Missing or falsy intermediate values are replaced by an empty object.
    /// Existing containers are left untouched, so resolving the same chain
    /// twice only differs in what the caller then writes.
    pub fn resolve<'t, 's>(
        tree: &'t mut MetadataTree,
        parents: &[String],
        block: Option<&BlockFieldData>,
        schema: SchemaIndex<'s>,
    ) -> Result<Resolved<'t, 's>, PathError> {
        match block {
            None => {
                let (target, cursor) = descend_chain(tree, parents, Cursor::root(schema))?;
                Ok(Resolved {
                    target,
                    scope: cursor.scope,
                })
            }
            Some(block) => Self::resolve_block(tree, parents, block, schema),
        }
    }

    fn resolve_block<'t, 's>(
        tree: &'t mut MetadataTree,
        parents: &[String],
        block: &BlockFieldData,
        schema: SchemaIndex<'s>,
    ) -> Result<Resolved<'t, 's>, PathError> {
        let mut node = tree;
        let mut cursor = Cursor::root(schema);

        if let Some((last, init)) = block.parent_fields.split_last() {
            (node, cursor) = descend_chain(node, init, cursor)?;
            let parent_scope = cursor.scope;
            cursor = cursor.step(last);

            match (cursor.field, parent_scope) {
                (Some(field), Some(scope)) if field.kind == FieldKind::Block => {
                    let (instance, group) = block_instance(node, last, block)?;
                    node = instance;
                    cursor = Cursor {
                        field: Some(field),
                        scope: Some(scope.block_scope(field, &group)),
                    };
                }
                _ => node = descend_object(node, last)?,
            }
        }

        // The plain chain may repeat the first block parent; only that one
        // leading entry is treated as already consumed.
        let overlap = match (parents.first(), block.parent_fields.first()) {
            (Some(p), Some(b)) if p == b => 1,
            _ => 0,
        };
        let (target, cursor) = descend_chain(node, &parents[overlap..], cursor)?;

        Ok(Resolved {
            target,
            scope: cursor.scope,
        })
    }
}

fn descend_chain<'t, 's>(
    mut node: &'t mut MetadataTree,
    names: &[String],
    mut cursor: Cursor<'s>,
) -> Result<(&'t mut MetadataTree, Cursor<'s>), PathError> {
    for name in names {
        node = descend_object(node, name)?;
        cursor = cursor.step(name);
    }
    Ok((node, cursor))
}

fn descend_object<'t>(node: &'t mut MetadataTree, name: &str) -> Result<&'t mut MetadataTree, PathError> {
    let slot = node.entry(name).or_insert(Value::Null);
    if !is_truthy(slot) {
        debug!("Creating container `{}`", name);
        *slot = Value::Object(Map::new());
    }
    match slot {
        Value::Object(map) => Ok(map),
        other => Err(PathError::NotAContainer {
            segment: name.to_string(),
            found: kind_of(other),
        }),
    }
}

/// Returns the addressed instance of a block field and the field group it
/// follows.
fn block_instance<'t>(
    node: &'t mut MetadataTree,
    name: &str,
    block: &BlockFieldData,
) -> Result<(&'t mut MetadataTree, String), PathError> {
    let slot = node.entry(name).or_insert(Value::Null);
    let vacant = match &*slot {
        Value::Object(map) => map.is_empty(),
        other => !is_truthy(other),
    };
    if vacant {
        *slot = Value::Array(Vec::new());
    }
    let items = match slot {
        Value::Array(items) => items,
        other => {
            return Err(PathError::NotAList {
                field: name.to_string(),
                found: kind_of(other),
            });
        }
    };

    let index = match block.selected_index {
        Some(index) => index,
        None => {
            items.push(json!({ FIELD_GROUP_KEY: block.block_type }));
            debug!("Appended `{}` instance to `{}`", block.block_type, name);
            items.len() - 1
        }
    };

    let len = items.len();
    let instance = items
        .get_mut(index)
        .ok_or_else(|| PathError::BlockIndexOutOfRange {
            field: name.to_string(),
            index,
            len,
        })?;

    match instance {
        Value::Object(map) => {
            let group = map
                .get(FIELD_GROUP_KEY)
                .and_then(|v| v.as_str())
                .unwrap_or(block.block_type.as_str())
                .to_string();
            Ok((map, group))
        }
        other => Err(PathError::NotAContainer {
            segment: format!("{name}[{index}]"),
            found: kind_of(other),
        }),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
