use crate::schema::{FieldDefinition, FieldGroup, FieldKind};
use crate::value::is_truthy;
use crate::MetadataTree;
use serde_json::Value;

/// How an edit to a field is merged into the stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldClass {
    /// Stored as a formatted date string.
    Date,
    /// Multiple image: set-union on single additions, replace on lists.
    MultiImage,
    /// Multiple file: same merge rules as [`FieldClass::MultiImage`].
    MultiFile,
    /// Verbatim overwrite.
    Generic,
}

/// Read-only view over one level of a content-type schema.
///
/// Cheap to construct (two borrowed slices) and rebuilt for every edit.
/// Lookups for undeclared fields return `None` or an empty list.
#[derive(Debug, Clone, Copy)]
pub struct SchemaIndex<'a> {
    fields: &'a [FieldDefinition],
    groups: &'a [FieldGroup],
}

impl<'a> SchemaIndex<'a> {
    pub fn new(fields: &'a [FieldDefinition], groups: &'a [FieldGroup]) -> Self {
        Self { fields, groups }
    }

    /// Fields declared at this level.
    pub fn fields(&self) -> &'a [FieldDefinition] {
        self.fields
    }

    /// All fields at this level of the given kind, in declaration order.
    pub fn fields_of_type(&self, kind: &FieldKind) -> Vec<&'a FieldDefinition> {
        self.fields.iter().filter(|f| &f.kind == kind).collect()
    }

    pub fn find_field(&self, name: &str) -> Option<&'a FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The first slug-typed field, if the schema declares one.
    pub fn slug_field(&self) -> Option<&'a FieldDefinition> {
        self.fields.iter().find(|f| f.kind == FieldKind::Slug)
    }

    /// Whether this level declares a field of that name.
    pub fn declares(&self, name: &str) -> bool {
        self.find_field(name).is_some()
    }

    pub fn classify(&self, name: &str) -> FieldClass {
        match self.find_field(name) {
            Some(f) if f.kind == FieldKind::DateTime => FieldClass::Date,
            Some(f) if f.multiple && f.kind == FieldKind::Image => FieldClass::MultiImage,
            Some(f) if f.multiple && f.kind == FieldKind::File => FieldClass::MultiFile,
            _ => FieldClass::Generic,
        }
    }

    /// Moves one level down: returns the named field and the view over its
    /// own sub-fields.
    pub fn descend(&self, name: &str) -> Option<(&'a FieldDefinition, SchemaIndex<'a>)> {
        let field = self.find_field(name)?;
        Some((field, SchemaIndex::new(&field.fields, self.groups)))
    }

    /// The schema of one instance of a block field.
    ///
    /// A field group whose id matches `block_type` wins when the block accepts
    /// it (or does not restrict its groups); otherwise the block's own
    /// sub-fields apply.
    pub fn block_scope(&self, block: &'a FieldDefinition, block_type: &str) -> SchemaIndex<'a> {
        let accepts = block.field_group.is_empty()
            || block.field_group.iter().any(|id| id == block_type);
        match self.groups.iter().find(|g| accepts && g.id == block_type) {
            Some(group) => SchemaIndex::new(&group.fields, self.groups),
            None => SchemaIndex::new(&block.fields, self.groups),
        }
    }

    /// Required fields that hold no value, as field paths from this level.
    ///
    /// A value is empty when falsy or an empty list. Nested `fields` objects
    /// are searched recursively.
    pub fn empty_required_fields(&self, tree: &MetadataTree) -> Vec<Vec<&'a FieldDefinition>> {
        let mut found = Vec::new();
        self.collect_empty_required(tree, &mut Vec::new(), &mut found);
        found
    }

    fn collect_empty_required(
        &self,
        tree: &MetadataTree,
        parents: &mut Vec<&'a FieldDefinition>,
        found: &mut Vec<Vec<&'a FieldDefinition>>,
    ) {
        for field in self.fields {
            let value = tree.get(&field.name);

            if field.required && value.is_none_or(is_empty_value) {
                let mut path = parents.clone();
                path.push(field);
                found.push(path);
            }

            if field.kind == FieldKind::Fields
                && let Some(Value::Object(child)) = value
            {
                parents.push(field);
                SchemaIndex::new(&field.fields, self.groups).collect_empty_required(
                    child,
                    parents,
                    found,
                );
                parents.pop();
            }
        }
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Array(items) => items.is_empty(),
        other => !is_truthy(other),
    }
}
