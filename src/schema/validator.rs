//! Field-name and document validation
//!
//! Field names:
//! - must be non-empty
//! - must not contain empty segments (leading, trailing or doubled dots)
//! - a declared `name` must equal its table key
//!
//! Documents, checked against a field table:
//! - `required` fields resolve to at least one non-null value
//! - `array` fields hold arrays, all other fields hold single values
//! - undeclared fields are rejected when the dynamic mode is strict,
//!   including keys nested under a field declared with a scalar type
//!
//! Arrays met on intermediate path segments are walked element by element,
//! so `items.sku` matches `{"items": [{"sku": "a"}, {"sku": "b"}]}`.

use serde_json::{Map, Value};
use std::collections::BTreeSet;

use super::errors::{MappingError, MappingResult, ValidationDetails};
use super::types::{is_container_type, DynamicMode, FieldTable};

/// Splits a dotted field path into its segments.
///
/// Fails on an empty path or any empty segment.
pub fn split_field_path(name: &str) -> MappingResult<Vec<&str>> {
    if name.is_empty() {
        return Err(MappingError::invalid_field_name(name, "name is empty"));
    }

    let segments: Vec<&str> = name.split('.').collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(MappingError::invalid_field_name(name, "empty path segment"));
    }

    Ok(segments)
}

/// Validates a single dotted field path.
pub fn validate_field_name(name: &str) -> MappingResult<()> {
    split_field_path(name).map(|_| ())
}

/// Validates a field map ID, which becomes part of the registry file name.
pub fn validate_field_map_id(field_map_id: &str) -> MappingResult<()> {
    if field_map_id.trim().is_empty() {
        return Err(MappingError::invalid_field_map_id(field_map_id, "id is empty"));
    }

    if field_map_id.contains(['/', '\\']) || field_map_id.contains("..") {
        return Err(MappingError::invalid_field_map_id(
            field_map_id,
            "id must not contain path separators or '..'",
        ));
    }

    Ok(())
}

/// Validates every key and declaration of a field table.
///
/// Keys are checked in table order, so the first failure reported is
/// deterministic.
pub fn validate_table(table: &FieldTable) -> MappingResult<()> {
    for (key, decl) in table {
        validate_field_name(key)?;

        if let Some(ref declared) = decl.name {
            if declared != key {
                return Err(MappingError::name_mismatch(key, declared));
            }
        }

        if decl.field_type.trim().is_empty() {
            return Err(MappingError::missing_type(key));
        }
    }

    Ok(())
}

/// Validates documents against a field table.
///
/// Validator does not mutate documents.
pub struct FieldTableValidator<'a> {
    table: &'a FieldTable,
    dynamic: DynamicMode,
    /// Every proper prefix of a declared path ("a" and "a.b" for "a.b.c")
    prefixes: BTreeSet<String>,
}

impl<'a> FieldTableValidator<'a> {
    /// Creates a validator for the given table.
    ///
    /// Field names are checked up front so later path walks never see an
    /// empty segment.
    pub fn new(table: &'a FieldTable, dynamic: DynamicMode) -> MappingResult<Self> {
        validate_table(table)?;

        let mut prefixes = BTreeSet::new();
        for key in table.keys() {
            let mut end = 0;
            while let Some(offset) = key[end..].find('.') {
                end += offset;
                prefixes.insert(key[..end].to_string());
                end += 1;
            }
        }

        Ok(Self {
            table,
            dynamic,
            prefixes,
        })
    }

    /// Validates a document against the table.
    ///
    /// # Errors
    ///
    /// Returns `FIELDMAP_DOCUMENT_INVALID` with the first offending field.
    pub fn validate_document(&self, document: &Value) -> MappingResult<()> {
        let root = document.as_object().ok_or_else(|| {
            MappingError::document_invalid(ValidationDetails::new(
                "$root",
                "object",
                json_type_name(document),
            ))
        })?;

        for (path, decl) in self.table {
            let segments: Vec<&str> = path.split('.').collect();
            let values: Vec<&Value> = resolve(document, &segments)
                .into_iter()
                .filter(|v| !v.is_null())
                .collect();

            if values.is_empty() {
                if decl.required {
                    return Err(MappingError::document_invalid(
                        ValidationDetails::missing_field(path),
                    ));
                }
                continue;
            }

            for value in values {
                match (decl.array, value.is_array()) {
                    (true, false) => {
                        return Err(MappingError::document_invalid(
                            ValidationDetails::expected_array(path, json_type_name(value)),
                        ));
                    }
                    (false, true) => {
                        return Err(MappingError::document_invalid(
                            ValidationDetails::unexpected_array(path, &decl.field_type),
                        ));
                    }
                    _ => {}
                }
            }
        }

        if self.dynamic.is_strict() {
            self.check_undeclared(root, "")?;
        }

        Ok(())
    }

    /// Rejects keys that are neither declared nor on the way to a declared path.
    fn check_undeclared(&self, obj: &Map<String, Value>, path_prefix: &str) -> MappingResult<()> {
        for (key, value) in obj {
            let path = make_path(path_prefix, key);
            let declared = self.table.get(&path);
            let is_prefix = self.prefixes.contains(&path);

            if declared.is_none() && !is_prefix {
                return Err(MappingError::document_invalid(
                    ValidationDetails::undeclared_field(path),
                ));
            }

            let descend = is_prefix
                || declared.map_or(false, |decl| is_container_type(&decl.field_type));
            if descend {
                self.check_nested(value, &path)?;
            } else {
                reject_sub_fields(value, &path)?;
            }
        }

        Ok(())
    }

    fn check_nested(&self, value: &Value, path: &str) -> MappingResult<()> {
        match value {
            Value::Object(obj) => self.check_undeclared(obj, path),
            Value::Array(items) => {
                for item in items {
                    self.check_nested(item, path)?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

/// A scalar field holding an object declares nothing below it, so any key
/// found there is undeclared.
fn reject_sub_fields(value: &Value, path: &str) -> MappingResult<()> {
    match value {
        Value::Object(obj) => match obj.keys().next() {
            Some(key) => Err(MappingError::document_invalid(
                ValidationDetails::undeclared_field(make_path(path, key)),
            )),
            None => Ok(()),
        },
        Value::Array(items) => items
            .iter()
            .try_for_each(|item| reject_sub_fields(item, path)),
        _ => Ok(()),
    }
}

/// Collects every value reachable through `segments`, flattening arrays on
/// the way.
fn resolve<'v>(root: &'v Value, segments: &[&str]) -> Vec<&'v Value> {
    let mut current = vec![root];
    for segment in segments {
        let mut next = Vec::new();
        for value in current {
            collect_child(value, segment, &mut next);
        }
        current = next;
    }
    current
}

fn collect_child<'v>(value: &'v Value, segment: &str, out: &mut Vec<&'v Value>) {
    match value {
        Value::Object(obj) => {
            if let Some(child) = obj.get(segment) {
                out.push(child);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_child(item, segment, out);
            }
        }
        _ => {}
    }
}

/// Returns the JSON type name for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Creates a field path from prefix and field name.
fn make_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}
