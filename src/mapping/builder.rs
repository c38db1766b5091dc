//! Field table to index mapping conversion
//!
//! Every field is placed independently: its dotted key is split into
//! segments, intermediate nodes are created or reused, and the leaf
//! attributes land on the last segment. The trie is rendered only after all
//! fields are in, so table order never affects the result.

use std::collections::BTreeMap;

use crate::observability::Logger;
use crate::schema::{
    split_field_path, validate_table, DynamicMode, FieldTable, MappingError, MappingResult,
};

use super::tree::{MappingNode, MappingTree};

/// Builds index mappings with a fixed dynamic mode.
///
/// Stateless; one builder can be reused for any number of tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct MappingBuilder {
    dynamic: DynamicMode,
}

impl MappingBuilder {
    pub fn new(dynamic: DynamicMode) -> Self {
        Self { dynamic }
    }

    pub fn dynamic(&self) -> DynamicMode {
        self.dynamic
    }

    /// Converts a field table into a mapping tree.
    ///
    /// # Errors
    ///
    /// - `FIELDMAP_INVALID_FIELD_NAME` for an empty name or empty segment
    /// - `FIELDMAP_NAME_MISMATCH` when a declared name differs from its key
    /// - `FIELDMAP_MISSING_TYPE` for an empty type
    /// - `FIELDMAP_PATH_CONFLICT` when a field extends a non-object leaf
    pub fn build(&self, fields: &FieldTable) -> MappingResult<MappingTree> {
        validate_table(fields)?;

        let mut properties: BTreeMap<String, MappingNode> = BTreeMap::new();
        for (key, decl) in fields {
            let segments = split_field_path(key)?;
            let (leaf, parents) = segments
                .split_last()
                .ok_or_else(|| MappingError::invalid_field_name(key.as_str(), "name is empty"))?;

            let mut level = &mut properties;
            for segment in parents {
                level = level
                    .entry((*segment).to_string())
                    .or_default()
                    .children_mut();
            }

            level
                .entry((*leaf).to_string())
                .or_default()
                .set_attributes(decl.schema_attributes());

            Logger::trace(
                "FIELD_MAPPED",
                &[("field", key.as_str()), ("type", decl.field_type.as_str())],
            );
        }

        MappingTree::new(self.dynamic, properties)
    }
}

/// Converts a field table into a mapping tree rooted at `dynamic`.
pub fn build_mapping(fields: &FieldTable, dynamic: DynamicMode) -> MappingResult<MappingTree> {
    MappingBuilder::new(dynamic).build(fields)
}
