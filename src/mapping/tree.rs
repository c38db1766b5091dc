//! Mapping tree built from a field table
//!
//! The tree is a trie keyed by path segment. A node may carry leaf
//! attributes, children, or both (an `object` field with declared
//! sub-fields). Rendering turns children into a `properties` object:
//!
//! ```json
//! { "dynamic": "strict",
//!   "properties": { "user": { "properties": { "name": { "type": "text" } } } } }
//! ```

use serde::ser::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::schema::{is_container_type, DynamicMode, MappingError, MappingResult};

/// One segment of a mapping path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingNode {
    /// Index-schema attributes when a field is declared at this path
    attributes: Option<Map<String, Value>>,
    children: BTreeMap<String, MappingNode>,
}

impl MappingNode {
    pub fn attributes(&self) -> Option<&Map<String, Value>> {
        self.attributes.as_ref()
    }

    pub fn children(&self) -> &BTreeMap<String, MappingNode> {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.attributes.is_some()
    }

    pub(crate) fn set_attributes(&mut self, attributes: Map<String, Value>) {
        self.attributes = Some(attributes);
    }

    pub(crate) fn children_mut(&mut self) -> &mut BTreeMap<String, MappingNode> {
        &mut self.children
    }

    /// Fails if this node's own attributes cannot coexist with its children.
    fn check_conflicts(&self, path: &str) -> MappingResult<()> {
        if let Some(ref attributes) = self.attributes {
            if !self.children.is_empty() {
                if attributes.contains_key("properties") {
                    return Err(MappingError::path_conflict(
                        path,
                        "declares its own properties and is extended by other fields",
                    ));
                }
                if let Some(field_type) = attributes.get("type").and_then(Value::as_str) {
                    if !is_container_type(field_type) {
                        return Err(MappingError::path_conflict(
                            path,
                            format!("type '{}' cannot hold sub-fields", field_type),
                        ));
                    }
                }
            }
        }

        for (segment, child) in &self.children {
            child.check_conflicts(&join_path(path, segment))?;
        }
        Ok(())
    }

    fn to_value(&self) -> Value {
        let mut obj = self.attributes.clone().unwrap_or_default();
        if !self.children.is_empty() {
            obj.insert("properties".into(), render_properties(&self.children));
        }
        Value::Object(obj)
    }

    fn collect_leaf_paths(&self, path: &str, out: &mut Vec<String>) {
        if self.attributes.is_some() {
            out.push(path.to_string());
        }
        for (segment, child) in &self.children {
            child.collect_leaf_paths(&join_path(path, segment), out);
        }
    }
}

/// A complete index mapping: dynamic mode plus the property trie.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingTree {
    dynamic: DynamicMode,
    properties: BTreeMap<String, MappingNode>,
}

impl MappingTree {
    /// Wraps a property trie after checking it for path conflicts.
    pub(crate) fn new(
        dynamic: DynamicMode,
        properties: BTreeMap<String, MappingNode>,
    ) -> MappingResult<Self> {
        for (segment, node) in &properties {
            node.check_conflicts(segment)?;
        }
        Ok(Self {
            dynamic,
            properties,
        })
    }

    pub fn dynamic(&self) -> DynamicMode {
        self.dynamic
    }

    pub fn properties(&self) -> &BTreeMap<String, MappingNode> {
        &self.properties
    }

    /// Returns the node at a dotted path.
    pub fn node(&self, path: &str) -> Option<&MappingNode> {
        let mut segments = path.split('.');
        let mut node = self.properties.get(segments.next()?)?;
        for segment in segments {
            node = node.children.get(segment)?;
        }
        Some(node)
    }

    /// Returns the leaf attributes declared at a dotted path.
    pub fn get(&self, path: &str) -> Option<&Map<String, Value>> {
        self.node(path).and_then(MappingNode::attributes)
    }

    /// Returns every declared field path in sorted order.
    pub fn leaf_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        for (segment, node) in &self.properties {
            node.collect_leaf_paths(segment, &mut paths);
        }
        paths
    }

    pub fn field_count(&self) -> usize {
        self.leaf_paths().len()
    }

    /// Renders the mapping as JSON.
    pub fn to_value(&self) -> Value {
        let mut root = Map::new();
        root.insert("dynamic".into(), self.dynamic.as_value());
        root.insert("properties".into(), render_properties(&self.properties));
        Value::Object(root)
    }
}

impl Serialize for MappingTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

fn render_properties(children: &BTreeMap<String, MappingNode>) -> Value {
    let properties: Map<String, Value> = children
        .iter()
        .map(|(segment, node)| (segment.clone(), node.to_value()))
        .collect();
    Value::Object(properties)
}

fn join_path(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", prefix, segment)
    }
}
