//! Mapping Invariant Tests
//!
//! Properties of the field table to index mapping conversion:
//! - Every leaf carries exactly the declared attributes minus required/array
//! - Building is deterministic and order independent
//! - Shared prefixes merge into a single properties node
//! - Malformed names are rejected, never mis-nested

use fieldmap::mapping::{build_mapping, MappingBuilder};
use fieldmap::schema::{DynamicMode, FieldDeclaration, FieldTable, MappingErrorCode};
use proptest::prelude::*;
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn table(entries: &[(&str, FieldDeclaration)]) -> FieldTable {
    entries
        .iter()
        .map(|(key, decl)| (key.to_string(), decl.clone()))
        .collect()
}

fn alert_fields() -> FieldTable {
    table(&[
        ("@timestamp", FieldDeclaration::new("date").required()),
        ("event.action", FieldDeclaration::keyword()),
        ("event.kind", FieldDeclaration::keyword().required()),
        (
            "kibana.alert.rule.name",
            FieldDeclaration::keyword().with_attribute("ignore_above", 1024),
        ),
        ("kibana.alert.rule.tags", FieldDeclaration::keyword().array()),
        ("kibana.alert.reason", FieldDeclaration::text()),
        ("tags", FieldDeclaration::keyword().array()),
    ])
}

// =============================================================================
// Shape Tests
// =============================================================================

/// The canonical example: one nested text field in strict mode.
#[test]
fn test_user_name_example() {
    let fields = table(&[("user.name", FieldDeclaration::text().required())]);

    let mapping = build_mapping(&fields, DynamicMode::Strict).unwrap();
    assert_eq!(
        mapping.to_value(),
        json!({
            "dynamic": "strict",
            "properties": { "user": { "properties": { "name": { "type": "text" } } } }
        })
    );
}

/// A realistic alert field map renders the full nested tree.
#[test]
fn test_alert_field_map() {
    let mapping = build_mapping(&alert_fields(), DynamicMode::Disabled).unwrap();

    assert_eq!(
        mapping.to_value(),
        json!({
            "dynamic": false,
            "properties": {
                "@timestamp": { "type": "date" },
                "event": {
                    "properties": {
                        "action": { "type": "keyword" },
                        "kind": { "type": "keyword" }
                    }
                },
                "kibana": {
                    "properties": {
                        "alert": {
                            "properties": {
                                "reason": { "type": "text" },
                                "rule": {
                                    "properties": {
                                        "name": { "type": "keyword", "ignore_above": 1024 },
                                        "tags": { "type": "keyword" }
                                    }
                                }
                            }
                        }
                    }
                },
                "tags": { "type": "keyword" }
            }
        })
    );
}

/// Rendered JSON text is identical across builds.
#[test]
fn test_rendered_json_is_stable() {
    let first = serde_json::to_string(&build_mapping(&alert_fields(), DynamicMode::Strict).unwrap())
        .unwrap();

    for _ in 0..50 {
        let again =
            serde_json::to_string(&build_mapping(&alert_fields(), DynamicMode::Strict).unwrap())
                .unwrap();
        assert_eq!(first, again);
    }
}

/// Every dynamic mode lands at the root as the engine expects it.
#[test]
fn test_dynamic_modes_at_root() {
    let fields = table(&[("a", FieldDeclaration::keyword())]);

    for (mode, expected) in [
        (DynamicMode::Strict, json!("strict")),
        (DynamicMode::Enabled, json!(true)),
        (DynamicMode::Disabled, json!(false)),
    ] {
        let mapping = MappingBuilder::new(mode).build(&fields).unwrap();
        assert_eq!(mapping.to_value()["dynamic"], expected);
    }
}

/// A nested-typed parent keeps its type next to the merged properties.
#[test]
fn test_nested_parent_with_children() {
    let fields = table(&[
        ("threat.indicator", FieldDeclaration::new("nested").array()),
        ("threat.indicator.ip", FieldDeclaration::new("ip")),
        ("threat.indicator.port", FieldDeclaration::new("long")),
    ]);

    let mapping = build_mapping(&fields, DynamicMode::Strict).unwrap();
    assert_eq!(
        mapping.to_value()["properties"]["threat"]["properties"]["indicator"],
        json!({
            "type": "nested",
            "properties": {
                "ip": { "type": "ip" },
                "port": { "type": "long" }
            }
        })
    );
}

// =============================================================================
// Rejection Tests
// =============================================================================

/// Empty segments are rejected wherever they appear.
#[test]
fn test_empty_segments_rejected() {
    for name in ["", ".", "..", ".user", "user.", "user..name"] {
        let fields = table(&[(name, FieldDeclaration::text())]);
        let err = build_mapping(&fields, DynamicMode::Strict).unwrap_err();
        assert_eq!(err.code(), MappingErrorCode::InvalidFieldName, "name {:?}", name);
    }
}

/// One bad name poisons the whole table; no partial mapping is returned.
#[test]
fn test_bad_name_among_good_ones() {
    let mut fields = alert_fields();
    fields.insert("event..outcome".into(), FieldDeclaration::keyword());

    assert!(build_mapping(&fields, DynamicMode::Strict).is_err());
}

/// A scalar parent cannot hold sub-fields.
#[test]
fn test_scalar_parent_conflict() {
    let fields = table(&[
        ("event", FieldDeclaration::keyword()),
        ("event.kind", FieldDeclaration::keyword()),
    ]);

    let err = build_mapping(&fields, DynamicMode::Strict).unwrap_err();
    assert_eq!(err.code(), MappingErrorCode::PathConflict);
}

/// Declared name must match its key.
#[test]
fn test_name_must_match_key() {
    let fields = table(&[("event.kind", FieldDeclaration::keyword().named("event.type"))]);

    let err = build_mapping(&fields, DynamicMode::Strict).unwrap_err();
    assert_eq!(err.code(), MappingErrorCode::NameMismatch);
}

// =============================================================================
// Property Tests
// =============================================================================

fn field_type_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["keyword", "text", "long", "date", "boolean", "ip"])
}

fn declaration_strategy() -> impl Strategy<Value = FieldDeclaration> {
    (
        field_type_strategy(),
        any::<bool>(),
        any::<bool>(),
        prop::option::of(1u32..4096),
    )
        .prop_map(|(field_type, required, array, ignore_above)| {
            let mut decl = FieldDeclaration::new(field_type);
            decl.required = required;
            decl.array = array;
            if let Some(limit) = ignore_above {
                decl = decl.with_attribute("ignore_above", limit);
            }
            decl
        })
}

/// Dotted paths over a tiny alphabet so prefixes collide often.
fn path_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-c]{1,2}", 1..4).prop_map(|segments| segments.join("."))
}

/// Tables whose paths never extend one another (no scalar parents).
fn table_strategy() -> impl Strategy<Value = FieldTable> {
    prop::collection::btree_map(path_strategy(), declaration_strategy(), 0..12).prop_map(
        |mut fields| {
            let keys: Vec<String> = fields.keys().cloned().collect();
            fields.retain(|key, _| {
                !keys
                    .iter()
                    .any(|other| other.len() > key.len() && other.starts_with(&format!("{}.", key)))
            });
            fields
        },
    )
}

proptest! {
    /// Each leaf holds exactly the declaration's attributes minus required/array.
    #[test]
    fn prop_leaf_attributes_exact(fields in table_strategy()) {
        let mapping = build_mapping(&fields, DynamicMode::Strict).unwrap();

        for (path, decl) in &fields {
            let attrs = mapping.get(path).unwrap();
            prop_assert!(!attrs.contains_key("required"));
            prop_assert!(!attrs.contains_key("array"));
            prop_assert_eq!(attrs, &decl.schema_attributes());
        }
    }

    /// The tree contains exactly the declared leaves.
    #[test]
    fn prop_leaf_paths_match_table(fields in table_strategy()) {
        let mapping = build_mapping(&fields, DynamicMode::Strict).unwrap();

        let expected: Vec<String> = fields.keys().cloned().collect();
        prop_assert_eq!(mapping.leaf_paths(), expected);
    }

    /// Building twice yields structurally equal trees.
    #[test]
    fn prop_build_is_idempotent(fields in table_strategy()) {
        let first = build_mapping(&fields, DynamicMode::Enabled).unwrap();
        let second = build_mapping(&fields, DynamicMode::Enabled).unwrap();
        prop_assert_eq!(first.to_value(), second.to_value());
        prop_assert_eq!(first, second);
    }

    /// Rendered paths follow `properties.<seg>.properties.<seg>...`.
    #[test]
    fn prop_rendered_path_layout(fields in table_strategy()) {
        let rendered = build_mapping(&fields, DynamicMode::Strict).unwrap().to_value();

        for (path, decl) in &fields {
            let mut node: &Value = &rendered;
            for segment in path.split('.') {
                node = &node["properties"][segment];
            }
            prop_assert_eq!(node, &Value::Object(decl.schema_attributes()));
        }
    }
}
