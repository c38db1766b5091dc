//! Field Map Registry Tests
//!
//! - Field maps survive a save/load cycle unchanged
//! - Registered field maps are immutable
//! - Malformed files on disk fail the whole load
//! - Documents are checked against required/array metadata

use fieldmap::schema::{
    DynamicMode, FieldDeclaration, FieldMap, FieldMapRegistry, FieldTable, FieldTableValidator,
    MappingErrorCode,
};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn users_field_map() -> FieldMap {
    let mut fields = FieldTable::new();
    fields.insert("user.id".to_string(), FieldDeclaration::keyword().required());
    fields.insert("user.name".to_string(), FieldDeclaration::text());
    fields.insert("user.roles".to_string(), FieldDeclaration::keyword().array());

    FieldMap::new("users", fields).with_description("Directory users")
}

fn setup_registry() -> (TempDir, FieldMapRegistry) {
    let tmp = TempDir::new().unwrap();
    let mut registry = FieldMapRegistry::new(tmp.path());
    registry.register(users_field_map()).unwrap();
    (tmp, registry)
}

fn write_field_map_file(tmp: &TempDir, name: &str, content: &str) {
    let dir = tmp.path().join("field_maps");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(name), content).unwrap();
}

// =============================================================================
// Persistence Tests
// =============================================================================

/// A saved field map loads back identical.
#[test]
fn test_save_load_cycle() {
    let tmp = TempDir::new().unwrap();
    let registry = FieldMapRegistry::new(tmp.path());
    let path = registry.save(&users_field_map()).unwrap();
    assert!(path.ends_with("field_map_users.json"));

    let mut reloaded = FieldMapRegistry::new(tmp.path());
    reloaded.load_all().unwrap();

    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded.get("users").unwrap(), &users_field_map());
}

/// Hand-written files with extra attributes and an explicit dynamic mode load.
#[test]
fn test_load_hand_written_file() {
    let tmp = TempDir::new().unwrap();
    write_field_map_file(
        &tmp,
        "field_map_alerts.json",
        r#"{
            "field_map_id": "alerts",
            "dynamic": false,
            "fields": {
                "@timestamp": { "type": "date", "required": true },
                "rule.name": { "type": "keyword", "ignore_above": 1024 }
            }
        }"#,
    );

    let mut registry = FieldMapRegistry::new(tmp.path());
    registry.load_all().unwrap();

    let mapping = registry.build("alerts").unwrap();
    assert_eq!(
        mapping.to_value(),
        json!({
            "dynamic": false,
            "properties": {
                "@timestamp": { "type": "date" },
                "rule": { "properties": { "name": { "type": "keyword", "ignore_above": 1024 } } }
            }
        })
    );
}

/// Files are loaded in a stable order and all of them are registered.
#[test]
fn test_load_many_files() {
    let tmp = TempDir::new().unwrap();
    for id in ["c", "a", "b"] {
        write_field_map_file(
            &tmp,
            &format!("field_map_{}.json", id),
            &format!(r#"{{ "field_map_id": "{}", "fields": {{ "x": {{ "type": "keyword" }} }} }}"#, id),
        );
    }

    let mut registry = FieldMapRegistry::new(tmp.path());
    registry.load_all().unwrap();

    let ids: Vec<&str> = registry.all().iter().map(|m| m.field_map_id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
}

// =============================================================================
// Malformed File Tests
// =============================================================================

/// A file with an empty path segment is rejected at load.
#[test]
fn test_load_rejects_bad_field_name() {
    let tmp = TempDir::new().unwrap();
    write_field_map_file(
        &tmp,
        "field_map_bad.json",
        r#"{ "field_map_id": "bad", "fields": { "rule..name": { "type": "keyword" } } }"#,
    );

    let mut registry = FieldMapRegistry::new(tmp.path());
    let err = registry.load_all().unwrap_err();
    assert_eq!(err.code(), MappingErrorCode::MalformedFieldMap);
    assert!(err.is_fatal());
    assert!(err.message().contains("rule..name"));
}

/// A file whose fields conflict is rejected at load.
#[test]
fn test_load_rejects_path_conflict() {
    let tmp = TempDir::new().unwrap();
    write_field_map_file(
        &tmp,
        "field_map_conflict.json",
        r#"{ "field_map_id": "conflict", "fields": {
            "host": { "type": "keyword" },
            "host.name": { "type": "keyword" }
        } }"#,
    );

    let mut registry = FieldMapRegistry::new(tmp.path());
    let err = registry.load_all().unwrap_err();
    assert_eq!(err.code(), MappingErrorCode::MalformedFieldMap);
}

/// Two files declaring the same ID are rejected.
#[test]
fn test_load_rejects_duplicate_ids() {
    let tmp = TempDir::new().unwrap();
    let body = r#"{ "field_map_id": "dup", "fields": {} }"#;
    write_field_map_file(&tmp, "field_map_dup.json", body);
    write_field_map_file(&tmp, "field_map_dup_copy.json", body);

    let mut registry = FieldMapRegistry::new(tmp.path());
    let err = registry.load_all().unwrap_err();
    assert!(err.message().contains("Duplicate"));
}

/// A declaration without a type is not a field declaration.
#[test]
fn test_load_rejects_missing_type() {
    let tmp = TempDir::new().unwrap();
    write_field_map_file(
        &tmp,
        "field_map_untyped.json",
        r#"{ "field_map_id": "untyped", "fields": { "x": { "required": true } } }"#,
    );

    let mut registry = FieldMapRegistry::new(tmp.path());
    assert!(registry.load_all().is_err());
}

// =============================================================================
// Immutability Tests
// =============================================================================

/// Registering the same ID twice fails.
#[test]
fn test_register_twice_fails() {
    let (_tmp, mut registry) = setup_registry();

    let err = registry.register(users_field_map()).unwrap_err();
    assert_eq!(err.code(), MappingErrorCode::Immutable);
    assert_eq!(registry.len(), 1);
}

/// Saving over an existing file fails and leaves the file untouched.
#[test]
fn test_save_does_not_overwrite() {
    let tmp = TempDir::new().unwrap();
    let registry = FieldMapRegistry::new(tmp.path());
    let path = registry.save(&users_field_map()).unwrap();
    let before = fs::read_to_string(&path).unwrap();

    let changed = users_field_map().with_dynamic(DynamicMode::Enabled);
    let err = registry.save(&changed).unwrap_err();
    assert_eq!(err.code(), MappingErrorCode::Immutable);
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

/// A field map loaded from a differently named file still blocks a save of
/// the same ID, so the directory never ends up holding two copies.
#[test]
fn test_save_blocked_by_id_from_other_file() {
    let tmp = TempDir::new().unwrap();
    write_field_map_file(
        &tmp,
        "custom.json",
        r#"{ "field_map_id": "users", "fields": { "user.id": { "type": "keyword" } } }"#,
    );

    let mut registry = FieldMapRegistry::new(tmp.path());
    registry.load_all().unwrap();

    let err = registry.save(&users_field_map()).unwrap_err();
    assert_eq!(err.code(), MappingErrorCode::Immutable);

    let mut reloaded = FieldMapRegistry::new(tmp.path());
    reloaded.load_all().unwrap();
    assert_eq!(reloaded.len(), 1);
}

/// IDs that cannot be used as a file name are caller errors, not corruption.
#[test]
fn test_save_rejects_path_like_ids() {
    let tmp = TempDir::new().unwrap();
    let registry = FieldMapRegistry::new(tmp.path());

    for id in ["", "../../escaped", "a/b"] {
        let mut map = users_field_map();
        map.field_map_id = id.to_string();

        let err = registry.save(&map).unwrap_err();
        assert_eq!(err.code(), MappingErrorCode::InvalidFieldMapId);
        assert!(!err.is_fatal());
    }
}

// =============================================================================
// Document Validation Tests
// =============================================================================

/// A document carrying every required field passes.
#[test]
fn test_document_passes() {
    let (_tmp, registry) = setup_registry();
    let map = registry.get("users").unwrap();
    let validator = FieldTableValidator::new(&map.fields, DynamicMode::Strict).unwrap();

    let doc = json!({ "user": { "id": "u1", "name": "Ada", "roles": ["admin"] } });
    assert!(validator.validate_document(&doc).is_ok());
}

/// Validation outcome is the same every time.
#[test]
fn test_document_validation_is_deterministic() {
    let (_tmp, registry) = setup_registry();
    let map = registry.get("users").unwrap();
    let validator = FieldTableValidator::new(&map.fields, DynamicMode::Strict).unwrap();

    let doc = json!({ "user": { "name": "Ada", "nickname": "A" } });
    let first = validator.validate_document(&doc).unwrap_err();
    for _ in 0..100 {
        let again = validator.validate_document(&doc).unwrap_err();
        assert_eq!(again.field(), first.field());
    }
    assert_eq!(first.field(), Some("user.id"));
}

/// Single role where an array is declared fails.
#[test]
fn test_document_array_mismatch() {
    let (_tmp, registry) = setup_registry();
    let map = registry.get("users").unwrap();
    let validator = FieldTableValidator::new(&map.fields, DynamicMode::Strict).unwrap();

    let doc = json!({ "user": { "id": "u1", "roles": "admin" } });
    let err = validator.validate_document(&doc).unwrap_err();
    assert_eq!(err.code(), MappingErrorCode::DocumentInvalid);
    assert_eq!(err.field(), Some("user.roles"));
}

/// Undeclared fields only fail in strict mode.
#[test]
fn test_document_undeclared_field_by_mode() {
    let (_tmp, registry) = setup_registry();
    let map = registry.get("users").unwrap();
    let doc = json!({ "user": { "id": "u1" }, "session": { "ip": "10.0.0.1" } });

    let strict = FieldTableValidator::new(&map.fields, DynamicMode::Strict).unwrap();
    assert_eq!(
        strict.validate_document(&doc).unwrap_err().field(),
        Some("session")
    );

    let lenient = FieldTableValidator::new(&map.fields, DynamicMode::Disabled).unwrap();
    assert!(lenient.validate_document(&doc).is_ok());
}

/// A scalar field holding an object leaks undeclared sub-fields in strict mode.
#[test]
fn test_document_object_under_scalar_field() {
    let (_tmp, registry) = setup_registry();
    let map = registry.get("users").unwrap();
    let validator = FieldTableValidator::new(&map.fields, DynamicMode::Strict).unwrap();

    let doc = json!({ "user": { "id": "u1", "name": { "x": 1 } } });
    let err = validator.validate_document(&doc).unwrap_err();
    assert_eq!(err.code(), MappingErrorCode::DocumentInvalid);
    assert_eq!(err.field(), Some("user.name.x"));
}
