//! Field map registry backed by JSON files
//!
//! - Field maps stored at `<data_dir>/field_maps/field_map_<id>.json`
//! - One file per field map
//! - Registered field maps are immutable
//! - Malformed files fail the whole load (FATAL)

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::mapping::{MappingBuilder, MappingTree};
use crate::observability::{log_event_with_fields, Event};

use super::errors::{MappingError, MappingResult};
use super::types::{DynamicMode, FieldMap};
use super::validator::{validate_field_map_id, validate_table};

/// Registry that reads field map files from disk and keeps them in memory.
pub struct FieldMapRegistry {
    /// Directory containing field map files
    field_map_dir: PathBuf,
    /// Dynamic mode used for field maps that do not declare one
    default_dynamic: DynamicMode,
    field_maps: HashMap<String, FieldMap>,
}

impl FieldMapRegistry {
    /// Creates a registry for the given data directory.
    ///
    /// Field map files are expected at `<data_dir>/field_maps/`.
    pub fn new(data_dir: &Path) -> Self {
        Self {
            field_map_dir: data_dir.join("field_maps"),
            default_dynamic: DynamicMode::default(),
            field_maps: HashMap::new(),
        }
    }

    /// Sets the dynamic mode used when a field map declares none.
    pub fn with_default_dynamic(mut self, dynamic: DynamicMode) -> Self {
        self.default_dynamic = dynamic;
        self
    }

    pub fn field_map_dir(&self) -> &Path {
        &self.field_map_dir
    }

    pub fn default_dynamic(&self) -> DynamicMode {
        self.default_dynamic
    }

    /// Loads every `.json` file from the field map directory.
    ///
    /// A missing directory is created and yields an empty registry.
    pub fn load_all(&mut self) -> MappingResult<()> {
        if !self.field_map_dir.exists() {
            fs::create_dir_all(&self.field_map_dir).map_err(|e| {
                MappingError::malformed_field_map(
                    self.field_map_dir.display().to_string(),
                    format!("Failed to create field map directory: {}", e),
                )
            })?;
            return Ok(());
        }

        let entries = fs::read_dir(&self.field_map_dir).map_err(|e| {
            MappingError::malformed_field_map(
                self.field_map_dir.display().to_string(),
                format!("Failed to read field map directory: {}", e),
            )
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                MappingError::malformed_field_map(
                    self.field_map_dir.display().to_string(),
                    format!("Failed to read directory entry: {}", e),
                )
            })?;

            let path = entry.path();
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            paths.push(path);
        }

        // read_dir order is platform dependent
        paths.sort();
        for path in &paths {
            self.load_field_map_file(path)?;
        }

        let count = self.field_maps.len().to_string();
        let dir = self.field_map_dir.display().to_string();
        log_event_with_fields(
            Event::FieldMapsLoaded,
            &[("count", count.as_str()), ("dir", dir.as_str())],
        );

        Ok(())
    }

    fn load_field_map_file(&mut self, path: &Path) -> MappingResult<()> {
        let content = fs::read_to_string(path).map_err(|e| {
            MappingError::malformed_field_map(
                path.display().to_string(),
                format!("Failed to read file: {}", e),
            )
        })?;

        let field_map: FieldMap = serde_json::from_str(&content).map_err(|e| {
            MappingError::malformed_field_map(path.display().to_string(), format!("Invalid JSON: {}", e))
        })?;

        self.check_structure(&field_map).map_err(|e| {
            MappingError::malformed_field_map(path.display().to_string(), e.message())
        })?;

        if self.field_maps.contains_key(&field_map.field_map_id) {
            return Err(MappingError::malformed_field_map(
                path.display().to_string(),
                format!("Duplicate field map id '{}'", field_map.field_map_id),
            ));
        }

        self.field_maps
            .insert(field_map.field_map_id.clone(), field_map);
        Ok(())
    }

    /// Checks the ID, names and types, then builds once to surface path
    /// conflicts.
    fn check_structure(&self, field_map: &FieldMap) -> MappingResult<()> {
        validate_field_map_id(&field_map.field_map_id)?;
        validate_table(&field_map.fields)?;
        MappingBuilder::new(field_map.dynamic_or(self.default_dynamic))
            .build(&field_map.fields)
            .map(|_| ())
    }

    /// Registers a field map in memory.
    pub fn register(&mut self, field_map: FieldMap) -> MappingResult<()> {
        self.check_structure(&field_map)
            .map_err(|e| e.in_field_map(&field_map.field_map_id))?;

        if self.field_maps.contains_key(&field_map.field_map_id) {
            return Err(MappingError::immutable(&field_map.field_map_id));
        }

        log_event_with_fields(
            Event::FieldMapRegistered,
            &[("field_map_id", field_map.field_map_id.as_str())],
        );
        self.field_maps
            .insert(field_map.field_map_id.clone(), field_map);
        Ok(())
    }

    pub fn get(&self, field_map_id: &str) -> Option<&FieldMap> {
        self.field_maps.get(field_map_id)
    }

    pub fn exists(&self, field_map_id: &str) -> bool {
        self.field_maps.contains_key(field_map_id)
    }

    /// Returns all field maps sorted by ID.
    pub fn all(&self) -> Vec<&FieldMap> {
        let mut maps: Vec<&FieldMap> = self.field_maps.values().collect();
        maps.sort_by(|a, b| a.field_map_id.cmp(&b.field_map_id));
        maps
    }

    pub fn len(&self) -> usize {
        self.field_maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.field_maps.is_empty()
    }

    /// Builds the index mapping of a registered field map.
    pub fn build(&self, field_map_id: &str) -> MappingResult<MappingTree> {
        let field_map = self
            .get(field_map_id)
            .ok_or_else(|| MappingError::unknown_field_map(field_map_id))?;

        self.build_with(field_map_id, field_map.dynamic_or(self.default_dynamic))
    }

    /// Builds the index mapping of a registered field map with an explicit
    /// dynamic mode, ignoring the one it declares.
    pub fn build_with(&self, field_map_id: &str, dynamic: DynamicMode) -> MappingResult<MappingTree> {
        let field_map = self
            .get(field_map_id)
            .ok_or_else(|| MappingError::unknown_field_map(field_map_id))?;

        MappingBuilder::new(dynamic)
            .build(&field_map.fields)
            .map_err(|e| e.in_field_map(field_map_id))
    }

    /// Writes a field map file.
    ///
    /// Refuses an ID already held by this registry, whatever file it was
    /// loaded from, and refuses to overwrite an existing file.
    pub fn save(&self, field_map: &FieldMap) -> MappingResult<PathBuf> {
        self.check_structure(field_map)
            .map_err(|e| e.in_field_map(&field_map.field_map_id))?;

        let filename = format!("field_map_{}.json", field_map.field_map_id);
        let path = self.field_map_dir.join(&filename);

        if self.exists(&field_map.field_map_id) || path.exists() {
            return Err(MappingError::immutable(&field_map.field_map_id));
        }

        if !self.field_map_dir.exists() {
            fs::create_dir_all(&self.field_map_dir).map_err(|e| {
                MappingError::malformed_field_map(
                    self.field_map_dir.display().to_string(),
                    format!("Failed to create field map directory: {}", e),
                )
            })?;
        }

        let content = serde_json::to_string_pretty(field_map).map_err(|e| {
            MappingError::malformed_field_map(
                path.display().to_string(),
                format!("Failed to serialize field map: {}", e),
            )
        })?;

        fs::write(&path, content).map_err(|e| {
            MappingError::malformed_field_map(
                path.display().to_string(),
                format!("Failed to write file: {}", e),
            )
        })?;

        let written = path.display().to_string();
        log_event_with_fields(
            Event::FieldMapSaved,
            &[
                ("field_map_id", field_map.field_map_id.as_str()),
                ("path", written.as_str()),
            ],
        );

        Ok(path)
    }
}
