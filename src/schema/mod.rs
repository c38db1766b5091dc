//! Field declarations, validation and the on-disk field map registry
//!
//! # Design Principles
//!
//! - A field path is the table key; segments are never empty
//! - `required` and `array` are declaration metadata, never mapping attributes
//! - Registered field maps are immutable
//! - Validation is deterministic and never mutates its input

mod errors;
mod loader;
mod types;
mod validator;

pub use errors::{MappingError, MappingErrorCode, MappingResult, Severity, ValidationDetails};
pub use loader::FieldMapRegistry;
pub use types::{is_container_type, DynamicMode, FieldDeclaration, FieldMap, FieldTable};
pub use validator::{
    split_field_path, validate_field_map_id, validate_field_name, validate_table,
    FieldTableValidator,
};
