//! fieldmap - build nested search-index mappings from flat field maps
//!
//! - `schema`: field declarations, validation, on-disk registry
//! - `mapping`: field table to index mapping conversion
//! - `observability`: structured logging
//! - `cli`: command-line front end

pub mod cli;
pub mod mapping;
pub mod observability;
pub mod schema;

pub use mapping::{build_mapping, MappingBuilder, MappingTree};
pub use schema::{DynamicMode, FieldDeclaration, FieldMap, FieldTable, MappingError};
