//! Index mapping construction
//!
//! Turns a flat, dot-path-keyed field table into the nested mapping document
//! a search engine expects. Pure and synchronous: no I/O, no shared state.
//!
//! ```ignore
//! use fieldmap::mapping::build_mapping;
//! use fieldmap::schema::{DynamicMode, FieldDeclaration, FieldTable};
//!
//! let mut fields = FieldTable::new();
//! fields.insert("user.name".into(), FieldDeclaration::text().required());
//!
//! let mapping = build_mapping(&fields, DynamicMode::Strict)?;
//! // {"dynamic":"strict","properties":{"user":{"properties":{"name":{"type":"text"}}}}}
//! ```

mod builder;
mod tree;

pub use builder::{build_mapping, MappingBuilder};
pub use tree::{MappingNode, MappingTree};
