//! Field map error types
//!
//! Error codes:
//! - FIELDMAP_INVALID_FIELD_NAME (REJECT)
//! - FIELDMAP_NAME_MISMATCH (REJECT)
//! - FIELDMAP_MISSING_TYPE (REJECT)
//! - FIELDMAP_PATH_CONFLICT (REJECT)
//! - FIELDMAP_INVALID_FIELD_MAP_ID (REJECT)
//! - FIELDMAP_UNKNOWN_FIELD_MAP (REJECT)
//! - FIELDMAP_IMMUTABLE (REJECT)
//! - FIELDMAP_DOCUMENT_INVALID (REJECT)
//! - FIELDMAP_MALFORMED_FIELD_MAP (FATAL)

use std::fmt;

/// Severity levels for field map errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Caller input rejected
    Reject,
    /// Registry on disk is unusable
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingErrorCode {
    /// Empty field path or empty path segment
    InvalidFieldName,
    /// Declared `name` differs from the table key
    NameMismatch,
    /// Declaration has an empty `type`
    MissingType,
    /// A field extends a path whose leaf cannot hold properties
    PathConflict,
    /// Field map ID is empty or cannot be used as a file name
    InvalidFieldMapId,
    /// Field map ID not registered
    UnknownFieldMap,
    /// Attempt to replace an existing field map
    Immutable,
    /// Document does not satisfy the field declarations
    DocumentInvalid,
    /// Field map file cannot be read or parsed
    MalformedFieldMap,
}

impl MappingErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            MappingErrorCode::InvalidFieldName => "FIELDMAP_INVALID_FIELD_NAME",
            MappingErrorCode::NameMismatch => "FIELDMAP_NAME_MISMATCH",
            MappingErrorCode::MissingType => "FIELDMAP_MISSING_TYPE",
            MappingErrorCode::PathConflict => "FIELDMAP_PATH_CONFLICT",
            MappingErrorCode::InvalidFieldMapId => "FIELDMAP_INVALID_FIELD_MAP_ID",
            MappingErrorCode::UnknownFieldMap => "FIELDMAP_UNKNOWN_FIELD_MAP",
            MappingErrorCode::Immutable => "FIELDMAP_IMMUTABLE",
            MappingErrorCode::DocumentInvalid => "FIELDMAP_DOCUMENT_INVALID",
            MappingErrorCode::MalformedFieldMap => "FIELDMAP_MALFORMED_FIELD_MAP",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            MappingErrorCode::MalformedFieldMap => Severity::Fatal,
            _ => Severity::Reject,
        }
    }
}

impl fmt::Display for MappingErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Document validation failure details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDetails {
    /// Field path (e.g., "user.address.city")
    pub field: String,
    /// Expected type or condition
    pub expected: String,
    /// Actual value or type found
    pub actual: String,
}

impl ValidationDetails {
    pub fn new(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::new(field, "field to be present", "missing")
    }

    pub fn undeclared_field(field: impl Into<String>) -> Self {
        Self::new(field, "no undeclared fields", "undeclared field present")
    }

    pub fn expected_array(field: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::new(field, "array", actual)
    }

    pub fn unexpected_array(field: impl Into<String>, field_type: &str) -> Self {
        Self::new(field, format!("single {} value", field_type), "array")
    }
}

impl fmt::Display for ValidationDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "field '{}': expected {}, got {}",
            self.field, self.expected, self.actual
        )
    }
}

/// Field map error with full context
#[derive(Debug, Clone)]
pub struct MappingError {
    code: MappingErrorCode,
    message: String,
    /// Field path if applicable
    field: Option<String>,
    /// Field map ID if applicable
    field_map_id: Option<String>,
    details: Option<ValidationDetails>,
}

impl MappingError {
    fn new(code: MappingErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            field: None,
            field_map_id: None,
            details: None,
        }
    }

    /// Field path is empty or has an empty segment
    pub fn invalid_field_name(name: impl Into<String>, reason: &str) -> Self {
        let name = name.into();
        let mut err = Self::new(
            MappingErrorCode::InvalidFieldName,
            format!("Invalid field name '{}': {}", name, reason),
        );
        err.field = Some(name);
        err
    }

    pub fn name_mismatch(key: impl Into<String>, declared: impl Into<String>) -> Self {
        let key = key.into();
        let mut err = Self::new(
            MappingErrorCode::NameMismatch,
            format!(
                "Field '{}' declares name '{}'; name must match the field key",
                key,
                declared.into()
            ),
        );
        err.field = Some(key);
        err
    }

    pub fn missing_type(field: impl Into<String>) -> Self {
        let field = field.into();
        let mut err = Self::new(
            MappingErrorCode::MissingType,
            format!("Field '{}' has an empty type", field),
        );
        err.field = Some(field);
        err
    }

    /// `field` extends `parent`, but `parent` cannot hold sub-properties
    pub fn path_conflict(parent: impl Into<String>, reason: impl Into<String>) -> Self {
        let parent = parent.into();
        let mut err = Self::new(
            MappingErrorCode::PathConflict,
            format!("Path conflict at '{}': {}", parent, reason.into()),
        );
        err.field = Some(parent);
        err
    }

    pub fn invalid_field_map_id(field_map_id: impl Into<String>, reason: &str) -> Self {
        let id = field_map_id.into();
        let mut err = Self::new(
            MappingErrorCode::InvalidFieldMapId,
            format!("Invalid field map id '{}': {}", id, reason),
        );
        err.field_map_id = Some(id);
        err
    }

    pub fn unknown_field_map(field_map_id: impl Into<String>) -> Self {
        let id = field_map_id.into();
        let mut err = Self::new(
            MappingErrorCode::UnknownFieldMap,
            format!("Field map '{}' not found", id),
        );
        err.field_map_id = Some(id);
        err
    }

    pub fn immutable(field_map_id: impl Into<String>) -> Self {
        let id = field_map_id.into();
        let mut err = Self::new(
            MappingErrorCode::Immutable,
            format!("Field map '{}' is already registered and immutable", id),
        );
        err.field_map_id = Some(id);
        err
    }

    pub fn document_invalid(details: ValidationDetails) -> Self {
        let mut err = Self::new(
            MappingErrorCode::DocumentInvalid,
            format!("Document validation failed: {}", details),
        );
        err.field = Some(details.field.clone());
        err.details = Some(details);
        err
    }

    /// Field map file could not be read, parsed or validated
    pub fn malformed_field_map(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(
            MappingErrorCode::MalformedFieldMap,
            format!("Malformed field map '{}': {}", path.into(), reason.into()),
        )
    }

    /// Attach the owning field map ID
    pub fn in_field_map(mut self, field_map_id: impl Into<String>) -> Self {
        self.field_map_id = Some(field_map_id.into());
        self
    }

    pub fn code(&self) -> MappingErrorCode {
        self.code
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn field_map_id(&self) -> Option<&str> {
        self.field_map_id.as_deref()
    }

    pub fn details(&self) -> Option<&ValidationDetails> {
        self.details.as_ref()
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)?;
        if let Some(ref id) = self.field_map_id {
            write!(f, " (field map '{}')", id)?;
        }
        Ok(())
    }
}

impl std::error::Error for MappingError {}

/// Result type for field map operations
pub type MappingResult<T> = Result<T, MappingError>;
