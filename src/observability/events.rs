//! Observable events
//!
//! Every log line emitted outside of an `ObservationScope` names one of these.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Command lifecycle
    /// CLI command started
    CommandStart,
    /// CLI command finished successfully
    CommandComplete,
    /// CLI command failed
    CommandFailed,

    // Configuration
    /// Configuration loaded
    ConfigLoaded,
    /// Data directory initialized
    DataDirInitialized,

    // Registry
    /// Field map files loaded from disk
    FieldMapsLoaded,
    /// Field map registered in memory
    FieldMapRegistered,
    /// Field map written to disk
    FieldMapSaved,
    /// Field map directory unusable (FATAL)
    FieldMapsCorrupt,

    // Mapping
    /// Mapping built from a field table
    MappingBuilt,
    /// Field table rejected by the builder
    MappingRejected,

    // Documents
    /// Document satisfied its field map
    DocumentAccepted,
    /// Document violated its field map
    DocumentRejected,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::CommandStart => "COMMAND_BEGIN",
            Event::CommandComplete => "COMMAND_COMPLETE",
            Event::CommandFailed => "COMMAND_FAILED",

            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::DataDirInitialized => "DATA_DIR_INITIALIZED",

            Event::FieldMapsLoaded => "FIELD_MAPS_LOADED",
            Event::FieldMapRegistered => "FIELD_MAP_REGISTERED",
            Event::FieldMapSaved => "FIELD_MAP_SAVED",
            Event::FieldMapsCorrupt => "FIELD_MAPS_CORRUPT",

            Event::MappingBuilt => "MAPPING_BUILT",
            Event::MappingRejected => "MAPPING_REJECTED",

            Event::DocumentAccepted => "DOCUMENT_ACCEPTED",
            Event::DocumentRejected => "DOCUMENT_REJECTED",
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::FieldMapsCorrupt)
    }

    /// Returns true if this event reports a rejected or failed operation
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Event::CommandFailed | Event::MappingRejected | Event::DocumentRejected
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
