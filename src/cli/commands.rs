//! CLI command implementations
//!
//! Each command loads its configuration, does one unit of work and writes
//! exactly one JSON response line to stdout. The `*_response` functions hold
//! the work itself and return the response payload, so they can be driven
//! without a terminal.

use std::fs;
use std::path::Path;

use serde_json::{json, Value};

use crate::mapping::build_mapping;
use crate::observability::{log_event_with_fields, Event, Logger, ObservationScope};
use crate::schema::{
    DynamicMode, FieldMap, FieldMapRegistry, FieldTable, FieldTableValidator, MappingError,
};

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_error, write_response};

/// Main CLI entry point
///
/// Parses arguments, runs the command and reports failures as a JSON error
/// response before handing the error back to `main`.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    let name = cli.command.name();

    log_event_with_fields(Event::CommandStart, &[("command", name)]);
    match run_command(cli.command) {
        Ok(()) => {
            log_event_with_fields(Event::CommandComplete, &[("command", name)]);
            Ok(())
        }
        Err(e) => {
            log_event_with_fields(
                Event::CommandFailed,
                &[("command", name), ("code", e.code_str())],
            );
            write_error(e.code_str(), e.message())?;
            Err(e)
        }
    }
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Register { config, file } => register(&config, &file),
        Command::Build {
            config,
            id,
            dynamic,
        } => build(&config, &id, dynamic),
        Command::Convert { dynamic } => convert(dynamic),
        Command::Check { config } => check(&config),
        Command::Validate { config, id } => validate(&config, &id),
    }
}

/// Load configuration and apply its log level
fn load_config(config_path: &Path) -> CliResult<Config> {
    let config = Config::load(config_path)?;
    Logger::set_min_severity(config.log_severity()?);

    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("data_dir", config.data_dir.as_str()),
            ("default_dynamic", config.default_dynamic.as_str()),
        ],
    );
    Ok(config)
}

/// Open the registry of an initialized data directory and load every file
fn open_registry(config: &Config) -> CliResult<FieldMapRegistry> {
    let mut registry =
        FieldMapRegistry::new(config.data_path()).with_default_dynamic(config.default_dynamic);

    if !registry.field_map_dir().is_dir() {
        return Err(CliError::not_initialized());
    }

    registry.load_all().map_err(|e| {
        if e.is_fatal() {
            log_event_with_fields(Event::FieldMapsCorrupt, &[("reason", e.message())]);
        }
        CliError::from(e)
    })?;

    Ok(registry)
}

/// Create the field map directory
pub fn init(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    write_response(init_response(&config)?)
}

pub fn init_response(config: &Config) -> CliResult<Value> {
    let registry = FieldMapRegistry::new(config.data_path());
    let dir = registry.field_map_dir();

    if dir.exists() {
        return Err(CliError::already_initialized());
    }

    fs::create_dir_all(dir).map_err(|e| {
        CliError::io_error(format!("Failed to create directory {}: {}", dir.display(), e))
    })?;

    let dir = dir.display().to_string();
    log_event_with_fields(Event::DataDirInitialized, &[("field_map_dir", dir.as_str())]);

    Ok(json!({ "initialized": true, "field_map_dir": dir }))
}

/// Store a field map file in the registry
pub fn register(config_path: &Path, file: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let content = fs::read_to_string(file).map_err(|e| {
        CliError::io_error(format!("Failed to read {}: {}", file.display(), e))
    })?;
    let field_map: FieldMap = serde_json::from_str(&content)?;

    write_response(register_response(&config, field_map)?)
}

pub fn register_response(config: &Config, field_map: FieldMap) -> CliResult<Value> {
    let mut registry = open_registry(config)?;

    let path = registry.save(&field_map)?;
    let field_map_id = field_map.field_map_id.clone();
    let field_count = field_map.fields.len();
    registry.register(field_map)?;

    Ok(json!({
        "registered": field_map_id,
        "fields": field_count,
        "path": path.display().to_string(),
    }))
}

/// Print the index mapping of a registered field map
pub fn build(config_path: &Path, id: &str, dynamic: Option<DynamicMode>) -> CliResult<()> {
    let config = load_config(config_path)?;
    write_response(build_response(&config, id, dynamic)?)
}

pub fn build_response(config: &Config, id: &str, dynamic: Option<DynamicMode>) -> CliResult<Value> {
    let registry = open_registry(config)?;

    let scope = ObservationScope::with_fields("MAPPING_BUILD", &[("field_map_id", id)]);
    let built = match dynamic {
        Some(mode) => registry.build_with(id, mode),
        None => registry.build(id),
    };

    match built {
        Ok(tree) => {
            let fields = tree.field_count().to_string();
            scope.complete_with_fields(&[
                ("dynamic", tree.dynamic().as_str()),
                ("fields", fields.as_str()),
            ]);
            Ok(tree.to_value())
        }
        Err(e) => {
            scope.fail(e.message());
            Err(e.into())
        }
    }
}

/// Read a field table from stdin and print its index mapping
pub fn convert(dynamic: DynamicMode) -> CliResult<()> {
    let input = read_request()?;
    write_response(convert_response(input, dynamic)?)
}

pub fn convert_response(input: Value, dynamic: DynamicMode) -> CliResult<Value> {
    let fields: FieldTable = serde_json::from_value(input)
        .map_err(|e| CliError::invalid_input(format!("Expected a field table: {}", e)))?;

    match build_mapping(&fields, dynamic) {
        Ok(tree) => {
            let count = tree.field_count().to_string();
            log_event_with_fields(
                Event::MappingBuilt,
                &[("dynamic", dynamic.as_str()), ("fields", count.as_str())],
            );
            Ok(tree.to_value())
        }
        Err(e) => Err(rejected(Event::MappingRejected, e)),
    }
}

/// Load and validate every registered field map
pub fn check(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    write_response(check_response(&config)?)
}

pub fn check_response(config: &Config) -> CliResult<Value> {
    let scope = ObservationScope::new("REGISTRY_CHECK");
    let registry = match open_registry(config) {
        Ok(registry) => registry,
        Err(e) => {
            scope.fail(e.message());
            return Err(e);
        }
    };

    let field_maps: Vec<Value> = registry
        .all()
        .into_iter()
        .map(|map| {
            json!({
                "field_map_id": map.field_map_id,
                "fields": map.fields.len(),
                "dynamic": map.dynamic_or(registry.default_dynamic()),
            })
        })
        .collect();

    scope.complete();
    Ok(json!({ "count": field_maps.len(), "field_maps": field_maps }))
}

/// Validate a document from stdin against a registered field map
pub fn validate(config_path: &Path, id: &str) -> CliResult<()> {
    let config = load_config(config_path)?;
    let document = read_request()?;
    write_response(validate_response(&config, id, &document)?)
}

pub fn validate_response(config: &Config, id: &str, document: &Value) -> CliResult<Value> {
    let registry = open_registry(config)?;
    let field_map = registry
        .get(id)
        .ok_or_else(|| MappingError::unknown_field_map(id))?;

    let validator = FieldTableValidator::new(
        &field_map.fields,
        field_map.dynamic_or(registry.default_dynamic()),
    )?;

    match validator.validate_document(document) {
        Ok(()) => {
            log_event_with_fields(Event::DocumentAccepted, &[("field_map_id", id)]);
            Ok(json!({ "valid": true, "field_map_id": id }))
        }
        Err(e) => Err(rejected(Event::DocumentRejected, e.in_field_map(id))),
    }
}

fn rejected(event: Event, e: MappingError) -> CliError {
    log_event_with_fields(
        event,
        &[("code", e.code().code()), ("field", e.field().unwrap_or(""))],
    );
    e.into()
}
