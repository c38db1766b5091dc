//! CLI module for fieldmap
//!
//! Provides command-line interface for:
//! - init: create the field map directory
//! - register: store a field map file
//! - build: print the mapping of a registered field map
//! - convert: one-shot field table to mapping conversion over stdin
//! - check: load and validate every field map
//! - validate: check a document against a field map

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{
    build, build_response, check, check_response, convert, convert_response, init,
    init_response, register, register_response, run, run_command, validate, validate_response,
};
pub use config::{Config, ConfigError};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_json, read_request, write_error, write_response};
