//! CLI argument definitions using clap
//!
//! Commands:
//! - fieldmap init --config <path>
//! - fieldmap register --config <path> --file <field_map.json>
//! - fieldmap build --config <path> --id <field_map_id> [--dynamic <mode>]
//! - fieldmap convert [--dynamic <mode>]
//! - fieldmap check --config <path>
//! - fieldmap validate --config <path> --id <field_map_id>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::schema::DynamicMode;

/// fieldmap - build nested search-index mappings from flat field maps
#[derive(Parser, Debug)]
#[command(name = "fieldmap")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the field map directory
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./fieldmap.json")]
        config: PathBuf,
    },

    /// Store a field map file in the registry
    Register {
        /// Path to configuration file
        #[arg(long, default_value = "./fieldmap.json")]
        config: PathBuf,

        /// Field map JSON file to register
        #[arg(long)]
        file: PathBuf,
    },

    /// Print the index mapping of a registered field map
    Build {
        /// Path to configuration file
        #[arg(long, default_value = "./fieldmap.json")]
        config: PathBuf,

        /// Field map ID
        #[arg(long)]
        id: String,

        /// Override the dynamic mode: strict, true or false
        #[arg(long)]
        dynamic: Option<DynamicMode>,
    },

    /// Read a field table from stdin and print its index mapping
    Convert {
        /// Dynamic mode: strict, true or false
        #[arg(long, default_value = "strict")]
        dynamic: DynamicMode,
    },

    /// Load and validate every registered field map
    Check {
        /// Path to configuration file
        #[arg(long, default_value = "./fieldmap.json")]
        config: PathBuf,
    },

    /// Validate a document from stdin against a registered field map
    Validate {
        /// Path to configuration file
        #[arg(long, default_value = "./fieldmap.json")]
        config: PathBuf,

        /// Field map ID
        #[arg(long)]
        id: String,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

impl Command {
    /// Name used in command lifecycle logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::Init { .. } => "init",
            Command::Register { .. } => "register",
            Command::Build { .. } => "build",
            Command::Convert { .. } => "convert",
            Command::Check { .. } => "check",
            Command::Validate { .. } => "validate",
        }
    }
}
