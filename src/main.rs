//! fieldmap CLI entry point
//!
//! Parses arguments and dispatches via `cli::run`. On failure the command has
//! already written a JSON error response; the error is echoed to stderr and
//! the process exits non-zero.

use fieldmap::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
