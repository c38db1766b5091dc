//! JSON I/O for CLI commands
//!
//! - Input: one JSON value on stdin (may span lines)
//! - Output: one JSON object per line on stdout
//!   - `{"status":"ok","data":...}`
//!   - `{"status":"error","code":...,"message":...}`

use std::io::{self, Read, Write};

use serde_json::{json, Value};

use super::errors::{CliError, CliResult};

/// Read a JSON request from stdin
pub fn read_request() -> CliResult<Value> {
    read_json(io::stdin().lock())
}

/// Read a single JSON value from any reader
pub fn read_json<R: Read>(mut reader: R) -> CliResult<Value> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;

    if input.trim().is_empty() {
        return Err(CliError::invalid_input("Empty input"));
    }

    Ok(serde_json::from_str(&input)?)
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_line(&mut io::stdout().lock(), &json!({ "status": "ok", "data": data }))
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    write_line(
        &mut io::stdout().lock(),
        &json!({ "status": "error", "code": code, "message": message }),
    )
}

fn write_line<W: Write>(writer: &mut W, value: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut *writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
