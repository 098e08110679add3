//! Generated `go.mod` files
//!
//! A checkout without its own `go.mod` cannot be used as a replacement, so
//! one is generated. Its exact contents identify it as ours, so it can be
//! removed again before the working copy is inspected.

use std::fs;
use std::path::Path;

use crate::error::{HackError, Result};

pub const GO_MOD_FILE: &str = "go.mod";

/// Contents of the generated `go.mod` for `module_path`
pub fn contents(module_path: &str) -> String {
    format!("// Generated by gohack; DO NOT EDIT.\nmodule {module_path}\n")
}

/// Report whether `dir` holds a `go.mod` generated for `module_path`
pub fn is_generated(dir: &Path, module_path: &str) -> Result<bool> {
    let path = dir.join(GO_MOD_FILE);
    match fs::read(&path) {
        Ok(data) => Ok(data == contents(module_path).as_bytes()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(HackError::FileReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Write a generated `go.mod` unless one already exists
///
/// Returns whether a file was written.
pub fn ensure(dir: &Path, module_path: &str) -> Result<bool> {
    let path = dir.join(GO_MOD_FILE);
    if path.exists() {
        return Ok(false);
    }
    fs::write(&path, contents(module_path)).map_err(|e| HackError::FileWriteFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(true)
}

/// Remove `go.mod` if we generated it
///
/// Returns whether a file was removed.
pub fn remove_generated(dir: &Path, module_path: &str) -> Result<bool> {
    if !is_generated(dir, module_path)? {
        return Ok(false);
    }
    let path = dir.join(GO_MOD_FILE);
    fs::remove_file(&path).map_err(|e| HackError::FileWriteFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(true)
}
