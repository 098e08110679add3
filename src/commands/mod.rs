//! Command implementations for the gohack CLI

pub mod completions;
pub mod get;
pub mod status;
pub mod undo;

use std::path::PathBuf;

use crate::checkout::paths;
use crate::context::Context;
use crate::error::Result;
use crate::modfile::{ModFile, Replace};

/// Load the main module's `go.mod`, found from the working directory
fn load_manifest(ctx: &Context) -> Result<ModFile> {
    ModFile::load(&ModFile::find(&ctx.work_dir)?)
}

/// Absolute directory a directory replacement points at
fn replacement_dir(modfile: &ModFile, replace: &Replace) -> PathBuf {
    paths::resolve_dir(modfile.dir(), &replace.new.path)
}

/// Drop repeated arguments, keeping the first occurrence
fn dedup(modules: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    modules
        .iter()
        .filter(|m| seen.insert(m.as_str()))
        .cloned()
        .collect()
}
