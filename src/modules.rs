//! Dependency enumeration via `go list -m -json`

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{HackError, Result};
use crate::exec::Runner;

/// A module as reported by `go list -m -json`
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Module {
    pub path: String,

    #[serde(default)]
    pub version: String,

    /// The module replacing this one, if any
    #[serde(default)]
    pub replace: Option<Box<Module>>,

    /// Directory holding the module's source, if it has been downloaded
    #[serde(default)]
    pub dir: Option<PathBuf>,

    #[serde(default)]
    pub main: bool,

    #[serde(default)]
    pub error: Option<ModuleError>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct ModuleError {
    pub err: String,
}

/// Modules keyed by module path
pub type ModuleMap = BTreeMap<String, Module>;

/// Source of module information for the main module in `dir`
pub trait ModuleLister {
    fn list(&self, runner: &Runner, dir: &Path, patterns: &[&str]) -> Result<ModuleMap>;
}

/// Lists modules by running the `go` command
#[derive(Debug, Default)]
pub struct GoList;

impl ModuleLister for GoList {
    fn list(&self, runner: &Runner, dir: &Path, patterns: &[&str]) -> Result<ModuleMap> {
        let mut args = vec!["list", "-m", "-json"];
        args.extend_from_slice(patterns);
        let out = runner
            .run(Some(dir), "go", &args)
            .map_err(|e| HackError::ModuleListFailed {
                reason: e.to_string(),
            })?;
        parse_listing(&out)
    }
}

/// Decode the concatenated JSON objects printed by `go list -m -json`
pub fn parse_listing(out: &str) -> Result<ModuleMap> {
    let mut modules = ModuleMap::new();
    for module in serde_json::Deserializer::from_str(out).into_iter::<Module>() {
        let module = module?;
        if modules.contains_key(&module.path) {
            return Err(HackError::DuplicateModule { path: module.path });
        }
        modules.insert(module.path.clone(), module);
    }
    Ok(modules)
}
