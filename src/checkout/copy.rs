//! Copy-mode checkouts
//!
//! The module source is copied out of the download cache and a fingerprint
//! of it is stored alongside. On the next sync the fingerprint tells whether
//! the copy was edited, in which case it is left alone.

use std::fs;
use std::io;
use std::path::Path;

use super::{HackedModule, paths};
use crate::common::fs::{copy_all, is_empty_dir, remove_dir_all};
use crate::error::{HackError, Result};
use crate::hash::{self, Exclusions};
use crate::modules::Module;

/// Copy `module`'s downloaded source into the cache root
///
/// An existing, non-empty destination must carry a fingerprint and must not
/// have been modified since it was written. If it already matches the
/// source, nothing is done. `force` skips both checks and replaces the
/// destination wholesale.
pub fn sync(module: &Module, cache_root: &Path, force: bool) -> Result<HackedModule> {
    let src = module
        .dir
        .as_deref()
        .ok_or_else(|| HackError::NoLocalSource {
            path: module.path.clone(),
        })?;
    let source_hash = hash::fingerprint(src, &Exclusions::for_module(&module.path))?;
    let dest = paths::module_dir(cache_root, &module.path);
    let hacked = HackedModule {
        path: module.path.clone(),
        dir: dest.clone(),
    };

    match fs::symlink_metadata(&dest) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent).map_err(|e| HackError::FileWriteFailed {
                    path: parent.display().to_string(),
                    reason: e.to_string(),
                })?;
            }
            copy_all(src, &dest)?;
        }
        Err(e) => {
            return Err(HackError::FileReadFailed {
                path: dest.display().to_string(),
                reason: e.to_string(),
            });
        }
        Ok(_) => {
            if !force && !is_empty_dir(&dest)? {
                let stored = check_clean(&dest, &module.path)?;
                if hash::verify_hash(&stored, &source_hash) {
                    return Ok(hacked);
                }
            }
            remove_dir_all(&dest)?;
            copy_all(src, &dest)?;
        }
    }

    hash::write_sidecar(&dest, &source_hash)?;
    Ok(hacked)
}

/// Check that `dir` is an unmodified copy, returning its stored fingerprint
fn check_clean(dir: &Path, module_path: &str) -> Result<String> {
    let stored = hash::read_sidecar(dir)?.ok_or_else(|| HackError::NotOverwriting {
        dir: dir.display().to_string(),
    })?;
    let current = hash::fingerprint(dir, &Exclusions::for_module(module_path))?;
    if !hash::verify_hash(&stored, &current) {
        return Err(HackError::NotClean {
            dir: dir.display().to_string(),
        });
    }
    Ok(stored)
}
