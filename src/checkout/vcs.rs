//! VCS-mode checkouts
//!
//! The module's whole repository is checked out under the cache root at the
//! repository's import path, then updated to the revision named by the
//! module version. The module directory is the matching subdirectory.

use std::fs;
use std::path::{Path, PathBuf};

use super::{HackedModule, paths, stub};
use crate::common::fs::is_empty_dir;
use crate::error::{HackError, Result};
use crate::exec::Runner;
use crate::modules::Module;
use crate::ui;
use crate::vcs::{RepoRoot, Vcs, VcsKind, repo_root};
use crate::version::UpdateTarget;

/// Check out `module` at its current version
pub fn sync(runner: &Runner, module: &Module, cache_root: &Path, force: bool) -> Result<HackedModule> {
    let root = repo_root::resolve(&module.path)?;
    sync_repo(runner, module, &root, cache_root, force)
}

pub(crate) fn sync_repo(
    runner: &Runner,
    module: &Module,
    root: &RepoRoot,
    cache_root: &Path,
    force: bool,
) -> Result<HackedModule> {
    if module.version.is_empty() {
        return Err(HackError::NoVersion {
            path: module.path.clone(),
        });
    }
    let target = UpdateTarget::for_version(&module.version)?;
    let checkout = paths::join_slash_path(cache_root, &root.root);
    let exists = existing_working_copy(&checkout, root.vcs)?;

    // A generated go.mod would show up as an uncommitted change.
    let stub_dir = module_dir(&checkout, root, &module.path);
    let removed_stub = exists && stub::remove_generated(&stub_dir, &module.path)?;

    let result = update(runner, module, root, &checkout, exists, &target, force);

    if removed_stub && stub_dir.is_dir() {
        stub::ensure(&stub_dir, &module.path)?;
    }
    result?;

    Ok(HackedModule {
        path: module.path.clone(),
        dir: module_dir(&checkout, root, &module.path),
    })
}

fn update(
    runner: &Runner,
    module: &Module,
    root: &RepoRoot,
    checkout: &Path,
    exists: bool,
    target: &UpdateTarget,
    force: bool,
) -> Result<()> {
    let backend: &dyn Vcs = root.vcs.backend();
    if exists {
        let state = backend.inspect(runner, checkout)?;
        if !state.clean {
            if force {
                ui::note(format!("cleaning {}", checkout.display()));
                backend.clean(runner, checkout)?;
            } else {
                ui::warn(format!(
                    "{} has uncommitted changes; updating without cleaning",
                    checkout.display()
                ));
            }
        }
    } else {
        ui::note(format!("creating {}@{}", module.path, module.version));
        if let Some(parent) = checkout.parent() {
            fs::create_dir_all(parent).map_err(|e| HackError::FileWriteFailed {
                path: parent.display().to_string(),
                reason: e.to_string(),
            })?;
        }
        backend.create(runner, &root.repo, checkout)?;
    }

    if let Err(err) = backend.update_to(runner, checkout, target.is_tag, &target.rev) {
        if !exists {
            return Err(err);
        }
        ui::note(format!("fetching {}@{}", module.path, module.version));
        backend.fetch(runner, checkout)?;
        backend.update_to(runner, checkout, target.is_tag, &target.rev)?;
    }
    ui::note(format!(
        "updated hack version of {} to {}",
        module.path, module.version
    ));
    Ok(())
}

/// Whether `checkout` already holds a working copy of kind `kind`
///
/// A missing or empty directory counts as absent. Anything else is refused
/// before a VCS command can run in it and act on an enclosing repository.
fn existing_working_copy(checkout: &Path, kind: VcsKind) -> Result<bool> {
    if !checkout.exists() {
        return Ok(false);
    }
    if checkout.is_dir() && is_empty_dir(checkout)? {
        fs::remove_dir(checkout).map_err(|e| HackError::FileWriteFailed {
            path: checkout.display().to_string(),
            reason: e.to_string(),
        })?;
        return Ok(false);
    }
    if VcsKind::detect(checkout) == Some(kind) {
        return Ok(true);
    }
    Err(HackError::NotOverwriting {
        dir: checkout.display().to_string(),
    })
}

/// Directory of `module_path` inside the checkout of `root`
///
/// A trailing major version element such as `/v2` usually has no directory
/// of its own; the module then lives at the parent.
pub(crate) fn module_dir(checkout: &Path, root: &RepoRoot, module_path: &str) -> PathBuf {
    let sub = root.subpath(module_path);
    let dir = paths::join_slash_path(checkout, sub);
    let last = sub.rsplit('/').next().unwrap_or("");
    if is_major_version(last) && !dir.is_dir() {
        if let Some(parent) = dir.parent() {
            return parent.to_path_buf();
        }
    }
    dir
}

fn is_major_version(elem: &str) -> bool {
    elem.strip_prefix('v')
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}
