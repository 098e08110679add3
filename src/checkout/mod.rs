//! Checkout synchronization
//!
//! Brings a directory under the cache root to the version of a module that
//! the main module uses, either by copying the downloaded module source or by
//! driving a VCS working copy. Local edits are never overwritten unless the
//! caller forces it.

pub mod copy;
pub mod paths;
pub mod stub;
pub mod vcs;

use std::path::{Path, PathBuf};

use crate::context::Context;
use crate::error::Result;
use crate::hash::{self, Exclusions};
use crate::modules::Module;
use crate::vcs::{VcsKind, WorkingCopyState, find_working_copy};

/// A module checked out and ready to be used as a replacement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HackedModule {
    pub path: String,
    pub dir: PathBuf,
}

/// How a checkout is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Copy the source from the module download cache
    Copy,

    /// Check out the module's repository
    Vcs,
}

/// Synchronize the checkout for `module` and make sure it has a `go.mod`
pub fn sync(ctx: &Context, module: &Module, mode: Mode, force: bool) -> Result<HackedModule> {
    let hacked = match mode {
        Mode::Copy => copy::sync(module, ctx.cache_root(), force)?,
        Mode::Vcs => vcs::sync(&ctx.runner, module, ctx.cache_root(), force)?,
    };
    // Nothing exists yet after a dry-run clone.
    if hacked.dir.is_dir() {
        stub::ensure(&hacked.dir, &hacked.path)?;
    }
    Ok(hacked)
}

/// What is currently in a module's checkout directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutState {
    Missing,

    /// Neither a gohack copy nor a working copy
    Unmanaged,

    /// A copy-mode checkout; `clean` when its fingerprint still matches
    Copy { clean: bool },

    Vcs {
        kind: VcsKind,

        /// Top of the working copy
        root: PathBuf,

        state: WorkingCopyState,
    },
}

impl CheckoutState {
    pub fn is_clean(&self) -> bool {
        match self {
            CheckoutState::Missing => true,
            CheckoutState::Unmanaged => false,
            CheckoutState::Copy { clean } => *clean,
            CheckoutState::Vcs { state, .. } => state.clean,
        }
    }

    /// Short description for status output
    pub fn describe(&self) -> String {
        match self {
            CheckoutState::Missing => "missing".to_string(),
            CheckoutState::Unmanaged => "unmanaged".to_string(),
            CheckoutState::Copy { clean: true } => "clean".to_string(),
            CheckoutState::Copy { clean: false } => "modified".to_string(),
            CheckoutState::Vcs { kind, state, .. } => {
                let mut desc = format!("vcs:{} {}", kind, state.revid);
                if !state.clean {
                    desc.push_str(" modified");
                }
                desc
            }
        }
    }
}

/// Inspect the checkout of `module_path` at `dir`
///
/// A generated `go.mod` is moved out of the way while a working copy is
/// inspected so that it does not count as a local change.
pub fn inspect(ctx: &Context, module_path: &str, dir: &Path) -> Result<CheckoutState> {
    if !dir.is_dir() {
        return Ok(CheckoutState::Missing);
    }
    if let Some(stored) = hash::read_sidecar(dir)? {
        let current = hash::fingerprint(dir, &Exclusions::for_module(module_path))?;
        return Ok(CheckoutState::Copy {
            clean: hash::verify_hash(&stored, &current),
        });
    }
    let Some((kind, root)) = find_working_copy(dir, ctx.cache_root()) else {
        return Ok(CheckoutState::Unmanaged);
    };
    let removed = stub::remove_generated(dir, module_path)?;
    let state = kind.backend().inspect(&ctx.runner, &root);
    if removed {
        stub::ensure(dir, module_path)?;
    }
    Ok(CheckoutState::Vcs {
        kind,
        root,
        state: state?,
    })
}
