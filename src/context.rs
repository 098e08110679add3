//! State shared by one gohack invocation

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::HackError;
use crate::exec::Runner;
use crate::ui;

/// Everything a command needs besides its own arguments
#[derive(Debug)]
pub struct Context {
    pub runner: Runner,

    /// Directory under which all checkouts are placed
    pub cache_root: PathBuf,

    /// Print extra detail
    pub verbose: bool,

    /// Directory the main module is searched from
    pub work_dir: PathBuf,

    /// Set once any module has failed
    failed: AtomicBool,
}

impl Context {
    pub fn new(runner: Runner, cache_root: PathBuf, verbose: bool) -> Self {
        Self {
            runner,
            cache_root,
            verbose,
            work_dir: PathBuf::from("."),
            failed: AtomicBool::new(false),
        }
    }

    /// Search for the main module from `dir` instead of the current directory
    #[must_use]
    pub fn in_dir(mut self, dir: PathBuf) -> Self {
        self.work_dir = dir;
        self
    }

    pub fn cache_root(&self) -> &Path {
        &self.cache_root
    }

    /// Report a per-module failure and remember it for the exit status
    pub fn report(&self, err: &HackError) {
        ui::error(err);
        self.fail();
    }

    pub fn fail(&self) {
        self.failed.store(true, Ordering::Relaxed);
    }

    pub fn has_failed(&self) -> bool {
        self.failed.load(Ordering::Relaxed)
    }

    /// Process exit status: 0 when everything succeeded, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        i32::from(self.has_failed())
    }
}
