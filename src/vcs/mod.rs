//! Version control backends
//!
//! Working copies are driven through the external `git`, `hg` and `bzr`
//! executables. Each backend owns the command lines for its tool and the
//! parsing of their output; callers select one through [`VcsKind::backend`].
//!
//! Commands that change a working copy (create, update, clean) are routed
//! through [`Runner::run_mutating`] so that dry-run mode applies to them.

pub mod bzr;
pub mod git;
pub mod hg;
pub mod repo_root;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{HackError, Result};
use crate::exec::Runner;

pub use repo_root::RepoRoot;

/// Supported version control systems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VcsKind {
    Git,
    Mercurial,
    Bazaar,
}

impl VcsKind {
    pub const ALL: [VcsKind; 3] = [VcsKind::Git, VcsKind::Mercurial, VcsKind::Bazaar];

    /// Short name, which is also the executable name
    pub fn name(self) -> &'static str {
        match self {
            VcsKind::Git => "git",
            VcsKind::Mercurial => "hg",
            VcsKind::Bazaar => "bzr",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Metadata directory that marks the top of a working copy
    pub fn metadata_dir(self) -> &'static str {
        match self {
            VcsKind::Git => ".git",
            VcsKind::Mercurial => ".hg",
            VcsKind::Bazaar => ".bzr",
        }
    }

    /// The backend implementing this kind
    pub fn backend(self) -> &'static dyn Vcs {
        match self {
            VcsKind::Git => &git::Git,
            VcsKind::Mercurial => &hg::Mercurial,
            VcsKind::Bazaar => &bzr::Bazaar,
        }
    }

    /// Recognise a working copy rooted at `dir`
    pub fn detect(dir: &Path) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| dir.join(kind.metadata_dir()).exists())
    }
}

impl fmt::Display for VcsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Find the working copy containing `dir`, looking no higher than `stop`
///
/// Returns the kind and the root directory of the working copy.
pub fn find_working_copy(dir: &Path, stop: &Path) -> Option<(VcsKind, PathBuf)> {
    let mut current = dir.to_path_buf();
    loop {
        if let Some(kind) = VcsKind::detect(&current) {
            return Some((kind, current));
        }
        if current == stop || !current.starts_with(stop) || !current.pop() {
            return None;
        }
    }
}

/// Result of inspecting a working copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingCopyState {
    /// Revision the working copy is at
    pub revid: String,

    /// Human-oriented revision: a revision number, or a commit time for git
    pub revno: Option<String>,

    /// No uncommitted changes
    pub clean: bool,
}

/// Operations every backend supports
pub trait Vcs: Send + Sync {
    fn kind(&self) -> VcsKind;

    /// Create a new working copy of `repo` at `dir`
    fn create(&self, runner: &Runner, repo: &str, dir: &Path) -> Result<()>;

    /// Pull new revisions from upstream without touching the working tree
    fn fetch(&self, runner: &Runner, dir: &Path) -> Result<()>;

    /// Switch the working tree to a tag or revision id
    fn update_to(&self, runner: &Runner, dir: &Path, is_tag: bool, rev: &str) -> Result<()>;

    /// Discard uncommitted changes
    fn clean(&self, runner: &Runner, dir: &Path) -> Result<()>;

    fn inspect(&self, runner: &Runner, dir: &Path) -> Result<WorkingCopyState>;
}

/// A backend operation, used to label commands and their failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Create,
    Fetch,
    Update,
    Clean,
    Inspect,
}

impl Step {
    fn name(self) -> &'static str {
        match self {
            Step::Create => "create",
            Step::Fetch => "fetch",
            Step::Update => "update",
            Step::Clean => "clean",
            Step::Inspect => "inspect",
        }
    }

    fn is_mutating(self) -> bool {
        matches!(self, Step::Create | Step::Update | Step::Clean)
    }
}

/// Run one backend command for `step` on the working copy at `dir`
///
/// `create` runs from the current directory since `dir` does not exist yet;
/// every other step runs inside `dir`. Failures are reported against the
/// step and directory.
pub(crate) fn run_step(
    runner: &Runner,
    kind: VcsKind,
    step: Step,
    dir: &Path,
    args: &[&str],
) -> Result<String> {
    let cwd = (step != Step::Create).then_some(dir);
    let program = kind.name();
    let result = if step.is_mutating() {
        runner.run_mutating(cwd, program, args)
    } else {
        runner.run(cwd, program, args)
    };
    result.map_err(|e| HackError::VcsOperationFailed {
        operation: format!("{} {}", kind, step.name()),
        dir: dir.display().to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_kind_names_round_trip() {
        for kind in VcsKind::ALL {
            assert_eq!(VcsKind::from_name(kind.name()), Some(kind));
            assert_eq!(kind.backend().kind(), kind);
        }
        assert_eq!(VcsKind::from_name("svn"), None);
    }

    #[test]
    fn test_detect_by_metadata_dir() {
        let temp = TempDir::new().unwrap();
        assert_eq!(VcsKind::detect(temp.path()), None);
        fs::create_dir(temp.path().join(".hg")).unwrap();
        assert_eq!(VcsKind::detect(temp.path()), Some(VcsKind::Mercurial));
    }

    #[test]
    fn test_find_working_copy_from_subdir() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("example.com/repo");
        let sub = root.join("pkg/sub");
        fs::create_dir_all(&sub).unwrap();
        fs::create_dir(root.join(".bzr")).unwrap();

        let (kind, found) = find_working_copy(&sub, temp.path()).unwrap();
        assert_eq!(kind, VcsKind::Bazaar);
        assert_eq!(found, root);
    }

    #[test]
    fn test_find_working_copy_stops_at_boundary() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();
        let cache = temp.path().join("cache");
        let dir = cache.join("example.com/m");
        fs::create_dir_all(&dir).unwrap();

        assert_eq!(find_working_copy(&dir, &cache), None);
    }

    #[test]
    fn test_mutating_steps_are_not_run_in_dry_run() {
        let runner = Runner::new(false, true);
        let temp = TempDir::new().unwrap();
        for step in [Step::Create, Step::Update, Step::Clean] {
            let out = run_step(&runner, VcsKind::Git, step, temp.path(), &["no-such-subcommand"]);
            assert_eq!(out.unwrap(), "");
        }
    }

    #[test]
    fn test_step_failure_names_operation_and_dir() {
        let runner = Runner::default();
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing");
        let err = run_step(&runner, VcsKind::Git, Step::Fetch, &missing, &["fetch"]).unwrap_err();
        match err {
            HackError::VcsOperationFailed { operation, dir, .. } => {
                assert_eq!(operation, "git fetch");
                assert_eq!(dir, missing.display().to_string());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
