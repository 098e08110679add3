//! Bazaar backend

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::{Step, Vcs, VcsKind, WorkingCopyState, run_step};
use crate::error::{HackError, Result};
use crate::exec::Runner;

#[allow(clippy::unwrap_used)]
static REVISION_INFO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9.]+) ([^ \t]+)$").unwrap());

#[allow(clippy::unwrap_used)]
static SHELF_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+ (shelves exist|shelf exists)\.").unwrap());

pub struct Bazaar;

impl Vcs for Bazaar {
    fn kind(&self) -> VcsKind {
        VcsKind::Bazaar
    }

    fn create(&self, runner: &Runner, repo: &str, dir: &Path) -> Result<()> {
        let target = dir.to_string_lossy();
        run_step(runner, self.kind(), Step::Create, dir, &["branch", repo, &target])?;
        Ok(())
    }

    fn fetch(&self, runner: &Runner, dir: &Path) -> Result<()> {
        run_step(runner, self.kind(), Step::Fetch, dir, &["pull"])?;
        Ok(())
    }

    fn update_to(&self, runner: &Runner, dir: &Path, is_tag: bool, rev: &str) -> Result<()> {
        let spec = revision_spec(is_tag, rev);
        run_step(runner, self.kind(), Step::Update, dir, &["update", "-r", &spec])?;
        Ok(())
    }

    fn clean(&self, runner: &Runner, dir: &Path) -> Result<()> {
        run_step(runner, self.kind(), Step::Clean, dir, &["revert"])?;
        Ok(())
    }

    fn inspect(&self, runner: &Runner, dir: &Path) -> Result<WorkingCopyState> {
        let info = run_step(
            runner,
            self.kind(),
            Step::Inspect,
            dir,
            &["revision-info", "--tree"],
        )?;
        let (revno, revid) = parse_revision_info(&info)?;
        let status = run_step(runner, self.kind(), Step::Inspect, dir, &["status", "-S"])?;
        Ok(WorkingCopyState {
            revid,
            revno: Some(revno),
            clean: status_is_clean(&status),
        })
    }
}

/// Revision specifier understood by `bzr update -r`
pub(crate) fn revision_spec(is_tag: bool, rev: &str) -> String {
    if is_tag {
        format!("tag:{rev}")
    } else {
        format!("revid:{rev}")
    }
}

/// Parse `bzr revision-info --tree` into a revision number and revision id
pub(crate) fn parse_revision_info(out: &str) -> Result<(String, String)> {
    let caps = REVISION_INFO_RE
        .captures(out.trim())
        .ok_or_else(|| HackError::UnexpectedVcsOutput {
            command: "bzr revision-info".to_string(),
            output: out.to_string(),
        })?;
    Ok((caps[1].to_string(), caps[2].to_string()))
}

/// Shelved changes are not counted as modifications.
pub(crate) fn status_is_clean(out: &str) -> bool {
    out.split('\n')
        .all(|line| line.is_empty() || SHELF_LINE_RE.is_match(line))
}
