//! Mercurial backend

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::{Step, Vcs, VcsKind, WorkingCopyState, run_step};
use crate::error::{HackError, Result};
use crate::exec::Runner;

#[allow(clippy::unwrap_used)]
static LOG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([a-f0-9]+) ([0-9]+)$").unwrap());

pub struct Mercurial;

impl Vcs for Mercurial {
    fn kind(&self) -> VcsKind {
        VcsKind::Mercurial
    }

    fn create(&self, runner: &Runner, repo: &str, dir: &Path) -> Result<()> {
        let target = dir.to_string_lossy();
        run_step(runner, self.kind(), Step::Create, dir, &["clone", "-U", repo, &target])?;
        Ok(())
    }

    fn fetch(&self, runner: &Runner, dir: &Path) -> Result<()> {
        run_step(runner, self.kind(), Step::Fetch, dir, &["pull"])?;
        Ok(())
    }

    fn update_to(&self, runner: &Runner, dir: &Path, _is_tag: bool, rev: &str) -> Result<()> {
        run_step(runner, self.kind(), Step::Update, dir, &["update", rev])?;
        Ok(())
    }

    fn clean(&self, runner: &Runner, dir: &Path) -> Result<()> {
        run_step(runner, self.kind(), Step::Clean, dir, &["revert", "--all"])?;
        Ok(())
    }

    fn inspect(&self, runner: &Runner, dir: &Path) -> Result<WorkingCopyState> {
        let log = run_step(
            runner,
            self.kind(),
            Step::Inspect,
            dir,
            &["log", "-l", "1", "-r", ".", "--template", "{node} {rev}"],
        )?;
        let (revid, revno) = parse_log(&log)?;
        let status = run_step(runner, self.kind(), Step::Inspect, dir, &["status"])?;
        Ok(WorkingCopyState {
            revid,
            revno: Some(revno),
            clean: status.is_empty(),
        })
    }
}

/// Parse `hg log --template '{node} {rev}'` into a node id and revision number
pub(crate) fn parse_log(out: &str) -> Result<(String, String)> {
    let caps = LOG_RE
        .captures(out.trim())
        .ok_or_else(|| HackError::UnexpectedVcsOutput {
            command: "hg log".to_string(),
            output: out.to_string(),
        })?;
    Ok((caps[1].to_string(), caps[2].to_string()))
}
