//! Git backend

use std::path::Path;

use chrono::{DateTime, SecondsFormat};

use super::{Step, Vcs, VcsKind, WorkingCopyState, run_step};
use crate::error::{HackError, Result};
use crate::exec::Runner;

pub struct Git;

impl Vcs for Git {
    fn kind(&self) -> VcsKind {
        VcsKind::Git
    }

    fn create(&self, runner: &Runner, repo: &str, dir: &Path) -> Result<()> {
        let target = dir.to_string_lossy();
        run_step(runner, self.kind(), Step::Create, dir, &["clone", repo, &target])?;
        Ok(())
    }

    fn fetch(&self, runner: &Runner, dir: &Path) -> Result<()> {
        run_step(runner, self.kind(), Step::Fetch, dir, &["fetch"])?;
        Ok(())
    }

    fn update_to(&self, runner: &Runner, dir: &Path, _is_tag: bool, rev: &str) -> Result<()> {
        run_step(runner, self.kind(), Step::Update, dir, &["checkout", rev])?;
        Ok(())
    }

    fn clean(&self, runner: &Runner, dir: &Path) -> Result<()> {
        run_step(runner, self.kind(), Step::Clean, dir, &["reset", "--hard", "HEAD"])?;
        Ok(())
    }

    fn inspect(&self, runner: &Runner, dir: &Path) -> Result<WorkingCopyState> {
        let log = run_step(
            runner,
            self.kind(),
            Step::Inspect,
            dir,
            &["log", "-n", "1", "--pretty=format:%H %ct", "HEAD"],
        )?;
        let (revid, revno) = parse_log(&log)?;
        let status = run_step(
            runner,
            self.kind(),
            Step::Inspect,
            dir,
            &["status", "--porcelain"],
        )?;
        Ok(WorkingCopyState {
            revid,
            revno: Some(revno),
            clean: status.is_empty(),
        })
    }
}

/// Parse `git log --pretty=format:'%H %ct'` into a revision id and an
/// RFC 3339 commit time
pub(crate) fn parse_log(out: &str) -> Result<(String, String)> {
    let fields: Vec<&str> = out.split_whitespace().collect();
    let [revid, time] = fields[..] else {
        return Err(unexpected("git log", out));
    };
    match hex::decode(revid) {
        Ok(bytes) if !bytes.is_empty() => {}
        _ => return Err(unexpected("git log", revid)),
    }
    let seconds: i64 = time.parse().map_err(|_| unexpected("git log", time))?;
    let time = DateTime::from_timestamp(seconds, 0).ok_or_else(|| unexpected("git log", time))?;
    Ok((
        revid.to_string(),
        time.to_rfc3339_opts(SecondsFormat::Secs, true),
    ))
}

fn unexpected(command: &str, output: &str) -> HackError {
    HackError::UnexpectedVcsOutput {
        command: command.to_string(),
        output: output.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_log() {
        let (revid, revno) =
            parse_log("0123456789abcdef0123456789abcdef01234567 1552423184").unwrap();
        assert_eq!(revid, "0123456789abcdef0123456789abcdef01234567");
        assert_eq!(revno, "2019-03-12T20:39:44Z");
    }

    #[test]
    fn test_parse_log_rejects_bad_revision() {
        assert!(parse_log("not-hex 1552423184").is_err());
        assert!(parse_log("abc 1552423184").is_err());
    }

    #[test]
    fn test_parse_log_rejects_bad_time() {
        assert!(parse_log("abcdef 12x").is_err());
    }

    #[test]
    fn test_parse_log_rejects_wrong_field_count() {
        assert!(parse_log("").is_err());
        assert!(parse_log("abcdef").is_err());
        assert!(parse_log("abcdef 1 2").is_err());
    }

    fn git_available() -> bool {
        std::process::Command::new("git")
            .arg("--version")
            .output()
            .is_ok_and(|o| o.status.success())
    }

    fn commit_file(repo: &git2::Repository, name: &str, contents: &str, message: &str) {
        let workdir = repo.workdir().unwrap();
        fs::write(workdir.join(name), contents).unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new(name)).unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let sig = git2::Signature::now("Test", "test@example.com").unwrap();
        let parents: Vec<git2::Commit> = repo
            .head()
            .ok()
            .and_then(|h| h.peel_to_commit().ok())
            .into_iter()
            .collect();
        let parents: Vec<&git2::Commit> = parents.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap();
    }

    #[test]
    fn test_inspect_reports_clean_and_dirty() {
        if !git_available() {
            return;
        }
        let temp = TempDir::new().unwrap();
        let repo = git2::Repository::init(temp.path()).unwrap();
        commit_file(&repo, "a.go", "package a\n", "initial");

        let runner = Runner::default();
        let state = Git.inspect(&runner, temp.path()).unwrap();
        let head = repo.head().unwrap().peel_to_commit().unwrap().id();
        assert_eq!(state.revid, head.to_string());
        assert!(state.clean);

        fs::write(temp.path().join("a.go"), "package a // changed\n").unwrap();
        let state = Git.inspect(&runner, temp.path()).unwrap();
        assert!(!state.clean);

        Git.clean(&runner, temp.path()).unwrap();
        assert!(Git.inspect(&runner, temp.path()).unwrap().clean);
    }

    #[test]
    fn test_create_and_update_to_tag() {
        if !git_available() {
            return;
        }
        let upstream = TempDir::new().unwrap();
        let repo = git2::Repository::init(upstream.path()).unwrap();
        commit_file(&repo, "a.go", "package a\n", "first");
        let first = repo.head().unwrap().peel_to_commit().unwrap();
        repo.tag_lightweight("v1.0.0", first.as_object(), false)
            .unwrap();
        commit_file(&repo, "a.go", "package a // two\n", "second");

        let dest = TempDir::new().unwrap();
        let checkout = dest.path().join("clone");
        let runner = Runner::default();
        Git.create(&runner, &upstream.path().to_string_lossy(), &checkout)
            .unwrap();
        Git.update_to(&runner, &checkout, true, "v1.0.0").unwrap();

        let state = Git.inspect(&runner, &checkout).unwrap();
        assert_eq!(state.revid, first.id().to_string());
        assert_eq!(
            fs::read_to_string(checkout.join("a.go")).unwrap(),
            "package a\n"
        );
    }

    #[test]
    fn test_dry_run_create_leaves_no_checkout() {
        let dest = TempDir::new().unwrap();
        let checkout = dest.path().join("clone");
        let runner = Runner::new(false, true);
        Git.create(&runner, "https://example.com/repo", &checkout)
            .unwrap();
        assert!(!checkout.exists());
    }
}
