//! Undo command
//!
//! Removes gohack's replace directives, restoring any directive a
//! replacement took over. With `--rm` the checkouts go too, provided they
//! have no local changes.

use std::path::{Path, PathBuf};

use crate::checkout::{self, CheckoutState, paths};
use crate::cli::UndoArgs;
use crate::common::fs::remove_dir_all;
use crate::context::Context;
use crate::error::{HackError, Result};
use crate::modfile::UndoOutcome;
use crate::ui;

struct Undone {
    path: String,
    outcome: UndoOutcome,
    dir: Option<PathBuf>,
}

/// Run undo command
pub fn run(ctx: &Context, args: &UndoArgs) -> Result<()> {
    let mut modfile = super::load_manifest(ctx)?;
    let targets: Vec<String> = if args.modules.is_empty() {
        modfile
            .directory_replacements()
            .map(|r| r.old.path.clone())
            .collect()
    } else {
        super::dedup(&args.modules)
    };

    let mut undone: Vec<Undone> = Vec::new();
    for path in targets {
        let dir = modfile
            .directory_replacements()
            .find(|r| r.old.path == path)
            .map(|r| super::replacement_dir(&modfile, r));
        match modfile.undo_module(&path) {
            Ok(outcome) => undone.push(Undone { path, outcome, dir }),
            Err(e) => ctx.report(&e),
        }
    }
    if undone.is_empty() {
        return Ok(());
    }
    modfile.save()?;

    for entry in &undone {
        ui::result(format!("{} {}", entry.outcome.verb(), entry.path));
    }

    if args.remove {
        for entry in &undone {
            let Some(dir) = &entry.dir else { continue };
            if let Err(e) = remove_checkout(ctx, &entry.path, dir, args.force) {
                ctx.report(&e);
            }
        }
    }
    Ok(())
}

/// Remove the checkout of `module_path` at `dir`
///
/// Only directories under the cache root that gohack created are removed.
/// For a VCS checkout that is the whole working copy.
fn remove_checkout(ctx: &Context, module_path: &str, dir: &Path, force: bool) -> Result<()> {
    let unmanaged = || HackError::Unmanaged {
        dir: dir.display().to_string(),
    };
    if !paths::is_within(dir, ctx.cache_root()) {
        return Err(unmanaged());
    }

    let state = checkout::inspect(ctx, module_path, dir)?;
    let target = match &state {
        CheckoutState::Missing => return Ok(()),
        CheckoutState::Unmanaged => return Err(unmanaged()),
        CheckoutState::Copy { .. } => dir.to_path_buf(),
        CheckoutState::Vcs { root, .. } => root.clone(),
    };
    if paths::is_within(ctx.cache_root(), &target) {
        return Err(unmanaged());
    }
    if !state.is_clean() && !force {
        return Err(HackError::NotClean {
            dir: target.display().to_string(),
        });
    }

    if ctx.runner.is_dry_run() {
        ui::note(format!("would remove {}", target.display()));
        return Ok(());
    }
    remove_dir_all(&target)?;
    if ctx.verbose {
        ui::note(format!("removed {}", target.display()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::Runner;
    use crate::hash;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        temp: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            fs::create_dir_all(temp.path().join("main")).unwrap();
            Self { temp }
        }

        fn cache(&self) -> PathBuf {
            self.temp.path().join("gohack")
        }

        fn context(&self) -> Context {
            Context::new(Runner::default(), self.cache(), false).in_dir(self.temp.path().join("main"))
        }

        fn write_go_mod(&self, content: &str) {
            fs::write(self.temp.path().join("main/go.mod"), content).unwrap();
        }

        fn go_mod(&self) -> String {
            fs::read_to_string(self.temp.path().join("main/go.mod")).unwrap()
        }

        /// A copy-mode checkout with a valid fingerprint
        fn checkout(&self, module_path: &str) -> PathBuf {
            let dir = paths::module_dir(&self.cache(), module_path);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("x.go"), "package x\n").unwrap();
            let digest =
                hash::fingerprint(&dir, &hash::Exclusions::for_module(module_path)).unwrap();
            hash::write_sidecar(&dir, &digest).unwrap();
            dir
        }
    }

    fn args(modules: &[&str], remove: bool, force: bool) -> UndoArgs {
        UndoArgs {
            modules: modules.iter().map(ToString::to_string).collect(),
            remove,
            force,
        }
    }

    #[test]
    fn test_undo_all_directory_replacements() {
        let fx = Fixture::new();
        fx.write_go_mod(
            "module m\n\n\
             replace example.com/a => /cache/a\n\
             replace example.com/b => example.com/fork v1.0.0\n\
             replace example.com/c => /cache/c // was example.com/c v1.0.0 => example.com/cfork v1.0.1\n",
        );
        let ctx = fx.context();
        run(&ctx, &args(&[], false, false)).unwrap();

        assert_eq!(
            fx.go_mod(),
            "module m\n\n\
             replace example.com/b => example.com/fork v1.0.0\n\
             replace example.com/c v1.0.0 => example.com/cfork v1.0.1\n"
        );
        assert!(!ctx.has_failed());
    }

    #[test]
    fn test_undo_unknown_module_fails() {
        let fx = Fixture::new();
        let original = "module m\n\nreplace example.com/a => /cache/a\n";
        fx.write_go_mod(original);
        let ctx = fx.context();
        run(&ctx, &args(&["example.com/zzz"], false, false)).unwrap();

        assert!(ctx.has_failed());
        assert_eq!(fx.go_mod(), original);
    }

    #[test]
    fn test_undo_rm_removes_clean_checkout() {
        let fx = Fixture::new();
        let dir = fx.checkout("example.com/a");
        fx.write_go_mod(&format!(
            "module m\n\nreplace example.com/a => {}\n",
            dir.display()
        ));
        let ctx = fx.context();
        run(&ctx, &args(&["example.com/a"], true, false)).unwrap();

        assert_eq!(fx.go_mod(), "module m\n");
        assert!(!dir.exists());
        assert!(!ctx.has_failed());
    }

    #[test]
    fn test_undo_rm_keeps_modified_checkout() {
        let fx = Fixture::new();
        let dir = fx.checkout("example.com/a");
        fs::write(dir.join("x.go"), "package x // edited\n").unwrap();
        fx.write_go_mod(&format!(
            "module m\n\nreplace example.com/a => {}\n",
            dir.display()
        ));
        let ctx = fx.context();
        run(&ctx, &args(&["example.com/a"], true, false)).unwrap();

        // The directive is gone but the edits survive.
        assert_eq!(fx.go_mod(), "module m\n");
        assert!(dir.join("x.go").is_file());
        assert!(ctx.has_failed());
    }

    #[test]
    fn test_undo_rm_force_removes_modified_checkout() {
        let fx = Fixture::new();
        let dir = fx.checkout("example.com/a");
        fs::write(dir.join("x.go"), "package x // edited\n").unwrap();
        fx.write_go_mod(&format!(
            "module m\n\nreplace example.com/a => {}\n",
            dir.display()
        ));
        let ctx = fx.context();
        run(&ctx, &args(&["example.com/a"], true, true)).unwrap();

        assert!(!dir.exists());
        assert!(!ctx.has_failed());
    }

    #[test]
    fn test_undo_rm_dry_run_keeps_checkout() {
        let fx = Fixture::new();
        let dir = fx.checkout("example.com/a");
        fx.write_go_mod(&format!(
            "module m\n\nreplace example.com/a => {}\n",
            dir.display()
        ));
        let ctx = Context::new(Runner::new(false, true), fx.cache(), false)
            .in_dir(fx.temp.path().join("main"));
        run(&ctx, &args(&["example.com/a"], true, false)).unwrap();

        assert_eq!(fx.go_mod(), "module m\n");
        assert!(dir.join("x.go").is_file());
        assert!(!ctx.has_failed());
    }

    #[test]
    fn test_undo_rm_leaves_directories_outside_cache() {
        let fx = Fixture::new();
        let outside = fx.temp.path().join("elsewhere");
        fs::create_dir_all(&outside).unwrap();
        fx.write_go_mod("module m\n\nreplace example.com/a => ../elsewhere\n");
        let ctx = fx.context();
        run(&ctx, &args(&["example.com/a"], true, true)).unwrap();

        assert_eq!(fx.go_mod(), "module m\n");
        assert!(outside.is_dir());
        assert!(ctx.has_failed());
    }
}
