//! Get command
//!
//! Checks out each requested module and points `go.mod` at the checkouts.
//! A module that fails is reported and skipped; the others still go ahead.

use crate::checkout::{self, HackedModule, Mode, paths};
use crate::cli::GetArgs;
use crate::context::Context;
use crate::error::{HackError, Result};
use crate::modfile::ModFile;
use crate::modules::{GoList, ModuleLister, ModuleMap};
use crate::ui;

/// Run get command
pub fn run(ctx: &Context, args: &GetArgs) -> Result<()> {
    execute(ctx, &GoList, args)
}

pub(crate) fn execute(ctx: &Context, lister: &dyn ModuleLister, args: &GetArgs) -> Result<()> {
    let mut modfile = super::load_manifest(ctx)?;
    let modules = lister.list(&ctx.runner, modfile.dir(), &["all"])?;
    let mode = if args.vcs { Mode::Vcs } else { Mode::Copy };

    let mut hacked: Vec<HackedModule> = Vec::new();
    for path in super::dedup(&args.modules) {
        match get_one(ctx, &modfile, &modules, &path, mode, args.force) {
            Ok(Some(module)) => hacked.push(module),
            Ok(None) => {}
            Err(e) => ctx.report(&e),
        }
    }

    if hacked.is_empty() {
        if ctx.has_failed() {
            return Err(HackError::NothingReplaced);
        }
        return Ok(());
    }

    for module in &hacked {
        modfile.replace_module(&module.path, &module.dir.to_string_lossy());
    }
    modfile.save()?;

    for module in &hacked {
        ui::result(ui::replacement_line(
            &module.path,
            &module.dir.display().to_string(),
        ));
    }
    Ok(())
}

/// Check out one module, or return `None` when it is already being hacked
fn get_one(
    ctx: &Context,
    modfile: &ModFile,
    modules: &ModuleMap,
    path: &str,
    mode: Mode,
    force: bool,
) -> Result<Option<HackedModule>> {
    let module = modules.get(path).ok_or_else(|| HackError::ModuleNotInUse {
        path: path.to_string(),
    })?;
    if module.main {
        return Err(HackError::MainModule {
            path: path.to_string(),
        });
    }
    if let Some(err) = &module.error {
        return Err(HackError::ModuleListFailed {
            reason: format!("{path}: {}", err.err),
        });
    }

    match modfile.check_can_replace(path) {
        Err(HackError::AlreadyReplaced { target, .. })
            if paths::is_within(&paths::resolve_dir(modfile.dir(), &target), ctx.cache_root()) =>
        {
            ui::warn(HackError::AlreadyHacking {
                path: path.to_string(),
                dir: target,
            });
            return Ok(None);
        }
        other => other?,
    }

    if ctx.verbose {
        ui::note(format!("getting {}@{}", module.path, module.version));
        if let Some(replaced) = &module.replace {
            ui::note(format!(
                "{} is currently replaced by {} {}",
                module.path, replaced.path, replaced.version
            ));
        }
    }
    checkout::sync(ctx, module, mode, force).map(Some)
}
