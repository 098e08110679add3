//! Status command

use crate::checkout;
use crate::cli::StatusArgs;
use crate::context::Context;
use crate::error::{HackError, Result};
use crate::ui;

/// Run status command
pub fn run(ctx: &Context, args: &StatusArgs) -> Result<()> {
    let modfile = super::load_manifest(ctx)?;
    let wanted = |path: &str| args.modules.is_empty() || args.modules.iter().any(|m| m == path);

    let mut shown: Vec<&str> = Vec::new();
    for replace in modfile.directory_replacements() {
        if !wanted(&replace.old.path) {
            continue;
        }
        shown.push(&replace.old.path);
        let line = ui::replacement_line(&replace.old.path, &replace.new.path);
        if !ctx.verbose {
            ui::result(line);
            continue;
        }
        let dir = super::replacement_dir(&modfile, replace);
        match checkout::inspect(ctx, &replace.old.path, &dir) {
            Ok(state) => ui::result(format!("{line} ({})", state.describe())),
            Err(e) => {
                ui::result(line);
                ctx.report(&e);
            }
        }
    }

    for path in super::dedup(&args.modules) {
        if !shown.contains(&path.as_str()) {
            ctx.report(&HackError::NotHacked { path });
        }
    }
    Ok(())
}
