//! gohack - mutable checkouts of Go module dependencies
//!
//! Checks out the source of Go module dependencies into a directory where it
//! can be edited, and adds `replace` directives to the main module's `go.mod`
//! so that builds use the checkouts. `undo` puts `go.mod` back the way it was.

use clap::Parser;

mod checkout;
mod cli;
mod commands;
mod common;
mod context;
mod error;
mod exec;
mod hash;
mod modfile;
mod modules;
mod ui;
mod vcs;
mod version;

use checkout::paths;
use cli::{Cli, Commands};
use context::Context;
use error::Result;
use exec::Runner;

/// Build the context shared by the module commands
fn context(cli: &Cli) -> Result<Context> {
    let work_dir = std::env::current_dir()?;
    // A relative $GOHACK is taken relative to where gohack was started.
    let cache_root = work_dir.join(paths::cache_root()?);
    let runner = Runner::new(cli.echo, cli.dry_run);
    Ok(Context::new(runner, cache_root, cli.verbose).in_dir(work_dir))
}

/// Run the selected command, returning the process exit status
fn run(cli: &Cli) -> Result<i32> {
    let ctx = match &cli.command {
        Commands::Completions(args) => {
            commands::completions::run(args)?;
            return Ok(0);
        }
        _ => context(cli)?,
    };
    match &cli.command {
        Commands::Get(args) => commands::get::run(&ctx, args)?,
        Commands::Undo(args) => commands::undo::run(&ctx, args)?,
        Commands::Status(args) => commands::status::run(&ctx, args)?,
        Commands::Completions(_) => {}
    }
    Ok(ctx.exit_code())
}

fn main() {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            ui::error(format!("Error: {e}"));
            std::process::exit(1);
        }
    }
}
