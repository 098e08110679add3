//! CLI definitions using clap derive API
//!
//! Each command's arguments live in their own submodule:
//! - get: start hacking modules
//! - undo: stop hacking modules
//! - status: show hacked modules
//! - completions: shell completion scripts

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};

pub mod completions;
pub mod get;
pub mod status;
pub mod undo;

pub use completions::CompletionsArgs;
pub use get::GetArgs;
pub use status::StatusArgs;
pub use undo::UndoArgs;

/// gohack - mutable checkouts of Go module dependencies
#[derive(Parser, Debug)]
#[command(
    name = "gohack",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Make and manage mutable checkouts of Go module dependencies",
    long_about = "gohack checks out Go module dependencies into a directory where they can be \
                  edited and points the main module's go.mod at them. Checkouts live under \
                  $GOHACK, or $HOME/gohack when $GOHACK is empty.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  gohack get example.com/foo          \x1b[90m# Copy a dependency and use the copy\x1b[0m\n   \
                  gohack get --vcs example.com/foo    \x1b[90m# Check out the dependency's repository\x1b[0m\n   \
                  gohack status                       \x1b[90m# List hacked modules\x1b[0m\n   \
                  gohack undo example.com/foo         \x1b[90m# Stop hacking a module\x1b[0m\n   \
                  gohack undo                         \x1b[90m# Stop hacking every module\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Print external commands as they are run
    #[arg(short = 'x', global = true)]
    pub echo: bool,

    /// Print commands that would change a working copy instead of running them
    #[arg(long, short = 'n', global = true)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start hacking modules
    Get(GetArgs),

    /// Stop hacking modules
    Undo(UndoArgs),

    /// Show modules currently being hacked
    Status(StatusArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
