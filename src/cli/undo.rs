use clap::Parser;

/// Arguments for the undo command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Stop hacking a module:\n    gohack undo example.com/foo\n\n\
                  Stop hacking every module replaced by a directory:\n    gohack undo\n\n\
                  Also remove the checkout if it has no local changes:\n    gohack undo --rm example.com/foo")]
pub struct UndoArgs {
    /// Module paths to stop hacking (defaults to all directory replacements)
    #[arg(value_name = "MODULE")]
    pub modules: Vec<String>,

    /// Remove the module's checkout too
    #[arg(long = "rm")]
    pub remove: bool,

    /// Remove checkouts even when they have local changes
    #[arg(long, short = 'f', requires = "remove")]
    pub force: bool,
}
