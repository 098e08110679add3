use clap::Parser;

/// Arguments for the get command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Copy a module from the module cache:\n    gohack get example.com/foo\n\n\
                  Check out the module's repository instead:\n    gohack get --vcs example.com/foo\n\n\
                  Throw away local changes and update to the current version:\n    gohack get -f example.com/foo\n\n\
                  Show VCS commands without running them:\n    gohack -n get --vcs example.com/foo")]
pub struct GetArgs {
    /// Module paths to check out
    #[arg(required = true, value_name = "MODULE")]
    pub modules: Vec<String>,

    /// Check out from version control instead of copying from the module cache
    #[arg(long)]
    pub vcs: bool,

    /// Update to the current version even if the checkout has local changes
    #[arg(long, short = 'f')]
    pub force: bool,
}
