use clap::Parser;

/// Arguments for the status command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  List hacked modules:\n    gohack status\n\n\
                  Show one module with the state of its checkout:\n    gohack -v status example.com/foo")]
pub struct StatusArgs {
    /// Only show these modules
    #[arg(value_name = "MODULE")]
    pub modules: Vec<String>,
}
