use clap::Parser;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    gohack completions --shell bash > ~/.bash_completion.d/gohack\n\n\
                  Generate zsh completions:\n    gohack completions --shell zsh > ~/.zfunc/_gohack\n\n\
                  Generate fish completions:\n    gohack completions --shell fish > ~/.config/fish/completions/gohack.fish")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    #[arg(long, short = 's')]
    pub shell: String,
}
