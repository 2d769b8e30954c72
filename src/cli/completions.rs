use clap::Parser;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    license-collect completions bash > ~/.bash_completion.d/license-collect\n\n\
                  Generate zsh completions:\n    license-collect completions zsh > ~/.zfunc/_license-collect\n\n\
                  Generate fish completions:\n    license-collect completions fish > ~/.config/fish/completions/license-collect.fish")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    pub shell: String,
}
