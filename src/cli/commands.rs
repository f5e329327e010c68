// src/cli/commands.rs
use clap::{Args, Subcommand};

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Open the interactive generator and analyzer (the default)
    Interactive,

    /// Generate a single password and print it
    Generate(GenerateArgs),

    /// Analyze a password once and print the report
    Analyze {
        /// Password to analyze; prompted for (hidden) when omitted
        password: Option<String>,

        /// Print the raw analysis as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Password length (clamped to the configured bounds)
    #[arg(long, short)]
    pub length: Option<usize>,

    /// Leave out uppercase letters
    #[arg(long)]
    pub no_upper: bool,

    /// Leave out lowercase letters
    #[arg(long)]
    pub no_lower: bool,

    /// Leave out numbers
    #[arg(long)]
    pub no_number: bool,

    /// Leave out symbols
    #[arg(long)]
    pub no_symbol: bool,

    /// Copy the result to the clipboard
    #[arg(long)]
    pub copy: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Ask for the options interactively
    #[arg(long)]
    pub prompt: bool,
}
