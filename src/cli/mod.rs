// src/cli/mod.rs
use clap::Parser;
use std::path::PathBuf;

pub mod commands;
pub mod handlers;

pub use commands::{CliCommand, GenerateArgs};

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate passwords and check their strength against a scoring service", long_about = None)]
pub struct Args {
    /// Base URL of the password service
    #[arg(long, short = 's')]
    pub service_url: Option<String>,

    /// Quiet period before analyzing typed input, in milliseconds
    #[arg(long)]
    pub debounce_ms: Option<u64>,

    /// Log level
    #[arg(long, value_parser = clap::builder::PossibleValuesParser::new(LOG_LEVELS), ignore_case = true)]
    pub log_level: Option<String>,

    /// Write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}
