use clap::Parser;
use std::path::Path;
use std::sync::Arc;

mod cli;
mod clipboard;
mod controller;
mod coordinator;
mod core;
mod logging;
mod models;
mod render;
mod service;
mod terminal;
mod utils;

use crate::cli::{Args, CliCommand};
use crate::core::config::Config;
use crate::service::http::HttpPasswordService;
use crate::service::PasswordService;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    if Path::new(".env").exists() {
        dotenvy::dotenv().ok();
    }

    let args = Args::parse();

    let mut config = Config::load();
    config.apply_args(&args);
    config.validate()?;

    logging::init(&config)?;
    let http = HttpPasswordService::new(&config.service_url, config.request_timeout)?;
    log::info!("Starting passcheck against {}", http.base_url());
    let service: Arc<dyn PasswordService> = Arc::new(http);

    let result = match args.command {
        None | Some(CliCommand::Interactive) => terminal::run_interactive(service, &config).await,
        Some(CliCommand::Generate(generate)) => cli::handlers::handle_generate(service, &config, &generate).await,
        Some(CliCommand::Analyze { password, json }) => cli::handlers::handle_analyze(service, password, json).await,
    };

    if let Err(e) = &result {
        log::error!("{:#}", e);
    }
    log::info!("passcheck shutdown complete");

    result
}
