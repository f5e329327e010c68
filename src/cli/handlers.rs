// src/cli/handlers.rs
use anyhow::Context;
use console::style;
use inquire::{Confirm, CustomType, Password, PasswordDisplayMode};
use log::{info, warn};
use std::sync::Arc;

use super::GenerateArgs;
use crate::clipboard::{Clipboard, SystemClipboard};
use crate::core::config::Config;
use crate::models::{AnalysisRequest, CharClass, GenerationPreferences};
use crate::render::{self, AnalysisDisplay, CheckStatus};
use crate::service::PasswordService;
use crate::terminal::{bar_cells, hex_to_ansi256};
use crate::utils::describe_secret;

// Handlers for the one-shot commands

/// Preferences from command-line flags, with the length pulled into bounds.
pub fn preferences_from_args(args: &GenerateArgs, config: &Config) -> GenerationPreferences {
    let length = args
        .length
        .map(|length| length.clamp(config.min_password_length, config.max_password_length))
        .unwrap_or_else(|| config.initial_length());

    GenerationPreferences {
        length,
        upper: !args.no_upper,
        lower: !args.no_lower,
        number: !args.no_number,
        symbol: !args.no_symbol,
    }
}

fn prompt_preferences(defaults: GenerationPreferences, config: &Config) -> anyhow::Result<GenerationPreferences> {
    let (min, max) = (config.min_password_length, config.max_password_length);
    let length = CustomType::<usize>::new("Password length:")
        .with_default(defaults.length)
        .with_help_message(&format!("Between {} and {}", min, max))
        .with_error_message("Please enter a whole number")
        .prompt()?
        .clamp(min, max);

    let mut preferences = GenerationPreferences { length, ..defaults };
    for class in CharClass::ALL {
        let slot = match class {
            CharClass::Upper => &mut preferences.upper,
            CharClass::Lower => &mut preferences.lower,
            CharClass::Number => &mut preferences.number,
            CharClass::Symbol => &mut preferences.symbol,
        };
        *slot = Confirm::new(&format!("Include {}?", class.caption()))
            .with_default(*slot)
            .prompt()?;
    }

    Ok(preferences)
}

pub async fn handle_generate(
    service: Arc<dyn PasswordService>,
    config: &Config,
    args: &GenerateArgs,
) -> anyhow::Result<()> {
    let mut preferences = preferences_from_args(args, config);
    if args.prompt {
        preferences = prompt_preferences(preferences, config)?;
    }
    if preferences.selected_classes() == 0 {
        warn!("Generating with no character classes selected");
    }

    info!("Generating a {}-character password", preferences.length);
    let password = service
        .generate(preferences)
        .await
        .context("Failed to generate password")?;

    if args.json {
        println!("{}", serde_json::json!({ "password": password }));
    } else {
        println!("{}", style(&password).bold());
    }

    if args.copy {
        let text = password.clone();
        let copied = tokio::task::spawn_blocking(move || SystemClipboard::new().copy(&text)).await?;
        match copied {
            Ok(method) => {
                info!("Copied {} via {}", describe_secret(&password), method);
                eprintln!("{}", style("Password copied to clipboard").green());
            }
            Err(e) => {
                warn!("Copy failed: {}", e);
                eprintln!("{}", style("Failed to copy password").red());
            }
        }
    }

    Ok(())
}

pub async fn handle_analyze(
    service: Arc<dyn PasswordService>,
    password: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let password = match password {
        Some(password) => password,
        None => Password::new("Password to analyze:")
            .with_display_mode(PasswordDisplayMode::Hidden)
            .without_confirmation()
            .prompt()?,
    };

    if password.is_empty() {
        println!("{}", style("Nothing to analyze").dim());
        return Ok(());
    }

    info!("Analyzing {}", describe_secret(&password));
    let result = service
        .analyze(AnalysisRequest { password })
        .await
        .context("Failed to analyze password")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        for line in report_lines(&render::render_analysis(&result)) {
            println!("{}", line);
        }
    }

    Ok(())
}

/// Printable lines for an analysis report.
pub fn report_lines(display: &AnalysisDisplay) -> Vec<String> {
    let color = hex_to_ansi256(display.bar.color);
    let (filled, empty) = bar_cells(display.bar.width_percent);

    let mut lines = vec![
        format!(
            "{} {}",
            style(&display.strength_label).color256(color).bold(),
            display.score_text
        ),
        format!(
            "{}{}",
            style("\u{2588}".repeat(filled)).color256(color),
            style("\u{2591}".repeat(empty)).dim()
        ),
        String::new(),
    ];

    for item in &display.checklist {
        let marker = match item.status {
            CheckStatus::Ok => style("\u{2714}").green(),
            CheckStatus::Bad => style("\u{2718}").red(),
        };
        lines.push(format!("{} {}", marker, item.caption));
    }

    for warning in [&display.sequential_warning, &display.pwned_warning].into_iter().flatten() {
        lines.push(format!("{} {}", style("\u{26a0}").yellow(), warning));
    }

    lines
}
