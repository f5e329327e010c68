// src/terminal/mod.rs
use console::{style, Style, Term};
use log::{info, warn};
use std::io;
use std::sync::Arc;
use std::thread;
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::clipboard::SystemClipboard;
use crate::controller::{Action, Controller, ControllerSettings, Input, NoticeKind, Presenter, Screen, Tab};
use crate::core::config::Config;
use crate::models::CharClass;
use crate::render::{AnalysisDisplay, CheckStatus};
use crate::service::PasswordService;
use crate::utils::truncate_string;

const BAR_CELLS: usize = 40;

/// Map a `#rrggbb` colour to the nearest entry of the 256-colour cube.
pub fn hex_to_ansi256(hex: &str) -> u8 {
    let digits = hex.trim_start_matches('#');
    if digits.len() != 6 {
        return 244;
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16)
            .ok()
            .map(|value| ((value as u16 * 5 + 127) / 255) as u8)
    };
    match (channel(0..2), channel(2..4), channel(4..6)) {
        (Some(r), Some(g), Some(b)) => 16 + 36 * r + 6 * g + b,
        _ => 244,
    }
}

pub fn bar_cells(width_percent: u8) -> (usize, usize) {
    let filled = (width_percent as usize * BAR_CELLS + 50) / 100;
    (filled, BAR_CELLS - filled)
}

pub struct TerminalPresenter {
    term: Term,
}

impl TerminalPresenter {
    pub fn new(term: Term) -> io::Result<Self> {
        term.hide_cursor()?;
        Ok(Self { term })
    }

    fn tab_header(&self, tab: Tab) -> String {
        let active = Style::new().bold().reverse();
        let inactive = Style::new().dim();
        let (generator, analyzer) = match tab {
            Tab::Generator => (active.apply_to(" Generator "), inactive.apply_to(" Analyzer ")),
            Tab::Analyzer => (inactive.apply_to(" Generator "), active.apply_to(" Analyzer ")),
        };
        format!(" {} {} {}", style("passcheck").bold().cyan(), generator, analyzer)
    }

    fn generator_lines(&self, screen: &Screen<'_>) -> Vec<String> {
        let prefs = screen.preferences;
        let (min, max) = screen.length_bounds;
        let mut lines = vec![
            format!("  Length: {}  ({}-{}, \u{2190}/\u{2192})", style(prefs.length).bold(), min, max),
            String::new(),
        ];

        for (index, class) in CharClass::ALL.iter().enumerate() {
            let checked = match class {
                CharClass::Upper => prefs.upper,
                CharClass::Lower => prefs.lower,
                CharClass::Number => prefs.number,
                CharClass::Symbol => prefs.symbol,
            };
            let mark = if checked { "[x]" } else { "[ ]" };
            lines.push(format!("  {} {} {}", style(index + 1).dim(), mark, class.caption()));
        }

        let button = if screen.button.enabled {
            style(format!("[ {} ]", screen.button.label)).green().bold()
        } else {
            style(format!("[ {} ]", screen.button.label)).dim()
        };
        lines.push(String::new());
        lines.push(format!("  Password: {}", style(screen.output).bold()));
        lines.push(String::new());
        lines.push(format!("  {}", button));
        lines.push(String::new());
        lines.push(style("  g/Enter generate   c copy   1-4 toggle   Tab analyzer   q quit").dim().to_string());
        lines
    }

    fn analyzer_lines(&self, screen: &Screen<'_>) -> Vec<String> {
        let analysis: &AnalysisDisplay = screen.analysis;
        let mut lines = vec![format!("  Password: {}\u{2581}", screen.analyzer_input), String::new()];

        let color = hex_to_ansi256(analysis.bar.color);
        let (filled, empty) = bar_cells(analysis.bar.width_percent);
        lines.push(format!(
            "  {}{}  {} {}",
            style("\u{2588}".repeat(filled)).color256(color),
            style("\u{2591}".repeat(empty)).dim(),
            style(&analysis.strength_label).color256(color).bold(),
            analysis.score_text
        ));
        lines.push(String::new());

        if let Some(message) = analysis.error_message {
            lines.push(format!("  {}", style(message).red()));
        }

        for item in &analysis.checklist {
            let marker = match item.status {
                CheckStatus::Ok => style("\u{2714}").green(),
                CheckStatus::Bad => style("\u{2718}").red(),
            };
            lines.push(format!("  {} {}", marker, item.caption));
        }

        for warning in [&analysis.sequential_warning, &analysis.pwned_warning].into_iter().flatten() {
            lines.push(format!("  {} {}", style("\u{26a0}").yellow(), truncate_string(warning, 100)));
        }

        lines.push(String::new());
        lines.push(style("  Enter analyze now   Esc clear   Tab generator   Ctrl+G generate").dim().to_string());
        lines
    }
}

impl Presenter for TerminalPresenter {
    fn draw(&mut self, screen: &Screen<'_>) -> io::Result<()> {
        let mut lines = vec![self.tab_header(screen.tab), String::new()];
        lines.extend(match screen.tab {
            Tab::Generator => self.generator_lines(screen),
            Tab::Analyzer => self.analyzer_lines(screen),
        });

        lines.push(String::new());
        if let Some(notice) = screen.notice {
            let text = match notice.kind {
                NoticeKind::Success => style(&notice.text).green(),
                NoticeKind::Error => style(&notice.text).red(),
            };
            lines.push(format!("  {}", text));
        }

        self.term.clear_screen()?;
        self.term.write_line(&lines.join("\n"))
    }
}

impl Drop for TerminalPresenter {
    fn drop(&mut self) {
        let _ = self.term.show_cursor();
    }
}

// Keys are read on a plain thread because reading blocks
fn spawn_key_reader(term: Term, inputs: UnboundedSender<Input>) {
    thread::spawn(move || loop {
        match term.read_key() {
            Ok(key) => {
                if inputs.send(Input::Key(key)).is_err() {
                    break;
                }
            }
            Err(e) => {
                if e.kind() != io::ErrorKind::Interrupted {
                    warn!("Stopped reading keys: {}", e);
                }
                let _ = inputs.send(Input::Shutdown);
                break;
            }
        }
    });
}

pub async fn run_interactive(service: Arc<dyn PasswordService>, config: &Config) -> anyhow::Result<()> {
    let term = Term::stdout();
    if !term.is_term() {
        anyhow::bail!("Interactive mode needs a terminal; use the generate or analyze commands instead");
    }

    let (input_tx, input_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    {
        let input_tx = input_tx.clone();
        ctrlc::set_handler(move || {
            let _ = input_tx.send(Input::Action(Action::Quit));
        })?;
    }
    spawn_key_reader(term.clone(), input_tx.clone());

    let controller = Controller::new(
        ControllerSettings::from(config),
        service,
        Arc::new(SystemClipboard::new()),
        input_tx,
        event_tx,
    );

    info!("Interactive session started");
    let mut presenter = TerminalPresenter::new(term.clone())?;
    controller.run(input_rx, event_rx, &mut presenter).await?;
    drop(presenter);

    term.clear_screen()?;
    println!("Goodbye!");
    Ok(())
}
