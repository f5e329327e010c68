// src/clipboard.rs
use base64::{engine::general_purpose, Engine as _};
use console::Term;
use log::{debug, warn};
use std::fmt;
use std::io::{self, Write};
use std::process::{Command, Stdio};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("No clipboard method succeeded ({0})")]
    Unavailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyMethod {
    Command(&'static str),
    Osc52,
}

impl fmt::Display for CopyMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CopyMethod::Command(program) => write!(f, "{}", program),
            CopyMethod::Osc52 => write!(f, "OSC 52 terminal sequence"),
        }
    }
}

/// Copying may block on an external tool, so callers off the blocking pool
/// should hand it to `spawn_blocking`.
pub trait Clipboard: Send + Sync {
    fn copy(&self, text: &str) -> Result<CopyMethod, ClipboardError>;
}

#[derive(Debug, Clone, Copy)]
pub struct ClipboardCommand {
    pub program: &'static str,
    pub args: &'static [&'static str],
}

fn platform_commands() -> Vec<ClipboardCommand> {
    if cfg!(target_os = "macos") {
        vec![ClipboardCommand { program: "pbcopy", args: &[] }]
    } else if cfg!(windows) {
        vec![ClipboardCommand { program: "clip", args: &[] }]
    } else {
        vec![
            ClipboardCommand { program: "wl-copy", args: &[] },
            ClipboardCommand { program: "xclip", args: &["-selection", "clipboard"] },
            ClipboardCommand { program: "xsel", args: &["--clipboard", "--input"] },
        ]
    }
}

/// Copies through the platform clipboard tool, falling back to an OSC 52
/// escape sequence that asks the terminal itself to set the clipboard.
pub struct SystemClipboard {
    commands: Vec<ClipboardCommand>,
    fallback: Option<Term>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::with_commands(platform_commands(), Some(Term::stdout()))
    }

    pub fn with_commands(commands: Vec<ClipboardCommand>, fallback: Option<Term>) -> Self {
        Self { commands, fallback }
    }

    fn pipe_to(command: &ClipboardCommand, text: &str) -> io::Result<bool> {
        let mut child = Command::new(command.program)
            .args(command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(text.as_bytes()) {
                drop(stdin);
                let _ = child.kill();
                let _ = child.wait();
                return Err(e);
            }
        }
        Ok(child.wait()?.success())
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Clipboard for SystemClipboard {
    fn copy(&self, text: &str) -> Result<CopyMethod, ClipboardError> {
        let mut failures = Vec::new();

        for command in &self.commands {
            match Self::pipe_to(command, text) {
                Ok(true) => return Ok(CopyMethod::Command(command.program)),
                Ok(false) => failures.push(format!("{} exited with an error", command.program)),
                Err(e) => {
                    debug!("Clipboard command {} unavailable: {}", command.program, e);
                    failures.push(format!("{}: {}", command.program, e));
                }
            }
        }

        match &self.fallback {
            Some(term) if term.is_term() => {
                warn!("Clipboard commands failed, falling back to OSC 52");
                let mut term = term.clone();
                term.write_all(osc52_sequence(text).as_bytes())?;
                term.flush()?;
                Ok(CopyMethod::Osc52)
            }
            _ => {
                failures.push("terminal clipboard not available".to_string());
                Err(ClipboardError::Unavailable(failures.join("; ")))
            }
        }
    }
}

pub fn osc52_sequence(text: &str) -> String {
    let encoded = general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{}\x1b\\", encoded)
}
