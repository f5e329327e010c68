// src/controller/mod.rs
use console::Key;
use log::{debug, info, warn};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crate::clipboard::{Clipboard, ClipboardError, CopyMethod};
use crate::coordinator::{CoordinatorEvent, CoordinatorUpdate, RequestCoordinator, ScheduleOutcome, TimerSlot};
use crate::core::config::Config;
use crate::models::{CharClass, GenerationPreferences};
use crate::render::{self, AnalysisDisplay, GenerateButton};
use crate::service::PasswordService;

pub mod keymap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Generator,
    Analyzer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ShowAnalyzer,
    ToggleTab,
    Generate,
    /// Switch to the generator if needed, then generate.
    GenerateShortcut,
    /// Switch to the analyzer with its input focused.
    AnalyzerShortcut,
    Copy,
    LengthUp,
    LengthDown,
    ToggleClass(CharClass),
    InsertChar(char),
    DeleteChar,
    AnalyzeNow,
    ClearAnalyzer,
    Quit,
}

/// Everything the controller reacts to apart from service completions.
#[derive(Debug)]
pub enum Input {
    Key(Key),
    Action(Action),
    NoticeExpired(u64),
    CopyFinished(Result<CopyMethod, ClipboardError>),
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub quiet_period: Duration,
    pub notice_duration: Duration,
    pub min_length: usize,
    pub max_length: usize,
    pub default_length: usize,
}

impl From<&Config> for ControllerSettings {
    fn from(config: &Config) -> Self {
        Self {
            quiet_period: config.analyze_debounce,
            notice_duration: config.notice_duration,
            min_length: config.min_password_length,
            max_length: config.max_password_length,
            default_length: config.initial_length(),
        }
    }
}

/// Read-only view handed to the presenter after every event.
#[derive(Debug)]
pub struct Screen<'a> {
    pub tab: Tab,
    pub preferences: &'a GenerationPreferences,
    pub length_bounds: (usize, usize),
    pub output: &'a str,
    pub button: GenerateButton,
    pub analyzer_input: &'a str,
    pub analysis: &'a AnalysisDisplay,
    pub notice: Option<&'a Notice>,
}

pub trait Presenter {
    fn draw(&mut self, screen: &Screen<'_>) -> io::Result<()>;
}

/// Owns all interactive state and wires inputs to the request coordinator.
pub struct Controller {
    settings: ControllerSettings,
    coordinator: RequestCoordinator,
    clipboard: Arc<dyn Clipboard>,
    inputs: UnboundedSender<Input>,

    tab: Tab,
    preferences: GenerationPreferences,
    output: String,
    analyzer_input: String,
    analysis: AnalysisDisplay,

    notice: Option<Notice>,
    notice_timer: TimerSlot,
    quit: bool,
}

impl Controller {
    pub fn new(
        settings: ControllerSettings,
        service: Arc<dyn PasswordService>,
        clipboard: Arc<dyn Clipboard>,
        inputs: UnboundedSender<Input>,
        events: UnboundedSender<CoordinatorEvent>,
    ) -> Self {
        let coordinator = RequestCoordinator::new(service, events, settings.quiet_period);
        let preferences = GenerationPreferences {
            length: settings.default_length,
            ..Default::default()
        };

        Self {
            settings,
            coordinator,
            clipboard,
            inputs,
            tab: Tab::Generator,
            preferences,
            output: String::new(),
            analyzer_input: String::new(),
            analysis: AnalysisDisplay::reset(),
            notice: None,
            notice_timer: TimerSlot::new(),
            quit: false,
        }
    }

    pub fn screen(&self) -> Screen<'_> {
        Screen {
            tab: self.tab,
            preferences: &self.preferences,
            length_bounds: (self.settings.min_length, self.settings.max_length),
            output: &self.output,
            button: render::render_generate_button(self.coordinator.is_generating()),
            analyzer_input: &self.analyzer_input,
            analysis: &self.analysis,
            notice: self.notice.as_ref(),
        }
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Open with a freshly generated password.
    pub fn start(&mut self) {
        self.generate();
    }

    pub fn handle_input(&mut self, input: Input) {
        match input {
            Input::Key(key) => {
                if let Some(action) = keymap::action_for_key(self.tab, &key) {
                    self.handle_action(action);
                }
            }
            Input::Action(action) => self.handle_action(action),
            Input::NoticeExpired(id) => {
                if self.notice_timer.take_if_live(id) {
                    self.notice = None;
                }
            }
            Input::CopyFinished(result) => self.copy_finished(result),
            Input::Shutdown => self.quit = true,
        }
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::ShowAnalyzer | Action::AnalyzerShortcut => self.tab = Tab::Analyzer,
            Action::ToggleTab => {
                self.tab = match self.tab {
                    Tab::Generator => Tab::Analyzer,
                    Tab::Analyzer => Tab::Generator,
                };
            }
            Action::Generate => {
                if self.tab == Tab::Generator {
                    self.generate();
                }
            }
            Action::GenerateShortcut => {
                self.tab = Tab::Generator;
                self.generate();
            }
            Action::Copy => self.copy_output(),
            Action::LengthUp => {
                self.preferences.length = (self.preferences.length + 1).min(self.settings.max_length);
            }
            Action::LengthDown => {
                self.preferences.length = self
                    .preferences
                    .length
                    .saturating_sub(1)
                    .max(self.settings.min_length);
            }
            Action::ToggleClass(class) => {
                let flag = match class {
                    CharClass::Upper => &mut self.preferences.upper,
                    CharClass::Lower => &mut self.preferences.lower,
                    CharClass::Number => &mut self.preferences.number,
                    CharClass::Symbol => &mut self.preferences.symbol,
                };
                *flag = !*flag;
            }
            Action::InsertChar(c) => {
                self.analyzer_input.push(c);
                self.analyzer_input_changed();
            }
            Action::DeleteChar => {
                if self.analyzer_input.pop().is_some() {
                    self.analyzer_input_changed();
                }
            }
            Action::AnalyzeNow => {
                if self.coordinator.analyze_now(&self.analyzer_input) == ScheduleOutcome::Reset {
                    self.analysis = AnalysisDisplay::reset();
                }
            }
            Action::ClearAnalyzer => {
                self.analyzer_input.clear();
                self.coordinator.reset_analysis();
                self.analysis = AnalysisDisplay::reset();
            }
            Action::Quit => self.quit = true,
        }
    }

    pub fn handle_coordinator_event(&mut self, event: CoordinatorEvent) {
        match self.coordinator.handle_event(event) {
            Some(CoordinatorUpdate::Generation(outcome)) => {
                self.output = render::render_generation(&outcome);
                if outcome.is_ok() {
                    self.show_notice(NoticeKind::Success, "Password generated successfully!");
                } else {
                    self.show_notice(NoticeKind::Error, "Failed to generate password. Please try again.");
                }
            }
            Some(CoordinatorUpdate::Analysis(outcome)) => {
                self.analysis = render::render_analysis_outcome(&outcome);
            }
            None => {}
        }
    }

    fn generate(&mut self) {
        // Preferences are snapshotted from the form at trigger time
        let preferences = self.preferences.clone();
        if !self.coordinator.request_generation(preferences) {
            debug!("Generate ignored while busy");
        }
    }

    fn analyzer_input_changed(&mut self) {
        if self.coordinator.schedule_analysis(&self.analyzer_input) == ScheduleOutcome::Reset {
            self.analysis = AnalysisDisplay::reset();
        }
    }

    fn copy_output(&mut self) {
        if !render::is_copyable(&self.output) {
            self.show_notice(NoticeKind::Error, "No password to copy");
            return;
        }

        let clipboard = Arc::clone(&self.clipboard);
        let text = self.output.clone();
        let inputs = self.inputs.clone();
        tokio::task::spawn_blocking(move || {
            let result = clipboard.copy(&text);
            let _ = inputs.send(Input::CopyFinished(result));
        });
    }

    fn copy_finished(&mut self, result: Result<CopyMethod, ClipboardError>) {
        match result {
            Ok(method) => {
                info!("Password copied via {}", method);
                self.show_notice(NoticeKind::Success, "Password copied to clipboard");
            }
            Err(e) => {
                warn!("Error copying password: {}", e);
                self.show_notice(NoticeKind::Error, "Failed to copy password");
            }
        }
    }

    fn show_notice(&mut self, kind: NoticeKind, text: &str) {
        match kind {
            NoticeKind::Success => info!("{}", text),
            NoticeKind::Error => warn!("{}", text),
        }
        self.notice = Some(Notice { kind, text: text.to_string() });

        let inputs = self.inputs.clone();
        self.notice_timer.schedule(self.settings.notice_duration, move |id| {
            let _ = inputs.send(Input::NoticeExpired(id));
        });
    }

    /// Drive the controller until it is asked to quit or its input closes.
    pub async fn run<P: Presenter>(
        mut self,
        mut inputs: UnboundedReceiver<Input>,
        mut events: UnboundedReceiver<CoordinatorEvent>,
        presenter: &mut P,
    ) -> io::Result<()> {
        self.start();
        presenter.draw(&self.screen())?;

        loop {
            tokio::select! {
                input = inputs.recv() => match input {
                    Some(input) => self.handle_input(input),
                    None => break,
                },
                Some(event) = events.recv() => self.handle_coordinator_event(event),
            }

            if self.should_quit() {
                break;
            }
            presenter.draw(&self.screen())?;
        }

        info!(
            "Controller stopped ({} analyses in flight, debounce pending: {})",
            self.coordinator.analyses_in_flight(),
            self.coordinator.has_pending_analysis()
        );
        Ok(())
    }
}
