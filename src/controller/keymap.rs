// src/controller/keymap.rs
use console::Key;

use super::{Action, Tab};
use crate::models::CharClass;

const CTRL_A: char = '\u{1}';
const CTRL_C: char = '\u{3}';
const CTRL_D: char = '\u{4}';
const CTRL_G: char = '\u{7}';

// Shortcuts that apply on either panel
fn global_action(key: &Key) -> Option<Action> {
    match key {
        Key::Char(CTRL_G) => Some(Action::GenerateShortcut),
        Key::Char(CTRL_A) => Some(Action::AnalyzerShortcut),
        Key::Char(CTRL_C) | Key::Char(CTRL_D) => Some(Action::Quit),
        Key::Tab => Some(Action::ToggleTab),
        _ => None,
    }
}

pub fn action_for_key(tab: Tab, key: &Key) -> Option<Action> {
    if let Some(action) = global_action(key) {
        return Some(action);
    }

    match tab {
        Tab::Generator => match key {
            Key::Enter | Key::Char('g') => Some(Action::Generate),
            Key::Char('c') => Some(Action::Copy),
            Key::ArrowRight | Key::ArrowUp | Key::Char('+') | Key::Char('=') => Some(Action::LengthUp),
            Key::ArrowLeft | Key::ArrowDown | Key::Char('-') => Some(Action::LengthDown),
            Key::Char('1') => Some(Action::ToggleClass(CharClass::Upper)),
            Key::Char('2') => Some(Action::ToggleClass(CharClass::Lower)),
            Key::Char('3') => Some(Action::ToggleClass(CharClass::Number)),
            Key::Char('4') => Some(Action::ToggleClass(CharClass::Symbol)),
            Key::Char('a') => Some(Action::ShowAnalyzer),
            Key::Char('q') => Some(Action::Quit),
            _ => None,
        },
        Tab::Analyzer => match key {
            Key::Enter => Some(Action::AnalyzeNow),
            Key::Escape => Some(Action::ClearAnalyzer),
            Key::Backspace => Some(Action::DeleteChar),
            Key::Char(c) if !c.is_control() => Some(Action::InsertChar(*c)),
            _ => None,
        },
    }
}
