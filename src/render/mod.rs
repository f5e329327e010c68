// src/render/mod.rs
//! Pure mapping from service responses to display state.
//!
//! Nothing here touches the terminal. The same input always yields the same
//! display, which is what lets a discarded stale response be observed as
//! "nothing changed".

use crate::models::{AnalysisResult, GenerationOutcome, StrengthLabel};
use crate::service;

/// Written into the output field when generation fails.
pub const GENERATION_ERROR: &str = "Error generating password";

pub const FALLBACK_COLOR: &str = "#6b7280";
pub const NEUTRAL_COLOR: &str = "#fafafa";
pub const ERROR_COLOR: &str = "#ef4444";

pub const RESET_LABEL: &str = "Enter password";
pub const ERROR_LABEL: &str = "Error";
pub const ANALYSIS_ERROR_MESSAGE: &str = "Error analyzing password. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Ok,
    Bad,
}

impl From<bool> for CheckStatus {
    fn from(passed: bool) -> Self {
        if passed { CheckStatus::Ok } else { CheckStatus::Bad }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistItem {
    pub caption: &'static str,
    pub status: CheckStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisState {
    Empty,
    Analyzed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrengthBar {
    pub width_percent: u8,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisDisplay {
    pub state: AnalysisState,
    pub checklist: Vec<ChecklistItem>,
    pub error_message: Option<&'static str>,
    pub sequential_warning: Option<String>,
    pub pwned_warning: Option<String>,
    pub strength_label: String,
    pub score_text: String,
    pub bar: StrengthBar,
}

impl AnalysisDisplay {
    /// Neutral state shown while the analyzer input is empty.
    pub fn reset() -> Self {
        Self {
            state: AnalysisState::Empty,
            checklist: Vec::new(),
            error_message: None,
            sequential_warning: None,
            pwned_warning: None,
            strength_label: RESET_LABEL.to_string(),
            score_text: String::new(),
            bar: StrengthBar { width_percent: 0, color: NEUTRAL_COLOR },
        }
    }

    pub fn failed() -> Self {
        Self {
            state: AnalysisState::Failed,
            checklist: Vec::new(),
            error_message: Some(ANALYSIS_ERROR_MESSAGE),
            sequential_warning: None,
            pwned_warning: None,
            strength_label: ERROR_LABEL.to_string(),
            score_text: String::new(),
            bar: StrengthBar { width_percent: 0, color: ERROR_COLOR },
        }
    }
}

impl Default for AnalysisDisplay {
    fn default() -> Self {
        Self::reset()
    }
}

pub fn bar_color(label: &StrengthLabel) -> &'static str {
    match label {
        StrengthLabel::VeryWeak => "#ef4444",
        StrengthLabel::Weak => "#f97316",
        StrengthLabel::Moderate => "#eab308",
        StrengthLabel::Strong => "#22c55e",
        StrengthLabel::VeryStrong => "#16a34a",
        StrengthLabel::Unrecognized(_) => FALLBACK_COLOR,
    }
}

pub fn clamp_score(score: i64) -> u8 {
    score.clamp(0, 100) as u8
}

pub fn render_analysis(result: &AnalysisResult) -> AnalysisDisplay {
    let checks = &result.checks;
    let checklist = vec![
        ChecklistItem { caption: "Length: At least 12 characters", status: checks.length.into() },
        ChecklistItem { caption: "Contains uppercase letters", status: checks.uppercase.into() },
        ChecklistItem { caption: "Contains lowercase letters", status: checks.lowercase.into() },
        ChecklistItem { caption: "Contains numbers", status: checks.number.into() },
        ChecklistItem { caption: "Not a common password", status: checks.not_common.into() },
        ChecklistItem { caption: "Contains symbols", status: checks.symbol.into() },
    ];

    let score = clamp_score(result.strength_score);
    AnalysisDisplay {
        state: AnalysisState::Analyzed,
        checklist,
        error_message: None,
        sequential_warning: visible(&result.sequential_warning),
        pwned_warning: visible(&result.pwned_warning),
        strength_label: result.strength_label.to_string(),
        score_text: format!("{}/100", score),
        bar: StrengthBar { width_percent: score, color: bar_color(&result.strength_label) },
    }
}

fn visible(warning: &Option<String>) -> Option<String> {
    warning.as_ref().filter(|text| !text.is_empty()).cloned()
}

pub fn render_analysis_outcome(outcome: &service::Result<AnalysisResult>) -> AnalysisDisplay {
    match outcome {
        Ok(result) => render_analysis(result),
        Err(_) => AnalysisDisplay::failed(),
    }
}

/// Value of the generator output field for an outcome.
pub fn render_generation(outcome: &GenerationOutcome) -> String {
    match outcome {
        Ok(password) => password.clone(),
        Err(_) => GENERATION_ERROR.to_string(),
    }
}

/// True when the output field holds something worth copying.
pub fn is_copyable(output: &str) -> bool {
    !output.is_empty() && output != GENERATION_ERROR
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateButton {
    pub label: &'static str,
    pub enabled: bool,
}

pub fn render_generate_button(busy: bool) -> GenerateButton {
    if busy {
        GenerateButton { label: "Generating...", enabled: false }
    } else {
        GenerateButton { label: "Generate Password", enabled: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Checks;
    use crate::service::ServiceError;

    fn weak_result() -> AnalysisResult {
        AnalysisResult {
            checks: Checks {
                length: true,
                uppercase: false,
                lowercase: true,
                number: true,
                symbol: false,
                not_common: true,
            },
            sequential_warning: None,
            pwned_warning: Some("Found in 3 breaches".to_string()),
            strength_label: StrengthLabel::Weak,
            strength_score: 35,
        }
    }

    #[test]
    fn renders_weak_breached_password() {
        let display = render_analysis(&weak_result());

        let ok = display.checklist.iter().filter(|item| item.status == CheckStatus::Ok).count();
        let bad = display.checklist.iter().filter(|item| item.status == CheckStatus::Bad).count();
        assert_eq!((ok, bad), (4, 2));
        assert_eq!(display.sequential_warning, None);
        assert_eq!(display.pwned_warning.as_deref(), Some("Found in 3 breaches"));
        assert_eq!(display.bar, StrengthBar { width_percent: 35, color: "#f97316" });
        assert_eq!(display.strength_label, "Weak");
        assert_eq!(display.score_text, "35/100");
        assert_eq!(display.state, AnalysisState::Analyzed);
    }

    #[test]
    fn checklist_order_is_fixed() {
        let captions: Vec<_> = render_analysis(&weak_result()).checklist.iter().map(|item| item.caption).collect();
        assert_eq!(
            captions,
            vec![
                "Length: At least 12 characters",
                "Contains uppercase letters",
                "Contains lowercase letters",
                "Contains numbers",
                "Not a common password",
                "Contains symbols",
            ]
        );
    }

    #[test]
    fn rendering_is_idempotent() {
        let result = weak_result();
        assert_eq!(render_analysis(&result), render_analysis(&result));
    }

    #[test]
    fn both_warnings_can_show_together() {
        let mut result = weak_result();
        result.sequential_warning = Some("Avoid sequential characters".to_string());
        let display = render_analysis(&result);
        assert!(display.sequential_warning.is_some());
        assert!(display.pwned_warning.is_some());

        result.sequential_warning = Some(String::new());
        result.pwned_warning = None;
        let display = render_analysis(&result);
        assert!(display.sequential_warning.is_none());
        assert!(display.pwned_warning.is_none());
    }

    #[test]
    fn unknown_label_uses_fallback_color() {
        let mut result = weak_result();
        result.strength_label = StrengthLabel::Unrecognized("Unbreakable".to_string());
        let display = render_analysis(&result);
        assert_eq!(display.bar.color, FALLBACK_COLOR);
        assert_eq!(display.strength_label, "Unbreakable");
    }

    #[test]
    fn palette_covers_every_known_label() {
        assert_eq!(bar_color(&StrengthLabel::VeryWeak), "#ef4444");
        assert_eq!(bar_color(&StrengthLabel::Moderate), "#eab308");
        assert_eq!(bar_color(&StrengthLabel::Strong), "#22c55e");
        assert_eq!(bar_color(&StrengthLabel::VeryStrong), "#16a34a");
    }

    #[test]
    fn score_is_clamped() {
        let mut result = weak_result();
        result.strength_score = -20;
        assert_eq!(render_analysis(&result).bar.width_percent, 0);
        result.strength_score = 140;
        let display = render_analysis(&result);
        assert_eq!(display.bar.width_percent, 100);
        assert_eq!(display.score_text, "100/100");
    }

    #[test]
    fn reset_and_error_states_are_distinct() {
        let reset = AnalysisDisplay::reset();
        let failed = render_analysis_outcome(&Err(ServiceError::Status(500)));

        assert_eq!(reset.strength_label, RESET_LABEL);
        assert!(reset.checklist.is_empty());
        assert!(reset.score_text.is_empty());
        assert_eq!(reset.bar, StrengthBar { width_percent: 0, color: NEUTRAL_COLOR });
        assert!(reset.error_message.is_none());

        assert_eq!(failed.state, AnalysisState::Failed);
        assert_eq!(failed.strength_label, ERROR_LABEL);
        assert_eq!(failed.error_message, Some(ANALYSIS_ERROR_MESSAGE));
        assert_ne!(reset, failed);
        assert_ne!(failed, render_analysis(&weak_result()));
    }

    #[test]
    fn generation_renders_password_or_sentinel() {
        assert_eq!(render_generation(&Ok(" pa ss ".to_string())), " pa ss ");
        assert_eq!(render_generation(&Err(ServiceError::Abandoned)), GENERATION_ERROR);
        assert!(!is_copyable(GENERATION_ERROR));
        assert!(!is_copyable(""));
        assert!(is_copyable("abc"));
    }

    #[test]
    fn generate_button_reflects_busy_flag() {
        assert_eq!(render_generate_button(true), GenerateButton { label: "Generating...", enabled: false });
        assert!(render_generate_button(false).enabled);
    }
}
