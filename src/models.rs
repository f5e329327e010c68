// src/models.rs
use serde::{Serialize, Deserialize};
use std::fmt;

// Password generation preferences, built fresh from the generator form on every request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationPreferences {
    pub length: usize,
    pub upper: bool,
    pub lower: bool,
    pub number: bool,
    pub symbol: bool,
}

impl Default for GenerationPreferences {
    fn default() -> Self {
        Self {
            length: 12,
            upper: true,
            lower: true,
            number: true,
            symbol: true,
        }
    }
}

impl GenerationPreferences {
    /// Number of character classes the password must draw from.
    pub fn selected_classes(&self) -> usize {
        [self.upper, self.lower, self.number, self.symbol]
            .iter()
            .filter(|selected| **selected)
            .count()
    }
}

/// One of the four composition checkboxes on the generator panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Upper,
    Lower,
    Number,
    Symbol,
}

impl CharClass {
    pub const ALL: [CharClass; 4] = [CharClass::Upper, CharClass::Lower, CharClass::Number, CharClass::Symbol];

    pub fn caption(&self) -> &'static str {
        match self {
            CharClass::Upper => "Uppercase (A-Z)",
            CharClass::Lower => "Lowercase (a-z)",
            CharClass::Number => "Numbers (0-9)",
            CharClass::Symbol => "Symbols (!@#$)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub password: String,
}

// Composition checks reported by the analysis service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Checks {
    pub length: bool,
    pub uppercase: bool,
    pub lowercase: bool,
    pub number: bool,
    pub symbol: bool,
    pub not_common: bool,
}

/// Strength label as reported by the service.
///
/// Labels outside the known five are kept verbatim rather than rejected, so
/// the renderer can fall back to a default colour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StrengthLabel {
    VeryWeak,
    Weak,
    Moderate,
    Strong,
    VeryStrong,
    Unrecognized(String),
}

impl StrengthLabel {
    pub fn as_str(&self) -> &str {
        match self {
            StrengthLabel::VeryWeak => "Very Weak",
            StrengthLabel::Weak => "Weak",
            StrengthLabel::Moderate => "Moderate",
            StrengthLabel::Strong => "Strong",
            StrengthLabel::VeryStrong => "Very Strong",
            StrengthLabel::Unrecognized(label) => label,
        }
    }
}

impl From<String> for StrengthLabel {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Very Weak" => StrengthLabel::VeryWeak,
            "Weak" => StrengthLabel::Weak,
            "Moderate" => StrengthLabel::Moderate,
            "Strong" => StrengthLabel::Strong,
            "Very Strong" => StrengthLabel::VeryStrong,
            _ => StrengthLabel::Unrecognized(label),
        }
    }
}

impl From<StrengthLabel> for String {
    fn from(label: StrengthLabel) -> Self {
        label.as_str().to_string()
    }
}

impl fmt::Display for StrengthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    pub checks: Checks,
    pub sequential_warning: Option<String>,
    pub pwned_warning: Option<String>,
    pub strength_label: StrengthLabel,
    pub strength_score: i64,
}

/// Result of one generation request: the password exactly as the service sent it,
/// or the failure that replaced it.
pub type GenerationOutcome = Result<String, crate::service::ServiceError>;
