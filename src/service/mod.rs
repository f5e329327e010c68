// src/service/mod.rs
use futures::future::BoxFuture;
use serde::Deserialize;
use thiserror::Error;

use crate::models::{AnalysisRequest, AnalysisResult, Checks, GenerationPreferences, StrengthLabel};

pub mod http;

// Failures of the scoring/generation service. The controller treats every
// variant the same way; the distinction only matters for logs.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Service responded with status {0}")]
    Status(u16),

    #[error("Response is missing the '{0}' field")]
    MissingField(&'static str),

    #[error("Invalid service URL: {0}")]
    InvalidUrl(String),

    #[error("Request was abandoned before it completed")]
    Abandoned,
}

pub type Result<T> = std::result::Result<T, ServiceError>;

/// The external collaborator that generates and scores passwords.
///
/// Both calls return `'static` futures so the coordinator can hand them to a
/// spawned task and keep running while they are in flight.
pub trait PasswordService: Send + Sync + 'static {
    fn generate(&self, preferences: GenerationPreferences) -> BoxFuture<'static, Result<String>>;

    fn analyze(&self, request: AnalysisRequest) -> BoxFuture<'static, Result<AnalysisResult>>;
}

// Wire format of POST /generate
#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    pub password: Option<String>,
}

impl GenerateResponse {
    pub fn into_password(self) -> Result<String> {
        match self.password {
            Some(password) if !password.is_empty() => Ok(password),
            _ => Err(ServiceError::MissingField("password")),
        }
    }
}

// Wire format of POST /analyze
#[derive(Debug, Deserialize)]
pub struct AnalyzeResponse {
    pub analysis: AnalysisBody,
    pub strength_label: StrengthLabel,
    pub strength_score: i64,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisBody {
    pub length: bool,
    pub uppercase: bool,
    pub lowercase: bool,
    pub number: bool,
    pub symbol: bool,
    pub not_common: bool,
    pub sequential_message: Option<String>,
    pub pwned_message: Option<String>,
}

fn non_empty(message: Option<String>) -> Option<String> {
    message.filter(|text| !text.is_empty())
}

impl From<AnalyzeResponse> for AnalysisResult {
    fn from(response: AnalyzeResponse) -> Self {
        let body = response.analysis;
        AnalysisResult {
            checks: Checks {
                length: body.length,
                uppercase: body.uppercase,
                lowercase: body.lowercase,
                number: body.number,
                symbol: body.symbol,
                not_common: body.not_common,
            },
            sequential_warning: non_empty(body.sequential_message),
            pwned_warning: non_empty(body.pwned_message),
            strength_label: response.strength_label,
            strength_score: response.strength_score,
        }
    }
}
