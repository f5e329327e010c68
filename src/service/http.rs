// src/service/http.rs
use futures::future::BoxFuture;
use futures::FutureExt;
use log::{debug, warn};
use reqwest::Url;
use std::time::Duration;

use super::{AnalyzeResponse, GenerateResponse, PasswordService, Result, ServiceError};
use crate::models::{AnalysisRequest, AnalysisResult, GenerationPreferences};

/// JSON-over-HTTP client for the generation and analysis endpoints.
#[derive(Clone, Debug)]
pub struct HttpPasswordService {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpPasswordService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| ServiceError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        // Endpoints are joined relative to the base, which needs a trailing slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, name: &str) -> Result<Url> {
        self.base_url
            .join(name)
            .map_err(|e| ServiceError::InvalidUrl(format!("{}{}: {}", self.base_url, name, e)))
    }

    pub async fn request_generation(&self, preferences: &GenerationPreferences) -> Result<String> {
        let url = self.endpoint("generate")?;
        debug!("POST {} (length {})", url, preferences.length);

        let response = self.client.post(url).json(preferences).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("Generation request rejected with status {}", status);
            return Err(ServiceError::Status(status.as_u16()));
        }

        let body: GenerateResponse = response.json().await?;
        body.into_password()
    }

    pub async fn request_analysis(&self, request: &AnalysisRequest) -> Result<AnalysisResult> {
        let url = self.endpoint("analyze")?;
        debug!("POST {} ({} chars)", url, request.password.chars().count());

        let response = self.client.post(url).json(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("Analysis request rejected with status {}", status);
            return Err(ServiceError::Status(status.as_u16()));
        }

        let body: AnalyzeResponse = response.json().await?;
        Ok(body.into())
    }
}

impl PasswordService for HttpPasswordService {
    fn generate(&self, preferences: GenerationPreferences) -> BoxFuture<'static, Result<String>> {
        let service = self.clone();
        async move { service.request_generation(&preferences).await }.boxed()
    }

    fn analyze(&self, request: AnalysisRequest) -> BoxFuture<'static, Result<AnalysisResult>> {
        let service = self.clone();
        async move { service.request_analysis(&request).await }.boxed()
    }
}
