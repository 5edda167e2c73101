//! Completion client, the single point of entry for text-completion calls in KeyGuru.
//!
//! ARCHITECTURAL RULE: No other module may call the completion API directly.
//! The keyword pipeline only sees the `CompletionService` trait; the concrete
//! `OpenAiClient` is built once at startup and injected through `AppState`.
//!
//! Model: gpt-3.5-turbo-instruct (a text-completion model, hardcoded to keep
//! keyword output stable across deployments)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

#[cfg(test)]
pub mod fake;

/// The model used for all completion calls.
pub const MODEL: &str = "gpt-3.5-turbo-instruct";

// Sampling parameters are fixed for every call. Only `max_tokens` varies.
const TEMPERATURE: f32 = 1.0;
const TOP_P: f32 = 1.0;
const FREQUENCY_PENALTY: f32 = 0.0;
const PRESENCE_PENALTY: f32 = 0.0;

/// First retry delay. Each further retry doubles it.
pub const BASE_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(8);

/// Upper bound on total attempts per call, whatever the configuration says.
pub const MAX_ATTEMPTS: u32 = 5;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("completion request timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("malformed completion response: {0}")]
    Malformed(String),

    #[error("completion response contained no choices")]
    EmptyChoices,
}

impl CompletionError {
    /// Upstream HTTP status, when the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            CompletionError::Api { status, .. } => Some(*status),
            CompletionError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Per-call knobs. Everything except the token budget is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionParams {
    pub max_tokens: u32,
}

impl CompletionParams {
    /// Keyword extraction: a short list.
    pub const EXTRACTION: CompletionParams = CompletionParams { max_tokens: 256 };
    /// Resume revision: must fit a whole resume.
    pub const REVISION: CompletionParams = CompletionParams { max_tokens: 2100 };
}

/// First choice of a completion response.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    pub finish_reason: Option<String>,
}

/// Anything that can turn a prompt into text. Carried in `AppState` as
/// `Arc<dyn CompletionService>` so handlers and tests can swap backends.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(
        &self,
        prompt: &str,
        params: CompletionParams,
    ) -> Result<Completion, CompletionError>;
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    frequency_penalty: f32,
    presence_penalty: f32,
}

impl<'a> CompletionRequest<'a> {
    fn new(prompt: &'a str, params: CompletionParams) -> Self {
        Self {
            model: MODEL,
            prompt,
            temperature: TEMPERATURE,
            max_tokens: params.max_tokens,
            top_p: TOP_P,
            frequency_penalty: FREQUENCY_PENALTY,
            presence_penalty: PRESENCE_PENALTY,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    text: String,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Connection settings for `OpenAiClient`, taken from `Config`.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
    /// Total attempts including the first one. 1 disables retries.
    pub max_attempts: u32,
    pub base_backoff: Duration,
}

/// Client for the legacy text-completions endpoint.
/// Retries on transport errors, 429 and 5xx with exponential backoff.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    settings: ClientSettings,
}

impl OpenAiClient {
    pub fn new(settings: ClientSettings) -> Result<Self, CompletionError> {
        let client = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self { client, settings })
    }

    fn endpoint(&self) -> String {
        format!("{}/completions", self.settings.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionService for OpenAiClient {
    async fn complete(
        &self,
        prompt: &str,
        params: CompletionParams,
    ) -> Result<Completion, CompletionError> {
        let request_body = CompletionRequest::new(prompt, params);
        let url = self.endpoint();
        let max_attempts = self.settings.max_attempts.clamp(1, MAX_ATTEMPTS);

        let mut attempt = 1;
        loop {
            match self.send_once(&url, &request_body).await {
                Err(e) if attempt < max_attempts && is_retryable(&e) => {
                    let delay = backoff_delay(self.settings.base_backoff, attempt);
                    warn!(
                        "Completion attempt {} failed ({}), retrying after {}ms...",
                        attempt,
                        e,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}

impl OpenAiClient {
    async fn send_once(
        &self,
        url: &str,
        request_body: &CompletionRequest<'_>,
    ) -> Result<Completion, CompletionError> {
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.settings.api_key)
            .json(request_body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Completion API returned {}: {}", status, body);
            return Err(CompletionError::Api {
                status: status.as_u16(),
                message: api_error_message(body),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;
        parse_completion(&body)
    }

    fn transport_error(&self, e: reqwest::Error) -> CompletionError {
        if e.is_timeout() {
            CompletionError::Timeout {
                secs: self.settings.timeout.as_secs(),
            }
        } else {
            CompletionError::Http(e)
        }
    }
}

/// Transport failures, 429 and 5xx are retried. Timeouts, other statuses and
/// malformed 2xx bodies are not.
fn is_retryable(err: &CompletionError) -> bool {
    match err {
        CompletionError::Http(_) => true,
        CompletionError::Api { status, .. } => *status == 429 || *status >= 500,
        _ => false,
    }
}

/// Delay before retry number `retry` (1-based): base, 2x base, 4x base, ...
/// capped at `MAX_BACKOFF`.
fn backoff_delay(base: Duration, retry: u32) -> Duration {
    let factor = 2u32.saturating_pow(retry.saturating_sub(1));
    base.saturating_mul(factor).min(MAX_BACKOFF)
}

/// Pulls the first choice out of a raw response body.
fn parse_completion(body: &str) -> Result<Completion, CompletionError> {
    let response: CompletionResponse =
        serde_json::from_str(body).map_err(|e| CompletionError::Malformed(e.to_string()))?;

    if let Some(usage) = &response.usage {
        debug!(
            "Completion succeeded: prompt_tokens={}, completion_tokens={}",
            usage.prompt_tokens, usage.completion_tokens
        );
    }

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or(CompletionError::EmptyChoices)?;

    debug!("Completion finish_reason={:?}", choice.finish_reason);

    Ok(Completion {
        text: choice.text,
        finish_reason: choice.finish_reason,
    })
}

fn api_error_message(body: String) -> String {
    serde_json::from_str::<ApiError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}
