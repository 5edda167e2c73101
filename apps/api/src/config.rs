use std::time::Duration;

use anyhow::{Context, Result};

use crate::completion::{ClientSettings, BASE_BACKOFF, MAX_ATTEMPTS};
use crate::keywords::lead_in::LeadInPatterns;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub completion_timeout_secs: u64,
    pub completion_max_attempts: u32,
    /// Extra keyword lead-in phrases, on top of the built-in set.
    pub keyword_lead_ins: Vec<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.to_string()),
            completion_timeout_secs: check_timeout(parse_env(
                "COMPLETION_TIMEOUT_SECS",
                120,
            )?)?,
            completion_max_attempts: check_attempts(parse_env(
                "COMPLETION_MAX_ATTEMPTS",
                3,
            )?)?,
            keyword_lead_ins: std::env::var("KEYWORD_LEAD_INS")
                .map(|v| split_lead_ins(&v))
                .unwrap_or_default(),
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn completion_settings(&self) -> ClientSettings {
        ClientSettings {
            api_key: self.openai_api_key.clone(),
            base_url: self.openai_base_url.clone(),
            timeout: Duration::from_secs(self.completion_timeout_secs),
            max_attempts: self.completion_max_attempts,
            base_backoff: BASE_BACKOFF,
        }
    }

    pub fn lead_ins(&self) -> LeadInPatterns {
        LeadInPatterns::with_extra(&self.keyword_lead_ins)
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| anyhow::anyhow!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

fn check_timeout(secs: u64) -> Result<u64> {
    if secs == 0 {
        anyhow::bail!("COMPLETION_TIMEOUT_SECS must be at least 1");
    }
    Ok(secs)
}

fn check_attempts(attempts: u32) -> Result<u32> {
    if !(1..=MAX_ATTEMPTS).contains(&attempts) {
        anyhow::bail!(
            "COMPLETION_MAX_ATTEMPTS must be between 1 and {MAX_ATTEMPTS}, got {attempts}"
        );
    }
    Ok(attempts)
}

/// `KEYWORD_LEAD_INS` holds phrases separated by `|` (phrases contain colons
/// and commas, so neither works as a separator).
fn split_lead_ins(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
