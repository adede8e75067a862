use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::optimizer::assembler::ImprovementReporting;
use crate::optimizer::pipeline::{ExecutionMode, PipelineConfig, MAX_RETRY_CAP};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    pub pipeline: PipelineConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = PipelineConfig::default();

        let max_retries: u32 = parse_env("OPTIMIZER_MAX_RETRIES", defaults.max_retries)?;
        if max_retries > MAX_RETRY_CAP {
            bail!("OPTIMIZER_MAX_RETRIES must be at most {MAX_RETRY_CAP}");
        }

        let pipeline = PipelineConfig {
            mode: parse_mode(std::env::var("OPTIMIZER_MODE").ok().as_deref())?,
            call_delay: Duration::from_millis(parse_env(
                "OPTIMIZER_CALL_DELAY_MS",
                defaults.call_delay.as_millis() as u64,
            )?),
            max_concurrency: parse_env("OPTIMIZER_MAX_CONCURRENCY", defaults.max_concurrency)?
                .max(1),
            call_timeout: Duration::from_secs(parse_env(
                "OPTIMIZER_CALL_TIMEOUT_SECS",
                defaults.call_timeout.as_secs(),
            )?),
            pipeline_timeout: optional_env::<u64>("OPTIMIZER_PIPELINE_TIMEOUT_SECS")?
                .map(Duration::from_secs),
            max_retries,
            reporting: parse_reporting(std::env::var("OPTIMIZER_REPORT").ok().as_deref())?,
        };

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            pipeline,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env<T: std::str::FromStr>(key: &str) -> Result<Option<T>> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| anyhow::anyhow!("{key} has an invalid value: '{raw}'")),
        Err(_) => Ok(None),
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
    Ok(optional_env(key)?.unwrap_or(default))
}

fn parse_mode(raw: Option<&str>) -> Result<ExecutionMode> {
    match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        None | Some("") | Some("serialized") => Ok(ExecutionMode::Serialized),
        Some("concurrent") => Ok(ExecutionMode::Concurrent),
        Some(other) => bail!("OPTIMIZER_MODE must be 'serialized' or 'concurrent', got '{other}'"),
    }
}

fn parse_reporting(raw: Option<&str>) -> Result<ImprovementReporting> {
    match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        None | Some("") | Some("attempted") => Ok(ImprovementReporting::Attempted),
        Some("applied") => Ok(ImprovementReporting::Applied),
        Some(other) => bail!("OPTIMIZER_REPORT must be 'attempted' or 'applied', got '{other}'"),
    }
}
