use anyhow::{Context, Result};

/// Default model fallback chain, highest priority first.
const DEFAULT_MODEL_CHAIN: &str = "gemini-2.5-flash,gemini-2.5-flash-lite,gemini-2.0-flash";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub google_api_key: String,
    /// Ordered model priority list for the fallback generator.
    pub model_chain: Vec<String>,
    /// Per-field character budget applied before prompt interpolation.
    pub prompt_char_budget: usize,
    /// Timeout for the single-attempt job-posting fetch.
    pub fetch_timeout_secs: u64,
    /// Delay before retrying the same model after a rate-limit response.
    pub rate_limit_backoff_secs: u64,
    /// Same-model retries after a rate-limit response before moving on.
    pub rate_limit_retries: u32,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://careerai.db".to_string()),
            google_api_key: require_env("GOOGLE_API_KEY")?,
            model_chain: std::env::var("GEMINI_MODELS")
                .unwrap_or_else(|_| DEFAULT_MODEL_CHAIN.to_string())
                .split(',')
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
                .collect(),
            prompt_char_budget: parse_env("PROMPT_CHAR_BUDGET", 30_000)?,
            fetch_timeout_secs: parse_env("FETCH_TIMEOUT_SECS", 10)?,
            rate_limit_backoff_secs: parse_env("RATE_LIMIT_BACKOFF_SECS", 5)?,
            rate_limit_retries: parse_env("RATE_LIMIT_RETRIES", 1)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("'{key}' must be a valid number")),
        Err(_) => Ok(default),
    }
}
