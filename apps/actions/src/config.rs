use anyhow::{Context, Result};

const DEFAULT_COMPLETION_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const DEFAULT_MODEL: &str = "mistralai/mistral-7b-instruct";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub openrouter_api_key: String,
    pub openrouter_api_url: String,
    pub openrouter_model: String,
    /// Absent means the in-memory session store is used.
    pub redis_url: Option<String>,
    pub session_ttl_secs: u64,
    pub completion_retry: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openrouter_api_key: require_env("OPENROUTER_API_KEY")?,
            openrouter_api_url: optional_env("OPENROUTER_API_URL")
                .unwrap_or_else(|| DEFAULT_COMPLETION_URL.to_string()),
            openrouter_model: optional_env("OPENROUTER_MODEL")
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            redis_url: optional_env("REDIS_URL"),
            session_ttl_secs: optional_env("SESSION_TTL_SECS")
                .unwrap_or_else(|| "86400".to_string())
                .parse::<u64>()
                .context("SESSION_TTL_SECS must be a whole number of seconds")?,
            completion_retry: parse_flag(optional_env("COMPLETION_RETRY").as_deref())
                .context("COMPLETION_RETRY must be true or false")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5055".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Treats an empty value the same as an unset one.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_flag(value: Option<&str>) -> Result<bool> {
    match value.map(str::to_ascii_lowercase).as_deref() {
        None => Ok(false),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(other) => anyhow::bail!("unrecognised flag value '{other}'"),
    }
}
