use anyhow::{bail, Context, Result};

/// Default number of technical questions per assessment.
pub const DEFAULT_TOTAL_QUESTIONS: usize = 3;
/// Upper bound accepted for `TOTAL_QUESTIONS` and per-session overrides.
pub const MAX_TOTAL_QUESTIONS: usize = 20;
/// Default idle lifetime of a session, in seconds.
pub const DEFAULT_SESSION_IDLE_TTL_SECS: u64 = 3600;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub groq_api_key: String,
    pub port: u16,
    pub rust_log: String,
    pub total_questions: usize,
    pub llm_timeout_secs: u64,
    /// When set, every session's clarification RNG is seeded from this value.
    pub clarification_seed: Option<u64>,
    /// Sessions untouched for this long are evicted.
    pub session_idle_ttl_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let total_questions = std::env::var("TOTAL_QUESTIONS")
            .unwrap_or_else(|_| DEFAULT_TOTAL_QUESTIONS.to_string())
            .parse::<usize>()
            .context("TOTAL_QUESTIONS must be a positive integer")?;
        if !(1..=MAX_TOTAL_QUESTIONS).contains(&total_questions) {
            bail!("TOTAL_QUESTIONS must be between 1 and {MAX_TOTAL_QUESTIONS}");
        }

        let clarification_seed = match std::env::var("CLARIFICATION_SEED") {
            Ok(raw) => Some(
                raw.parse::<u64>()
                    .context("CLARIFICATION_SEED must be an unsigned integer")?,
            ),
            Err(_) => None,
        };

        let session_idle_ttl_secs = std::env::var("SESSION_IDLE_TTL_SECS")
            .unwrap_or_else(|_| DEFAULT_SESSION_IDLE_TTL_SECS.to_string())
            .parse::<u64>()
            .context("SESSION_IDLE_TTL_SECS must be a number of seconds")?;
        if session_idle_ttl_secs == 0 {
            bail!("SESSION_IDLE_TTL_SECS must be greater than zero");
        }

        Ok(Config {
            groq_api_key: require_env("GROQ_API_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            total_questions,
            llm_timeout_secs: std::env::var("LLM_TIMEOUT_SECS")
                .unwrap_or_else(|_| "120".to_string())
                .parse::<u64>()
                .context("LLM_TIMEOUT_SECS must be a number of seconds")?,
            clarification_seed,
            session_idle_ttl_secs,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
