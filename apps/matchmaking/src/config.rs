use anyhow::{bail, Context, Result};

use crate::providers::FallbackPolicy;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON weights file; takes precedence over `database_url`.
    pub weights_file: Option<String>,
    pub database_url: Option<String>,
    pub provider_fallback: FallbackPolicy,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let fallback_kind =
            std::env::var("PROVIDER_FALLBACK").unwrap_or_else(|_| "missing".to_string());
        let neutral_score = std::env::var("NEUTRAL_SCORE").ok();

        Ok(Config {
            weights_file: optional_env("WEIGHTS_FILE"),
            database_url: optional_env("DATABASE_URL"),
            provider_fallback: parse_fallback(&fallback_kind, neutral_score.as_deref())?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// `missing` | `neutral` | `fail`. `neutral` reads its value from NEUTRAL_SCORE (default 0.5).
pub fn parse_fallback(kind: &str, neutral_score: Option<&str>) -> Result<FallbackPolicy> {
    match kind.trim().to_lowercase().as_str() {
        "missing" | "treat_as_missing" => Ok(FallbackPolicy::TreatAsMissing),
        "fail" => Ok(FallbackPolicy::Fail),
        "neutral" => {
            let value = match neutral_score {
                Some(raw) => raw
                    .trim()
                    .parse::<f64>()
                    .context("NEUTRAL_SCORE must be a number")?,
                None => 0.5,
            };
            if !(0.0..=1.0).contains(&value) {
                bail!("NEUTRAL_SCORE must be within [0, 1], got {value}");
            }
            Ok(FallbackPolicy::Neutral(value))
        }
        other => bail!("PROVIDER_FALLBACK must be one of missing, neutral, fail (got '{other}')"),
    }
}
