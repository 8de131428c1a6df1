use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::enrich::DEFAULT_BATCH_SIZE;
use crate::scoring::DEFAULT_RESULT_BUDGET;

/// Pipeline configuration loaded from environment variables.
///
/// Only `GITHUB_TOKEN` matters for quota; everything else has a sensible
/// default so the pipeline can run from an empty environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Optional bearer token for the GitHub API. Absent = reduced quota.
    pub github_token: Option<String>,
    pub cache_dir: PathBuf,
    pub default_ttl: Duration,
    /// Capacity of the in-process cache tier.
    pub memory_cache_capacity: usize,
    /// Candidates enriched concurrently per batch.
    pub batch_size: usize,
    /// Delay inserted between enrichment batches.
    pub batch_delay: Duration,
    /// Maximum candidates returned by the ranking stage.
    pub result_budget: usize,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            github_token: None,
            cache_dir: PathBuf::from(".scout-cache"),
            default_ttl: Duration::from_secs(60 * 60),
            memory_cache_capacity: 100,
            batch_size: DEFAULT_BATCH_SIZE,
            batch_delay: Duration::from_millis(1000),
            result_budget: DEFAULT_RESULT_BUDGET,
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();

        Ok(Config {
            github_token: std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty()),
            cache_dir: std::env::var("SCOUT_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_dir),
            default_ttl: Duration::from_secs(
                parse_env("SCOUT_CACHE_TTL_SECS", 60 * 60)
                    .context("SCOUT_CACHE_TTL_SECS must be a number of seconds")?,
            ),
            memory_cache_capacity: parse_env("SCOUT_MEMORY_CACHE_CAPACITY", 100)
                .context("SCOUT_MEMORY_CACHE_CAPACITY must be a positive integer")?,
            batch_size: parse_env("SCOUT_BATCH_SIZE", DEFAULT_BATCH_SIZE)
                .context("SCOUT_BATCH_SIZE must be a positive integer")?,
            batch_delay: Duration::from_millis(
                parse_env("SCOUT_BATCH_DELAY_MS", 1000)
                    .context("SCOUT_BATCH_DELAY_MS must be a number of milliseconds")?,
            ),
            result_budget: parse_env("SCOUT_RESULT_BUDGET", DEFAULT_RESULT_BUDGET)
                .context("SCOUT_RESULT_BUDGET must be a positive integer")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
        })
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("invalid value for '{key}'")),
        Err(_) => Ok(default),
    }
}
