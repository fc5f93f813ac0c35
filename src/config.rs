use std::{env, str::FromStr, time::Duration};

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: String,
    pub backend_base_url: String,
    /// Forwarded upstream as a bearer token when set.
    pub backend_api_token: Option<String>,
    pub api_prefix: String,
    pub http_timeout: Duration,

    // Query cache
    pub query_stale_time: Duration,
    pub query_gc_time: Duration,
    pub query_cache_capacity: u64,
    pub query_revalidate_interval: Duration,

    // Rate limiting
    pub rate_per_min: u32,

    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| AppError::Config(format!("{name} must be set")))
        };
        let parsed = |name: &str, default: &str| parse_or(&lookup, name, default);

        Ok(Self {
            server_addr: lookup("SERVER_ADDR").unwrap_or_else(|| "127.0.0.1:8080".to_string()),
            backend_base_url: required("BACKEND_BASE_URL")?,
            backend_api_token: lookup("BACKEND_API_TOKEN").filter(|t| !t.is_empty()),
            api_prefix: lookup("API_PREFIX").unwrap_or_else(|| "/api/v1".to_string()),
            http_timeout: Duration::from_secs(parsed("HTTP_TIMEOUT_SECS", "15")?),

            query_stale_time: Duration::from_secs(parsed("QUERY_STALE_TIME_SECS", "30")?),
            query_gc_time: Duration::from_secs(parsed("QUERY_GC_TIME_SECS", "300")?),
            query_cache_capacity: parsed("QUERY_CACHE_CAPACITY", "10000")?,
            // 0 disables background revalidation.
            query_revalidate_interval: Duration::from_secs(parsed(
                "QUERY_REVALIDATE_INTERVAL_SECS",
                "60",
            )?),

            rate_per_min: parse_or(&lookup, "RATE_PER_MIN", "600")?,

            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: &str,
) -> Result<T, AppError> {
    let raw = lookup(name).unwrap_or_else(|| default.to_string());
    raw.trim()
        .parse()
        .map_err(|_| AppError::Config(format!("{name} must be a number, got {raw:?}")))
}
