use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheBackend {
    Memory,
    File,
    Redis,
}

impl FromStr for CacheBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(CacheBackend::Memory),
            "file" => Ok(CacheBackend::File),
            "redis" => Ok(CacheBackend::Redis),
            other => bail!("CACHE_BACKEND must be one of memory, file, redis (got '{other}')"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if a value is present but invalid.
#[derive(Debug, Clone)]
pub struct Config {
    pub upstream_api_url: String,
    pub port: u16,
    pub rust_log: String,
    pub request_timeout_secs: u64,
    pub cache_backend: CacheBackend,
    pub cache_dir: PathBuf,
    pub redis_url: Option<String>,
    pub cache_ttl_secs: Option<u64>,
    pub chart_height: f64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let cache_backend: CacheBackend = get("CACHE_BACKEND")
            .unwrap_or_else(|| "memory".to_string())
            .parse()?;
        let redis_url = get("REDIS_URL");
        if cache_backend == CacheBackend::Redis && redis_url.is_none() {
            bail!("REDIS_URL is required when CACHE_BACKEND=redis");
        }

        Ok(Config {
            upstream_api_url: get("UPSTREAM_API_URL")
                .unwrap_or_else(|| "http://localhost:8080".to_string()),
            port: parse_or(&get, "PORT", 3001)?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            request_timeout_secs: parse_or(&get, "REQUEST_TIMEOUT_SECS", 30)?,
            cache_backend,
            cache_dir: get("CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".cache/snapshots")),
            redis_url,
            cache_ttl_secs: get("CACHE_TTL_SECS")
                .map(|v| v.parse::<u64>())
                .transpose()
                .context("CACHE_TTL_SECS must be a whole number of seconds")?,
            chart_height: parse_or(&get, "CHART_HEIGHT", 256.0)?,
        })
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
