use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

/// Server settings, read from `RECIPEBOX_*` environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub session_ttl_hours: i64,
    pub session_sweep_secs: u64,
    pub cookie_secure: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            host: lookup("RECIPEBOX_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(&lookup, "RECIPEBOX_PORT", 5555)?,
            db_path: lookup("RECIPEBOX_DB_PATH")
                .unwrap_or_else(|| "recipebox.db".into())
                .into(),
            session_ttl_hours: parse_or(&lookup, "RECIPEBOX_SESSION_TTL_HOURS", 24)?,
            session_sweep_secs: parse_or(&lookup, "RECIPEBOX_SESSION_SWEEP_SECS", 300)?,
            cookie_secure: parse_or(&lookup, "RECIPEBOX_COOKIE_SECURE", false)?,
        };

        anyhow::ensure!(
            config.session_ttl_hours > 0,
            "RECIPEBOX_SESSION_TTL_HOURS must be positive"
        );
        anyhow::ensure!(
            config.session_sweep_secs > 0,
            "RECIPEBOX_SESSION_SWEEP_SECS must be positive"
        );
        Ok(config)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        None => Ok(default),
    }
}
