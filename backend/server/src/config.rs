use std::{env, fmt::Display, str::FromStr};

use anyhow::{Context, anyhow, bail};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerBackend {
    Memory,
    Redis,
}

impl FromStr for LedgerBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "redis" => Ok(Self::Redis),
            other => bail!("unknown ledger backend {other:?}, expected memory or redis"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub ledger: LedgerBackend,
    pub redis_url: String,
    pub accounts_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 1111,
            ledger: LedgerBackend::Memory,
            redis_url: "redis://127.0.0.1:6379".to_string(),
            accounts_path: "/run/secrets/VOTE_ACCOUNTS".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Ok(Self {
            port: try_load("RUST_PORT", "1111")?,
            ledger: try_load("LEDGER_BACKEND", "memory")?,
            redis_url: try_load("REDIS_URL", "redis://127.0.0.1:6379")?,
            accounts_path: try_load("ACCOUNTS_PATH", "/run/secrets/VOTE_ACCOUNTS")?,
        })
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key)
        .map_err(|_| {
            warn!("Environment variable {key} not found, using default");
        })
        .ok()
}

fn try_load<T: FromStr>(key: &str, default: &str) -> anyhow::Result<T>
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| anyhow!("{e}"))
        .with_context(|| format!("Invalid {key} value"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_names() {
        assert_eq!(
            "memory".parse::<LedgerBackend>().unwrap(),
            LedgerBackend::Memory
        );
        assert_eq!(
            " Redis ".parse::<LedgerBackend>().unwrap(),
            LedgerBackend::Redis
        );
        assert!("postgres".parse::<LedgerBackend>().is_err());
    }

    #[test]
    fn test_defaults_parse() {
        let port: u16 = try_load("VOTE_TEST_UNSET_PORT", "1111").unwrap();
        assert_eq!(port, 1111);

        let bad: anyhow::Result<u16> = try_load("VOTE_TEST_UNSET_PORT", "not-a-port");
        assert!(bad.is_err());
    }
}
