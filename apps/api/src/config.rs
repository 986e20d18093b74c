use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_PORT: u16 = 4000;
const DEFAULT_PUBLIC_DIR: &str = "public";
const DEFAULT_RENDER_TIMEOUT_SECS: u64 = 60;

/// Application configuration loaded from environment variables.
/// Only malformed numeric values fail startup; a missing API key is reported
/// per request instead.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
    pub public_dir: PathBuf,
    pub chrome_path: Option<PathBuf>,
    pub render_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Ok(Config {
            openai_api_key: get("OPENAI_API_KEY"),
            port: get("PORT")
                .map(|v| v.parse::<u16>())
                .transpose()
                .context("PORT must be a valid port number")?
                .unwrap_or(DEFAULT_PORT),
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            public_dir: get("PUBLIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PUBLIC_DIR)),
            chrome_path: get("CHROME_PATH").map(PathBuf::from),
            render_timeout: Duration::from_secs(
                get("RENDER_TIMEOUT_SECS")
                    .map(|v| v.parse::<u64>())
                    .transpose()
                    .context("RENDER_TIMEOUT_SECS must be a whole number of seconds")?
                    .unwrap_or(DEFAULT_RENDER_TIMEOUT_SECS),
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.openai_api_key, None);
        assert_eq!(config.port, 4000);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.public_dir, PathBuf::from("public"));
        assert_eq!(config.chrome_path, None);
        assert_eq!(config.render_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_overrides_and_blank_key() {
        let config = config(&[
            ("OPENAI_API_KEY", "  "),
            ("PORT", "8080"),
            ("CHROME_PATH", "/usr/bin/chromium"),
            ("RENDER_TIMEOUT_SECS", "15"),
        ])
        .unwrap();
        assert_eq!(config.openai_api_key, None);
        assert_eq!(config.port, 8080);
        assert_eq!(config.chrome_path, Some(PathBuf::from("/usr/bin/chromium")));
        assert_eq!(config.render_timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_invalid_numbers_fail() {
        assert!(config(&[("PORT", "eighty")]).is_err());
        assert!(config(&[("RENDER_TIMEOUT_SECS", "-1")]).is_err());
    }
}
