use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_DATA_DIR: &str = ".listiq";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Runtime settings read from the environment
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory holding the persisted state files
    pub data_dir: PathBuf,
    /// AI features fall back to offline output when unset
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub http_timeout_secs: u64,
    /// Bearer secret expected by scheduled research runs
    pub cron_secret: Option<String>,
}

impl Config {
    /// Read the process environment. Call `dotenvy::dotenv()` first to pick
    /// up a `.env` file.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let http_timeout_secs = match non_empty("LISTIQ_HTTP_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().ok().filter(|secs| *secs > 0).ok_or_else(|| {
                Error::Validation(format!(
                    "LISTIQ_HTTP_TIMEOUT_SECS must be a positive number of seconds, got {raw:?}"
                ))
            })?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(Self {
            data_dir: non_empty("LISTIQ_DATA_DIR")
                .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string())
                .into(),
            openai_api_key: non_empty("OPENAI_API_KEY"),
            openai_model: non_empty("OPENAI_MODEL")
                .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            openai_base_url: non_empty("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            http_timeout_secs,
            cron_secret: non_empty("CRON_SECRET"),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: DEFAULT_DATA_DIR.into(),
            openai_api_key: None,
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            cron_secret: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn reads_overrides_and_ignores_blank_values() {
        let config = Config::from_lookup(lookup(&[
            ("LISTIQ_DATA_DIR", "/tmp/listiq"),
            ("OPENAI_API_KEY", "  "),
            ("OPENAI_MODEL", "gpt-4o"),
            ("LISTIQ_HTTP_TIMEOUT_SECS", "5"),
            ("CRON_SECRET", "s3cret"),
        ]))
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/listiq"));
        assert_eq!(config.openai_api_key, None);
        assert_eq!(config.openai_model, "gpt-4o");
        assert_eq!(config.http_timeout_secs, 5);
        assert_eq!(config.cron_secret.as_deref(), Some("s3cret"));
    }

    #[test]
    fn rejects_bad_timeout() {
        assert!(Config::from_lookup(lookup(&[("LISTIQ_HTTP_TIMEOUT_SECS", "soon")])).is_err());
        assert!(Config::from_lookup(lookup(&[("LISTIQ_HTTP_TIMEOUT_SECS", "0")])).is_err());
    }
}
