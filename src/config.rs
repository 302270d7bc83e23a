use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub request: RequestConfig,
    #[serde(default)]
    pub trigger: TriggerConfig,
    #[serde(default)]
    pub cli: CliConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RequestConfig {
    /// Per-request timeout in seconds (platform-default equivalent).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct TriggerConfig {
    /// Distance from the trailing edge at which to fetch the next page.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Minimum interval between trigger evaluations, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_threshold() -> f64 {
    120.0
}
fn default_debounce_ms() -> u64 {
    200
}

#[derive(Debug, Deserialize, Clone)]
pub struct CliConfig {
    /// How many pages `portal list` follows by default.
    #[serde(default = "default_page_limit")]
    pub page_limit: usize,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            page_limit: default_page_limit(),
        }
    }
}

fn default_page_limit() -> usize {
    1
}

impl RequestConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl TriggerConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.request.timeout_secs == 0 {
        anyhow::bail!("request.timeout_secs must be > 0");
    }

    if config.trigger.threshold < 0.0 {
        anyhow::bail!("trigger.threshold must be >= 0");
    }

    if config.cli.page_limit == 0 {
        anyhow::bail!("cli.page_limit must be >= 1");
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.request.timeout_secs, 30);
        assert_eq!(config.trigger.threshold, 120.0);
        assert_eq!(config.trigger.debounce_ms, 200);
        assert_eq!(config.cli.page_limit, 1);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("portal.toml");
        std::fs::write(&path, "[request]\ntimeout_secs = 10\n").unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.request.timeout_secs, 10);
        assert_eq!(config.trigger.threshold, 120.0);
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("portal.toml");
        std::fs::write(&path, "[request]\ntimeout_secs = 0\n").unwrap();
        assert!(load_config(&path).is_err());
    }
}
