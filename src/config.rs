//! Centralized configuration management for termblocks

use std::path::PathBuf;
use std::time::Duration;
use anyhow::{Result, Context};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// File the story browser logs to while it owns the terminal
    pub log_file: PathBuf,
    /// Redraw interval of the story browser (milliseconds)
    pub tick_rate_ms: u64,
    /// Character used to mask password fields
    pub mask_char: char,
    /// Story opened at startup when none is given on the command line
    pub default_story: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from("./termblocks.log"),
            tick_rate_ms: 250,
            mask_char: '*',
            default_story: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let log_file = std::env::var("TERMBLOCKS_LOG_FILE")
            .map(PathBuf::from)
            .unwrap_or(defaults.log_file);

        let tick_rate_ms = parse_env_var("TERMBLOCKS_TICK_RATE_MS")?.unwrap_or(defaults.tick_rate_ms);

        let mask_char = match std::env::var("TERMBLOCKS_MASK_CHAR") {
            Ok(val) => parse_mask_char(&val)?,
            Err(_) => defaults.mask_char,
        };

        let default_story = std::env::var("TERMBLOCKS_DEFAULT_STORY")
            .ok()
            .filter(|s| !s.trim().is_empty());

        Ok(Config {
            log_file,
            tick_rate_ms,
            mask_char,
            default_story,
        })
    }

    /// Get tick rate as Duration
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.tick_rate_ms == 0 {
            return Err(anyhow::anyhow!("Tick rate must be greater than zero"));
        }

        if let Some(parent) = self.log_file.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                return Err(anyhow::anyhow!(
                    "Log file directory does not exist: {}",
                    parent.display()
                ));
            }
        }

        Ok(())
    }
}

fn parse_mask_char(val: &str) -> Result<char> {
    let mut chars = val.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !c.is_control() => Ok(c),
        _ => Err(anyhow::anyhow!(
            "TERMBLOCKS_MASK_CHAR must be a single printable character, got '{}'",
            val
        )),
    }
}

/// Helper function to parse environment variable as a specific type
fn parse_env_var<T>(var_name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display + Send + Sync + std::error::Error + 'static,
{
    match std::env::var(var_name) {
        Ok(val) => val.parse().map(Some).with_context(|| {
            format!("Failed to parse environment variable {} = '{}'", var_name, val)
        }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.log_file, PathBuf::from("./termblocks.log"));
        assert_eq!(config.tick_rate(), Duration::from_millis(250));
        assert_eq!(config.mask_char, '*');
        config.validate().unwrap();
    }

    #[test]
    fn test_config_validation() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config {
            log_file: dir.path().join("termblocks.log"),
            ..Config::default()
        };
        config.validate().unwrap();

        config.log_file = dir.path().join("missing").join("termblocks.log");
        assert!(config.validate().is_err());

        config.log_file = dir.path().join("termblocks.log");
        config.tick_rate_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_mask_char() {
        assert_eq!(parse_mask_char("•").unwrap(), '•');
        assert!(parse_mask_char("").is_err());
        assert!(parse_mask_char("ab").is_err());
    }
}
