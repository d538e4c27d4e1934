use dotenv::dotenv;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_DATA_PATH: &str = "radar-data.json";
pub const DEFAULT_LOG_PATH: &str = "radar.log";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("RADAR_SEED must be an unsigned integer, got {0:?}")]
    InvalidSeed(String),
    #[error("RADAR_TRANSITIONS must be on/off, got {0:?}")]
    InvalidToggle(String),
}

/// Runtime settings resolved from `.env`, the environment and CLI overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_path: PathBuf,
    /// Fixed placement seed; `None` draws a fresh layout every run.
    pub seed: Option<u64>,
    pub transitions: bool,
    pub log_path: PathBuf,
    pub debug: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            seed: None,
            transitions: true,
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            debug: false,
        }
    }
}

impl AppConfig {
    /// Loads `.env` (if any) and reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let seed = lookup("RADAR_SEED")
            .filter(|value| !value.trim().is_empty())
            .map(|value| {
                value
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidSeed(value))
            })
            .transpose()?;

        let transitions = lookup("RADAR_TRANSITIONS")
            .map(|value| parse_toggle(&value))
            .transpose()?
            .unwrap_or(defaults.transitions);

        Ok(Self {
            data_path: lookup("RADAR_DATA").map_or(defaults.data_path, PathBuf::from),
            seed,
            transitions,
            log_path: lookup("RADAR_LOG").map_or(defaults.log_path, PathBuf::from),
            debug: lookup("DEBUG").is_some_and(|value| parse_toggle(&value).unwrap_or(false)),
        })
    }
}

fn parse_toggle(value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidToggle(value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn reads_every_variable() {
        let config = AppConfig::from_lookup(lookup(&[
            ("RADAR_DATA", "docs/javascripts/radar-data.js"),
            ("RADAR_SEED", " 42 "),
            ("RADAR_TRANSITIONS", "off"),
            ("RADAR_LOG", "/tmp/radar.log"),
            ("DEBUG", "1"),
        ]))
        .unwrap();

        assert_eq!(
            config,
            AppConfig {
                data_path: PathBuf::from("docs/javascripts/radar-data.js"),
                seed: Some(42),
                transitions: false,
                log_path: PathBuf::from("/tmp/radar.log"),
                debug: true,
            }
        );
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(
            AppConfig::from_lookup(lookup(&[("RADAR_SEED", "abc")])),
            Err(ConfigError::InvalidSeed("abc".to_string()))
        );
        assert_eq!(
            AppConfig::from_lookup(lookup(&[("RADAR_TRANSITIONS", "maybe")])),
            Err(ConfigError::InvalidToggle("maybe".to_string()))
        );
    }
}
