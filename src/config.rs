use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "idrac_status.toml";

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// CSV file holding the host records
    pub hosts_file: String,
    /// Fallback log filter when RUST_LOG is not set
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hosts_file: "hosts.csv".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    pub fn load(filename: &str) -> Result<Self> {
        if Path::new(filename).exists() {
            let config = std::fs::read_to_string(filename)
                .with_context(|| format!("Unable to read {filename}"))?;
            Self::from_toml(&config).with_context(|| format!("Unable to parse {filename}"))
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }
}
