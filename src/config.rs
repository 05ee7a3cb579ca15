//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! The ledger access token is referenced by env-var name in the config
//! and resolved at runtime via `std::env::var`.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::fs;
use std::time::Duration;

use crate::types::SandwichError;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub projection: ProjectionSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LedgerConfig {
    /// Spreadsheet title, looked up through Drive.
    #[serde(default)]
    pub spreadsheet_name: Option<String>,
    /// Spreadsheet id, used directly when known.
    #[serde(default)]
    pub spreadsheet_id: Option<String>,
    /// Env var holding an already-issued OAuth bearer token.
    pub access_token_env: String,
    /// Per-request timeout. Absent means requests wait indefinitely.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// Label rows at the top of every worksheet, skipped when reading data.
    #[serde(default = "default_header_rows")]
    pub header_rows: usize,
    /// Sheets API root override (emulators, proxies).
    #[serde(default)]
    pub sheets_base_url: Option<String>,
    /// Drive API root override.
    #[serde(default)]
    pub drive_base_url: Option<String>,
}

fn default_header_rows() -> usize {
    1
}

impl LedgerConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// How the ×margin product is rounded to a whole sandwich count.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// 2.5 → 3, 3.5 → 4
    #[default]
    HalfUp,
    /// 2.5 → 2, 3.5 → 4
    HalfEven,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProjectionSettings {
    #[serde(default = "default_margin")]
    pub margin: Decimal,
    #[serde(default)]
    pub rounding: RoundingMode,
}

fn default_margin() -> Decimal {
    dec!(1.1)
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        Self {
            margin: default_margin(),
            rounding: RoundingMode::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<(), SandwichError> {
        match (&self.ledger.spreadsheet_name, &self.ledger.spreadsheet_id) {
            (Some(_), Some(_)) => {
                return Err(SandwichError::Config(
                    "set only one of ledger.spreadsheet_name and ledger.spreadsheet_id".into(),
                ))
            }
            (None, None) => {
                return Err(SandwichError::Config(
                    "one of ledger.spreadsheet_name or ledger.spreadsheet_id is required".into(),
                ))
            }
            _ => {}
        }
        if self.projection.margin <= Decimal::ZERO {
            return Err(SandwichError::Config(format!(
                "projection.margin must be positive, got {}",
                self.projection.margin
            )));
        }
        Ok(())
    }

    /// Resolve an environment variable name to its value.
    pub fn resolve_env(env_name: &str) -> Result<String> {
        std::env::var(env_name)
            .with_context(|| format!("Environment variable not set: {env_name}"))
    }
}
