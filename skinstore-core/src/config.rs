//! Storefront configuration
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Environment key holding the payment-token (USDC) contract address.
pub const TOKEN_ADDRESS_KEY: &str = "SKINSTORE_USDC_TOKEN_ADDRESS";
/// Environment key holding the settlement timeout in milliseconds (`0` disables it).
pub const SETTLEMENT_TIMEOUT_KEY: &str = "SKINSTORE_SETTLEMENT_TIMEOUT_MS";
pub const DEFAULT_SETTLEMENT_TIMEOUT_MS: u64 = 120_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// Payment-token contract handed to the bridge. Empty when unset; the
    /// bridge is expected to reject such a request.
    #[serde(default)]
    pub token_address: String,
    #[serde(default = "default_timeout_ms")]
    pub settlement_timeout_ms: u64,
}

const fn default_timeout_ms() -> u64 {
    DEFAULT_SETTLEMENT_TIMEOUT_MS
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            token_address: String::new(),
            settlement_timeout_ms: DEFAULT_SETTLEMENT_TIMEOUT_MS,
        }
    }
}

impl StorefrontConfig {
    /// Build the config from a key lookup (process env, compile-time env, ...).
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout value is present but not a number.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token_address = lookup(TOKEN_ADDRESS_KEY).unwrap_or_default();
        let settlement_timeout_ms = match lookup(SETTLEMENT_TIMEOUT_KEY) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue {
                    key: SETTLEMENT_TIMEOUT_KEY,
                    value: raw,
                })?,
            None => DEFAULT_SETTLEMENT_TIMEOUT_MS,
        };
        Ok(Self {
            token_address,
            settlement_timeout_ms,
        })
    }

    /// Load config from a JSON document; missing fields fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn with_token_address(mut self, address: impl Into<String>) -> Self {
        self.token_address = address.into();
        self
    }

    #[must_use]
    pub const fn with_settlement_timeout_ms(mut self, ms: u64) -> Self {
        self.settlement_timeout_ms = ms;
        self
    }

    /// Timeout applied to the settlement call, `None` when disabled.
    #[must_use]
    pub const fn settlement_timeout(&self) -> Option<Duration> {
        if self.settlement_timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.settlement_timeout_ms))
        }
    }
}
