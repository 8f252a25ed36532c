//! Invoice configuration

use serde::{Deserialize, Serialize};

use crate::tax::summary::{HsnRatePolicy, DEFAULT_HSN_RATE_POLICY, DEFAULT_MISSING_HSN_CODE};

pub const ENV_CURRENCY_CODE: &str = "INVOICE_CURRENCY_CODE";
pub const ENV_CURRENCY_SYMBOL: &str = "INVOICE_CURRENCY_SYMBOL";
pub const ENV_MISSING_HSN_CODE: &str = "INVOICE_MISSING_HSN_CODE";
pub const ENV_HSN_RATE_POLICY: &str = "INVOICE_HSN_RATE_POLICY";

/// Settings shared by derivation, validation and display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceConfig {
    /// Prefix of the amount-in-words lines, e.g. `INR`
    pub currency_code: String,
    /// Prefix of formatted amounts, e.g. `₹`
    pub currency_symbol: String,
    /// Summary key for items without an HSN/SAC code
    pub missing_hsn_code: String,
    pub hsn_rate_policy: HsnRatePolicy,
}

impl Default for InvoiceConfig {
    fn default() -> Self {
        Self {
            currency_code: "INR".to_string(),
            currency_symbol: "₹".to_string(),
            missing_hsn_code: DEFAULT_MISSING_HSN_CODE.to_string(),
            hsn_rate_policy: DEFAULT_HSN_RATE_POLICY,
        }
    }
}

impl InvoiceConfig {
    /// Load overrides from `INVOICE_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load overrides through `lookup`; unset or blank keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(code) = value(ENV_CURRENCY_CODE) {
            config.currency_code = code.trim().to_string();
        }
        if let Some(symbol) = value(ENV_CURRENCY_SYMBOL) {
            config.currency_symbol = symbol.trim().to_string();
        }
        if let Some(code) = value(ENV_MISSING_HSN_CODE) {
            config.missing_hsn_code = code.trim().to_string();
        }
        if let Some(policy) = value(ENV_HSN_RATE_POLICY) {
            config.hsn_rate_policy =
                policy
                    .parse()
                    .map_err(|message| ConfigError::InvalidValue {
                        key: ENV_HSN_RATE_POLICY.to_string(),
                        message,
                    })?;
        }

        tracing::debug!(
            currency_code = %config.currency_code,
            missing_hsn_code = %config.missing_hsn_code,
            hsn_rate_policy = %config.hsn_rate_policy,
            "invoice configuration loaded"
        );
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}
