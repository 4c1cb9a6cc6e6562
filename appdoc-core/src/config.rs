//! Read-only settings consumed during document generation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("support email must not be empty")]
    EmptySupportEmail,

    #[error("tax rate must not be negative, got {0}")]
    NegativeTaxRate(Decimal),
}

/// What to do when an application is in a state that has no document
/// template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnsupportedStatePolicy {
    /// Log a warning and convert empty HTML anyway. The caller still
    /// receives PDF bytes (a blank document).
    #[default]
    RenderEmpty,

    /// Log a warning and return [`crate::DocumentError::UnsupportedState`].
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentConfig {
    pub support_email: String,
    pub signature: String,

    /// Multiplier applied to each fund's net value (amount minus fees).
    pub tax_rate: Decimal,

    #[serde(default)]
    pub unsupported_state: UnsupportedStatePolicy,
}

impl DocumentConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.support_email.trim().is_empty() {
            return Err(ConfigError::EmptySupportEmail);
        }
        if self.tax_rate < Decimal::ZERO {
            return Err(ConfigError::NegativeTaxRate(self.tax_rate));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn config() -> DocumentConfig {
        DocumentConfig {
            support_email: "support@example.com".to_string(),
            signature: "The Onboarding Team".to_string(),
            tax_rate: dec!(0.85),
            unsupported_state: UnsupportedStatePolicy::default(),
        }
    }

    #[test]
    fn default_policy_renders_empty() {
        assert_eq!(
            UnsupportedStatePolicy::default(),
            UnsupportedStatePolicy::RenderEmpty
        );
    }

    #[test]
    fn valid_config_passes() {
        assert_eq!(config().validate(), Ok(()));
    }

    #[test]
    fn zero_tax_rate_is_allowed() {
        let cfg = DocumentConfig {
            tax_rate: dec!(0),
            ..config()
        };
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn blank_support_email_is_rejected() {
        let cfg = DocumentConfig {
            support_email: "   ".to_string(),
            ..config()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::EmptySupportEmail));
    }

    #[test]
    fn negative_tax_rate_is_rejected() {
        let cfg = DocumentConfig {
            tax_rate: dec!(-0.1),
            ..config()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::NegativeTaxRate(dec!(-0.1))));
    }

    #[test]
    fn policy_deserializes_from_snake_case() {
        let cfg: DocumentConfig = serde_json::from_str(
            r#"{
                "support_email": "help@example.com",
                "signature": "Ops",
                "tax_rate": "0.5",
                "unsupported_state": "reject"
            }"#,
        )
        .unwrap();

        assert_eq!(cfg.unsupported_state, UnsupportedStatePolicy::Reject);
        assert_eq!(cfg.tax_rate, dec!(0.5));
    }
}
