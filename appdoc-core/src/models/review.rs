use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Why an application was placed in review.
///
/// Codes are matched exactly. Anything that is not `"address"` or `"bank"`
/// (an empty code, a differently-cased code, a code added upstream later)
/// lands in [`ReviewReason::Other`] with the raw code kept for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReviewReason {
    Address,
    Bank,
    Other(String),
}

impl ReviewReason {
    pub fn from_code(code: &str) -> Self {
        match code {
            "address" => Self::Address,
            "bank" => Self::Bank,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::Address => "address",
            Self::Bank => "bank",
            Self::Other(code) => code,
        }
    }
}

impl From<String> for ReviewReason {
    fn from(code: String) -> Self {
        match code.as_str() {
            "address" => Self::Address,
            "bank" => Self::Bank,
            _ => Self::Other(code),
        }
    }
}

impl From<ReviewReason> for String {
    fn from(reason: ReviewReason) -> Self {
        match reason {
            ReviewReason::Other(code) => code,
            known => known.code().to_string(),
        }
    }
}

/// The review currently open against an application.
///
/// Everything besides `reason` is opaque to this crate and is handed to the
/// template unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub reason: ReviewReason,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl Review {
    pub fn new(reason: ReviewReason) -> Self {
        Self {
            reason,
            metadata: Map::new(),
        }
    }
}
