use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

const MIN_DENOM_LEN: usize = 3;
const MAX_DENOM_LEN: usize = 16;

/// Errors that can occur when parsing a denomination
#[derive(Error, Debug)]
pub enum DenomError {
    #[error("Denomination cannot be empty")]
    Empty,

    #[error("Invalid denomination length {0}: expected {MIN_DENOM_LEN} to {MAX_DENOM_LEN} characters")]
    InvalidLength(usize),

    #[error("Invalid denomination '{0}': must start with a lowercase letter")]
    InvalidLeadingChar(String),

    #[error("Invalid denomination '{0}': only lowercase letters and digits allowed")]
    InvalidChar(String),
}

/// A denomination - the string identifier of one asset type
///
/// Validated at parse time so that arithmetic never has to reject a
/// malformed identifier. Totally ordered for deterministic iteration.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Denom(String);

impl Denom {
    /// Parse and validate a denomination string
    pub fn parse(s: &str) -> Result<Self, DenomError> {
        if s.is_empty() {
            return Err(DenomError::Empty);
        }

        if s.len() < MIN_DENOM_LEN || s.len() > MAX_DENOM_LEN {
            return Err(DenomError::InvalidLength(s.len()));
        }

        let first = s.chars().next().unwrap_or_default();
        if !first.is_ascii_lowercase() {
            return Err(DenomError::InvalidLeadingChar(s.to_string()));
        }

        if !s.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()) {
            return Err(DenomError::InvalidChar(s.to_string()));
        }

        Ok(Self(s.to_string()))
    }

    /// Construct without validation. Only for compiled-in denominations.
    pub(crate) fn unchecked(s: &str) -> Self {
        Self(s.to_string())
    }

    /// Get the denomination as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Denom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
