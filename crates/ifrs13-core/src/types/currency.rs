//! Currency codes used to key grids and curve mappings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ObservabilityError, ObservabilityResult};

/// A normalized currency (or risk category) code.
///
/// Codes are trimmed and upper-cased on construction, so `" usd"` and `"USD"`
/// refer to the same grid entry. Unlike a closed ISO 4217 enum, any
/// non-empty code is accepted: a currency the grid does not cover is a
/// classification input, not a parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Creates a currency code, rejecting blank input.
    pub fn new(code: &str) -> ObservabilityResult<Self> {
        let normalized = code.trim().to_uppercase();
        if normalized.is_empty() {
            return Err(ObservabilityError::data("currency", "empty currency code"));
        }
        Ok(Self(normalized))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CurrencyCode {
    type Err = ObservabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = ObservabilityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl AsRef<str> for CurrencyCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
