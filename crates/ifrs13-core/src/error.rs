//! Error types for observability classification.
//!
//! Three kinds of failure are distinguished:
//! - [`ObservabilityError::Data`]: malformed or missing grid/reference data
//! - [`ObservabilityError::Configuration`]: invalid or missing configuration
//! - [`ObservabilityError::Range`]: values outside physically sensible bounds
//!
//! A missing currency-to-curve mapping is *not* surfaced as an error during
//! classification: affected buckets are marked unobservable instead.

use thiserror::Error;

/// Result type for observability operations.
pub type ObservabilityResult<T> = Result<T, ObservabilityError>;

/// Errors that can occur while loading reference data or classifying a trade.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ObservabilityError {
    /// Malformed or missing grid/reference data.
    #[error("Data error in {context}: {reason}")]
    Data {
        /// Where the bad data was found (file, currency, bucket id).
        context: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Invalid or missing configuration.
    #[error("Configuration error: {reason}")]
    Configuration {
        /// What is wrong with the configuration.
        reason: String,
    },

    /// A value outside its physically sensible range.
    #[error("Range error for {field} = {value}: {reason}")]
    Range {
        /// The offending field (e.g. `tenor`, `notional`).
        field: String,
        /// The rejected value, rendered as text.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl ObservabilityError {
    /// Create a data error.
    #[must_use]
    pub fn data(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Data {
            context: context.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Create a range error.
    #[must_use]
    pub fn range(
        field: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::Range {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Short category label, used in batch diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Data { .. } => "DataError",
            Self::Configuration { .. } => "ConfigurationError",
            Self::Range { .. } => "RangeError",
        }
    }

    /// Prefixes the error context with the owning trade or bucket.
    #[must_use]
    pub fn in_context(self, owner: &str) -> Self {
        match self {
            Self::Data { context, reason } => Self::Data {
                context: format!("{owner}/{context}"),
                reason,
            },
            Self::Range {
                field,
                value,
                reason,
            } => Self::Range {
                field: format!("{owner}/{field}"),
                value,
                reason,
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ObservabilityError::data("ir_grid.csv", "no usable rows");
        assert!(err.to_string().contains("ir_grid.csv"));
        assert!(err.to_string().contains("no usable rows"));

        let err = ObservabilityError::range("tenor", -1.0, "must be non-negative");
        assert!(err.to_string().contains("tenor = -1"));

        let err = ObservabilityError::configuration("threshold out of range");
        assert!(err.to_string().starts_with("Configuration error"));
    }

    #[test]
    fn test_kind() {
        assert_eq!(ObservabilityError::data("a", "b").kind(), "DataError");
        assert_eq!(ObservabilityError::range("a", 1, "b").kind(), "RangeError");
        assert_eq!(
            ObservabilityError::configuration("x").kind(),
            "ConfigurationError"
        );
    }

    #[test]
    fn test_in_context() {
        let err = ObservabilityError::range("tenor", -2.0, "negative").in_context("T-42");
        match err {
            ObservabilityError::Range { field, .. } => assert_eq!(field, "T-42/tenor"),
            other => panic!("unexpected {other:?}"),
        }

        let err = ObservabilityError::configuration("x").in_context("T-1");
        assert_eq!(err, ObservabilityError::configuration("x"));
    }
}
