//! Configuration for classification runs.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{ObservabilityError, ObservabilityResult};

/// Default materiality threshold: stress PV above 10% of trade PV is Level 3.
pub const DEFAULT_THRESHOLD_FRACTION: Decimal = dec!(0.10);

fn default_threshold_fraction() -> Decimal {
    DEFAULT_THRESHOLD_FRACTION
}

fn default_parallel() -> bool {
    true
}

fn default_parallel_threshold() -> usize {
    64
}

/// Configuration for classification runs.
///
/// Controls the materiality threshold and batch parallelism.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationConfig {
    /// Fraction of trade PV above which total stress PV makes a trade Level 3.
    #[serde(default = "default_threshold_fraction")]
    pub threshold_fraction: Decimal,

    /// Enable parallel batch processing (requires the `parallel` feature).
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    /// Minimum batch size to trigger parallel processing.
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            threshold_fraction: DEFAULT_THRESHOLD_FRACTION,
            parallel: default_parallel(),
            parallel_threshold: default_parallel_threshold(),
        }
    }
}

impl ClassificationConfig {
    /// Creates a config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a config that always uses sequential processing.
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Sets the materiality threshold fraction.
    #[must_use]
    pub fn with_threshold_fraction(mut self, fraction: Decimal) -> Self {
        self.threshold_fraction = fraction;
        self
    }

    /// Sets whether to use parallel processing.
    #[must_use]
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Sets the batch size threshold for parallel processing.
    #[must_use]
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Checks that the threshold fraction lies in `[0, 1]`.
    pub fn validate(&self) -> ObservabilityResult<()> {
        if self.threshold_fraction < Decimal::ZERO || self.threshold_fraction > Decimal::ONE {
            return Err(ObservabilityError::configuration(format!(
                "threshold_fraction {} must lie in [0, 1]",
                self.threshold_fraction
            )));
        }
        Ok(())
    }

    /// Returns true if a batch of `count` trades should be processed in parallel.
    #[must_use]
    pub fn should_parallelize(&self, count: usize) -> bool {
        cfg!(feature = "parallel") && self.parallel && count >= self.parallel_threshold
    }
}
