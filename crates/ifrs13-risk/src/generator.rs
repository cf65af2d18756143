//! The risk exposure generator seam.

use ifrs13_core::{ObservabilityResult, Trade};

use crate::profile::RiskProfile;

/// Produces a trade's PV and risk ladder.
///
/// Implementations must be deterministic: the same trade yields the same
/// profile. Classification only ever sees the returned [`RiskProfile`], so a
/// valuation engine can replace the synthetic generator without touching
/// the classifier.
pub trait RiskExposureGenerator: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Generates the risk profile of `trade`.
    ///
    /// # Errors
    ///
    /// Returns a `Range` or `Data` error if the trade cannot be valued or a
    /// generated bucket is out of bounds.
    fn generate(&self, trade: &Trade) -> ObservabilityResult<RiskProfile>;
}

impl<F> RiskExposureGenerator for F
where
    F: Fn(&Trade) -> ObservabilityResult<RiskProfile> + Send + Sync,
{
    fn name(&self) -> &str {
        "closure"
    }

    fn generate(&self, trade: &Trade) -> ObservabilityResult<RiskProfile> {
        self(trade)
    }
}
