//! Stress PV aggregation and level assignment.

use rust_decimal::Decimal;
use serde::Serialize;

use ifrs13_core::{
    ClassificationConfig, FairValueLevel, ObservabilityResult, ObservabilityVerdict, RiskClass,
    DEFAULT_THRESHOLD_FRACTION,
};

/// Σ |pv| over the unobservable verdicts.
///
/// Absolute values are summed so that offsetting buckets cannot hide
/// unobservable risk.
#[must_use]
pub fn class_stress_pv(verdicts: &[ObservabilityVerdict]) -> Decimal {
    verdicts.iter().map(ObservabilityVerdict::stress_pv).sum()
}

/// Assigns the fair value level.
///
/// Level 3 iff `total_stress_pv > threshold_fraction × |trade_pv|`. For a
/// zero-PV trade this reduces to "any unobservable PV at all".
#[must_use]
pub fn determine_level(
    total_stress_pv: Decimal,
    trade_pv: Decimal,
    threshold_fraction: Decimal,
) -> FairValueLevel {
    if total_stress_pv > threshold_fraction * trade_pv.abs() {
        FairValueLevel::Level3
    } else {
        FairValueLevel::Level2
    }
}

/// Stress metrics of one trade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StressSummary {
    /// Total trade PV.
    pub trade_pv: Decimal,
    /// IR delta stress PV.
    pub ir_stress_pv: Decimal,
    /// Volatility stress PV.
    pub vol_stress_pv: Decimal,
    /// `ir_stress_pv + vol_stress_pv`.
    pub total_stress_pv: Decimal,
    /// Applied materiality threshold.
    pub threshold_fraction: Decimal,
    /// `threshold_fraction × |trade_pv|`.
    pub threshold_amount: Decimal,
    /// Resulting level.
    pub level: FairValueLevel,
}

impl StressSummary {
    /// Stress PV of one risk class.
    #[must_use]
    pub fn stress_pv(&self, risk_class: RiskClass) -> Decimal {
        match risk_class {
            RiskClass::IrDelta => self.ir_stress_pv,
            RiskClass::Vega => self.vol_stress_pv,
        }
    }

    /// Total stress PV as a fraction of |trade PV|, if the PV is non-zero.
    #[must_use]
    pub fn stress_ratio(&self) -> Option<Decimal> {
        if self.trade_pv.is_zero() {
            None
        } else {
            Some(self.total_stress_pv / self.trade_pv.abs())
        }
    }
}

/// Compares stress PV against the materiality threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StressAggregator {
    threshold_fraction: Decimal,
}

impl Default for StressAggregator {
    fn default() -> Self {
        Self {
            threshold_fraction: DEFAULT_THRESHOLD_FRACTION,
        }
    }
}

impl StressAggregator {
    /// Creates an aggregator from a validated config.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error if the threshold is outside `[0, 1]`.
    pub fn from_config(config: &ClassificationConfig) -> ObservabilityResult<Self> {
        config.validate()?;
        Ok(Self {
            threshold_fraction: config.threshold_fraction,
        })
    }

    /// Applied threshold fraction.
    #[must_use]
    pub fn threshold_fraction(&self) -> Decimal {
        self.threshold_fraction
    }

    /// Aggregates per-class stress PV into a summary and level.
    #[must_use]
    pub fn aggregate(
        &self,
        trade_pv: Decimal,
        ir_stress_pv: Decimal,
        vol_stress_pv: Decimal,
    ) -> StressSummary {
        let total_stress_pv = ir_stress_pv + vol_stress_pv;
        StressSummary {
            trade_pv,
            ir_stress_pv,
            vol_stress_pv,
            total_stress_pv,
            threshold_fraction: self.threshold_fraction,
            threshold_amount: self.threshold_fraction * trade_pv.abs(),
            level: determine_level(total_stress_pv, trade_pv, self.threshold_fraction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_threshold() {
        let agg = StressAggregator::default();
        assert_eq!(agg.aggregate(dec!(10000), dec!(900), dec!(0)).level, FairValueLevel::Level2);
        assert_eq!(agg.aggregate(dec!(10000), dec!(600), dec!(500)).level, FairValueLevel::Level3);
        // Exactly at the threshold is not "greater than"
        assert_eq!(agg.aggregate(dec!(10000), dec!(1000), dec!(0)).level, FairValueLevel::Level2);
    }

    #[test]
    fn test_zero_pv() {
        assert_eq!(determine_level(dec!(0), dec!(0), dec!(0.1)), FairValueLevel::Level2);
        assert_eq!(determine_level(dec!(0.01), dec!(0), dec!(0.1)), FairValueLevel::Level3);
    }

    #[test]
    fn test_negative_pv_uses_magnitude() {
        assert_eq!(determine_level(dec!(900), dec!(-10000), dec!(0.1)), FairValueLevel::Level2);
        assert_eq!(determine_level(dec!(1100), dec!(-10000), dec!(0.1)), FairValueLevel::Level3);
    }

    #[test]
    fn test_summary_fields() {
        let summary = StressAggregator::default().aggregate(dec!(-5000), dec!(100), dec!(150));
        assert_eq!(summary.total_stress_pv, dec!(250));
        assert_eq!(summary.threshold_amount, dec!(500));
        assert_eq!(summary.stress_pv(RiskClass::Vega), dec!(150));
        assert_eq!(summary.stress_ratio(), Some(dec!(0.05)));
    }

    #[test]
    fn test_from_config() {
        let config = ClassificationConfig::new().with_threshold_fraction(dec!(0.25));
        assert_eq!(StressAggregator::from_config(&config).unwrap().threshold_fraction(), dec!(0.25));

        let bad = ClassificationConfig::new().with_threshold_fraction(dec!(1.5));
        assert_eq!(StressAggregator::from_config(&bad).unwrap_err().kind(), "ConfigurationError");
    }
}
