//! Trade-level predictions used to cross-check the stress test.

use serde::Serialize;

use ifrs13_core::{FairValueLevel, Trade};

use crate::pipeline::ClassificationResult;

/// Predicts a trade's level from its terms alone.
///
/// Stands at the seam where an externally trained model would plug in.
pub trait LevelPredictor: Send + Sync {
    /// Short name used in reports.
    fn name(&self) -> &str;

    /// Predicted level for `trade`.
    fn predict(&self, trade: &Trade) -> FairValueLevel;
}

/// Term-based rule: short-dated, low-strike trades are Level 2.
///
/// Level 2 iff expiry < 5Y, maturity < 15Y and strike < 3%.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleBasedPredictor {
    max_expiry: f64,
    max_maturity: f64,
    max_strike: f64,
}

impl Default for RuleBasedPredictor {
    fn default() -> Self {
        Self {
            max_expiry: 5.0,
            max_maturity: 15.0,
            max_strike: 3.0,
        }
    }
}

impl RuleBasedPredictor {
    /// Creates the predictor with the standard limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the (exclusive) limits.
    #[must_use]
    pub fn with_limits(max_expiry: f64, max_maturity: f64, max_strike: f64) -> Self {
        Self {
            max_expiry,
            max_maturity,
            max_strike,
        }
    }
}

impl LevelPredictor for RuleBasedPredictor {
    fn name(&self) -> &str {
        "rule-based"
    }

    fn predict(&self, trade: &Trade) -> FairValueLevel {
        if trade.expiry_tenor < self.max_expiry
            && trade.maturity_tenor < self.max_maturity
            && trade.strike < self.max_strike
        {
            FairValueLevel::Level2
        } else {
            FairValueLevel::Level3
        }
    }
}

/// Prediction set against the stress-test level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictionCheck {
    /// Predictor name.
    pub predictor: String,
    /// Predicted level.
    pub predicted: FairValueLevel,
    /// Stress-test level.
    pub classified: FairValueLevel,
    /// Whether the two agree.
    pub agrees: bool,
}

/// Compares a predictor's output with a classification result.
#[must_use]
pub fn cross_check<P>(predictor: &P, trade: &Trade, result: &ClassificationResult) -> PredictionCheck
where
    P: LevelPredictor + ?Sized,
{
    let predicted = predictor.predict(trade);
    let classified = result.level();
    PredictionCheck {
        predictor: predictor.name().to_string(),
        predicted,
        classified,
        agrees: predicted == classified,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifrs13_core::{CurrencyCode, ProductType};
    use rust_decimal_macros::dec;

    fn trade(expiry: f64, maturity: f64, strike: f64) -> Trade {
        Trade::builder()
            .product_type(ProductType::IrSwaption)
            .currency(CurrencyCode::new("USD").unwrap())
            .notional(dec!(1_000_000))
            .strike(strike)
            .expiry_tenor(expiry)
            .maturity_tenor(maturity)
            .build()
            .unwrap()
    }

    #[test]
    fn test_rule() {
        let p = RuleBasedPredictor::new();
        assert_eq!(p.predict(&trade(2.0, 10.0, 2.5)), FairValueLevel::Level2);
        assert_eq!(p.predict(&trade(5.0, 10.0, 2.5)), FairValueLevel::Level3);
        assert_eq!(p.predict(&trade(2.0, 15.0, 2.5)), FairValueLevel::Level3);
        assert_eq!(p.predict(&trade(2.0, 10.0, 3.0)), FairValueLevel::Level3);
    }

    #[test]
    fn test_custom_limits() {
        let p = RuleBasedPredictor::with_limits(10.0, 30.0, 5.0);
        assert_eq!(p.predict(&trade(5.0, 20.0, 4.0)), FairValueLevel::Level2);
    }
}
