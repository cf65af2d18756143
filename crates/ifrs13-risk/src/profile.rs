//! Generator output: trade PV plus risk ladder.

use rust_decimal::Decimal;
use serde::Serialize;

use ifrs13_core::{RiskClass, RiskLadder};

/// The risk profile of one trade.
///
/// Created once per run by a [`RiskExposureGenerator`](crate::RiskExposureGenerator)
/// and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskProfile {
    trade_pv: Decimal,
    ladder: RiskLadder,
}

impl RiskProfile {
    /// Creates a profile.
    #[must_use]
    pub fn new(trade_pv: Decimal, ladder: RiskLadder) -> Self {
        Self { trade_pv, ladder }
    }

    /// Total trade PV.
    #[must_use]
    pub fn trade_pv(&self) -> Decimal {
        self.trade_pv
    }

    /// Risk ladder in generation order.
    #[must_use]
    pub fn ladder(&self) -> &RiskLadder {
        &self.ladder
    }

    /// Sum of bucket PV contributions of one risk class (signed).
    #[must_use]
    pub fn attributed_pv(&self, risk_class: RiskClass) -> Decimal {
        self.ladder.of_class(risk_class).map(|b| b.pv()).sum()
    }

    /// Splits the profile into its parts.
    #[must_use]
    pub fn into_parts(self) -> (Decimal, RiskLadder) {
        (self.trade_pv, self.ladder)
    }
}
