//! Observability verdicts and fair value hierarchy levels.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{BucketKey, BucketTenor, CurrencyCode};
use crate::error::ObservabilityError;

/// Why a bucket was judged observable or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObservabilityReason {
    /// The tenor lies within the grid's observable region.
    WithinGrid,
    /// The tenor lies beyond the grid's maximum observable tenor.
    BeyondMaxTenor,
    /// The grid has no entry for the bucket's currency.
    CurrencyNotCovered,
    /// The trade's currency has no discount curve mapping.
    MissingReferenceCurve,
}

impl ObservabilityReason {
    /// Returns the reason code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::WithinGrid => "WITHIN_GRID",
            Self::BeyondMaxTenor => "BEYOND_MAX_TENOR",
            Self::CurrencyNotCovered => "CURRENCY_NOT_COVERED",
            Self::MissingReferenceCurve => "MISSING_REFERENCE_CURVE",
        }
    }

    /// Returns true only for [`ObservabilityReason::WithinGrid`].
    #[must_use]
    pub fn is_observable(&self) -> bool {
        matches!(self, Self::WithinGrid)
    }
}

impl fmt::Display for ObservabilityReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The observability decision for one risk bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservabilityVerdict {
    /// Bucket identity.
    pub key: BucketKey,
    /// Bucket currency.
    pub currency: CurrencyCode,
    /// Greek value of the bucket.
    pub exposure: Decimal,
    /// Whether the bucket's inputs are observable.
    pub observable: bool,
    /// Reason code for the decision.
    pub reason: ObservabilityReason,
    /// PV contribution, carried forward unchanged.
    pub pv: Decimal,
    /// Grid tenor the bucket was matched to, when observable.
    pub matched_tenor: Option<BucketTenor>,
    /// Cutoff that applied, when the currency is covered.
    pub cutoff: Option<BucketTenor>,
}

impl ObservabilityVerdict {
    /// PV attributable to unobservable inputs: `|pv|` if unobservable, else zero.
    #[must_use]
    pub fn stress_pv(&self) -> Decimal {
        if self.observable {
            Decimal::ZERO
        } else {
            self.pv.abs()
        }
    }
}

/// IFRS13 fair value hierarchy level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FairValueLevel {
    /// Valuation inputs observable in the market.
    #[serde(rename = "Level 2")]
    Level2,
    /// Significant unobservable valuation inputs.
    #[serde(rename = "Level 3")]
    Level3,
}

impl FairValueLevel {
    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Level2 => "Level 2",
            Self::Level3 => "Level 3",
        }
    }

    /// Returns all levels in order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[Self::Level2, Self::Level3]
    }
}

impl fmt::Display for FairValueLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FairValueLevel {
    type Err = ObservabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace([' ', '_'], "").as_str() {
            "level2" | "2" | "l2" => Ok(Self::Level2),
            "level3" | "3" | "l3" => Ok(Self::Level3),
            _ => Err(ObservabilityError::data("level", format!("unknown level '{s}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RiskClass;
    use rust_decimal_macros::dec;

    fn verdict(observable: bool, pv: Decimal) -> ObservabilityVerdict {
        ObservabilityVerdict {
            key: BucketKey::new(RiskClass::IrDelta, BucketTenor::point(15.0).unwrap()),
            currency: CurrencyCode::new("USD").unwrap(),
            exposure: dec!(1),
            observable,
            reason: if observable {
                ObservabilityReason::WithinGrid
            } else {
                ObservabilityReason::BeyondMaxTenor
            },
            pv,
            matched_tenor: None,
            cutoff: None,
        }
    }

    #[test]
    fn test_stress_pv_uses_magnitude() {
        assert_eq!(verdict(false, dec!(-2000)).stress_pv(), dec!(2000));
        assert_eq!(verdict(true, dec!(-2000)).stress_pv(), Decimal::ZERO);
    }

    #[test]
    fn test_reason_codes() {
        assert_eq!(ObservabilityReason::BeyondMaxTenor.code(), "BEYOND_MAX_TENOR");
        assert!(ObservabilityReason::WithinGrid.is_observable());
        assert!(!ObservabilityReason::MissingReferenceCurve.is_observable());
    }

    #[test]
    fn test_level_parse_and_display() {
        assert_eq!("Level 2".parse::<FairValueLevel>().unwrap(), FairValueLevel::Level2);
        assert_eq!("level_3".parse::<FairValueLevel>().unwrap(), FairValueLevel::Level3);
        assert!("Level 1".parse::<FairValueLevel>().is_err());
        assert_eq!(FairValueLevel::Level3.to_string(), "Level 3");
    }
}
