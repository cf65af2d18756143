//! Risk buckets and risk ladders.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{BucketTenor, CurrencyCode};
use crate::error::{ObservabilityError, ObservabilityResult};

/// Risk class of an exposure point.
///
/// The declaration order is the reporting order: IR delta before volatility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskClass {
    /// Interest-rate delta by tenor bucket.
    #[serde(rename = "IR_DELTA")]
    IrDelta,
    /// Volatility vega by expiry × underlying bucket.
    #[serde(rename = "VEGA")]
    Vega,
}

impl RiskClass {
    /// Returns the wire tag for this risk class.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IrDelta => "IR_DELTA",
            Self::Vega => "VEGA",
        }
    }

    /// Returns all risk classes in reporting order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[Self::IrDelta, Self::Vega]
    }

    /// Returns true if buckets of this class sit on an expiry × tenor surface.
    #[must_use]
    pub fn uses_surface(&self) -> bool {
        matches!(self, Self::Vega)
    }
}

impl fmt::Display for RiskClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable identity of a bucket within a trade: `(risk_class, tenor)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BucketKey {
    /// Risk class.
    pub risk_class: RiskClass,
    /// Tenor coordinate.
    pub tenor: BucketTenor,
}

impl BucketKey {
    /// Creates a bucket key.
    #[must_use]
    pub fn new(risk_class: RiskClass, tenor: BucketTenor) -> Self {
        Self { risk_class, tenor }
    }

    /// Human-readable bucket id, e.g. `IR_DELTA_15Y` or `VEGA_5Yx10Y`.
    #[must_use]
    pub fn id(&self) -> String {
        format!("{}_{}", self.risk_class, self.tenor)
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.risk_class, self.tenor)
    }
}

/// One exposure point of a trade's risk ladder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskBucket {
    risk_class: RiskClass,
    currency: CurrencyCode,
    tenor: BucketTenor,
    exposure: Decimal,
    pv: Decimal,
}

impl RiskBucket {
    /// Creates a bucket, rejecting out-of-range tenors and mismatched shapes.
    ///
    /// # Errors
    ///
    /// - `Range` if the tenor is negative or non-finite
    /// - `Data` if an IR delta bucket carries a surface tenor or a vega
    ///   bucket carries a single tenor
    pub fn new(
        risk_class: RiskClass,
        currency: CurrencyCode,
        tenor: BucketTenor,
        exposure: Decimal,
        pv: Decimal,
    ) -> ObservabilityResult<Self> {
        let tenor = tenor.validate()?;
        if tenor.is_surface() != risk_class.uses_surface() {
            return Err(ObservabilityError::data(
                BucketKey::new(risk_class, tenor).id(),
                format!("{risk_class} buckets cannot carry tenor {tenor}"),
            ));
        }
        Ok(Self {
            risk_class,
            currency,
            tenor,
            exposure,
            pv,
        })
    }

    /// Creates a bucket from floating-point Greeks, rejecting non-finite values.
    pub fn from_f64(
        risk_class: RiskClass,
        currency: CurrencyCode,
        tenor: BucketTenor,
        exposure: f64,
        pv: f64,
    ) -> ObservabilityResult<Self> {
        let exposure = Decimal::from_f64(exposure)
            .ok_or_else(|| ObservabilityError::range("exposure", exposure, "not representable"))?;
        let pv = Decimal::from_f64(pv)
            .ok_or_else(|| ObservabilityError::range("pv", pv, "not representable"))?;
        Self::new(risk_class, currency, tenor, exposure, pv)
    }

    /// Risk class of this bucket.
    #[must_use]
    pub fn risk_class(&self) -> RiskClass {
        self.risk_class
    }

    /// Currency of this bucket.
    #[must_use]
    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    /// Tenor coordinate.
    #[must_use]
    pub fn tenor(&self) -> BucketTenor {
        self.tenor
    }

    /// The Greek value (signed).
    #[must_use]
    pub fn exposure(&self) -> Decimal {
        self.exposure
    }

    /// PV contribution (signed, same convention as trade PV).
    #[must_use]
    pub fn pv(&self) -> Decimal {
        self.pv
    }

    /// Stable identity of the bucket.
    #[must_use]
    pub fn key(&self) -> BucketKey {
        BucketKey::new(self.risk_class, self.tenor)
    }
}

/// The ordered sequence of risk buckets for one trade.
///
/// Order is generation order. Two buckets may not share a [`BucketKey`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RiskLadder {
    buckets: Vec<RiskBucket>,
}

impl RiskLadder {
    /// Creates an empty ladder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ladder from buckets, rejecting duplicate identities.
    pub fn from_buckets(buckets: impl IntoIterator<Item = RiskBucket>) -> ObservabilityResult<Self> {
        let mut ladder = Self::new();
        for bucket in buckets {
            ladder.push(bucket)?;
        }
        Ok(ladder)
    }

    /// Appends a bucket.
    pub fn push(&mut self, bucket: RiskBucket) -> ObservabilityResult<()> {
        let key = bucket.key();
        if self.buckets.iter().any(|b| b.key() == key) {
            return Err(ObservabilityError::data(key.id(), "duplicate bucket in ladder"));
        }
        self.buckets.push(bucket);
        Ok(())
    }

    /// Iterates over all buckets in generation order.
    pub fn iter(&self) -> impl Iterator<Item = &RiskBucket> {
        self.buckets.iter()
    }

    /// Iterates over the buckets of one risk class.
    pub fn of_class(&self, risk_class: RiskClass) -> impl Iterator<Item = &RiskBucket> {
        self.buckets
            .iter()
            .filter(move |b| b.risk_class == risk_class)
    }

    /// Number of buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Returns true if the ladder holds no buckets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Sum of absolute PV contributions across all buckets.
    #[must_use]
    pub fn total_abs_pv(&self) -> Decimal {
        self.buckets.iter().map(|b| b.pv.abs()).sum()
    }
}

impl<'a> IntoIterator for &'a RiskLadder {
    type Item = &'a RiskBucket;
    type IntoIter = std::slice::Iter<'a, RiskBucket>;

    fn into_iter(self) -> Self::IntoIter {
        self.buckets.iter()
    }
}
