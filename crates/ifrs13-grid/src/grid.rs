//! The observability grid and its lookup contract.

use serde::Serialize;
use std::collections::BTreeMap;

use ifrs13_core::{
    BucketTenor, CurrencyCode, ObservabilityError, ObservabilityReason, ObservabilityResult,
    RiskClass,
};

use crate::axis::TenorAxis;

/// Grid data for one currency.
///
/// IR delta entries carry a tenor axis only. Volatility entries usually also
/// carry an expiry axis; a surface coordinate is observable only when both
/// its expiry and its underlying tenor are within their cutoffs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridEntry {
    expiry: Option<TenorAxis>,
    tenor: TenorAxis,
}

impl GridEntry {
    /// Creates a single-axis entry.
    #[must_use]
    pub fn curve(tenor: TenorAxis) -> Self {
        Self {
            expiry: None,
            tenor,
        }
    }

    /// Creates an expiry × tenor entry.
    #[must_use]
    pub fn surface(expiry: TenorAxis, tenor: TenorAxis) -> Self {
        Self {
            expiry: Some(expiry),
            tenor,
        }
    }

    /// Expiry axis, if any.
    #[must_use]
    pub fn expiry_axis(&self) -> Option<&TenorAxis> {
        self.expiry.as_ref()
    }

    /// Tenor (or underlying tenor) axis.
    #[must_use]
    pub fn tenor_axis(&self) -> &TenorAxis {
        &self.tenor
    }

    /// The cutoff expressed in the shape of `tenor`.
    #[must_use]
    pub fn cutoff_for(&self, tenor: &BucketTenor) -> BucketTenor {
        match (tenor, &self.expiry) {
            (BucketTenor::Surface { .. }, Some(expiry)) => BucketTenor::Surface {
                expiry: expiry.cutoff(),
                underlying: self.tenor.cutoff(),
            },
            _ => BucketTenor::Point(self.tenor.cutoff()),
        }
    }

    fn lookup(&self, tenor: &BucketTenor) -> GridLookup {
        let cutoff = Some(self.cutoff_for(tenor));
        let matched_tenor = self.tenor.matched_tenor(tenor.tenor());

        let matched = match (tenor, &self.expiry) {
            (BucketTenor::Surface { expiry, .. }, Some(axis)) => axis
                .matched_tenor(*expiry)
                .zip(matched_tenor)
                .map(|(e, u)| BucketTenor::Surface {
                    expiry: e,
                    underlying: u,
                }),
            _ => matched_tenor.map(BucketTenor::Point),
        };

        match matched {
            Some(matched) => GridLookup {
                observable: true,
                reason: ObservabilityReason::WithinGrid,
                matched_tenor: Some(matched),
                cutoff,
            },
            None => GridLookup {
                observable: false,
                reason: ObservabilityReason::BeyondMaxTenor,
                matched_tenor: None,
                cutoff,
            },
        }
    }
}

/// Result of a grid lookup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridLookup {
    /// Whether the coordinate is observable.
    pub observable: bool,
    /// Reason for the decision.
    pub reason: ObservabilityReason,
    /// Grid tenor used for reporting, when observable.
    pub matched_tenor: Option<BucketTenor>,
    /// Cutoff that applied, when the currency is covered.
    pub cutoff: Option<BucketTenor>,
}

impl GridLookup {
    fn not_covered() -> Self {
        Self {
            observable: false,
            reason: ObservabilityReason::CurrencyNotCovered,
            matched_tenor: None,
            cutoff: None,
        }
    }
}

/// Immutable reference grid for one risk class.
///
/// Built once (from CSV or the standard set) and then shared read-only,
/// typically behind an `Arc`, across classification runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservabilityGrid {
    risk_class: RiskClass,
    entries: BTreeMap<CurrencyCode, GridEntry>,
}

impl ObservabilityGrid {
    /// Starts building a grid for a risk class.
    #[must_use]
    pub fn builder(risk_class: RiskClass) -> GridBuilder {
        GridBuilder::new(risk_class)
    }

    /// Builds a single-axis grid from `(currency, cutoff)` pairs.
    pub fn from_cutoffs<'a>(
        risk_class: RiskClass,
        cutoffs: impl IntoIterator<Item = (&'a str, f64)>,
    ) -> ObservabilityResult<Self> {
        let mut builder = Self::builder(risk_class);
        for (currency, cutoff) in cutoffs {
            builder = builder.curve(currency, &[], cutoff);
        }
        builder.build()
    }

    /// Risk class this grid serves.
    #[must_use]
    pub fn risk_class(&self) -> RiskClass {
        self.risk_class
    }

    /// Looks up the observability of a bucket coordinate.
    ///
    /// # Errors
    ///
    /// - `Data` if a tenor is not a finite number
    /// - `Range` if a tenor is negative
    pub fn lookup(
        &self,
        currency: &CurrencyCode,
        tenor: &BucketTenor,
    ) -> ObservabilityResult<GridLookup> {
        check_lookup_tenor(tenor.tenor())?;
        if let Some(expiry) = tenor.expiry() {
            check_lookup_tenor(expiry)?;
        }

        Ok(match self.entries.get(currency) {
            Some(entry) => entry.lookup(tenor),
            None => GridLookup::not_covered(),
        })
    }

    /// Looks up a single tenor in years.
    pub fn lookup_tenor(
        &self,
        currency: &CurrencyCode,
        tenor: f64,
    ) -> ObservabilityResult<GridLookup> {
        self.lookup(currency, &BucketTenor::Point(tenor))
    }

    /// Returns the grid entry for a currency.
    #[must_use]
    pub fn entry(&self, currency: &CurrencyCode) -> Option<&GridEntry> {
        self.entries.get(currency)
    }

    /// Returns true if the grid has an entry for `currency`.
    #[must_use]
    pub fn covers(&self, currency: &CurrencyCode) -> bool {
        self.entries.contains_key(currency)
    }

    /// Iterates over entries in currency order.
    pub fn entries(&self) -> impl Iterator<Item = (&CurrencyCode, &GridEntry)> {
        self.entries.iter()
    }

    /// Number of covered currencies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a built grid; provided for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn check_lookup_tenor(years: f64) -> ObservabilityResult<()> {
    if !years.is_finite() {
        return Err(ObservabilityError::data(
            "grid lookup",
            format!("tenor {years} is not numeric"),
        ));
    }
    if years < 0.0 {
        return Err(ObservabilityError::range("tenor", years, "must be non-negative"));
    }
    Ok(())
}

/// Builder for [`ObservabilityGrid`].
///
/// The first invalid input is remembered and reported by [`GridBuilder::build`].
#[derive(Debug, Clone)]
pub struct GridBuilder {
    risk_class: RiskClass,
    entries: BTreeMap<CurrencyCode, GridEntry>,
    error: Option<ObservabilityError>,
}

impl GridBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new(risk_class: RiskClass) -> Self {
        Self {
            risk_class,
            entries: BTreeMap::new(),
            error: None,
        }
    }

    /// Adds a single-axis entry.
    #[must_use]
    pub fn curve(self, currency: &str, points: &[f64], cutoff: f64) -> Self {
        let entry = TenorAxis::new(points.iter().copied(), cutoff).map(GridEntry::curve);
        self.try_entry(currency, entry)
    }

    /// Adds an expiry × tenor entry.
    #[must_use]
    pub fn surface(
        self,
        currency: &str,
        expiry_points: &[f64],
        expiry_cutoff: f64,
        tenor_points: &[f64],
        tenor_cutoff: f64,
    ) -> Self {
        let entry = TenorAxis::new(expiry_points.iter().copied(), expiry_cutoff).and_then(|e| {
            TenorAxis::new(tenor_points.iter().copied(), tenor_cutoff)
                .map(|t| GridEntry::surface(e, t))
        });
        self.try_entry(currency, entry)
    }

    /// Adds a prepared entry.
    #[must_use]
    pub fn entry(mut self, currency: CurrencyCode, entry: GridEntry) -> Self {
        if self.error.is_some() {
            return self;
        }
        if self.entries.contains_key(&currency) {
            self.error = Some(ObservabilityError::data(
                currency.as_str(),
                "duplicate grid entry",
            ));
            return self;
        }
        self.entries.insert(currency, entry);
        self
    }

    fn try_entry(mut self, currency: &str, entry: ObservabilityResult<GridEntry>) -> Self {
        match CurrencyCode::new(currency).and_then(|c| entry.map(|e| (c, e))) {
            Ok((code, entry)) => self.entry(code, entry),
            Err(err) => {
                if self.error.is_none() {
                    self.error = Some(err);
                }
                self
            }
        }
    }

    /// Builds the grid.
    ///
    /// # Errors
    ///
    /// Returns the first recorded error, or a `Data` error if no entry was added.
    pub fn build(self) -> ObservabilityResult<ObservabilityGrid> {
        if let Some(err) = self.error {
            return Err(err);
        }
        if self.entries.is_empty() {
            return Err(ObservabilityError::data(
                format!("{} grid", self.risk_class),
                "grid has no entries",
            ));
        }
        Ok(ObservabilityGrid {
            risk_class: self.risk_class,
            entries: self.entries,
        })
    }
}
