//! Per-bucket observability classification.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use ifrs13_core::{
    BucketKey, CurrencyCode, CurrencyCurveMap, ObservabilityError, ObservabilityReason,
    ObservabilityResult, ObservabilityVerdict, RiskBucket, RiskClass, RiskLadder,
};
use ifrs13_grid::ObservabilityGrid;

use crate::report::ReportRow;

/// Verdicts, report rows and messages for one risk class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassOutcome {
    /// Risk class classified.
    pub risk_class: RiskClass,
    /// One verdict per bucket of the class, in ladder order.
    pub verdicts: Vec<ObservabilityVerdict>,
    /// One report row per verdict.
    pub rows: Vec<ReportRow>,
    /// Decision messages: one per unobservable bucket, preceded by a
    /// missing-curve notice when applicable.
    pub messages: Vec<String>,
}

impl ClassOutcome {
    /// Σ |pv| over unobservable buckets.
    #[must_use]
    pub fn stress_pv(&self) -> Decimal {
        self.verdicts.iter().map(ObservabilityVerdict::stress_pv).sum()
    }

    /// Bucket → stressed (unobservable) flag.
    #[must_use]
    pub fn stressed_flags(&self) -> BTreeMap<BucketKey, bool> {
        self.verdicts.iter().map(|v| (v.key, !v.observable)).collect()
    }
}

/// Decides observability of the buckets of one risk class.
///
/// Two instances are used in practice, one for IR delta and one for
/// volatility. Classification is a pure function of its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObservabilityClassifier {
    risk_class: RiskClass,
}

impl ObservabilityClassifier {
    /// Creates a classifier for a risk class.
    #[must_use]
    pub fn new(risk_class: RiskClass) -> Self {
        Self { risk_class }
    }

    /// IR delta classifier.
    #[must_use]
    pub fn ir_delta() -> Self {
        Self::new(RiskClass::IrDelta)
    }

    /// Volatility classifier.
    #[must_use]
    pub fn volatility() -> Self {
        Self::new(RiskClass::Vega)
    }

    /// Risk class this classifier handles.
    #[must_use]
    pub fn risk_class(&self) -> RiskClass {
        self.risk_class
    }

    /// Classifies the buckets of this classifier's risk class.
    ///
    /// `currency` is the trade currency, used to resolve the discount curve.
    /// When `curve_map` is given and has no curve for it, every bucket is
    /// unobservable with `MISSING_REFERENCE_CURVE`. Pass `None` to skip the
    /// curve check.
    ///
    /// # Errors
    ///
    /// - `Data` if the grid serves another risk class
    /// - `Data` / `Range` from the grid lookup, prefixed with the bucket id
    pub fn classify(
        &self,
        currency: &CurrencyCode,
        ladder: &RiskLadder,
        grid: &ObservabilityGrid,
        curve_map: Option<&CurrencyCurveMap>,
    ) -> ObservabilityResult<ClassOutcome> {
        if grid.risk_class() != self.risk_class {
            return Err(ObservabilityError::data(
                format!("{} classifier", self.risk_class),
                format!("grid serves {}", grid.risk_class()),
            ));
        }

        let missing_curve = curve_map.is_some_and(|map| map.curve_for(currency).is_none());
        let mut messages = Vec::new();
        if missing_curve {
            warn!(
                currency = %currency,
                risk_class = %self.risk_class,
                "No discount curve mapped; buckets treated as unobservable"
            );
            messages.push(format!(
                "No reference curve mapped for {currency}: all {} buckets are NOT observable",
                self.risk_class
            ));
        }

        let mut verdicts = Vec::new();
        for bucket in ladder.of_class(self.risk_class) {
            let verdict = if missing_curve {
                missing_curve_verdict(bucket, grid)
            } else {
                grid_verdict(bucket, grid)?
            };
            if !verdict.observable {
                messages.push(unobservable_message(&verdict));
            }
            verdicts.push(verdict);
        }

        debug!(
            risk_class = %self.risk_class,
            buckets = verdicts.len(),
            unobservable = verdicts.iter().filter(|v| !v.observable).count(),
            "Classified risk class"
        );

        let rows = verdicts.iter().map(ReportRow::from_verdict).collect();
        Ok(ClassOutcome {
            risk_class: self.risk_class,
            verdicts,
            rows,
            messages,
        })
    }
}

fn grid_verdict(bucket: &RiskBucket, grid: &ObservabilityGrid) -> ObservabilityResult<ObservabilityVerdict> {
    let key = bucket.key();
    let lookup = grid
        .lookup(bucket.currency(), &key.tenor)
        .map_err(|e| e.in_context(&key.id()))?;
    Ok(ObservabilityVerdict {
        key,
        currency: bucket.currency().clone(),
        exposure: bucket.exposure(),
        observable: lookup.observable,
        reason: lookup.reason,
        pv: bucket.pv(),
        matched_tenor: lookup.matched_tenor,
        cutoff: lookup.cutoff,
    })
}

fn missing_curve_verdict(bucket: &RiskBucket, grid: &ObservabilityGrid) -> ObservabilityVerdict {
    let key = bucket.key();
    ObservabilityVerdict {
        key,
        currency: bucket.currency().clone(),
        exposure: bucket.exposure(),
        observable: false,
        reason: ObservabilityReason::MissingReferenceCurve,
        pv: bucket.pv(),
        matched_tenor: None,
        cutoff: grid.entry(bucket.currency()).map(|e| e.cutoff_for(&key.tenor)),
    }
}

/// Renders the decision message for an unobservable verdict.
#[must_use]
pub fn unobservable_message(verdict: &ObservabilityVerdict) -> String {
    let head = format!(
        "{} tenor {} for {} is NOT observable",
        verdict.key.risk_class, verdict.key.tenor, verdict.currency
    );
    let detail = match (verdict.reason, verdict.cutoff) {
        (ObservabilityReason::BeyondMaxTenor, Some(cutoff)) => format!(" beyond grid cutoff {cutoff}"),
        (ObservabilityReason::CurrencyNotCovered, _) => ": currency not covered by the grid".to_string(),
        (ObservabilityReason::MissingReferenceCurve, _) => ": no reference curve mapped".to_string(),
        _ => String::new(),
    };
    format!("{head}{detail} — PV impact {:.2}", verdict.pv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifrs13_core::BucketTenor;
    use rust_decimal_macros::dec;

    fn usd() -> CurrencyCode {
        CurrencyCode::new("USD").unwrap()
    }

    fn ir_grid() -> ObservabilityGrid {
        ObservabilityGrid::builder(RiskClass::IrDelta)
            .curve("USD", &[1.0, 2.0, 5.0, 10.0], 10.0)
            .build()
            .unwrap()
    }

    fn ir_bucket(currency: &CurrencyCode, tenor: f64, pv: Decimal) -> RiskBucket {
        RiskBucket::new(
            RiskClass::IrDelta,
            currency.clone(),
            BucketTenor::point(tenor).unwrap(),
            dec!(500),
            pv,
        )
        .unwrap()
    }

    #[test]
    fn test_observable_bucket_has_no_message() {
        let ladder = RiskLadder::from_buckets([ir_bucket(&usd(), 5.0, dec!(1000))]).unwrap();
        let outcome = ObservabilityClassifier::ir_delta()
            .classify(&usd(), &ladder, &ir_grid(), None)
            .unwrap();

        assert!(outcome.verdicts[0].observable);
        assert!(outcome.messages.is_empty());
        assert_eq!(outcome.stress_pv(), Decimal::ZERO);
    }

    #[test]
    fn test_beyond_cutoff_message() {
        let ladder = RiskLadder::from_buckets([ir_bucket(&usd(), 15.0, dec!(-2000))]).unwrap();
        let outcome = ObservabilityClassifier::ir_delta()
            .classify(&usd(), &ladder, &ir_grid(), None)
            .unwrap();

        assert_eq!(outcome.verdicts[0].reason, ObservabilityReason::BeyondMaxTenor);
        assert_eq!(outcome.stress_pv(), dec!(2000));
        assert_eq!(
            outcome.messages,
            vec!["IR_DELTA tenor 15Y for USD is NOT observable beyond grid cutoff 10Y — PV impact -2000.00"]
        );
    }

    #[test]
    fn test_missing_curve() {
        let xyz = CurrencyCode::new("XYZ").unwrap();
        let ladder = RiskLadder::from_buckets([
            ir_bucket(&xyz, 1.0, dec!(10)),
            ir_bucket(&xyz, 2.0, dec!(20)),
        ])
        .unwrap();
        let curves = CurrencyCurveMap::standard_ois();
        let outcome = ObservabilityClassifier::ir_delta()
            .classify(&xyz, &ladder, &ir_grid(), Some(&curves))
            .unwrap();

        assert!(outcome
            .verdicts
            .iter()
            .all(|v| v.reason == ObservabilityReason::MissingReferenceCurve));
        assert_eq!(outcome.messages.len(), 3);
        assert!(outcome.messages[0].contains("No reference curve mapped for XYZ"));
        assert_eq!(outcome.stress_pv(), dec!(30));
    }

    #[test]
    fn test_only_own_class_classified() {
        let vega = RiskBucket::new(
            RiskClass::Vega,
            usd(),
            BucketTenor::surface(1.0, 5.0).unwrap(),
            dec!(1),
            dec!(1),
        )
        .unwrap();
        let ladder = RiskLadder::from_buckets([ir_bucket(&usd(), 5.0, dec!(1)), vega]).unwrap();
        let outcome = ObservabilityClassifier::ir_delta()
            .classify(&usd(), &ladder, &ir_grid(), None)
            .unwrap();
        assert_eq!(outcome.verdicts.len(), 1);
    }

    #[test]
    fn test_wrong_grid_rejected() {
        let err = ObservabilityClassifier::volatility()
            .classify(&usd(), &RiskLadder::new(), &ir_grid(), None)
            .unwrap_err();
        assert_eq!(err.kind(), "DataError");
    }

    #[test]
    fn test_currency_not_covered_message() {
        let chf = CurrencyCode::new("CHF").unwrap();
        let ladder = RiskLadder::from_buckets([ir_bucket(&chf, 1.0, dec!(5))]).unwrap();
        let outcome = ObservabilityClassifier::ir_delta()
            .classify(&chf, &ladder, &ir_grid(), None)
            .unwrap();
        assert_eq!(outcome.verdicts[0].reason, ObservabilityReason::CurrencyNotCovered);
        assert!(outcome.messages[0].contains("currency not covered"));
    }
}
