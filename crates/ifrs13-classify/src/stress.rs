//! Observability stress tests.
//!
//! Three entry points mirror how the desk runs the check:
//!
//! - [`ir_delta_stress_test`]: IR delta buckets against the IR grid, with the
//!   trade's discount curve resolved through the currency map
//! - [`vol_risk_stress_test`]: vega buckets against the volatility grid
//! - [`run_full_observability_stress_test`]: both, combined into one report.
//!   An unmapped currency stresses every bucket of the trade, vega included.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use ifrs13_core::{
    BucketKey, CurrencyCurveMap, ObservabilityResult, RiskClass, RiskLadder, Trade,
};
use ifrs13_grid::ObservabilityGrid;

use crate::classifier::{ClassOutcome, ObservabilityClassifier};
use crate::report::{EvidenceReport, ReportRow};

/// Result of a single-class stress test.
#[derive(Debug, Clone, PartialEq)]
pub struct StressTestOutcome {
    /// Risk class tested.
    pub risk_class: RiskClass,
    /// Bucket → stressed (unobservable) flag.
    pub stressed: BTreeMap<BucketKey, bool>,
    /// Per-bucket report rows in ladder order.
    pub report: Vec<ReportRow>,
    /// Σ |pv| over unobservable buckets.
    pub stress_pv: Decimal,
    /// Decision messages.
    pub messages: Vec<String>,
}

impl From<ClassOutcome> for StressTestOutcome {
    fn from(outcome: ClassOutcome) -> Self {
        Self {
            risk_class: outcome.risk_class,
            stressed: outcome.stressed_flags(),
            stress_pv: outcome.stress_pv(),
            report: outcome.rows,
            messages: outcome.messages,
        }
    }
}

/// Result of the combined stress test.
#[derive(Debug, Clone, PartialEq)]
pub struct FullStressOutcome {
    /// Bucket → stressed flag across both risk classes.
    pub stressed: BTreeMap<BucketKey, bool>,
    /// Combined report and messages.
    pub report: EvidenceReport,
    /// IR delta stress PV.
    pub ir_stress_pv: Decimal,
    /// Volatility stress PV.
    pub vol_stress_pv: Decimal,
}

impl FullStressOutcome {
    /// Total stress PV across risk classes.
    #[must_use]
    pub fn total_stress_pv(&self) -> Decimal {
        self.ir_stress_pv + self.vol_stress_pv
    }

    /// Combined messages, IR delta first.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.report.messages()
    }
}

/// Runs the IR delta stress test for a trade.
///
/// # Errors
///
/// Fails with `Data` if `ir_grid` is not an IR delta grid, or with the grid
/// lookup error naming the offending bucket.
pub fn ir_delta_stress_test(
    trade: &Trade,
    ladder: &RiskLadder,
    ir_grid: &ObservabilityGrid,
    curve_map: &CurrencyCurveMap,
) -> ObservabilityResult<StressTestOutcome> {
    ObservabilityClassifier::ir_delta()
        .classify(&trade.currency, ladder, ir_grid, Some(curve_map))
        .map(StressTestOutcome::from)
}

/// Runs the volatility stress test for a trade.
///
/// Vega buckets are graded on the grid alone. Use
/// [`run_full_observability_stress_test`] to apply the currency map as well.
///
/// # Errors
///
/// Fails with `Data` if `vol_grid` is not a volatility grid, or with the
/// grid lookup error naming the offending bucket.
pub fn vol_risk_stress_test(
    trade: &Trade,
    ladder: &RiskLadder,
    vol_grid: &ObservabilityGrid,
) -> ObservabilityResult<StressTestOutcome> {
    ObservabilityClassifier::volatility()
        .classify(&trade.currency, ladder, vol_grid, None)
        .map(StressTestOutcome::from)
}

/// Runs both stress tests and combines their evidence.
///
/// When `curve_map` has no curve for the trade currency, buckets of both
/// risk classes are unobservable with `MISSING_REFERENCE_CURVE`.
///
/// # Errors
///
/// Propagates the first error from either stress test.
pub fn run_full_observability_stress_test(
    trade: &Trade,
    ladder: &RiskLadder,
    ir_grid: &ObservabilityGrid,
    vol_grid: &ObservabilityGrid,
    curve_map: &CurrencyCurveMap,
) -> ObservabilityResult<FullStressOutcome> {
    let ir = ir_delta_stress_test(trade, ladder, ir_grid, curve_map)?;
    let vol: StressTestOutcome = ObservabilityClassifier::volatility()
        .classify(&trade.currency, ladder, vol_grid, Some(curve_map))?
        .into();

    let mut stressed = ir.stressed;
    stressed.extend(vol.stressed);

    let mut report = EvidenceReport::new();
    report.extend(RiskClass::IrDelta, ir.report, ir.messages);
    report.extend(RiskClass::Vega, vol.report, vol.messages);

    Ok(FullStressOutcome {
        stressed,
        report,
        ir_stress_pv: ir.stress_pv,
        vol_stress_pv: vol.stress_pv,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifrs13_core::{BucketTenor, CurrencyCode, ObservabilityReason, ProductType, RiskBucket};
    use rust_decimal_macros::dec;

    fn trade(currency: &str) -> Trade {
        Trade::builder()
            .product_type(ProductType::IrSwaption)
            .currency(CurrencyCode::new(currency).unwrap())
            .notional(dec!(1_000_000))
            .strike(2.0)
            .expiry_tenor(5.0)
            .maturity_tenor(25.0)
            .build()
            .unwrap()
    }

    fn grids() -> (ObservabilityGrid, ObservabilityGrid) {
        let ir = ObservabilityGrid::from_cutoffs(RiskClass::IrDelta, [("USD", 10.0)]).unwrap();
        let vol = ObservabilityGrid::builder(RiskClass::Vega)
            .surface("USD", &[1.0, 5.0], 5.0, &[5.0, 10.0, 20.0], 20.0)
            .build()
            .unwrap();
        (ir, vol)
    }

    fn ladder(trade: &Trade) -> RiskLadder {
        let c = trade.currency.clone();
        RiskLadder::from_buckets([
            RiskBucket::new(RiskClass::Vega, c.clone(), BucketTenor::surface(5.0, 20.0).unwrap(), dec!(3), dec!(300)).unwrap(),
            RiskBucket::new(RiskClass::IrDelta, c.clone(), BucketTenor::point(5.0).unwrap(), dec!(-1), dec!(-100)).unwrap(),
            RiskBucket::new(RiskClass::IrDelta, c.clone(), BucketTenor::point(25.0).unwrap(), dec!(-2), dec!(-400)).unwrap(),
            RiskBucket::new(RiskClass::Vega, c, BucketTenor::surface(7.0, 18.0).unwrap(), dec!(2), dec!(250)).unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn test_ir_and_vol_stress() {
        let trade = trade("USD");
        let (ir_grid, vol_grid) = grids();
        let curves = CurrencyCurveMap::standard_ois();

        let ir = ir_delta_stress_test(&trade, &ladder(&trade), &ir_grid, &curves).unwrap();
        assert_eq!(ir.stress_pv, dec!(400));
        assert_eq!(ir.messages.len(), 1);
        assert_eq!(ir.stressed.values().filter(|s| **s).count(), 1);

        let vol = vol_risk_stress_test(&trade, &ladder(&trade), &vol_grid).unwrap();
        assert_eq!(vol.stress_pv, dec!(250));
        assert!(vol.messages[0].starts_with("VEGA tenor 7Yx18Y for USD"));
    }

    #[test]
    fn test_full_stress_combines() {
        let trade = trade("USD");
        let (ir_grid, vol_grid) = grids();
        let full = run_full_observability_stress_test(
            &trade,
            &ladder(&trade),
            &ir_grid,
            &vol_grid,
            &CurrencyCurveMap::standard_ois(),
        )
        .unwrap();

        assert_eq!(full.total_stress_pv(), dec!(650));
        assert_eq!(full.stressed.len(), 4);
        let ids: Vec<&str> = full.report.rows().iter().map(|r| r.bucket.as_str()).collect();
        assert_eq!(ids, vec!["IR_DELTA_5Y", "IR_DELTA_25Y", "VEGA_5Yx20Y", "VEGA_7Yx18Y"]);

        let messages: Vec<&str> = full.messages().collect();
        assert!(messages[0].starts_with("IR_DELTA"));
        assert!(messages[1].starts_with("VEGA"));
    }

    #[test]
    fn test_missing_curve_stresses_every_bucket() {
        let trade = trade("USD");
        let (ir_grid, vol_grid) = grids();
        let full = run_full_observability_stress_test(
            &trade,
            &ladder(&trade),
            &ir_grid,
            &vol_grid,
            &CurrencyCurveMap::new(),
        )
        .unwrap();

        assert_eq!(full.ir_stress_pv, dec!(500));
        assert_eq!(full.vol_stress_pv, dec!(550));
        assert!(full.stressed.values().all(|s| *s));
        assert!(full
            .report
            .rows()
            .iter()
            .all(|r| !r.observable && r.reason == ObservabilityReason::MissingReferenceCurve));
    }

    #[test]
    fn test_vol_alone_uses_grid() {
        let trade = trade("USD");
        let (_, vol_grid) = grids();
        let vol = vol_risk_stress_test(&trade, &ladder(&trade), &vol_grid).unwrap();
        assert_eq!(vol.stressed.values().filter(|s| **s).count(), 1);
    }

    #[test]
    fn test_grids_swapped() {
        let trade = trade("USD");
        let (ir_grid, vol_grid) = grids();
        let err = run_full_observability_stress_test(
            &trade,
            &ladder(&trade),
            &vol_grid,
            &ir_grid,
            &CurrencyCurveMap::standard_ois(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), "DataError");
    }
}
