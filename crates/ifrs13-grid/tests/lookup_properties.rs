//! Property-based tests for the grid lookup contract.
//!
//! - Observability is monotonic in tenor: once a tenor is beyond the cutoff,
//!   every longer tenor is too
//! - The cutoff itself is observable
//! - Uncovered currencies are never observable

use ifrs13_core::{BucketTenor, CurrencyCode, ObservabilityReason, RiskClass};
use ifrs13_grid::{standard_ir_grid, standard_vol_grid, ObservabilityGrid};
use proptest::prelude::*;

fn usd() -> CurrencyCode {
    CurrencyCode::new("USD").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn test_lookup_monotonic(cutoff in 0.0f64..60.0, a in 0.0f64..80.0, b in 0.0f64..80.0) {
        let grid = ObservabilityGrid::from_cutoffs(RiskClass::IrDelta, [("USD", cutoff)]).unwrap();
        let (short, long) = if a <= b { (a, b) } else { (b, a) };

        let short_obs = grid.lookup_tenor(&usd(), short).unwrap().observable;
        let long_obs = grid.lookup_tenor(&usd(), long).unwrap().observable;
        prop_assert!(short_obs || !long_obs);
    }

    #[test]
    fn test_cutoff_is_observable(cutoff in 0.0f64..60.0) {
        let grid = ObservabilityGrid::builder(RiskClass::IrDelta)
            .curve("USD", &[1.0, 5.0, 10.0, 30.0], cutoff)
            .build()
            .unwrap();
        let lookup = grid.lookup_tenor(&usd(), cutoff).unwrap();
        prop_assert!(lookup.observable);
        prop_assert_eq!(lookup.reason, ObservabilityReason::WithinGrid);

        let matched = lookup.matched_tenor.unwrap().tenor();
        prop_assert_eq!(matched, cutoff);
    }

    #[test]
    fn test_matched_tenor_within_cutoff(t in 0.0f64..30.0) {
        let grid = standard_ir_grid().unwrap();
        let lookup = grid.lookup_tenor(&usd(), t).unwrap();
        prop_assert!(lookup.observable);
        let matched = lookup.matched_tenor.unwrap().tenor();
        prop_assert!(matched >= t);
        prop_assert!(matched <= 30.0);
    }

    #[test]
    fn test_uncovered_currency(t in 0.0f64..50.0) {
        let grid = standard_ir_grid().unwrap();
        let chf = CurrencyCode::new("CHF").unwrap();
        let lookup = grid.lookup_tenor(&chf, t).unwrap();
        prop_assert!(!lookup.observable);
        prop_assert_eq!(lookup.reason, ObservabilityReason::CurrencyNotCovered);
    }

    #[test]
    fn test_surface_needs_both_axes(expiry in 0.0f64..30.0, underlying in 0.0f64..40.0) {
        let grid = standard_vol_grid().unwrap();
        let tenor = BucketTenor::surface(expiry, underlying).unwrap();
        let lookup = grid.lookup(&usd(), &tenor).unwrap();
        prop_assert_eq!(lookup.observable, expiry <= 10.0 && underlying <= 20.0);
    }
}

#[test]
fn test_grid_serializes_to_json() {
    let grid = standard_ir_grid().unwrap();
    let json = serde_json::to_value(grid.as_ref()).unwrap();
    assert_eq!(json["risk_class"], "IR_DELTA");
    assert_eq!(json["entries"]["GBP"]["tenor"]["cutoff"], 25.0);
}
