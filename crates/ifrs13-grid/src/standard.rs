//! Standard observability grids for the major rates currencies.
//!
//! Used when no grid file is configured. Each grid is built once per process
//! and shared through an `Arc`.

use std::sync::Arc;

use once_cell::sync::Lazy;

use ifrs13_core::{CurrencyCode, ObservabilityResult, RiskClass};

use crate::axis::TenorAxis;
use crate::grid::{GridBuilder, GridEntry, ObservabilityGrid};

/// Reference tenors quoted on the IR delta grid.
pub const IR_REFERENCE_TENORS: [f64; 12] =
    [1.0, 2.0, 3.0, 5.0, 7.0, 10.0, 15.0, 20.0, 25.0, 30.0, 40.0, 50.0];

/// Reference option expiries quoted on the volatility grid.
pub const VOL_REFERENCE_EXPIRIES: [f64; 8] = [1.0, 2.0, 3.0, 5.0, 7.0, 10.0, 15.0, 20.0];

/// Reference underlying tenors quoted on the volatility grid.
pub const VOL_REFERENCE_TENORS: [f64; 7] = [1.0, 2.0, 5.0, 10.0, 15.0, 20.0, 30.0];

/// (currency, max observable swap tenor)
const IR_CUTOFFS: [(&str, f64); 4] = [("USD", 30.0), ("EUR", 30.0), ("GBP", 25.0), ("JPY", 20.0)];

/// (currency, max observable expiry, max observable underlying tenor)
const VOL_CUTOFFS: [(&str, f64, f64); 4] = [
    ("USD", 10.0, 20.0),
    ("EUR", 10.0, 20.0),
    ("GBP", 7.0, 15.0),
    ("JPY", 5.0, 10.0),
];

static STANDARD_IR: Lazy<ObservabilityResult<Arc<ObservabilityGrid>>> = Lazy::new(|| {
    let mut builder = GridBuilder::new(RiskClass::IrDelta);
    for (code, cutoff) in IR_CUTOFFS {
        let currency = CurrencyCode::new(code)?;
        let axis = TenorAxis::trusted(IR_REFERENCE_TENORS.to_vec(), cutoff);
        builder = builder.entry(currency, GridEntry::curve(axis));
    }
    builder.build().map(Arc::new)
});

static STANDARD_VOL: Lazy<ObservabilityResult<Arc<ObservabilityGrid>>> = Lazy::new(|| {
    let mut builder = GridBuilder::new(RiskClass::Vega);
    for (code, expiry_cutoff, tenor_cutoff) in VOL_CUTOFFS {
        let currency = CurrencyCode::new(code)?;
        let expiry = TenorAxis::trusted(VOL_REFERENCE_EXPIRIES.to_vec(), expiry_cutoff);
        let tenor = TenorAxis::trusted(VOL_REFERENCE_TENORS.to_vec(), tenor_cutoff);
        builder = builder.entry(currency, GridEntry::surface(expiry, tenor));
    }
    builder.build().map(Arc::new)
});

/// The standard IR delta grid (USD/EUR 30Y, GBP 25Y, JPY 20Y).
pub fn standard_ir_grid() -> ObservabilityResult<Arc<ObservabilityGrid>> {
    Lazy::force(&STANDARD_IR).clone()
}

/// The standard volatility grid (expiry × underlying cutoffs per currency).
pub fn standard_vol_grid() -> ObservabilityResult<Arc<ObservabilityGrid>> {
    Lazy::force(&STANDARD_VOL).clone()
}
