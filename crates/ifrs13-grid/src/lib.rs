//! # IFRS13 Grid
//!
//! The observability grid store: immutable reference data defining, per
//! currency and risk class, the maximum tenor considered observable in the
//! market.
//!
//! ## Lookup contract
//!
//! `lookup(currency, tenor)` returns:
//! - `CURRENCY_NOT_COVERED` (unobservable) when the grid has no entry for
//!   the currency
//! - `WITHIN_GRID` (observable) when `tenor <= cutoff`, with the grid tenor
//!   used for reporting
//! - `BEYOND_MAX_TENOR` (unobservable) when `tenor > cutoff`
//!
//! The boundary is inclusive and comparisons are exact.
//!
//! ```rust
//! use ifrs13_core::{CurrencyCode, RiskClass};
//! use ifrs13_grid::ObservabilityGrid;
//!
//! let grid = ObservabilityGrid::from_cutoffs(RiskClass::IrDelta, [("USD", 10.0)]).unwrap();
//! let usd = CurrencyCode::new("USD").unwrap();
//! assert!(grid.lookup_tenor(&usd, 10.0).unwrap().observable);
//! assert!(!grid.lookup_tenor(&usd, 15.0).unwrap().observable);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod axis;
mod grid;
pub mod loader;
mod standard;

pub use axis::TenorAxis;
pub use grid::{GridBuilder, GridEntry, GridLookup, ObservabilityGrid};
pub use loader::{load_ir_grid, load_vol_grid, read_ir_grid, read_vol_grid};
pub use standard::{
    standard_ir_grid, standard_vol_grid, IR_REFERENCE_TENORS, VOL_REFERENCE_EXPIRIES,
    VOL_REFERENCE_TENORS,
};
