//! # IFRS13 Core
//!
//! Core types, error taxonomy and configuration shared by the IFRS13
//! observability classification crates.
//!
//! ## Module Overview
//!
//! - [`types`] - Currency codes, tenors, trades, risk buckets, verdicts, levels
//! - [`error`] - `DataError` / `ConfigurationError` / `RangeError` taxonomy
//! - [`config`] - Classification configuration (materiality threshold, parallelism)
//! - [`curve_map`] - Currency to discount curve mapping
//!
//! Monetary amounts (notional, exposures, PVs) are [`rust_decimal::Decimal`]
//! so that stress PV sums are exact; tenors are `f64` years.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod curve_map;
pub mod error;
pub mod types;

pub use config::{ClassificationConfig, DEFAULT_THRESHOLD_FRACTION};
pub use curve_map::CurrencyCurveMap;
pub use error::{ObservabilityError, ObservabilityResult};
pub use types::{
    validate_years, BucketKey, BucketTenor, CurrencyCode, FairValueLevel, ObservabilityReason,
    ObservabilityVerdict, OptionType, ProductType, RiskBucket, RiskClass, RiskLadder, Trade,
    TradeBuilder, MAX_NOTIONAL, MAX_STRIKE_PERCENT, MAX_TENOR_YEARS,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::ClassificationConfig;
    pub use crate::curve_map::CurrencyCurveMap;
    pub use crate::error::{ObservabilityError, ObservabilityResult};
    pub use crate::types::{
        BucketKey, BucketTenor, CurrencyCode, FairValueLevel, ObservabilityReason,
        ObservabilityVerdict, OptionType, ProductType, RiskBucket, RiskClass, RiskLadder, Trade,
    };
    pub use rust_decimal::Decimal;
    pub use rust_decimal_macros::dec;
}
