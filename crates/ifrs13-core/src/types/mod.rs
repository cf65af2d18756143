//! Core domain types for observability classification.

mod bucket;
mod currency;
mod tenor;
mod trade;
mod verdict;

pub use bucket::{BucketKey, RiskBucket, RiskClass, RiskLadder};
pub use currency::CurrencyCode;
pub use tenor::{validate_years, BucketTenor};
pub use trade::{
    OptionType, ProductType, Trade, TradeBuilder, MAX_NOTIONAL, MAX_STRIKE_PERCENT, MAX_TENOR_YEARS,
};
pub use verdict::{FairValueLevel, ObservabilityReason, ObservabilityVerdict};
