//! # IFRS13 Risk
//!
//! Risk exposure generation: for a trade, the total PV plus a ladder of risk
//! buckets (IR delta by tenor, vega by expiry × underlying), each carrying
//! its exposure and PV contribution.
//!
//! - [`RiskExposureGenerator`] - the pluggable generator contract
//! - [`RiskProfile`] - generator output, immutable once created
//! - [`SyntheticGenerator`] - deterministic stand-in for a valuation engine
//!
//! A real valuation engine plugs in by implementing [`RiskExposureGenerator`];
//! closures `Fn(&Trade) -> ObservabilityResult<RiskProfile>` implement it too,
//! which is convenient for fixed test ladders.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod generator;
mod profile;
pub mod synthetic;

pub use generator::RiskExposureGenerator;
pub use profile::RiskProfile;
pub use synthetic::SyntheticGenerator;
