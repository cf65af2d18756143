//! # IFRS13 Classify
//!
//! Observability stress testing and IFRS13 fair value classification.
//!
//! A trade's risk ladder is checked bucket by bucket against the
//! observability grids. PV attributed to unobservable buckets is summed per
//! risk class and compared with a materiality threshold (10% of trade PV by
//! default): above it the trade is Level 3, otherwise Level 2.
//!
//! ## Module Overview
//!
//! - [`classifier`] - Per-bucket verdicts for one risk class
//! - [`aggregate`] - Stress PV aggregation and level assignment
//! - [`report`] - Evidence table and decision messages
//! - [`stress`] - IR delta, volatility and combined stress tests
//! - [`pipeline`] - Single-trade and batch classification
//! - [`trades`] - Trade CSV loading
//! - [`predictor`] - Term-based level prediction for cross-checks
//! - [`rationale`] - Rationale prompt assembly
//!
//! ## Quick Start
//!
//! ```rust
//! use ifrs13_classify::prelude::*;
//! use ifrs13_core::prelude::*;
//! use ifrs13_risk::SyntheticGenerator;
//!
//! let context = ClassificationContext::standard().unwrap();
//! let trade = Trade::builder()
//!     .trade_id("SWPN-001")
//!     .product_type(ProductType::IrSwaption)
//!     .currency(CurrencyCode::new("USD").unwrap())
//!     .notional(dec!(10_000_000))
//!     .strike(2.5)
//!     .expiry_tenor(2.0)
//!     .maturity_tenor(10.0)
//!     .build()
//!     .unwrap();
//!
//! let result = classify_trade(
//!     &trade,
//!     &SyntheticGenerator::new(),
//!     &context,
//!     &ClassificationConfig::default(),
//! )
//! .unwrap();
//! assert_eq!(result.level(), FairValueLevel::Level2);
//! ```
//!
//! ## Features
//!
//! - `parallel` (default): classify large batches with rayon

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregate;
pub mod classifier;
mod parallel;
pub mod pipeline;
pub mod predictor;
pub mod rationale;
pub mod report;
pub mod stress;
pub mod trades;

pub use aggregate::{class_stress_pv, determine_level, StressAggregator, StressSummary};
pub use classifier::{ClassOutcome, ObservabilityClassifier};
pub use parallel::maybe_parallel_map;
pub use pipeline::{
    classify_batch, classify_profile, classify_rows, classify_trade, BatchSummary,
    ClassificationContext, ClassificationResult, UNASSIGNED_DESK,
};
pub use predictor::{cross_check, LevelPredictor, PredictionCheck, RuleBasedPredictor};
pub use rationale::{RationaleGenerator, RationaleRequest, TemplateRationale, SYSTEM_INSTRUCTION};
pub use report::{EvidenceReport, ReportRow};
pub use stress::{
    ir_delta_stress_test, run_full_observability_stress_test, vol_risk_stress_test,
    FullStressOutcome, StressTestOutcome,
};
pub use trades::{load_trades, read_trades};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::aggregate::{StressAggregator, StressSummary};
    pub use crate::classifier::ObservabilityClassifier;
    pub use crate::pipeline::{
        classify_batch, classify_trade, BatchSummary, ClassificationContext, ClassificationResult,
    };
    pub use crate::predictor::{LevelPredictor, RuleBasedPredictor};
    pub use crate::rationale::{RationaleGenerator, RationaleRequest};
    pub use crate::report::EvidenceReport;
    pub use crate::stress::{
        ir_delta_stress_test, run_full_observability_stress_test, vol_risk_stress_test,
    };
}
