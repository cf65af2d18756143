//! End-to-end classification of single trades and batches.

use std::collections::BTreeMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, debug_span, info, warn};

use ifrs13_core::{
    BucketKey, ClassificationConfig, CurrencyCode, CurrencyCurveMap, FairValueLevel,
    ObservabilityError, ObservabilityResult, ProductType, RiskClass, Trade,
};
use ifrs13_grid::{standard_ir_grid, standard_vol_grid, ObservabilityGrid};
use ifrs13_risk::{RiskExposureGenerator, RiskProfile};

use crate::aggregate::{StressAggregator, StressSummary};
use crate::parallel::maybe_parallel_map;
use crate::report::EvidenceReport;
use crate::stress::run_full_observability_stress_test;

/// Desk label for trades without a trading desk.
pub const UNASSIGNED_DESK: &str = "UNASSIGNED";

/// Reference data shared read-only by every classification run.
#[derive(Debug, Clone)]
pub struct ClassificationContext {
    ir_grid: Arc<ObservabilityGrid>,
    vol_grid: Arc<ObservabilityGrid>,
    curve_map: Arc<CurrencyCurveMap>,
}

impl ClassificationContext {
    /// Creates a context, checking each grid serves the expected risk class.
    ///
    /// # Errors
    ///
    /// Returns a `Data` error if a grid is tagged with the wrong risk class.
    pub fn new(
        ir_grid: Arc<ObservabilityGrid>,
        vol_grid: Arc<ObservabilityGrid>,
        curve_map: CurrencyCurveMap,
    ) -> ObservabilityResult<Self> {
        for (grid, expected) in [(&ir_grid, RiskClass::IrDelta), (&vol_grid, RiskClass::Vega)] {
            if grid.risk_class() != expected {
                return Err(ObservabilityError::data(
                    format!("{expected} grid"),
                    format!("grid serves {}", grid.risk_class()),
                ));
            }
        }
        Ok(Self {
            ir_grid,
            vol_grid,
            curve_map: Arc::new(curve_map),
        })
    }

    /// Standard grids with the standard OIS curve map.
    pub fn standard() -> ObservabilityResult<Self> {
        Self::new(
            standard_ir_grid()?,
            standard_vol_grid()?,
            CurrencyCurveMap::standard_ois(),
        )
    }

    /// IR delta grid.
    #[must_use]
    pub fn ir_grid(&self) -> &ObservabilityGrid {
        &self.ir_grid
    }

    /// Volatility grid.
    #[must_use]
    pub fn vol_grid(&self) -> &ObservabilityGrid {
        &self.vol_grid
    }

    /// Currency to discount curve map.
    #[must_use]
    pub fn curve_map(&self) -> &CurrencyCurveMap {
        &self.curve_map
    }
}

/// The classification of one trade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    /// Trade identifier (or descriptive fallback).
    pub trade_id: String,
    /// Product type.
    pub product_type: ProductType,
    /// Trade currency.
    pub currency: CurrencyCode,
    /// Trading desk, if known.
    pub trading_desk: Option<String>,
    /// Stress metrics and level.
    pub stress: StressSummary,
    /// Evidence table and messages.
    pub report: EvidenceReport,
}

impl ClassificationResult {
    /// Final level.
    #[must_use]
    pub fn level(&self) -> FairValueLevel {
        self.stress.level
    }

    /// Total trade PV.
    #[must_use]
    pub fn trade_pv(&self) -> Decimal {
        self.stress.trade_pv
    }

    /// Total stress PV.
    #[must_use]
    pub fn total_stress_pv(&self) -> Decimal {
        self.stress.total_stress_pv
    }

    /// Evidence messages, IR delta first.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.report.messages()
    }

    /// Bucket → stressed flag.
    #[must_use]
    pub fn stressed_flags(&self) -> BTreeMap<BucketKey, bool> {
        self.report.stressed_flags()
    }

    /// Desk label used for distributions.
    #[must_use]
    pub fn desk_label(&self) -> &str {
        self.trading_desk.as_deref().unwrap_or(UNASSIGNED_DESK)
    }
}

/// Classifies a trade from an already generated risk profile.
///
/// # Errors
///
/// Returns the first `Data`, `Range` or `Configuration` error, prefixed with
/// the trade id.
pub fn classify_profile(
    trade: &Trade,
    profile: &RiskProfile,
    context: &ClassificationContext,
    config: &ClassificationConfig,
) -> ObservabilityResult<ClassificationResult> {
    let trade_id = trade.display_id();
    let aggregator = StressAggregator::from_config(config)?;

    let outcome = run_full_observability_stress_test(
        trade,
        profile.ladder(),
        context.ir_grid(),
        context.vol_grid(),
        context.curve_map(),
    )
    .map_err(|e| e.in_context(&trade_id))?;

    let stress = aggregator.aggregate(profile.trade_pv(), outcome.ir_stress_pv, outcome.vol_stress_pv);
    info!(
        trade = %trade_id,
        level = %stress.level,
        trade_pv = %stress.trade_pv,
        stress_pv = %stress.total_stress_pv,
        "Classified trade"
    );

    Ok(ClassificationResult {
        trade_id,
        product_type: trade.product_type,
        currency: trade.currency.clone(),
        trading_desk: trade.trading_desk.clone(),
        stress,
        report: outcome.report,
    })
}

/// Validates, generates and classifies one trade.
///
/// # Errors
///
/// Returns the first error from validation, generation or classification,
/// prefixed with the trade id.
pub fn classify_trade<G>(
    trade: &Trade,
    generator: &G,
    context: &ClassificationContext,
    config: &ClassificationConfig,
) -> ObservabilityResult<ClassificationResult>
where
    G: RiskExposureGenerator + ?Sized,
{
    let trade_id = trade.display_id();
    let _span = debug_span!("classify_trade", trade = %trade_id).entered();

    trade.validate().map_err(|e| e.in_context(&trade_id))?;
    let profile = generator
        .generate(trade)
        .map_err(|e| e.in_context(&trade_id))?;
    debug!(
        generator = generator.name(),
        buckets = profile.ladder().len(),
        "Generated risk profile"
    );

    classify_profile(trade, &profile, context, config)
}

/// Classifies a batch of trades.
///
/// Each trade gets its own result, in input order; one trade's failure
/// never affects another.
pub fn classify_batch<G>(
    trades: &[Trade],
    generator: &G,
    context: &ClassificationContext,
    config: &ClassificationConfig,
) -> Vec<ObservabilityResult<ClassificationResult>>
where
    G: RiskExposureGenerator + ?Sized,
{
    let results = maybe_parallel_map(trades, config, |trade| {
        classify_trade(trade, generator, context, config)
    });
    log_batch(&results);
    results
}

/// Classifies rows that may have failed to parse.
///
/// Parse failures are passed through as that row's result.
pub fn classify_rows<G>(
    rows: &[ObservabilityResult<Trade>],
    generator: &G,
    context: &ClassificationContext,
    config: &ClassificationConfig,
) -> Vec<ObservabilityResult<ClassificationResult>>
where
    G: RiskExposureGenerator + ?Sized,
{
    let results = maybe_parallel_map(rows, config, |row| match row {
        Ok(trade) => classify_trade(trade, generator, context, config),
        Err(err) => Err(err.clone()),
    });
    log_batch(&results);
    results
}

fn log_batch(results: &[ObservabilityResult<ClassificationResult>]) {
    for err in results.iter().filter_map(|r| r.as_ref().err()) {
        warn!(kind = err.kind(), error = %err, "Trade classification failed");
    }
    let summary = BatchSummary::from_results(results);
    info!(
        total = summary.total,
        classified = summary.classified,
        failed = summary.failed,
        "Batch classification complete"
    );
}

/// Counts over a batch of results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// Number of trades.
    pub total: usize,
    /// Trades classified successfully.
    pub classified: usize,
    /// Trades that failed.
    pub failed: usize,
    /// Classified trades per level.
    pub level_counts: BTreeMap<FairValueLevel, usize>,
    /// Desk → level → count.
    pub desk_distribution: BTreeMap<String, BTreeMap<FairValueLevel, usize>>,
    /// Error kind → count.
    pub failures_by_kind: BTreeMap<String, usize>,
}

impl BatchSummary {
    /// Summarizes batch results.
    #[must_use]
    pub fn from_results(results: &[ObservabilityResult<ClassificationResult>]) -> Self {
        let mut summary = Self {
            total: results.len(),
            ..Self::default()
        };
        for result in results {
            match result {
                Ok(r) => {
                    summary.classified += 1;
                    *summary.level_counts.entry(r.level()).or_default() += 1;
                    *summary
                        .desk_distribution
                        .entry(r.desk_label().to_string())
                        .or_default()
                        .entry(r.level())
                        .or_default() += 1;
                }
                Err(err) => {
                    summary.failed += 1;
                    *summary.failures_by_kind.entry(err.kind().to_string()).or_default() += 1;
                }
            }
        }
        summary
    }

    /// Classified trades at `level`.
    #[must_use]
    pub fn count(&self, level: FairValueLevel) -> usize {
        self.level_counts.get(&level).copied().unwrap_or(0)
    }

    /// Trades of `desk` at `level`.
    #[must_use]
    pub fn desk_count(&self, desk: &str, level: FairValueLevel) -> usize {
        self.desk_distribution
            .get(desk)
            .and_then(|levels| levels.get(&level))
            .copied()
            .unwrap_or(0)
    }
}
