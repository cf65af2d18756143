//! Batch command implementation.
//!
//! Classifies every trade in a CSV file. Rows that fail to parse or
//! classify are reported individually and do not stop the run.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use ifrs13_classify::{classify_rows, load_trades, BatchSummary, ClassificationResult};
use ifrs13_core::{FairValueLevel, ObservabilityResult};
use ifrs13_risk::SyntheticGenerator;

use crate::cli::OutputFormat;
use crate::commands::validate_threshold;
use crate::config::AppConfig;
use crate::output::{
    format_amount, print_error, print_header, print_json_document, print_output, print_success,
    write_csv,
};

/// Arguments for the batch command.
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Trade file (CSV with trade_id, product_type, currency, option_type,
    /// notional, strike, expiry_tenor, maturity_tenor, trading_desk)
    #[arg(long)]
    pub trades: PathBuf,

    /// Write per-trade levels to this CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// IR delta grid CSV (overrides configuration)
    #[arg(long)]
    pub ir_grid: Option<PathBuf>,

    /// Volatility grid CSV (overrides configuration)
    #[arg(long)]
    pub vol_grid: Option<PathBuf>,

    /// Materiality threshold as a fraction of trade PV (e.g., 0.1)
    #[arg(short, long)]
    pub threshold: Option<f64>,
}

/// One line per input row.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct BatchLine {
    #[tabled(rename = "Row")]
    pub row: usize,
    #[tabled(rename = "Trade")]
    pub trade_id: String,
    #[tabled(rename = "Product")]
    pub product_type: String,
    #[tabled(rename = "Ccy")]
    pub currency: String,
    #[tabled(rename = "Desk")]
    pub desk: String,
    #[tabled(rename = "Trade PV")]
    pub trade_pv: String,
    #[tabled(rename = "Stress PV")]
    pub stress_pv: String,
    #[tabled(rename = "Level")]
    pub level: String,
    #[tabled(rename = "Error")]
    pub error: String,
}

impl BatchLine {
    fn new(row: usize, result: &ObservabilityResult<ClassificationResult>) -> Self {
        match result {
            Ok(r) => Self {
                row,
                trade_id: r.trade_id.clone(),
                product_type: r.product_type.to_string(),
                currency: r.currency.to_string(),
                desk: r.desk_label().to_string(),
                trade_pv: format_amount(r.trade_pv()),
                stress_pv: format_amount(r.total_stress_pv()),
                level: r.level().to_string(),
                error: String::new(),
            },
            Err(err) => Self {
                row,
                trade_id: String::new(),
                product_type: String::new(),
                currency: String::new(),
                desk: String::new(),
                trade_pv: String::new(),
                stress_pv: String::new(),
                level: String::new(),
                error: err.to_string(),
            },
        }
    }
}

/// Desk × level counts.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct DeskLine {
    #[tabled(rename = "Desk")]
    pub desk: String,
    #[tabled(rename = "Level 2")]
    pub level2: usize,
    #[tabled(rename = "Level 3")]
    pub level3: usize,
}

fn desk_lines(summary: &BatchSummary) -> Vec<DeskLine> {
    summary
        .desk_distribution
        .keys()
        .map(|desk| DeskLine {
            desk: desk.clone(),
            level2: summary.desk_count(desk, FairValueLevel::Level2),
            level3: summary.desk_count(desk, FairValueLevel::Level3),
        })
        .collect()
}

#[derive(Debug, Serialize)]
struct BatchOutput<'a> {
    trades: &'a [BatchLine],
    summary: &'a BatchSummary,
}

/// Execute the batch command.
pub fn execute(args: BatchArgs, config: &AppConfig, format: OutputFormat, quiet: bool) -> Result<()> {
    let threshold = args.threshold.map(validate_threshold).transpose()?;

    let rows = load_trades(&args.trades)?;
    let context = config.context(args.ir_grid.as_deref(), args.vol_grid.as_deref())?;
    let classification = config.classification_config(threshold)?;

    let results = classify_rows(&rows, &SyntheticGenerator::new(), &context, &classification);
    let summary = BatchSummary::from_results(&results);
    let lines: Vec<BatchLine> = results
        .iter()
        .enumerate()
        .map(|(i, r)| BatchLine::new(i + 1, r))
        .collect();

    match format {
        OutputFormat::Table => {
            print_header("Trade Classification");
            print_output(&lines, format)?;

            if summary.failed > 0 {
                print_header("Failures");
                for line in lines.iter().filter(|l| !l.error.is_empty()) {
                    print_error(&format!("row {}: {}", line.row, line.error));
                }
            }

            print_header("Desk Distribution");
            print_output(&desk_lines(&summary), format)?;

            if !quiet {
                println!();
                print_success(&format!(
                    "{} trades: {} Level 2, {} Level 3, {} failed",
                    summary.total,
                    summary.count(FairValueLevel::Level2),
                    summary.count(FairValueLevel::Level3),
                    summary.failed
                ));
            }
        }
        OutputFormat::Json => {
            print_json_document(&BatchOutput {
                trades: &lines,
                summary: &summary,
            })?;
        }
        OutputFormat::Csv => {
            print_output(&lines, format)?;
        }
    }

    if let Some(path) = &args.output {
        write_csv(path, &lines)?;
        if !quiet && format == OutputFormat::Table {
            print_success(&format!("Wrote {} rows to {}", lines.len(), path.display()));
        }
    }

    Ok(())
}
