//! Classify command implementation.
//!
//! Runs the full observability stress test on one trade described on the
//! command line.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;

use ifrs13_classify::{
    classify_trade, cross_check, ClassificationResult, PredictionCheck, RationaleGenerator,
    RationaleRequest, RuleBasedPredictor, TemplateRationale,
};
use ifrs13_core::{CurrencyCode, OptionType, ProductType, RiskClass, Trade};
use ifrs13_risk::SyntheticGenerator;

use crate::cli::OutputFormat;
use crate::commands::{projected_date, validate_notional, validate_threshold, ReportLine};
use crate::config::AppConfig;
use crate::output::{
    format_level, print_header, print_info, print_output, print_success, print_warning,
    print_json_document, KeyValue,
};

/// Arguments for the classify command.
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Trade identifier
    #[arg(long)]
    pub trade_id: Option<String>,

    /// Product type (IR Swaption, Bond, CapFloor, IRSwap)
    #[arg(short, long, default_value = "IR Swaption")]
    pub product: ProductType,

    /// Trade currency (ISO code)
    #[arg(long)]
    pub currency: CurrencyCode,

    /// Notional amount
    #[arg(short, long)]
    pub notional: f64,

    /// Strike (as percentage, e.g., 2.5 for 2.5%)
    #[arg(short, long, default_value = "0")]
    pub strike: f64,

    /// Option expiry in years (0 for non-options)
    #[arg(short, long, default_value = "0")]
    pub expiry: f64,

    /// Final maturity in years
    #[arg(short, long)]
    pub maturity: f64,

    /// Option direction: Payer or Receiver
    #[arg(long, default_value = "Receiver")]
    pub option_type: OptionType,

    /// Owning trading desk
    #[arg(long)]
    pub desk: Option<String>,

    /// IR delta grid CSV (overrides configuration)
    #[arg(long)]
    pub ir_grid: Option<PathBuf>,

    /// Volatility grid CSV (overrides configuration)
    #[arg(long)]
    pub vol_grid: Option<PathBuf>,

    /// Materiality threshold as a fraction of trade PV (e.g., 0.1)
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Also print the rationale prompt
    #[arg(long)]
    pub prompt: bool,
}

/// JSON document for one classification.
#[derive(Debug, Serialize)]
struct ClassifyOutput<'a> {
    trade: &'a Trade,
    expiry_date: Option<String>,
    maturity_date: Option<String>,
    result: &'a ClassificationResult,
    messages: Vec<&'a str>,
    prediction: &'a PredictionCheck,
    rationale: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    prompt: Option<String>,
}

/// Execute the classify command.
pub fn execute(args: ClassifyArgs, config: &AppConfig, format: OutputFormat) -> Result<()> {
    let notional = validate_notional(args.notional)?;
    let threshold = args.threshold.map(validate_threshold).transpose()?;

    let notional = Decimal::try_from(notional)
        .map_err(|_| anyhow::anyhow!("Invalid notional: {}", args.notional))?
        .round_dp(2);

    let mut builder = Trade::builder()
        .product_type(args.product)
        .currency(args.currency.clone())
        .option_type(args.option_type)
        .notional(notional)
        .strike(args.strike)
        .expiry_tenor(args.expiry)
        .maturity_tenor(args.maturity);
    if let Some(id) = &args.trade_id {
        builder = builder.trade_id(id.clone());
    }
    if let Some(desk) = &args.desk {
        builder = builder.trading_desk(desk.clone());
    }
    let trade = builder.build()?;

    let context = config.context(args.ir_grid.as_deref(), args.vol_grid.as_deref())?;
    let classification = config.classification_config(threshold)?;
    let result = classify_trade(&trade, &SyntheticGenerator::new(), &context, &classification)?;

    let check = cross_check(&RuleBasedPredictor::new(), &trade, &result);
    let request = RationaleRequest::from_result(&result, Some(check.predicted));
    let rationale = TemplateRationale.generate(&request)?;

    let today = chrono::Local::now().date_naive();
    let expiry_date = projected_date(today, trade.expiry_tenor).map(|d| d.to_string());
    let maturity_date = projected_date(today, trade.maturity_tenor).map(|d| d.to_string());

    let lines: Vec<ReportLine> = result.report.rows().iter().map(ReportLine::from).collect();

    match format {
        OutputFormat::Table => {
            print_header("Trade");
            let details = vec![
                KeyValue::new("Trade ID", trade.display_id()),
                KeyValue::new("Product", trade.product_type.to_string()),
                KeyValue::new("Currency", trade.currency.to_string()),
                KeyValue::new("Option Type", trade.option_type.to_string()),
                KeyValue::from_amount("Notional", trade.notional),
                KeyValue::new("Strike", format!("{}%", trade.strike)),
                KeyValue::new(
                    "Expiry",
                    format!("{}Y ({})", trade.expiry_tenor, expiry_date.as_deref().unwrap_or("n/a")),
                ),
                KeyValue::new(
                    "Maturity",
                    format!("{}Y ({})", trade.maturity_tenor, maturity_date.as_deref().unwrap_or("n/a")),
                ),
            ];
            print_output(&details, format)?;

            print_header("Observability Evidence");
            print_output(&lines, format)?;

            print_header("Stress Test");
            let stress = &result.stress;
            let mut metrics = vec![
                KeyValue::from_amount("Trade PV", stress.trade_pv),
                KeyValue::from_amount("IR Delta Stress PV", stress.stress_pv(RiskClass::IrDelta)),
                KeyValue::from_amount("Vol Stress PV", stress.stress_pv(RiskClass::Vega)),
                KeyValue::from_amount("Total Stress PV", stress.total_stress_pv),
                KeyValue::from_percent("Threshold", stress.threshold_fraction),
                KeyValue::from_amount("Threshold Amount", stress.threshold_amount),
            ];
            if let Some(ratio) = stress.stress_ratio() {
                metrics.push(KeyValue::from_percent("Stress / |PV|", ratio));
            }
            print_output(&metrics, format)?;

            println!("\nIFRS13 Classification: {}", format_level(result.level()));

            let messages: Vec<&str> = result.messages().collect();
            if !messages.is_empty() {
                print_header("Findings");
                for message in &messages {
                    println!("  {message}");
                }
            }

            print_header("Model Cross-Check");
            if check.agrees {
                print_success(&format!("{} prediction agrees: {}", check.predictor, check.predicted));
            } else {
                print_warning(&format!(
                    "{} prediction disagrees: predicted {}, stress test {}",
                    check.predictor, check.predicted, check.classified
                ));
            }
            print_info(&rationale);

            if args.prompt {
                print_header("Rationale Prompt");
                println!("{}\n", request.system_instruction());
                println!("{}", request.prompt());
            }
        }
        OutputFormat::Json => {
            let output = ClassifyOutput {
                trade: &trade,
                expiry_date,
                maturity_date,
                result: &result,
                messages: result.messages().collect(),
                prediction: &check,
                rationale: &rationale,
                prompt: args.prompt.then(|| request.prompt()),
            };
            print_json_document(&output)?;
        }
        OutputFormat::Csv => {
            print_output(&lines, format)?;
        }
    }

    Ok(())
}
