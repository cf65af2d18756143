//! Grid command implementation.
//!
//! Displays the observability grids a classification would use.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use ifrs13_core::CurrencyCode;
use ifrs13_grid::{ObservabilityGrid, TenorAxis};

use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::output::{print_header, print_json_document, print_output};

/// Arguments for the grid command.
#[derive(Args, Debug)]
pub struct GridArgs {
    /// IR delta grid CSV (overrides configuration)
    #[arg(long)]
    pub ir_grid: Option<PathBuf>,

    /// Volatility grid CSV (overrides configuration)
    #[arg(long)]
    pub vol_grid: Option<PathBuf>,

    /// Only show this currency
    #[arg(long)]
    pub currency: Option<CurrencyCode>,
}

/// One grid entry for display.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct GridLine {
    #[tabled(rename = "Risk Class")]
    pub risk_class: String,
    #[tabled(rename = "Ccy")]
    pub currency: String,
    #[tabled(rename = "Discount Curve")]
    pub curve: String,
    #[tabled(rename = "Expiry Cutoff")]
    pub expiry_cutoff: String,
    #[tabled(rename = "Tenor Cutoff")]
    pub tenor_cutoff: String,
    #[tabled(rename = "Reference Expiries")]
    pub expiries: String,
    #[tabled(rename = "Reference Tenors")]
    pub tenors: String,
}

fn format_points(axis: &TenorAxis) -> String {
    axis.points()
        .iter()
        .map(|p| format!("{p}Y"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn grid_lines(
    grid: &ObservabilityGrid,
    config: &AppConfig,
    filter: Option<&CurrencyCode>,
) -> Result<Vec<GridLine>> {
    let curves = config.curve_map()?;
    Ok(grid
        .entries()
        .filter(|(currency, _)| filter.map_or(true, |f| f == *currency))
        .map(|(currency, entry)| GridLine {
            risk_class: grid.risk_class().to_string(),
            currency: currency.to_string(),
            curve: curves.curve_for(currency).unwrap_or("-").to_string(),
            expiry_cutoff: entry
                .expiry_axis()
                .map_or_else(|| "-".to_string(), |a| format!("{}Y", a.cutoff())),
            tenor_cutoff: format!("{}Y", entry.tenor_axis().cutoff()),
            expiries: entry.expiry_axis().map_or_else(String::new, format_points),
            tenors: format_points(entry.tenor_axis()),
        })
        .collect())
}

#[derive(Debug, Serialize)]
struct GridOutput<'a> {
    ir_delta: &'a ObservabilityGrid,
    volatility: &'a ObservabilityGrid,
}

/// Execute the grid command.
pub fn execute(args: GridArgs, config: &AppConfig, format: OutputFormat) -> Result<()> {
    let context = config.context(args.ir_grid.as_deref(), args.vol_grid.as_deref())?;
    let filter = args.currency.as_ref();

    let ir_lines = grid_lines(context.ir_grid(), config, filter)?;
    let vol_lines = grid_lines(context.vol_grid(), config, filter)?;

    match format {
        OutputFormat::Table => {
            print_header("IR Delta Observability Grid");
            print_output(&ir_lines, format)?;
            print_header("Volatility Observability Grid");
            print_output(&vol_lines, format)?;
        }
        OutputFormat::Json => {
            print_json_document(&GridOutput {
                ir_delta: context.ir_grid(),
                volatility: context.vol_grid(),
            })?;
        }
        OutputFormat::Csv => {
            let all: Vec<GridLine> = ir_lines.into_iter().chain(vol_lines).collect();
            print_output(&all, format)?;
        }
    }

    Ok(())
}
