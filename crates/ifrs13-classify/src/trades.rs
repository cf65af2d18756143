//! CSV loading of trades for batch classification.
//!
//! | Column | Required |
//! |---|---|
//! | `product_type` | yes |
//! | `currency` | yes |
//! | `notional` | yes |
//! | `strike` | yes |
//! | `expiry_tenor` | yes |
//! | `maturity_tenor` | yes |
//! | `trade_id` | no |
//! | `option_type` | no (Receiver) |
//! | `trading_desk` | no |
//!
//! Missing required columns fail the whole file. A bad row only fails that
//! row: each row comes back as its own `Result`.

use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use csv::StringRecord;
use rust_decimal::Decimal;
use tracing::info;

use ifrs13_core::{
    CurrencyCode, ObservabilityError, ObservabilityResult, OptionType, ProductType, Trade,
};

const REQUIRED: [&str; 6] = [
    "product_type",
    "currency",
    "notional",
    "strike",
    "expiry_tenor",
    "maturity_tenor",
];

/// Loads trades from a CSV file.
///
/// # Errors
///
/// Returns a `Data` error if the file cannot be read or lacks a required
/// column. Row-level problems are reported per row.
pub fn load_trades(path: impl AsRef<Path>) -> ObservabilityResult<Vec<ObservabilityResult<Trade>>> {
    let path = path.as_ref();
    let source = path.display().to_string();
    let file = std::fs::File::open(path)
        .map_err(|e| ObservabilityError::data(&source, format!("cannot open trade file: {e}")))?;
    let rows = read_trades(file, &source)?;
    info!(
        path = %source,
        rows = rows.len(),
        invalid = rows.iter().filter(|r| r.is_err()).count(),
        "Loaded trades"
    );
    Ok(rows)
}

/// Reads trades from any CSV reader.
pub fn read_trades<R: Read>(
    reader: R,
    source: &str,
) -> ObservabilityResult<Vec<ObservabilityResult<Trade>>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| ObservabilityError::data(source, e.to_string()))?
        .clone();

    let missing: Vec<&str> = REQUIRED
        .iter()
        .copied()
        .filter(|c| column(&headers, c).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(ObservabilityError::data(
            source,
            format!("missing column(s): {}", missing.join(", ")),
        ));
    }

    let mut rows = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let row = format!("{source} row {}", index + 1);
        let parsed = result
            .map_err(|e| ObservabilityError::data("record", e.to_string()))
            .and_then(|record| parse_trade(&headers, &record))
            .map_err(|e| e.in_context(&row));
        rows.push(parsed);
    }
    Ok(rows)
}

fn column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.eq_ignore_ascii_case(name))
}

fn field<'r>(headers: &StringRecord, record: &'r StringRecord, name: &str) -> Option<&'r str> {
    column(headers, name)
        .and_then(|i| record.get(i))
        .filter(|v| !v.is_empty())
}

fn required<'r>(
    headers: &StringRecord,
    record: &'r StringRecord,
    name: &str,
) -> ObservabilityResult<&'r str> {
    field(headers, record, name).ok_or_else(|| ObservabilityError::data(name, "missing value"))
}

fn number(name: &str, text: &str) -> ObservabilityResult<f64> {
    text.parse::<f64>()
        .map_err(|_| ObservabilityError::data(name, format!("'{text}' is not a number")))
}

fn parse_trade(headers: &StringRecord, record: &StringRecord) -> ObservabilityResult<Trade> {
    let notional_text = required(headers, record, "notional")?;
    let notional = Decimal::from_str(notional_text)
        .or_else(|_| Decimal::from_scientific(notional_text))
        .map_err(|_| {
            ObservabilityError::data("notional", format!("'{notional_text}' is not a number"))
        })?;

    let mut builder = Trade::builder()
        .product_type(ProductType::from_str(required(headers, record, "product_type")?)?)
        .currency(CurrencyCode::new(required(headers, record, "currency")?)?)
        .notional(notional)
        .strike(number("strike", required(headers, record, "strike")?)?)
        .expiry_tenor(number("expiry_tenor", required(headers, record, "expiry_tenor")?)?)
        .maturity_tenor(number("maturity_tenor", required(headers, record, "maturity_tenor")?)?);

    if let Some(option_type) = field(headers, record, "option_type") {
        builder = builder.option_type(OptionType::from_str(option_type)?);
    }
    if let Some(id) = field(headers, record, "trade_id") {
        builder = builder.trade_id(id);
    }
    if let Some(desk) = field(headers, record, "trading_desk") {
        builder = builder.trading_desk(desk);
    }
    builder.build()
}
