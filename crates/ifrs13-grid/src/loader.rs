//! CSV loading of observability grids.
//!
//! Two reference tables are supported, one per risk class. Headers and
//! fields are trimmed of whitespace before use.
//!
//! IR delta grid columns:
//!
//! | Column | Required |
//! |---|---|
//! | `Currency` | yes |
//! | `Tenor (Years)` | no |
//! | `Observable Tenor (Years)` | yes |
//!
//! Volatility grid columns add `Expiry (Years)` (optional) and
//! `Observable Expiry (Years)` (required).
//!
//! A row whose numeric cells do not parse is treated as missing and skipped,
//! never defaulted to zero. A table with no usable rows, or with conflicting
//! cutoffs for one currency, is a `DataError`.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::{debug, info};

use ifrs13_core::{CurrencyCode, ObservabilityError, ObservabilityResult, RiskClass};

use crate::axis::TenorAxis;
use crate::grid::{GridEntry, ObservabilityGrid};

/// Currency column.
pub const COL_CURRENCY: &str = "Currency";
/// Reference tenor column.
pub const COL_TENOR: &str = "Tenor (Years)";
/// Maximum observable tenor column.
pub const COL_OBSERVABLE_TENOR: &str = "Observable Tenor (Years)";
/// Reference expiry column (volatility grids).
pub const COL_EXPIRY: &str = "Expiry (Years)";
/// Maximum observable expiry column (volatility grids).
pub const COL_OBSERVABLE_EXPIRY: &str = "Observable Expiry (Years)";

/// Loads an IR delta grid from a CSV file.
pub fn load_ir_grid(path: impl AsRef<Path>) -> ObservabilityResult<ObservabilityGrid> {
    load_grid(path.as_ref(), RiskClass::IrDelta)
}

/// Loads a volatility grid from a CSV file.
pub fn load_vol_grid(path: impl AsRef<Path>) -> ObservabilityResult<ObservabilityGrid> {
    load_grid(path.as_ref(), RiskClass::Vega)
}

/// Reads an IR delta grid from any CSV reader.
pub fn read_ir_grid<R: Read>(reader: R, source: &str) -> ObservabilityResult<ObservabilityGrid> {
    read_grid(reader, source, RiskClass::IrDelta)
}

/// Reads a volatility grid from any CSV reader.
pub fn read_vol_grid<R: Read>(reader: R, source: &str) -> ObservabilityResult<ObservabilityGrid> {
    read_grid(reader, source, RiskClass::Vega)
}

fn load_grid(path: &Path, risk_class: RiskClass) -> ObservabilityResult<ObservabilityGrid> {
    let source = path.display().to_string();
    let file = std::fs::File::open(path)
        .map_err(|e| ObservabilityError::data(&source, format!("cannot open grid file: {e}")))?;
    let grid = read_grid(file, &source, risk_class)?;
    info!(
        path = %source,
        risk_class = %risk_class,
        currencies = grid.len(),
        "Loaded observability grid"
    );
    Ok(grid)
}

/// Column positions resolved from the header row.
struct Columns {
    currency: usize,
    tenor: Option<usize>,
    observable_tenor: usize,
    expiry: Option<usize>,
    observable_expiry: Option<usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord, source: &str, risk_class: RiskClass) -> ObservabilityResult<Self> {
        let find = |name: &str| headers.iter().position(|h| h == name);

        let mut required = vec![COL_CURRENCY, COL_OBSERVABLE_TENOR];
        if risk_class.uses_surface() {
            required.push(COL_OBSERVABLE_EXPIRY);
        }
        let missing: Vec<&str> = required.into_iter().filter(|c| find(*c).is_none()).collect();
        if !missing.is_empty() {
            return Err(ObservabilityError::data(
                source,
                format!("missing column(s): {}", missing.join(", ")),
            ));
        }

        Ok(Self {
            currency: find(COL_CURRENCY).unwrap_or_default(),
            tenor: find(COL_TENOR),
            observable_tenor: find(COL_OBSERVABLE_TENOR).unwrap_or_default(),
            expiry: if risk_class.uses_surface() { find(COL_EXPIRY) } else { None },
            observable_expiry: if risk_class.uses_surface() {
                find(COL_OBSERVABLE_EXPIRY)
            } else {
                None
            },
        })
    }
}

/// Per-currency accumulator for one axis.
#[derive(Default)]
struct AxisAccum {
    points: Vec<f64>,
    cutoff: Option<f64>,
}

impl AxisAccum {
    fn set_cutoff(&mut self, cutoff: f64, currency: &CurrencyCode, what: &str) -> ObservabilityResult<()> {
        match self.cutoff {
            Some(existing) if existing != cutoff => Err(ObservabilityError::data(
                currency.as_str(),
                format!("conflicting {what} cutoffs {existing} and {cutoff}"),
            )),
            _ => {
                self.cutoff = Some(cutoff);
                Ok(())
            }
        }
    }

    fn into_axis(self) -> Option<TenorAxis> {
        self.cutoff.map(|cutoff| TenorAxis::trusted(self.points, cutoff))
    }
}

#[derive(Default)]
struct EntryAccum {
    expiry: AxisAccum,
    tenor: AxisAccum,
}

/// Outcome of parsing one optional numeric cell.
enum Cell {
    Empty,
    Value(f64),
    Invalid,
}

fn parse_cell(record: &StringRecord, index: Option<usize>) -> Cell {
    match index.and_then(|i| record.get(i)).map(str::trim) {
        None | Some("") => Cell::Empty,
        Some(text) => match text.parse::<f64>() {
            Ok(v) if v.is_finite() && v >= 0.0 => Cell::Value(v + 0.0),
            _ => Cell::Invalid,
        },
    }
}

fn read_grid<R: Read>(
    reader: R,
    source: &str,
    risk_class: RiskClass,
) -> ObservabilityResult<ObservabilityGrid> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| ObservabilityError::data(source, e.to_string()))?
        .clone();
    let columns = Columns::resolve(&headers, source, risk_class)?;

    let mut entries: BTreeMap<CurrencyCode, EntryAccum> = BTreeMap::new();
    let mut skipped = 0usize;

    for (row, result) in reader.records().enumerate() {
        let record = result.map_err(|e| ObservabilityError::data(source, e.to_string()))?;

        let currency = match record.get(columns.currency).map(CurrencyCode::new) {
            Some(Ok(c)) => c,
            _ => {
                debug!(source, row = row + 1, "Skipping grid row without currency");
                skipped += 1;
                continue;
            }
        };

        let observable_tenor = parse_cell(&record, Some(columns.observable_tenor));
        let tenor = parse_cell(&record, columns.tenor);
        let (observable_expiry, expiry) = if risk_class.uses_surface() {
            (
                parse_cell(&record, columns.observable_expiry),
                parse_cell(&record, columns.expiry),
            )
        } else {
            (Cell::Empty, Cell::Empty)
        };

        let obs_tenor = match observable_tenor {
            Cell::Value(v) => v,
            _ => {
                debug!(source, row = row + 1, currency = %currency, "Skipping grid row with missing observable tenor");
                skipped += 1;
                continue;
            }
        };
        let obs_expiry = match (risk_class.uses_surface(), observable_expiry) {
            (false, _) => None,
            (true, Cell::Value(v)) => Some(v),
            (true, _) => {
                debug!(source, row = row + 1, currency = %currency, "Skipping grid row with missing observable expiry");
                skipped += 1;
                continue;
            }
        };
        if matches!(tenor, Cell::Invalid) || matches!(expiry, Cell::Invalid) {
            debug!(source, row = row + 1, currency = %currency, "Skipping grid row with unparsable tenor");
            skipped += 1;
            continue;
        }

        let accum = entries.entry(currency.clone()).or_default();
        accum.tenor.set_cutoff(obs_tenor, &currency, "tenor")?;
        if let Cell::Value(t) = tenor {
            accum.tenor.points.push(t);
        }
        if let Some(cutoff) = obs_expiry {
            accum.expiry.set_cutoff(cutoff, &currency, "expiry")?;
            if let Cell::Value(e) = expiry {
                accum.expiry.points.push(e);
            }
        }
    }

    if skipped > 0 {
        debug!(source, skipped, "Grid rows treated as missing");
    }

    let mut builder = ObservabilityGrid::builder(risk_class);
    for (currency, accum) in entries {
        let Some(tenor) = accum.tenor.into_axis() else {
            continue;
        };
        let entry = match accum.expiry.into_axis() {
            Some(expiry) => GridEntry::surface(expiry, tenor),
            None => GridEntry::curve(tenor),
        };
        builder = builder.entry(currency, entry);
    }

    builder.build().map_err(|e| match e {
        ObservabilityError::Data { .. } => {
            ObservabilityError::data(source, format!("no usable grid rows ({skipped} skipped)"))
        }
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifrs13_core::ObservabilityReason;
    use std::io::Write;

    fn usd() -> CurrencyCode {
        CurrencyCode::new("USD").unwrap()
    }

    #[test]
    fn test_read_ir_grid_trims_headers() {
        let csv = " Currency , Tenor (Years) , Observable Tenor (Years) \n\
                   USD, 1, 10\n\
                   USD, 5, 10\n\
                   USD, 10, 10\n\
                   EUR, 2, 30\n";
        let grid = read_ir_grid(csv.as_bytes(), "inline").unwrap();
        assert_eq!(grid.len(), 2);
        let entry = grid.entry(&usd()).unwrap();
        assert_eq!(entry.tenor_axis().points(), &[1.0, 5.0, 10.0]);
        assert_eq!(entry.tenor_axis().cutoff(), 10.0);
    }

    #[test]
    fn test_cutoff_only_columns() {
        let csv = "Currency,Observable Tenor (Years)\nUSD,30\nJPY,20\n";
        let grid = read_ir_grid(csv.as_bytes(), "inline").unwrap();
        let lookup = grid.lookup_tenor(&usd(), 30.0).unwrap();
        assert!(lookup.observable);
    }

    #[test]
    fn test_unparsable_rows_excluded() {
        let csv = "Currency,Tenor (Years),Observable Tenor (Years)\n\
                   USD,1,10\n\
                   GBP,abc,25\n\
                   JPY,1,n/a\n";
        let grid = read_ir_grid(csv.as_bytes(), "inline").unwrap();
        assert_eq!(grid.len(), 1);
        let gbp = CurrencyCode::new("GBP").unwrap();
        assert_eq!(
            grid.lookup_tenor(&gbp, 1.0).unwrap().reason,
            ObservabilityReason::CurrencyNotCovered
        );
    }

    #[test]
    fn test_empty_grid_is_data_error() {
        let err = read_ir_grid("Currency,Observable Tenor (Years)\n".as_bytes(), "empty.csv")
            .unwrap_err();
        assert_eq!(err.kind(), "DataError");
        assert!(err.to_string().contains("empty.csv"));

        let err = read_ir_grid("".as_bytes(), "blank.csv").unwrap_err();
        assert!(err.to_string().contains("missing column"));
    }

    #[test]
    fn test_missing_required_column() {
        let err = read_vol_grid(
            "Currency,Observable Tenor (Years)\nUSD,20\n".as_bytes(),
            "vol.csv",
        )
        .unwrap_err();
        assert!(err.to_string().contains(COL_OBSERVABLE_EXPIRY));
    }

    #[test]
    fn test_conflicting_cutoffs() {
        let csv = "Currency,Tenor (Years),Observable Tenor (Years)\nUSD,1,10\nUSD,2,15\n";
        let err = read_ir_grid(csv.as_bytes(), "inline").unwrap_err();
        assert!(err.to_string().contains("conflicting"));
    }

    #[test]
    fn test_read_vol_grid() {
        let csv = "Currency,Expiry (Years),Tenor (Years),Observable Expiry (Years),Observable Tenor (Years)\n\
                   USD,1,5,10,20\n\
                   USD,5,10,10,20\n\
                   USD,10,20,10,20\n";
        let grid = read_vol_grid(csv.as_bytes(), "vol").unwrap();
        assert_eq!(grid.risk_class(), RiskClass::Vega);
        let entry = grid.entry(&usd()).unwrap();
        assert_eq!(entry.expiry_axis().unwrap().points(), &[1.0, 5.0, 10.0]);
        assert_eq!(entry.tenor_axis().points(), &[5.0, 10.0, 20.0]);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Currency,Observable Tenor (Years)").unwrap();
        writeln!(file, "USD,10").unwrap();
        let grid = load_ir_grid(file.path()).unwrap();
        assert_eq!(grid.risk_class(), RiskClass::IrDelta);

        let err = load_ir_grid("/nonexistent/ir_grid.csv").unwrap_err();
        assert!(err.to_string().contains("cannot open"));
    }
}
