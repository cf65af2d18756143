//! CLI command implementations.

pub mod batch;
pub mod classify;
pub mod grid;

// Re-export submodules for convenience
pub use batch::BatchArgs;
pub use classify::ClassifyArgs;
pub use grid::GridArgs;

use chrono::{Days, NaiveDate};
use serde::Serialize;
use tabled::Tabled;

use ifrs13_classify::ReportRow;

use crate::error::{CliError, CliResult};
use crate::output::format_amount;

/// Validates a materiality threshold fraction.
pub fn validate_threshold(threshold: f64) -> CliResult<f64> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(CliError::InvalidThreshold(threshold));
    }
    Ok(threshold)
}

/// Validates a notional amount.
pub fn validate_notional(notional: f64) -> CliResult<f64> {
    if !notional.is_finite() || notional <= 0.0 {
        return Err(CliError::InvalidNotional(notional));
    }
    Ok(notional)
}

/// Calendar date `years` after `from`, using 365.25-day years.
pub fn projected_date(from: NaiveDate, years: f64) -> Option<NaiveDate> {
    let days = (years * 365.25).round();
    if !(0.0..=u64::MAX as f64).contains(&days) {
        return None;
    }
    from.checked_add_days(Days::new(days as u64))
}

/// One evidence line for display.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct ReportLine {
    #[tabled(rename = "Bucket")]
    pub bucket: String,
    #[tabled(rename = "Ccy")]
    pub currency: String,
    #[tabled(rename = "Exposure")]
    pub exposure: String,
    #[tabled(rename = "PV")]
    pub pv: String,
    #[tabled(rename = "Observable")]
    pub observable: String,
    #[tabled(rename = "Reason")]
    pub reason: String,
    #[tabled(rename = "Stress PV")]
    pub stress_pv: String,
    #[tabled(rename = "Note")]
    pub note: String,
}

impl From<&ReportRow> for ReportLine {
    fn from(row: &ReportRow) -> Self {
        Self {
            bucket: row.bucket.clone(),
            currency: row.currency.to_string(),
            exposure: format_amount(row.exposure),
            pv: format_amount(row.pv),
            observable: if row.observable { "yes" } else { "NO" }.to_string(),
            reason: row.reason.code().to_string(),
            stress_pv: format_amount(row.stress_pv),
            note: row.note.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_threshold() {
        assert!(validate_threshold(0.1).is_ok());
        assert!(validate_threshold(0.0).is_ok());
        assert!(validate_threshold(1.0).is_ok());
        assert!(validate_threshold(1.01).is_err());
        assert!(validate_threshold(-0.1).is_err());
    }

    #[test]
    fn test_validate_notional() {
        assert!(validate_notional(1_000_000.0).is_ok());
        assert!(validate_notional(0.0).is_err());
        assert!(validate_notional(f64::NAN).is_err());
    }

    #[test]
    fn test_projected_date() {
        let today = NaiveDate::from_ymd_opt(2023, 1, 15).unwrap();
        assert_eq!(projected_date(today, 0.0), Some(today));
        assert_eq!(
            projected_date(today, 1.0),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
        assert_eq!(projected_date(today, -1.0), None);
    }
}
