//! Evidence report: per-bucket table plus decision messages.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use ifrs13_core::{
    BucketKey, BucketTenor, CurrencyCode, ObservabilityReason, ObservabilityVerdict, RiskClass,
};

/// One line of the evidence table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    /// Bucket identifier, e.g. `IR_DELTA_15Y`.
    pub bucket: String,
    /// Risk class.
    pub risk_class: RiskClass,
    /// Bucket tenor.
    pub tenor: BucketTenor,
    /// Bucket currency.
    pub currency: CurrencyCode,
    /// Greek value.
    pub exposure: Decimal,
    /// Whether the bucket is observable.
    pub observable: bool,
    /// Reason code.
    pub reason: ObservabilityReason,
    /// PV contribution.
    pub pv: Decimal,
    /// PV attributable to unobservable inputs.
    pub stress_pv: Decimal,
    /// Human-readable note.
    pub note: String,
}

impl ReportRow {
    /// Builds the report line for a verdict.
    #[must_use]
    pub fn from_verdict(verdict: &ObservabilityVerdict) -> Self {
        Self {
            bucket: verdict.key.id(),
            risk_class: verdict.key.risk_class,
            tenor: verdict.key.tenor,
            currency: verdict.currency.clone(),
            exposure: verdict.exposure,
            observable: verdict.observable,
            reason: verdict.reason,
            pv: verdict.pv,
            stress_pv: verdict.stress_pv(),
            note: note_for(verdict),
        }
    }

    /// Bucket identity used for ordering.
    #[must_use]
    pub fn key(&self) -> BucketKey {
        BucketKey::new(self.risk_class, self.tenor)
    }
}

fn note_for(verdict: &ObservabilityVerdict) -> String {
    let cutoff = verdict
        .cutoff
        .map_or_else(|| "n/a".to_string(), |c| c.to_string());
    match verdict.reason {
        ObservabilityReason::WithinGrid => match verdict.matched_tenor {
            Some(matched) => format!("Within grid (matched {matched}, cutoff {cutoff})"),
            None => format!("Within grid (cutoff {cutoff})"),
        },
        ObservabilityReason::BeyondMaxTenor => format!("Beyond grid cutoff {cutoff}"),
        ObservabilityReason::CurrencyNotCovered => {
            format!("Currency {} not covered by grid", verdict.currency)
        }
        ObservabilityReason::MissingReferenceCurve => {
            format!("No reference curve mapped for {}", verdict.currency)
        }
    }
}

/// Combined evidence across risk classes.
///
/// Rows are ordered by `(risk_class, tenor)`; messages keep IR delta before
/// volatility, each group in ladder order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvidenceReport {
    rows: Vec<ReportRow>,
    messages: BTreeMap<RiskClass, Vec<String>>,
}

impl EvidenceReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one risk class's rows and messages.
    pub fn extend(
        &mut self,
        risk_class: RiskClass,
        rows: impl IntoIterator<Item = ReportRow>,
        messages: impl IntoIterator<Item = String>,
    ) {
        self.rows.extend(rows);
        self.rows.sort_by_key(ReportRow::key);
        self.messages.entry(risk_class).or_default().extend(messages);
    }

    /// Report rows in `(risk_class, tenor)` order.
    #[must_use]
    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    /// Rows of one risk class.
    pub fn rows_of(&self, risk_class: RiskClass) -> impl Iterator<Item = &ReportRow> {
        self.rows.iter().filter(move |r| r.risk_class == risk_class)
    }

    /// All messages, IR delta first.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.messages.values().flatten().map(String::as_str)
    }

    /// Messages of one risk class.
    #[must_use]
    pub fn messages_for(&self, risk_class: RiskClass) -> &[String] {
        self.messages.get(&risk_class).map(Vec::as_slice).unwrap_or_default()
    }

    /// Newline-joined messages of one risk class.
    #[must_use]
    pub fn summary_for(&self, risk_class: RiskClass) -> String {
        self.messages_for(risk_class).join("\n")
    }

    /// All messages joined by newlines.
    #[must_use]
    pub fn messages_text(&self) -> String {
        self.messages().collect::<Vec<_>>().join("\n")
    }

    /// Bucket → stressed (unobservable) flag.
    #[must_use]
    pub fn stressed_flags(&self) -> BTreeMap<BucketKey, bool> {
        self.rows.iter().map(|r| (r.key(), !r.observable)).collect()
    }

    /// Number of unobservable buckets.
    #[must_use]
    pub fn unobservable_count(&self) -> usize {
        self.rows.iter().filter(|r| !r.observable).count()
    }
}
