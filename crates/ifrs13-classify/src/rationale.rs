//! Rationale request assembly.
//!
//! A rationale generator (typically a language model behind a service)
//! turns the classification evidence into a written justification. This
//! module builds its input and defines the seam; [`TemplateRationale`] is an
//! offline, deterministic implementation.

use rust_decimal::Decimal;
use serde::Serialize;

use ifrs13_core::{FairValueLevel, ObservabilityResult, RiskClass};

use crate::pipeline::ClassificationResult;

/// System instruction sent with every rationale prompt.
pub const SYSTEM_INSTRUCTION: &str =
    "You are a financial analyst reviewing IFRS13 fair value hierarchy classifications.";

/// Input to a rationale generator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RationaleRequest {
    /// Trade identifier.
    pub trade_id: String,
    /// Stress-test level.
    pub level: FairValueLevel,
    /// Total trade PV.
    pub trade_pv: Decimal,
    /// Total stress PV.
    pub total_stress_pv: Decimal,
    /// Applied materiality threshold amount.
    pub threshold_amount: Decimal,
    /// Newline-joined IR delta messages.
    pub ir_summary: String,
    /// Newline-joined volatility messages.
    pub vol_summary: String,
    /// Level predicted from trade terms, if a predictor was run.
    pub model_prediction: Option<FairValueLevel>,
}

impl RationaleRequest {
    /// Builds a request from a classification result.
    #[must_use]
    pub fn from_result(result: &ClassificationResult, model_prediction: Option<FairValueLevel>) -> Self {
        Self {
            trade_id: result.trade_id.clone(),
            level: result.level(),
            trade_pv: result.trade_pv(),
            total_stress_pv: result.total_stress_pv(),
            threshold_amount: result.stress.threshold_amount,
            ir_summary: result.report.summary_for(RiskClass::IrDelta),
            vol_summary: result.report.summary_for(RiskClass::Vega),
            model_prediction,
        }
    }

    /// The user prompt.
    #[must_use]
    pub fn prompt(&self) -> String {
        let prediction = self
            .model_prediction
            .map_or_else(|| "not available".to_string(), |l| l.to_string());
        format!(
            "IR Delta Summary:\n{}\n\nVol Summary:\n{}\n\nModel Prediction: {}\n\
             Explain and confirm IFRS13 classification with confidence score.",
            self.ir_summary, self.vol_summary, prediction
        )
    }

    /// The system instruction.
    #[must_use]
    pub fn system_instruction(&self) -> &'static str {
        SYSTEM_INSTRUCTION
    }
}

/// Produces a natural-language justification for a classification.
///
/// Only ever invoked after a result exists; classification never waits on it.
pub trait RationaleGenerator: Send + Sync {
    /// Writes the rationale for `request`.
    ///
    /// # Errors
    ///
    /// Implementation-defined; typically a `Configuration` error when the
    /// backing service is not set up.
    fn generate(&self, request: &RationaleRequest) -> ObservabilityResult<String>;
}

/// Deterministic rationale built from the evidence alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateRationale;

impl TemplateRationale {
    fn confidence(request: &RationaleRequest) -> Decimal {
        match request.model_prediction {
            Some(predicted) if predicted == request.level => Decimal::new(90, 2),
            Some(_) => Decimal::new(55, 2),
            None => Decimal::new(75, 2),
        }
    }
}

impl RationaleGenerator for TemplateRationale {
    fn generate(&self, request: &RationaleRequest) -> ObservabilityResult<String> {
        let mut text = format!(
            "Trade {} is classified as IFRS13 {}. Stress PV from unobservable inputs is {:.2} \
             against a materiality threshold of {:.2} (trade PV {:.2}).",
            request.trade_id,
            request.level,
            request.total_stress_pv,
            request.threshold_amount,
            request.trade_pv
        );

        let unobservable = request
            .ir_summary
            .lines()
            .chain(request.vol_summary.lines())
            .filter(|l| !l.is_empty())
            .count();
        if unobservable == 0 {
            text.push_str(" All risk buckets fall within the observability grids.");
        } else {
            text.push_str(&format!(
                " {unobservable} observability finding(s) were recorded."
            ));
        }

        match request.model_prediction {
            Some(p) if p == request.level => {
                text.push_str(&format!(" The model prediction ({p}) agrees."));
            }
            Some(p) => {
                text.push_str(&format!(
                    " The model prediction ({p}) disagrees; review recommended."
                ));
            }
            None => {}
        }

        text.push_str(&format!(" Confidence: {}.", Self::confidence(request)));
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request(prediction: Option<FairValueLevel>) -> RationaleRequest {
        RationaleRequest {
            trade_id: "T1".to_string(),
            level: FairValueLevel::Level3,
            trade_pv: dec!(10000),
            total_stress_pv: dec!(1100),
            threshold_amount: dec!(1000),
            ir_summary: "IR_DELTA tenor 40Y for USD is NOT observable".to_string(),
            vol_summary: String::new(),
            model_prediction: prediction,
        }
    }

    #[test]
    fn test_prompt_layout() {
        let prompt = request(Some(FairValueLevel::Level3)).prompt();
        assert_eq!(
            prompt,
            "IR Delta Summary:\nIR_DELTA tenor 40Y for USD is NOT observable\n\nVol Summary:\n\n\n\
             Model Prediction: Level 3\nExplain and confirm IFRS13 classification with confidence score."
        );
    }

    #[test]
    fn test_template_rationale() {
        let text = TemplateRationale.generate(&request(Some(FairValueLevel::Level3))).unwrap();
        assert!(text.contains("IFRS13 Level 3"));
        assert!(text.contains("1 observability finding"));
        assert!(text.contains("agrees"));
        assert!(text.ends_with("Confidence: 0.90."));

        let text = TemplateRationale.generate(&request(Some(FairValueLevel::Level2))).unwrap();
        assert!(text.contains("disagrees"));
        assert!(text.ends_with("Confidence: 0.55."));
    }
}
