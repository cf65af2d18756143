//! Tenor axes: sorted reference tenors with an inclusive observable cutoff.

use serde::Serialize;

use ifrs13_core::{ObservabilityError, ObservabilityResult};

/// One dimension of a grid entry.
///
/// Holds the reference tenors quoted for a currency (ascending, deduplicated)
/// and the maximum tenor considered observable. A tenor `t` is observable
/// iff `t <= cutoff`, so observability never switches back on as the tenor
/// grows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TenorAxis {
    points: Vec<f64>,
    cutoff: f64,
}

impl TenorAxis {
    /// Creates an axis from reference tenors and a cutoff.
    ///
    /// # Errors
    ///
    /// Returns a `Data` error if any value is negative or non-finite.
    pub fn new(points: impl IntoIterator<Item = f64>, cutoff: f64) -> ObservabilityResult<Self> {
        check_grid_value("cutoff", cutoff)?;
        let mut collected = Vec::new();
        for p in points {
            check_grid_value("reference tenor", p)?;
            collected.push(p + 0.0);
        }
        Ok(Self::trusted(collected, cutoff + 0.0))
    }

    /// Creates an axis with no reference tenors, only a cutoff.
    pub fn with_cutoff(cutoff: f64) -> ObservabilityResult<Self> {
        Self::new(std::iter::empty(), cutoff)
    }

    /// Builds an axis from values already known to be valid.
    pub(crate) fn trusted(mut points: Vec<f64>, cutoff: f64) -> Self {
        points.sort_by(f64::total_cmp);
        points.dedup();
        Self { points, cutoff }
    }

    /// Maximum observable tenor (inclusive).
    #[must_use]
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    /// Reference tenors in ascending order.
    #[must_use]
    pub fn points(&self) -> &[f64] {
        &self.points
    }

    /// Returns true if `tenor` lies within the observable region.
    #[must_use]
    pub fn is_observable(&self, tenor: f64) -> bool {
        tenor <= self.cutoff
    }

    /// Grid tenor an observable `tenor` is reported against.
    ///
    /// This is the smallest reference tenor at or above `tenor` that is itself
    /// observable, falling back to the cutoff. Returns `None` when `tenor` is
    /// beyond the cutoff.
    #[must_use]
    pub fn matched_tenor(&self, tenor: f64) -> Option<f64> {
        if !self.is_observable(tenor) {
            return None;
        }
        let matched = self
            .points
            .iter()
            .copied()
            .find(|p| *p >= tenor && *p <= self.cutoff)
            .unwrap_or(self.cutoff);
        Some(matched)
    }
}

fn check_grid_value(what: &str, value: f64) -> ObservabilityResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ObservabilityError::data(
            "observability grid",
            format!("{what} {value} is not a valid number of years"),
        ));
    }
    Ok(())
}
