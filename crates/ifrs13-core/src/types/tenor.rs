//! Bucket tenors expressed in years.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::error::{ObservabilityError, ObservabilityResult};

/// Validates a tenor in years: it must be finite and non-negative.
///
/// Negative zero is normalized to zero so that equal tenors compare equal.
pub fn validate_years(field: &str, years: f64) -> ObservabilityResult<f64> {
    if !years.is_finite() {
        return Err(ObservabilityError::range(field, years, "must be a finite number of years"));
    }
    if years < 0.0 {
        return Err(ObservabilityError::range(field, years, "must be non-negative"));
    }
    Ok(years + 0.0)
}

/// The tenor coordinate of a risk bucket.
///
/// IR delta buckets sit on a single tenor; vega buckets sit on an
/// (option expiry, underlying swap tenor) pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BucketTenor {
    /// A single tenor in years.
    Point(f64),
    /// An expiry × underlying tenor pair in years.
    Surface {
        /// Option expiry in years.
        expiry: f64,
        /// Underlying tenor in years.
        underlying: f64,
    },
}

impl BucketTenor {
    /// Creates a validated single-tenor coordinate.
    pub fn point(years: f64) -> ObservabilityResult<Self> {
        Ok(Self::Point(validate_years("tenor", years)?))
    }

    /// Creates a validated expiry × underlying coordinate.
    pub fn surface(expiry: f64, underlying: f64) -> ObservabilityResult<Self> {
        Ok(Self::Surface {
            expiry: validate_years("expiry", expiry)?,
            underlying: validate_years("underlying tenor", underlying)?,
        })
    }

    /// Re-validates a coordinate that may have been built from raw variants.
    pub fn validate(self) -> ObservabilityResult<Self> {
        match self {
            Self::Point(t) => Self::point(t),
            Self::Surface { expiry, underlying } => Self::surface(expiry, underlying),
        }
    }

    /// The tenor compared against a single-axis grid.
    ///
    /// For a surface this is the underlying tenor.
    #[must_use]
    pub fn tenor(&self) -> f64 {
        match self {
            Self::Point(t) => *t,
            Self::Surface { underlying, .. } => *underlying,
        }
    }

    /// Option expiry, if this is a surface coordinate.
    #[must_use]
    pub fn expiry(&self) -> Option<f64> {
        match self {
            Self::Point(_) => None,
            Self::Surface { expiry, .. } => Some(*expiry),
        }
    }

    /// Returns true for expiry × underlying coordinates.
    #[must_use]
    pub fn is_surface(&self) -> bool {
        matches!(self, Self::Surface { .. })
    }

    fn sort_key(&self) -> (u8, f64, f64) {
        match self {
            Self::Point(t) => (0, *t, 0.0),
            Self::Surface { expiry, underlying } => (1, *expiry, *underlying),
        }
    }
}

impl PartialEq for BucketTenor {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BucketTenor {}

impl PartialOrd for BucketTenor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BucketTenor {
    fn cmp(&self, other: &Self) -> Ordering {
        let (ka, a1, a2) = self.sort_key();
        let (kb, b1, b2) = other.sort_key();
        ka.cmp(&kb)
            .then_with(|| a1.total_cmp(&b1))
            .then_with(|| a2.total_cmp(&b2))
    }
}

impl fmt::Display for BucketTenor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Point(t) => write!(f, "{t}Y"),
            Self::Surface { expiry, underlying } => write!(f, "{expiry}Yx{underlying}Y"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation() {
        assert!(BucketTenor::point(5.0).is_ok());
        assert!(BucketTenor::point(0.0).is_ok());
        assert!(matches!(
            BucketTenor::point(-1.0),
            Err(ObservabilityError::Range { .. })
        ));
        assert!(BucketTenor::point(f64::NAN).is_err());
        assert!(BucketTenor::surface(2.0, f64::INFINITY).is_err());
        assert!(BucketTenor::Point(-3.0).validate().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(BucketTenor::point(15.0).unwrap().to_string(), "15Y");
        assert_eq!(BucketTenor::point(0.5).unwrap().to_string(), "0.5Y");
        assert_eq!(
            BucketTenor::surface(5.0, 10.0).unwrap().to_string(),
            "5Yx10Y"
        );
    }

    #[test]
    fn test_ordering() {
        let a = BucketTenor::point(2.0).unwrap();
        let b = BucketTenor::point(10.0).unwrap();
        let s = BucketTenor::surface(1.0, 1.0).unwrap();
        assert!(a < b);
        assert!(b < s);
        assert!(BucketTenor::surface(1.0, 5.0).unwrap() < BucketTenor::surface(2.0, 1.0).unwrap());
    }

    #[test]
    fn test_negative_zero_equal() {
        assert_eq!(BucketTenor::point(-0.0).unwrap(), BucketTenor::point(0.0).unwrap());
    }

    #[test]
    fn test_axis_accessors() {
        let s = BucketTenor::surface(3.0, 7.0).unwrap();
        assert_eq!(s.tenor(), 7.0);
        assert_eq!(s.expiry(), Some(3.0));
        assert!(s.is_surface());
        assert_eq!(BucketTenor::point(4.0).unwrap().expiry(), None);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(500))]

            #[test]
            fn test_ordering_consistent_with_eq(a in 0.0f64..100.0, b in 0.0f64..100.0) {
                let ta = BucketTenor::point(a).unwrap();
                let tb = BucketTenor::point(b).unwrap();
                prop_assert_eq!(ta == tb, ta.cmp(&tb) == Ordering::Equal);
                prop_assert_eq!(ta < tb, a < b);
            }

            #[test]
            fn test_negative_values_rejected(v in -1000.0f64..-1e-9) {
                prop_assert!(BucketTenor::point(v).is_err());
                prop_assert!(BucketTenor::surface(1.0, v).is_err());
                prop_assert!(BucketTenor::surface(v, 1.0).is_err());
            }
        }
    }
}
