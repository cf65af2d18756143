//! Currency to discount curve mapping.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ObservabilityResult;
use crate::types::CurrencyCode;

/// Fixed mapping from currency code to discount curve identifier.
///
/// A currency missing from the map is not an error: the classifier treats
/// every bucket of such a trade as unobservable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCurveMap {
    curves: BTreeMap<CurrencyCode, String>,
}

impl CurrencyCurveMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// OIS discount curves for USD, EUR, GBP and JPY.
    #[must_use]
    pub fn standard_ois() -> Self {
        let mut map = Self::new();
        for code in ["USD", "EUR", "GBP", "JPY"] {
            if let Ok(currency) = CurrencyCode::new(code) {
                map.insert(currency, format!("{code}.OIS"));
            }
        }
        map
    }

    /// Builds a map from `(currency, curve id)` pairs.
    pub fn from_pairs<'a>(
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> ObservabilityResult<Self> {
        let mut map = Self::new();
        for (currency, curve) in pairs {
            map.insert(CurrencyCode::new(currency)?, curve.trim().to_string());
        }
        Ok(map)
    }

    /// Adds or replaces a mapping.
    pub fn insert(&mut self, currency: CurrencyCode, curve_id: impl Into<String>) {
        self.curves.insert(currency, curve_id.into());
    }

    /// Returns the discount curve for a currency, if mapped.
    #[must_use]
    pub fn curve_for(&self, currency: &CurrencyCode) -> Option<&str> {
        self.curves.get(currency).map(String::as_str)
    }

    /// Overlays `other` on top of this map.
    #[must_use]
    pub fn merged(mut self, other: &Self) -> Self {
        for (currency, curve) in &other.curves {
            self.curves.insert(currency.clone(), curve.clone());
        }
        self
    }

    /// Iterates over mappings in currency order.
    pub fn iter(&self) -> impl Iterator<Item = (&CurrencyCode, &str)> {
        self.curves.iter().map(|(c, id)| (c, id.as_str()))
    }

    /// Number of mapped currencies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    /// Returns true if no currency is mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }
}
