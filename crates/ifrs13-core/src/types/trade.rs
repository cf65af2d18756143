//! Trade descriptors.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::tenor::validate_years;
use super::CurrencyCode;
use crate::error::{ObservabilityError, ObservabilityResult};

/// Largest accepted notional.
pub const MAX_NOTIONAL: Decimal = dec!(1_000_000_000_000_000);

/// Largest accepted strike magnitude, in percent.
pub const MAX_STRIKE_PERCENT: f64 = 100.0;

/// Longest accepted expiry or maturity, in years.
pub const MAX_TENOR_YEARS: f64 = 100.0;

/// Product type of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductType {
    /// European interest-rate swaption.
    #[serde(rename = "IR Swaption")]
    IrSwaption,
    /// Fixed-rate bond.
    Bond,
    /// Interest-rate cap or floor.
    CapFloor,
    /// Vanilla interest-rate swap.
    #[serde(rename = "IRSwap")]
    IrSwap,
}

impl ProductType {
    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::IrSwaption => "IR Swaption",
            Self::Bond => "Bond",
            Self::CapFloor => "CapFloor",
            Self::IrSwap => "IRSwap",
        }
    }

    /// Returns true for products with optionality (and therefore vega).
    #[must_use]
    pub fn is_option(&self) -> bool {
        matches!(self, Self::IrSwaption | Self::CapFloor)
    }

    /// Returns all product types.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[Self::IrSwaption, Self::Bond, Self::CapFloor, Self::IrSwap]
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProductType {
    type Err = ObservabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "irswaption" | "swaption" => Ok(Self::IrSwaption),
            "bond" => Ok(Self::Bond),
            "capfloor" | "cap" | "floor" => Ok(Self::CapFloor),
            "irswap" | "swap" => Ok(Self::IrSwap),
            _ => Err(ObservabilityError::data(
                "product_type",
                format!("unknown product type '{s}'"),
            )),
        }
    }
}

/// Direction of the trade's optionality (or of the fixed leg for swaps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OptionType {
    /// Receive fixed (floor for cap/floors).
    #[default]
    Receiver,
    /// Pay fixed (cap for cap/floors).
    Payer,
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Receiver => f.write_str("Receiver"),
            Self::Payer => f.write_str("Payer"),
        }
    }
}

impl FromStr for OptionType {
    type Err = ObservabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "receiver" | "receive" | "rec" | "floor" => Ok(Self::Receiver),
            "payer" | "pay" | "cap" => Ok(Self::Payer),
            _ => Err(ObservabilityError::data(
                "option_type",
                format!("unknown option type '{s}'"),
            )),
        }
    }
}

/// A trade descriptor.
///
/// The trade's PV is not part of the descriptor: it is produced once by a
/// risk exposure generator alongside the ladder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Optional trade identifier.
    #[serde(default)]
    pub trade_id: Option<String>,
    /// Product type.
    pub product_type: ProductType,
    /// Trade currency.
    pub currency: CurrencyCode,
    /// Option direction.
    #[serde(default)]
    pub option_type: OptionType,
    /// Notional amount (positive).
    pub notional: Decimal,
    /// Strike in percent (2.5 = 2.5%).
    pub strike: f64,
    /// Expiry tenor in years.
    pub expiry_tenor: f64,
    /// Maturity tenor in years.
    pub maturity_tenor: f64,
    /// Owning trading desk, if known.
    #[serde(default)]
    pub trading_desk: Option<String>,
}

impl Trade {
    /// Starts building a trade.
    #[must_use]
    pub fn builder() -> TradeBuilder {
        TradeBuilder::default()
    }

    /// Checks the trade's fields for physically sensible values.
    ///
    /// # Errors
    ///
    /// Returns a `Range` error naming the offending field.
    pub fn validate(&self) -> ObservabilityResult<()> {
        if self.notional <= Decimal::ZERO {
            return Err(ObservabilityError::range(
                "notional",
                self.notional,
                "must be positive",
            ));
        }
        if self.notional > MAX_NOTIONAL {
            return Err(ObservabilityError::range(
                "notional",
                self.notional,
                format!("must not exceed {MAX_NOTIONAL}"),
            ));
        }
        if !self.strike.is_finite() {
            return Err(ObservabilityError::range("strike", self.strike, "must be finite"));
        }
        if self.strike.abs() > MAX_STRIKE_PERCENT {
            return Err(ObservabilityError::range(
                "strike",
                self.strike,
                format!("must lie within ±{MAX_STRIKE_PERCENT}%"),
            ));
        }
        for (field, years) in [
            ("expiry_tenor", self.expiry_tenor),
            ("maturity_tenor", self.maturity_tenor),
        ] {
            if validate_years(field, years)? > MAX_TENOR_YEARS {
                return Err(ObservabilityError::range(
                    field,
                    years,
                    format!("must not exceed {MAX_TENOR_YEARS} years"),
                ));
            }
        }
        if self.maturity_tenor <= 0.0 {
            return Err(ObservabilityError::range(
                "maturity_tenor",
                self.maturity_tenor,
                "must be positive",
            ));
        }
        if self.product_type.is_option() && self.maturity_tenor <= self.expiry_tenor {
            return Err(ObservabilityError::range(
                "maturity_tenor",
                self.maturity_tenor,
                format!(
                    "must exceed expiry tenor {} for {}",
                    self.expiry_tenor, self.product_type
                ),
            ));
        }
        Ok(())
    }

    /// Identifier used in logs and diagnostics.
    ///
    /// Falls back to a description when no trade id was supplied.
    #[must_use]
    pub fn display_id(&self) -> String {
        match &self.trade_id {
            Some(id) => id.clone(),
            None => format!(
                "{} {} {}Yx{}Y",
                self.product_type, self.currency, self.expiry_tenor, self.maturity_tenor
            ),
        }
    }
}

/// Builder for [`Trade`].
#[derive(Debug, Clone, Default)]
pub struct TradeBuilder {
    trade_id: Option<String>,
    product_type: Option<ProductType>,
    currency: Option<CurrencyCode>,
    option_type: OptionType,
    notional: Option<Decimal>,
    strike: Option<f64>,
    expiry_tenor: Option<f64>,
    maturity_tenor: Option<f64>,
    trading_desk: Option<String>,
}

impl TradeBuilder {
    /// Sets the trade id.
    #[must_use]
    pub fn trade_id(mut self, id: impl Into<String>) -> Self {
        self.trade_id = Some(id.into());
        self
    }

    /// Sets the product type.
    #[must_use]
    pub fn product_type(mut self, product_type: ProductType) -> Self {
        self.product_type = Some(product_type);
        self
    }

    /// Sets the currency.
    #[must_use]
    pub fn currency(mut self, currency: CurrencyCode) -> Self {
        self.currency = Some(currency);
        self
    }

    /// Sets the option direction.
    #[must_use]
    pub fn option_type(mut self, option_type: OptionType) -> Self {
        self.option_type = option_type;
        self
    }

    /// Sets the notional.
    #[must_use]
    pub fn notional(mut self, notional: Decimal) -> Self {
        self.notional = Some(notional);
        self
    }

    /// Sets the strike in percent.
    #[must_use]
    pub fn strike(mut self, strike: f64) -> Self {
        self.strike = Some(strike);
        self
    }

    /// Sets the expiry tenor in years.
    #[must_use]
    pub fn expiry_tenor(mut self, years: f64) -> Self {
        self.expiry_tenor = Some(years);
        self
    }

    /// Sets the maturity tenor in years.
    #[must_use]
    pub fn maturity_tenor(mut self, years: f64) -> Self {
        self.maturity_tenor = Some(years);
        self
    }

    /// Sets the trading desk.
    #[must_use]
    pub fn trading_desk(mut self, desk: impl Into<String>) -> Self {
        self.trading_desk = Some(desk.into());
        self
    }

    /// Builds and validates the trade.
    ///
    /// Expiry defaults to zero for products without optionality.
    pub fn build(self) -> ObservabilityResult<Trade> {
        let missing = |field: &str| ObservabilityError::data("trade", format!("missing {field}"));

        let trade = Trade {
            trade_id: self.trade_id,
            product_type: self.product_type.ok_or_else(|| missing("product_type"))?,
            currency: self.currency.ok_or_else(|| missing("currency"))?,
            option_type: self.option_type,
            notional: self.notional.ok_or_else(|| missing("notional"))?,
            strike: self.strike.ok_or_else(|| missing("strike"))?,
            expiry_tenor: self.expiry_tenor.unwrap_or(0.0),
            maturity_tenor: self.maturity_tenor.ok_or_else(|| missing("maturity_tenor"))?,
            trading_desk: self.trading_desk,
        };
        trade.validate()?;
        Ok(trade)
    }
}
