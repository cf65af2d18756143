//! Deterministic synthetic risk generator.
//!
//! Stands in for a valuation engine. The numbers are not prices; they only
//! need to scale sensibly with notional, tenor and strike so the classifier
//! has something realistic to work on.
//!
//! # Ladder layout
//!
//! - **IR delta**: standard points strictly below maturity, plus the maturity
//! - **Vega** (options only):
//!   - swaptions: standard expiries strictly below the trade expiry plus the
//!     expiry, each on the `maturity - expiry` underlying
//!   - caps/floors: caplet expiries strictly below maturity plus the maturity,
//!     each on a 1Y underlying
//!
//! # PV attribution
//!
//! A fixed share of |trade PV| (25% IR, 15% vega by default) is spread over
//! each class in proportion to |exposure|, signed like the exposure and
//! rounded to cents.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use ifrs13_core::{
    BucketTenor, ObservabilityError, ObservabilityResult, OptionType, ProductType, RiskBucket,
    RiskClass, RiskLadder, Trade,
};

use crate::generator::RiskExposureGenerator;
use crate::profile::RiskProfile;

/// IR delta ladder points in years.
pub const IR_LADDER_TENORS: [f64; 12] =
    [1.0, 2.0, 3.0, 5.0, 7.0, 10.0, 15.0, 20.0, 25.0, 30.0, 40.0, 50.0];

/// Swaption vega expiries in years.
pub const SWAPTION_EXPIRIES: [f64; 8] = [1.0, 2.0, 3.0, 5.0, 7.0, 10.0, 15.0, 20.0];

/// Underlying tenor of a caplet.
pub const CAPLET_TENOR: f64 = 1.0;

/// Default share of |trade PV| attributed to IR delta buckets.
pub const DEFAULT_IR_PV_SHARE: Decimal = dec!(0.25);

/// Default share of |trade PV| attributed to vega buckets.
pub const DEFAULT_VEGA_PV_SHARE: Decimal = dec!(0.15);

const ONE_BP: Decimal = dec!(0.0001);

/// Per-product scaling.
#[derive(Debug, Clone, Copy)]
struct ProductFactors {
    delta: f64,
    vega: f64,
    premium_rate: f64,
}

impl ProductFactors {
    fn of(product: ProductType) -> Self {
        match product {
            ProductType::IrSwaption => Self {
                delta: 0.5,
                vega: 1.0,
                premium_rate: 0.02,
            },
            ProductType::CapFloor => Self {
                delta: 0.3,
                vega: 0.6,
                premium_rate: 0.015,
            },
            ProductType::IrSwap => Self {
                delta: 1.0,
                vega: 0.0,
                premium_rate: 0.01,
            },
            ProductType::Bond => Self {
                delta: 1.0,
                vega: 0.0,
                premium_rate: 0.03,
            },
        }
    }
}

/// Deterministic synthetic generator.
///
/// ```rust
/// use ifrs13_core::prelude::*;
/// use ifrs13_risk::{RiskExposureGenerator, SyntheticGenerator};
///
/// let trade = Trade::builder()
///     .product_type(ProductType::IrSwaption)
///     .currency(CurrencyCode::new("USD").unwrap())
///     .notional(dec!(10_000_000))
///     .strike(2.5)
///     .expiry_tenor(2.0)
///     .maturity_tenor(10.0)
///     .build()
///     .unwrap();
///
/// let profile = SyntheticGenerator::new().generate(&trade).unwrap();
/// assert!(profile.trade_pv() > Decimal::ZERO);
/// assert_eq!(profile.ladder().of_class(RiskClass::Vega).count(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticGenerator {
    ir_pv_share: Decimal,
    vega_pv_share: Decimal,
}

impl Default for SyntheticGenerator {
    fn default() -> Self {
        Self {
            ir_pv_share: DEFAULT_IR_PV_SHARE,
            vega_pv_share: DEFAULT_VEGA_PV_SHARE,
        }
    }
}

impl SyntheticGenerator {
    /// Creates a generator with the default PV shares.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the shares of |trade PV| attributed to each risk class.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error if a share is negative or the shares
    /// add up to more than 1.
    pub fn with_pv_shares(ir: Decimal, vega: Decimal) -> ObservabilityResult<Self> {
        if ir < Decimal::ZERO || vega < Decimal::ZERO || ir + vega > Decimal::ONE {
            return Err(ObservabilityError::configuration(format!(
                "PV shares must be non-negative and sum to at most 1 (got {ir} + {vega})"
            )));
        }
        Ok(Self {
            ir_pv_share: ir,
            vega_pv_share: vega,
        })
    }

    /// Share of |trade PV| attributed to IR delta buckets.
    #[must_use]
    pub fn ir_pv_share(&self) -> Decimal {
        self.ir_pv_share
    }

    /// Share of |trade PV| attributed to vega buckets.
    #[must_use]
    pub fn vega_pv_share(&self) -> Decimal {
        self.vega_pv_share
    }

    /// Synthetic trade PV: notional times a premium rate that grows with
    /// tenor and strike.
    pub fn trade_pv(&self, trade: &Trade) -> ObservabilityResult<Decimal> {
        let factors = ProductFactors::of(trade.product_type);
        let rate = factors.premium_rate
            * (1.0 + 0.05 * trade.maturity_tenor + 0.02 * trade.expiry_tenor)
            * strike_scale(trade);
        Ok(scale_notional(trade, "premium rate", rate)?.round_dp(2))
    }

    fn ir_exposures(&self, trade: &Trade) -> ObservabilityResult<Vec<(BucketTenor, Decimal)>> {
        let factors = ProductFactors::of(trade.product_type);
        let direction = direction(trade);
        let strike = strike_scale(trade);

        ladder_points(&IR_LADDER_TENORS, trade.maturity_tenor)
            .into_iter()
            .map(|t| {
                let exposure =
                    scale_notional(trade, "IR delta scale", t * factors.delta * strike)?;
                Ok((BucketTenor::point(t)?, (exposure * ONE_BP) * direction))
            })
            .collect()
    }

    fn vega_exposures(&self, trade: &Trade) -> ObservabilityResult<Vec<(BucketTenor, Decimal)>> {
        let factors = ProductFactors::of(trade.product_type);
        let coordinates: Vec<(f64, f64)> = match trade.product_type {
            ProductType::IrSwaption => {
                let underlying = trade.maturity_tenor - trade.expiry_tenor;
                ladder_points(&SWAPTION_EXPIRIES, trade.expiry_tenor)
                    .into_iter()
                    .map(|e| (e, underlying))
                    .collect()
            }
            ProductType::CapFloor => ladder_points(&IR_LADDER_TENORS, trade.maturity_tenor)
                .into_iter()
                .map(|e| (e, CAPLET_TENOR))
                .collect(),
            ProductType::IrSwap | ProductType::Bond => Vec::new(),
        };

        coordinates
            .into_iter()
            .map(|(expiry, underlying)| {
                let exposure =
                    scale_notional(trade, "vega scale", expiry.sqrt() * underlying * factors.vega)?;
                Ok((BucketTenor::surface(expiry, underlying)?, exposure * ONE_BP))
            })
            .collect()
    }
}

impl RiskExposureGenerator for SyntheticGenerator {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn generate(&self, trade: &Trade) -> ObservabilityResult<RiskProfile> {
        trade.validate()?;

        let trade_pv = self.trade_pv(trade)?;
        let mut ladder = RiskLadder::new();

        let classes = [
            (RiskClass::IrDelta, self.ir_exposures(trade)?, self.ir_pv_share),
            (RiskClass::Vega, self.vega_exposures(trade)?, self.vega_pv_share),
        ];
        for (risk_class, exposures, share) in classes {
            let budget = trade_pv.abs() * share;
            let amounts: Vec<Decimal> = exposures.iter().map(|(_, e)| *e).collect();
            let pvs = attribute_pv(&amounts, budget);
            for ((tenor, exposure), pv) in exposures.into_iter().zip(pvs) {
                ladder.push(RiskBucket::new(
                    risk_class,
                    trade.currency.clone(),
                    tenor,
                    exposure,
                    pv,
                )?)?;
            }
        }

        debug!(
            trade = %trade.display_id(),
            buckets = ladder.len(),
            trade_pv = %trade_pv,
            "generated synthetic risk profile"
        );
        Ok(RiskProfile::new(trade_pv, ladder))
    }
}

/// Standard points strictly below `end`, followed by `end` itself.
fn ladder_points(standard: &[f64], end: f64) -> Vec<f64> {
    let mut points: Vec<f64> = standard.iter().copied().filter(|p| *p < end).collect();
    points.push(end);
    points
}

fn direction(trade: &Trade) -> Decimal {
    match (trade.product_type, trade.option_type) {
        (ProductType::Bond, _) => Decimal::NEGATIVE_ONE,
        (_, OptionType::Payer) => Decimal::ONE,
        (_, OptionType::Receiver) => Decimal::NEGATIVE_ONE,
    }
}

/// Spreads `budget` over `exposures` in proportion to |exposure|.
///
/// Each share is rounded to cents and signed like its exposure. All zero
/// exposures receive zero.
fn attribute_pv(exposures: &[Decimal], budget: Decimal) -> Vec<Decimal> {
    let total: Decimal = exposures.iter().map(|e| e.abs()).sum();
    exposures
        .iter()
        .map(|e| {
            if total.is_zero() {
                return Decimal::ZERO;
            }
            let share = (budget * (e.abs() / total)).round_dp(2);
            if e.is_sign_negative() {
                -share
            } else {
                share
            }
        })
        .collect()
}

/// Strike multiplier; negative strikes scale like a zero strike.
fn strike_scale(trade: &Trade) -> f64 {
    1.0 + trade.strike.max(0.0) / 100.0
}

/// `notional × factor`, or a `Range` error when the product overflows.
fn scale_notional(trade: &Trade, what: &str, factor: f64) -> ObservabilityResult<Decimal> {
    trade
        .notional
        .checked_mul(to_decimal(what, factor)?)
        .ok_or_else(|| {
            ObservabilityError::range("notional", trade.notional, format!("overflows the {what}"))
        })
}

fn to_decimal(what: &str, value: f64) -> ObservabilityResult<Decimal> {
    Decimal::from_f64(value)
        .ok_or_else(|| ObservabilityError::range(what, value, "not representable as a decimal"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifrs13_core::CurrencyCode;

    fn swaption(option_type: OptionType) -> Trade {
        Trade::builder()
            .trade_id("SWPN-1")
            .product_type(ProductType::IrSwaption)
            .currency(CurrencyCode::new("USD").unwrap())
            .option_type(option_type)
            .notional(dec!(10_000_000))
            .strike(2.5)
            .expiry_tenor(2.0)
            .maturity_tenor(10.0)
            .build()
            .unwrap()
    }

    fn tenors(profile: &RiskProfile, risk_class: RiskClass) -> Vec<String> {
        profile
            .ladder()
            .of_class(risk_class)
            .map(|b| b.tenor().to_string())
            .collect()
    }

    #[test]
    fn test_swaption_ladder_layout() {
        let profile = SyntheticGenerator::new()
            .generate(&swaption(OptionType::Payer))
            .unwrap();

        assert_eq!(
            tenors(&profile, RiskClass::IrDelta),
            vec!["1Y", "2Y", "3Y", "5Y", "7Y", "10Y"]
        );
        assert_eq!(tenors(&profile, RiskClass::Vega), vec!["1Yx8Y", "2Yx8Y"]);
    }

    #[test]
    fn test_cap_floor_ladder_layout() {
        let mut trade = swaption(OptionType::Payer);
        trade.product_type = ProductType::CapFloor;
        trade.maturity_tenor = 4.0;
        let profile = SyntheticGenerator::new().generate(&trade).unwrap();

        assert_eq!(
            tenors(&profile, RiskClass::Vega),
            vec!["1Yx1Y", "2Yx1Y", "3Yx1Y", "4Yx1Y"]
        );
    }

    #[test]
    fn test_linear_products_have_no_vega() {
        let mut trade = swaption(OptionType::Receiver);
        trade.product_type = ProductType::Bond;
        let profile = SyntheticGenerator::new().generate(&trade).unwrap();
        assert_eq!(profile.ladder().of_class(RiskClass::Vega).count(), 0);
        assert!(profile
            .ladder()
            .iter()
            .all(|b| b.exposure() < Decimal::ZERO));
    }

    #[test]
    fn test_direction_signs() {
        let generator = SyntheticGenerator::new();
        let payer = generator.generate(&swaption(OptionType::Payer)).unwrap();
        let receiver = generator.generate(&swaption(OptionType::Receiver)).unwrap();

        assert!(payer.ladder().of_class(RiskClass::IrDelta).all(|b| b.exposure() > Decimal::ZERO));
        assert!(receiver
            .ladder()
            .of_class(RiskClass::IrDelta)
            .all(|b| b.exposure() < Decimal::ZERO && b.pv() < Decimal::ZERO));
        // Vega is long for both directions
        assert!(receiver.ladder().of_class(RiskClass::Vega).all(|b| b.exposure() > Decimal::ZERO));
    }

    #[test]
    fn test_deterministic() {
        let generator = SyntheticGenerator::new();
        let trade = swaption(OptionType::Payer);
        assert_eq!(generator.generate(&trade).unwrap(), generator.generate(&trade).unwrap());
    }

    #[test]
    fn test_notional_scales_exposure() {
        let generator = SyntheticGenerator::new();
        let small = swaption(OptionType::Payer);
        let mut large = small.clone();
        large.notional = small.notional * dec!(2);

        let a = generator.generate(&small).unwrap();
        let b = generator.generate(&large).unwrap();
        for (x, y) in a.ladder().iter().zip(b.ladder().iter()) {
            assert_eq!(y.exposure(), x.exposure() * dec!(2));
        }
        assert!((b.trade_pv() - a.trade_pv() * dec!(2)).abs() <= dec!(0.01));
    }

    #[test]
    fn test_longer_tenor_larger_exposure() {
        let profile = SyntheticGenerator::new()
            .generate(&swaption(OptionType::Payer))
            .unwrap();
        let exposures: Vec<Decimal> = profile
            .ladder()
            .of_class(RiskClass::IrDelta)
            .map(|b| b.exposure())
            .collect();
        assert!(exposures.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_attribution_bounded() {
        let profile = SyntheticGenerator::new()
            .generate(&swaption(OptionType::Receiver))
            .unwrap();
        let ir: Decimal = profile.ladder().of_class(RiskClass::IrDelta).map(|b| b.pv().abs()).sum();
        let vega: Decimal = profile.ladder().of_class(RiskClass::Vega).map(|b| b.pv().abs()).sum();
        let slack = dec!(0.01) * Decimal::from(profile.ladder().len());

        assert!(ir <= profile.trade_pv() * DEFAULT_IR_PV_SHARE + slack);
        assert!(vega <= profile.trade_pv() * DEFAULT_VEGA_PV_SHARE + slack);
        assert!(profile.ladder().total_abs_pv() <= profile.trade_pv() * dec!(0.40) + slack);
    }

    #[test]
    fn test_zero_expiry_swaption() {
        let mut trade = swaption(OptionType::Payer);
        trade.expiry_tenor = 0.0;
        let profile = SyntheticGenerator::new().generate(&trade).unwrap();
        let vega: Vec<_> = profile.ladder().of_class(RiskClass::Vega).collect();
        assert_eq!(vega.len(), 1);
        assert_eq!(vega[0].exposure(), Decimal::ZERO);
        assert_eq!(vega[0].pv(), Decimal::ZERO);
    }

    #[test]
    fn test_invalid_trade_rejected() {
        let mut trade = swaption(OptionType::Payer);
        trade.maturity_tenor = 1.0;
        let err = SyntheticGenerator::new().generate(&trade).unwrap_err();
        assert_eq!(err.kind(), "RangeError");
    }

    #[test]
    fn test_overflow_is_range_error() {
        let mut trade = swaption(OptionType::Payer);
        trade.notional = Decimal::MAX;
        trade.maturity_tenor = 1e9;

        let generator = SyntheticGenerator::new();
        let err = generator.trade_pv(&trade).unwrap_err();
        assert_eq!(err.kind(), "RangeError");
        assert!(err.to_string().contains("notional"));
        // Validation rejects the trade before any arithmetic
        assert_eq!(generator.generate(&trade).unwrap_err().kind(), "RangeError");
    }

    #[test]
    fn test_largest_valid_trade_generates() {
        let mut trade = swaption(OptionType::Receiver);
        trade.notional = ifrs13_core::MAX_NOTIONAL;
        trade.strike = ifrs13_core::MAX_STRIKE_PERCENT;
        trade.expiry_tenor = 20.0;
        trade.maturity_tenor = ifrs13_core::MAX_TENOR_YEARS;
        assert!(SyntheticGenerator::new().generate(&trade).is_ok());
    }

    #[test]
    fn test_negative_strike_scales_like_zero() {
        let generator = SyntheticGenerator::new();
        let mut zero = swaption(OptionType::Payer);
        zero.strike = 0.0;
        let mut deep = zero.clone();
        deep.strike = -100.0;

        let a = generator.generate(&zero).unwrap();
        let b = generator.generate(&deep).unwrap();
        assert_eq!(a, b);
        assert!(b.ladder().of_class(RiskClass::IrDelta).all(|x| x.exposure() > Decimal::ZERO));
    }

    #[test]
    fn test_pv_share_validation() {
        assert!(SyntheticGenerator::with_pv_shares(dec!(0.5), dec!(0.5)).is_ok());
        assert!(SyntheticGenerator::with_pv_shares(dec!(0.8), dec!(0.3)).is_err());
        assert!(SyntheticGenerator::with_pv_shares(dec!(-0.1), dec!(0.3)).is_err());
    }

    #[test]
    fn test_attribute_pv_rounding() {
        let pvs = attribute_pv(&[dec!(1), dec!(-1), dec!(1)], dec!(100));
        assert_eq!(pvs, vec![dec!(33.33), dec!(-33.33), dec!(33.33)]);
        assert_eq!(attribute_pv(&[Decimal::ZERO], dec!(50)), vec![Decimal::ZERO]);
    }
}
