// src/instruments/option.rs
//! European vanilla option under Black-Scholes
//!
//! A [`VanillaOption`] is a plain value: six model parameters plus the
//! option type. Every transformation comes as a pair, a pure method that
//! returns a new option (`shocked`, `with_parameter`, `flipped`) and an
//! in-place mutator (`shock_in_place`, `set_parameter`, `flip_in_place`).
//!
//! Equality is exact field-wise comparison. Two options built from values
//! that differ only by rounding noise are different options; callers that
//! want approximate matching must round first.

use crate::error::{validation::*, PricingError, PricingResult};
use crate::instruments::payoffs::{intrinsic, intrinsic_value, PayoffGrid};
use bitflags::bitflags;
use ndarray::Array1;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OptionType {
    #[default]
    Call,
    Put,
}

impl OptionType {
    pub fn flipped(self) -> Self {
        match self {
            OptionType::Call => OptionType::Put,
            OptionType::Put => OptionType::Call,
        }
    }
}

/// The six shockable Black-Scholes parameters of an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionParam {
    Spot,
    Strike,
    Expiry,
    Volatility,
    Rate,
    Dividend,
}

impl OptionParam {
    pub const ALL: [OptionParam; 6] = [
        OptionParam::Spot,
        OptionParam::Strike,
        OptionParam::Expiry,
        OptionParam::Volatility,
        OptionParam::Rate,
        OptionParam::Dividend,
    ];

    /// Short field name: `S`, `K`, `t`, `sigma`, `r` or `q`.
    pub fn name(self) -> &'static str {
        match self {
            OptionParam::Spot => "S",
            OptionParam::Strike => "K",
            OptionParam::Expiry => "t",
            OptionParam::Volatility => "sigma",
            OptionParam::Rate => "r",
            OptionParam::Dividend => "q",
        }
    }
}

impl fmt::Display for OptionParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OptionParam {
    type Err = PricingError;

    fn from_str(name: &str) -> PricingResult<Self> {
        OptionParam::ALL
            .into_iter()
            .find(|param| param.name() == name)
            .ok_or_else(|| PricingError::InvalidField {
                name: name.to_string(),
            })
    }
}

bitflags! {
    /// How a [`Shocks`] set is applied.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ShockFlags: u32 {
        const NONE       = 0;
        /// Shocks are percentages: x * (1 + delta / 100) instead of x + delta.
        const PERCENTAGE = 1 << 0;
        /// Swap call and put after shocking.
        const FLIP_TYPE  = 1 << 1;
    }
}

/// Per-parameter shift sizes; all zero by default.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Shocks {
    pub s: f64,
    pub k: f64,
    pub t: f64,
    pub sigma: f64,
    pub r: f64,
    pub q: f64,
}

impl Shocks {
    /// A shock set moving a single parameter.
    pub fn single(param: OptionParam, delta: f64) -> Self {
        let mut shocks = Shocks::default();
        match param {
            OptionParam::Spot => shocks.s = delta,
            OptionParam::Strike => shocks.k = delta,
            OptionParam::Expiry => shocks.t = delta,
            OptionParam::Volatility => shocks.sigma = delta,
            OptionParam::Rate => shocks.r = delta,
            OptionParam::Dividend => shocks.q = delta,
        }
        shocks
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VanillaOption {
    pub s: f64,     // Underlying spot price
    pub k: f64,     // Strike price
    pub t: f64,     // Time to expiry in years
    pub sigma: f64, // Annualized volatility
    pub r: f64,     // Risk-free rate
    pub q: f64,     // Continuous dividend yield
    pub kind: OptionType,
}

impl VanillaOption {
    /// A call with no dividend yield. Use [`with_dividend`](Self::with_dividend)
    /// and [`put`](Self::put) to complete the description.
    pub fn new(s: f64, k: f64, t: f64, sigma: f64, r: f64) -> Self {
        VanillaOption {
            s,
            k,
            t,
            sigma,
            r,
            q: 0.0,
            kind: OptionType::Call,
        }
    }

    /// Build an option and check every parameter against its domain.
    pub fn try_new(
        s: f64,
        k: f64,
        t: f64,
        sigma: f64,
        r: f64,
        q: f64,
        kind: OptionType,
    ) -> PricingResult<Self> {
        let option = VanillaOption::new(s, k, t, sigma, r)
            .with_dividend(q)
            .with_type(kind);
        option.validate()?;
        Ok(option)
    }

    /// Validate option parameters
    pub fn validate(&self) -> PricingResult<()> {
        validate_positive("S", self.s)?;
        validate_positive("K", self.k)?;
        validate_non_negative("t", self.t)?;
        validate_non_negative("sigma", self.sigma)?;
        validate_finite("r", self.r)?;
        validate_finite("q", self.q)?;
        Ok(())
    }

    pub fn with_dividend(mut self, q: f64) -> Self {
        self.q = q;
        self
    }

    pub fn with_type(mut self, kind: OptionType) -> Self {
        self.kind = kind;
        self
    }

    pub fn put(self) -> Self {
        self.with_type(OptionType::Put)
    }

    pub fn is_put(&self) -> bool {
        self.kind == OptionType::Put
    }

    pub fn parameter(&self, param: OptionParam) -> f64 {
        match param {
            OptionParam::Spot => self.s,
            OptionParam::Strike => self.k,
            OptionParam::Expiry => self.t,
            OptionParam::Volatility => self.sigma,
            OptionParam::Rate => self.r,
            OptionParam::Dividend => self.q,
        }
    }

    fn parameter_mut(&mut self, param: OptionParam) -> &mut f64 {
        match param {
            OptionParam::Spot => &mut self.s,
            OptionParam::Strike => &mut self.k,
            OptionParam::Expiry => &mut self.t,
            OptionParam::Volatility => &mut self.sigma,
            OptionParam::Rate => &mut self.r,
            OptionParam::Dividend => &mut self.q,
        }
    }

    /// Copy of this option with one parameter replaced.
    pub fn with_parameter(&self, param: OptionParam, value: f64) -> Self {
        let mut option = *self;
        option.set_parameter(param, value);
        option
    }

    pub fn set_parameter(&mut self, param: OptionParam, value: f64) {
        *self.parameter_mut(param) = value;
    }

    /// [`with_parameter`](Self::with_parameter) addressed by field name.
    pub fn with_named_parameter(&self, name: &str, value: f64) -> PricingResult<Self> {
        Ok(self.with_parameter(name.parse()?, value))
    }

    pub fn set_named_parameter(&mut self, name: &str, value: f64) -> PricingResult<()> {
        self.set_parameter(name.parse()?, value);
        Ok(())
    }

    /// Same option with call and put swapped.
    pub fn flipped(&self) -> Self {
        self.with_type(self.kind.flipped())
    }

    pub fn flip_in_place(&mut self) {
        self.kind = self.kind.flipped();
    }

    /// Shift every parameter by the matching entry of `shocks`.
    ///
    /// Without [`ShockFlags::PERCENTAGE`] each field moves additively,
    /// `x + delta`; with it, multiplicatively, `x * (1 + delta / 100)`.
    /// A field sitting at zero therefore never moves under a percentage
    /// shock.
    pub fn shocked(&self, shocks: &Shocks, flags: ShockFlags) -> Self {
        let apply = |x: f64, delta: f64| {
            if flags.contains(ShockFlags::PERCENTAGE) {
                x * (1.0 + delta / 100.0)
            } else {
                x + delta
            }
        };

        let kind = if flags.contains(ShockFlags::FLIP_TYPE) {
            self.kind.flipped()
        } else {
            self.kind
        };

        VanillaOption {
            s: apply(self.s, shocks.s),
            k: apply(self.k, shocks.k),
            t: apply(self.t, shocks.t),
            sigma: apply(self.sigma, shocks.sigma),
            r: apply(self.r, shocks.r),
            q: apply(self.q, shocks.q),
            kind,
        }
    }

    pub fn shock_in_place(&mut self, shocks: &Shocks, flags: ShockFlags) {
        *self = self.shocked(shocks, flags);
    }

    /// Terminal payoff for each price in `prices`.
    pub fn payoff_at(&self, prices: &[f64]) -> Array1<f64> {
        intrinsic(self.kind, self.k, prices)
    }

    /// Terminal payoff over the default grid, 100 points on `[0, 2K]`.
    pub fn payoff(&self) -> Array1<f64> {
        self.payoff_over(PayoffGrid::default().prices(self.k))
    }

    /// Terminal payoff over a custom grid, checked with [`PayoffGrid::validate`].
    pub fn payoff_on(&self, grid: &PayoffGrid) -> PricingResult<Array1<f64>> {
        grid.validate()?;
        Ok(self.payoff_over(grid.prices(self.k)))
    }

    fn payoff_over(&self, prices: Array1<f64>) -> Array1<f64> {
        prices.mapv_into(|p| intrinsic_value(self.kind, self.k, p))
    }
}

impl fmt::Display for VanillaOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            OptionType::Call => writeln!(f, "Call Option")?,
            OptionType::Put => writeln!(f, "Put Option")?,
        }
        writeln!(f, "=================================")?;
        writeln!(f, "Underlying Price = {}", self.s)?;
        writeln!(f, "Underlying Volatility = {}%", 100.0 * self.sigma)?;
        writeln!(f, "Strike Price = {}", self.k)?;
        writeln!(f, "Time to Maturity = {} years", self.t)?;
        write!(f, "Interest Rate = {}%", 100.0 * self.r)?;
        if self.q != 0.0 {
            write!(f, "\nDividend Yield = {}%", 100.0 * self.q)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atm_call() -> VanillaOption {
        VanillaOption::new(100.0, 100.0, 1.0, 0.2, 0.05)
    }

    #[test]
    fn test_param_names_round_trip() {
        for param in OptionParam::ALL {
            assert_eq!(param.name().parse::<OptionParam>().unwrap(), param);
        }
        assert_eq!(
            "vol".parse::<OptionParam>(),
            Err(PricingError::InvalidField {
                name: "vol".to_string()
            })
        );
        // Field names are case sensitive
        assert!("s".parse::<OptionParam>().is_err());
    }

    #[test]
    fn test_try_new_rejects_out_of_domain() {
        assert!(VanillaOption::try_new(100.0, 100.0, 1.0, 0.2, 0.05, 0.0, OptionType::Call).is_ok());
        assert!(VanillaOption::try_new(0.0, 100.0, 1.0, 0.2, 0.05, 0.0, OptionType::Call).is_err());
        assert!(VanillaOption::try_new(100.0, -5.0, 1.0, 0.2, 0.05, 0.0, OptionType::Put).is_err());
        assert!(VanillaOption::try_new(100.0, 100.0, -1.0, 0.2, 0.05, 0.0, OptionType::Call).is_err());
        assert!(VanillaOption::try_new(100.0, 100.0, 1.0, -0.2, 0.05, 0.0, OptionType::Call).is_err());
        assert!(VanillaOption::try_new(100.0, 100.0, 1.0, 0.2, f64::NAN, 0.0, OptionType::Call).is_err());
        // Negative rates are legitimate
        assert!(VanillaOption::try_new(100.0, 100.0, 1.0, 0.2, -0.01, 0.0, OptionType::Call).is_ok());
    }

    #[test]
    fn test_equality_is_exact() {
        let a = atm_call();
        assert_eq!(a, atm_call());
        assert_ne!(a, a.put());
        assert_ne!(a, a.with_parameter(OptionParam::Spot, 100.0 + 1e-12));
        assert_ne!(a, a.with_dividend(0.01));
    }

    #[test]
    fn test_with_parameter_leaves_receiver_untouched() {
        let original = atm_call();
        let moved = original.with_parameter(OptionParam::Volatility, 0.35);
        assert_eq!(moved.sigma, 0.35);
        assert_eq!(original.sigma, 0.2);
        assert_eq!(moved.with_parameter(OptionParam::Volatility, 0.2), original);
    }

    #[test]
    fn test_set_parameter_writes_through() {
        let mut option = atm_call();
        option.set_parameter(OptionParam::Expiry, 0.5);
        assert_eq!(option.t, 0.5);

        option.set_named_parameter("q", 0.03).unwrap();
        assert_eq!(option.q, 0.03);

        let err = option.set_named_parameter("rate", 0.1).unwrap_err();
        assert!(matches!(err, PricingError::InvalidField { .. }));
        assert_eq!(option.r, 0.05);
    }

    #[test]
    fn test_with_named_parameter() {
        let option = atm_call().with_named_parameter("K", 110.0).unwrap();
        assert_eq!(option.k, 110.0);
        assert!(atm_call().with_named_parameter("strike", 110.0).is_err());
    }

    #[test]
    fn test_flip() {
        let call = atm_call();
        let put = call.flipped();
        assert!(put.is_put());
        assert!(!call.is_put());
        assert_eq!(put.flipped(), call);

        let mut option = call;
        option.flip_in_place();
        assert_eq!(option, put);
    }

    #[test]
    fn test_additive_shock() {
        let shocks = Shocks {
            s: 5.0,
            sigma: 0.05,
            r: -0.01,
            ..Default::default()
        };
        let shocked = atm_call().shocked(&shocks, ShockFlags::NONE);
        assert_eq!(shocked.s, 105.0);
        assert_eq!(shocked.k, 100.0);
        assert!((shocked.sigma - 0.25).abs() < 1e-15);
        assert!((shocked.r - 0.04).abs() < 1e-15);
        assert_eq!(shocked.kind, OptionType::Call);
    }

    #[test]
    fn test_percentage_shock_and_flip() {
        let option = atm_call().with_dividend(0.0);
        let shocks = Shocks {
            s: 10.0,
            t: -50.0,
            q: 25.0,
            ..Default::default()
        };
        let shocked = option.shocked(&shocks, ShockFlags::PERCENTAGE | ShockFlags::FLIP_TYPE);
        assert!((shocked.s - 110.0).abs() < 1e-12);
        assert!((shocked.t - 0.5).abs() < 1e-15);
        // Zero fields do not move under a percentage shock
        assert_eq!(shocked.q, 0.0);
        assert!(shocked.is_put());
    }

    #[test]
    fn test_shock_in_place() {
        let mut option = atm_call();
        let expected = option.shocked(&Shocks::single(OptionParam::Strike, -10.0), ShockFlags::NONE);
        option.shock_in_place(&Shocks::single(OptionParam::Strike, -10.0), ShockFlags::NONE);
        assert_eq!(option, expected);
        assert_eq!(option.k, 90.0);
    }

    #[test]
    fn test_payoff_default_grid() {
        let payoff = atm_call().payoff();
        assert_eq!(payoff.len(), 100);
        assert_eq!(payoff[0], 0.0);
        assert!((payoff[99] - 100.0).abs() < 1e-9);

        let put_payoff = atm_call().put().payoff();
        assert!((put_payoff[0] - 100.0).abs() < 1e-12);
        assert!(put_payoff[99].abs() < 1e-9);
    }

    #[test]
    fn test_payoff_on_custom_grid() {
        let grid = PayoffGrid {
            points: 5,
            upper_multiple: 1.5,
        };
        let payoff = atm_call().payoff_on(&grid).unwrap();
        assert_eq!(payoff.to_vec(), vec![0.0, 0.0, 0.0, 12.5, 50.0]);

        let empty = PayoffGrid {
            points: 0,
            ..Default::default()
        };
        assert!(matches!(
            atm_call().payoff_on(&empty),
            Err(PricingError::InvalidConfiguration { .. })
        ));
        let reversed = PayoffGrid {
            upper_multiple: -2.0,
            ..Default::default()
        };
        assert!(atm_call().payoff_on(&reversed).is_err());
    }

    #[test]
    fn test_payoff_at_series() {
        let payoff = atm_call().put().payoff_at(&[90.0, 100.0, 130.0]);
        assert_eq!(payoff.to_vec(), vec![10.0, 0.0, 0.0]);
    }

    #[test]
    fn test_summary_display() {
        let text = atm_call().to_string();
        assert!(text.starts_with("Call Option"));
        assert!(text.contains("Strike Price = 100"));
        assert!(text.contains("Underlying Volatility = 20%"));
        assert!(!text.contains("Dividend"));

        let text = atm_call().put().with_dividend(0.02).to_string();
        assert!(text.starts_with("Put Option"));
        assert!(text.contains("Dividend Yield = 2%"));
    }
}
