// src/analytics/greeks.rs
//! Closed-form Black-Scholes Greeks up to third order
//!
//! All formulas share the [`BsTerms`] of the option (d₁, d₂, e^(-qt),
//! e^(-rt)). Theta and Color are derivatives with respect to calendar time
//! (minus the derivative in t); Charm is the derivative of Delta in time to
//! expiry t. Vega, Rho and Phi are per unit (not per 1%) move of σ, r and q.
//!
//! | Greek | Call                              | Put                                 |
//! |-------|-----------------------------------|-------------------------------------|
//! | Delta | e^(-qt) Φ(d₁)                      | e^(-qt) (Φ(d₁) - 1)                  |
//! | Gamma | e^(-qt) φ(d₁) / (S σ√t)            | same                                |
//! | Vega  | φ(d₁) S √t e^(-qt)                 | same                                |
//! | Rho   | K t e^(-rt) Φ(d₂)                  | K t e^(-rt) (Φ(d₂) - 1)              |
//! | Phi   | -t S e^(-qt) Φ(d₁)                 | t S e^(-qt) Φ(-d₁)                   |
//!
//! When σ√t is zero the limits are used: Φ(d₁) and Φ(d₂) become 1, ½ or 0
//! by the sign of the log-moneyness, φ(d₁) becomes 0 and every Greek that
//! carries φ(d₁) is reported as 0.
//!
//! Exactly at the forward (log-moneyness 0) that last rule is a convention,
//! not a limit: Gamma, Speed, Color and the φ part of Charm blow up as σ√t
//! shrinks, yet are still reported as 0 so that the record stays finite.
//! Negative σ or t, and NaN inputs, give NaN Greeks.

use crate::analytics::aggregate::{aggregate, Position};
use crate::analytics::bs_analytic::BsTerms;
use crate::instruments::option::{OptionType, VanillaOption};
use crate::math_utils::{norm_cdf, norm_pdf};
use std::collections::BTreeMap;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Greek {
    Delta,
    Gamma,
    Theta,
    Vega,
    Rho,
    Speed,
    Vanna,
    Volga,
    Charm,
    Color,
    Zomma,
    Phi,
}

impl Greek {
    pub const ALL: [Greek; 12] = [
        Greek::Delta,
        Greek::Gamma,
        Greek::Theta,
        Greek::Vega,
        Greek::Rho,
        Greek::Speed,
        Greek::Vanna,
        Greek::Volga,
        Greek::Charm,
        Greek::Color,
        Greek::Zomma,
        Greek::Phi,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Greek::Delta => "Delta",
            Greek::Gamma => "Gamma",
            Greek::Theta => "Theta",
            Greek::Vega => "Vega",
            Greek::Rho => "Rho",
            Greek::Speed => "Speed",
            Greek::Vanna => "Vanna",
            Greek::Volga => "Volga",
            Greek::Charm => "Charm",
            Greek::Color => "Color",
            Greek::Zomma => "Zomma",
            Greek::Phi => "Phi",
        }
    }
}

impl fmt::Display for Greek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The twelve sensitivities of an option or position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Greeks {
    pub delta: f64,
    pub gamma: f64,
    pub theta: f64,
    pub vega: f64,
    pub rho: f64,
    pub speed: f64,
    pub vanna: f64,
    pub volga: f64,
    pub charm: f64,
    pub color: f64,
    pub zomma: f64,
    pub phi: f64,
}

impl Greeks {
    pub fn get(&self, greek: Greek) -> f64 {
        match greek {
            Greek::Delta => self.delta,
            Greek::Gamma => self.gamma,
            Greek::Theta => self.theta,
            Greek::Vega => self.vega,
            Greek::Rho => self.rho,
            Greek::Speed => self.speed,
            Greek::Vanna => self.vanna,
            Greek::Volga => self.volga,
            Greek::Charm => self.charm,
            Greek::Color => self.color,
            Greek::Zomma => self.zomma,
            Greek::Phi => self.phi,
        }
    }

    /// (Greek, value) pairs in the order Delta, Gamma, Theta, Vega, Rho,
    /// Speed, Vanna, Volga, Charm, Color, Zomma, Phi.
    pub fn iter(&self) -> impl Iterator<Item = (Greek, f64)> + '_ {
        Greek::ALL.into_iter().map(move |greek| (greek, self.get(greek)))
    }

    /// Name-keyed view, e.g. `"Delta" -> 0.6368`.
    pub fn to_map(&self) -> BTreeMap<&'static str, f64> {
        self.iter().map(|(greek, value)| (greek.name(), value)).collect()
    }

    pub fn is_finite(&self) -> bool {
        self.iter().all(|(_, value)| value.is_finite())
    }

    fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Greeks {
            delta: f(self.delta),
            gamma: f(self.gamma),
            theta: f(self.theta),
            vega: f(self.vega),
            rho: f(self.rho),
            speed: f(self.speed),
            vanna: f(self.vanna),
            volga: f(self.volga),
            charm: f(self.charm),
            color: f(self.color),
            zomma: f(self.zomma),
            phi: f(self.phi),
        }
    }
}

impl Add for Greeks {
    type Output = Greeks;

    fn add(self, other: Greeks) -> Greeks {
        Greeks {
            delta: self.delta + other.delta,
            gamma: self.gamma + other.gamma,
            theta: self.theta + other.theta,
            vega: self.vega + other.vega,
            rho: self.rho + other.rho,
            speed: self.speed + other.speed,
            vanna: self.vanna + other.vanna,
            volga: self.volga + other.volga,
            charm: self.charm + other.charm,
            color: self.color + other.color,
            zomma: self.zomma + other.zomma,
            phi: self.phi + other.phi,
        }
    }
}

impl Mul<f64> for Greeks {
    type Output = Greeks;

    fn mul(self, factor: f64) -> Greeks {
        self.map(|value| value * factor)
    }
}

impl Sum for Greeks {
    fn sum<I: Iterator<Item = Greeks>>(iter: I) -> Greeks {
        iter.fold(Greeks::default(), Add::add)
    }
}

impl fmt::Display for Greeks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (greek, value)) in self.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{:<6} = {:>14.6}", greek.name(), value)?;
        }
        Ok(())
    }
}

fn delta(option: &VanillaOption, b: &BsTerms) -> f64 {
    match option.kind {
        OptionType::Call => b.div_adj * norm_cdf(b.d1),
        OptionType::Put => b.div_adj * (norm_cdf(b.d1) - 1.0),
    }
}

fn gamma(option: &VanillaOption, b: &BsTerms) -> f64 {
    b.div_adj * norm_pdf(b.d1) / (option.s * b.vol_adj)
}

fn vega(option: &VanillaOption, b: &BsTerms) -> f64 {
    norm_pdf(b.d1) * option.s * option.t.sqrt() * b.div_adj
}

fn theta(option: &VanillaOption, b: &BsTerms) -> f64 {
    let stock_part = -b.div_adj * option.s * norm_pdf(b.d1) * option.sigma / (2.0 * option.t.sqrt());
    let div_part = option.q * option.s * b.div_adj;
    let cash_part = option.r * option.k * b.discount;
    match option.kind {
        OptionType::Call => stock_part + norm_cdf(b.d1) * div_part - norm_cdf(b.d2) * cash_part,
        OptionType::Put => stock_part - norm_cdf(-b.d1) * div_part + norm_cdf(-b.d2) * cash_part,
    }
}

fn rho(option: &VanillaOption, b: &BsTerms) -> f64 {
    let fac = option.k * option.t * b.discount;
    match option.kind {
        OptionType::Call => fac * norm_cdf(b.d2),
        OptionType::Put => fac * (norm_cdf(b.d2) - 1.0),
    }
}

fn speed(option: &VanillaOption, b: &BsTerms) -> f64 {
    -gamma(option, b) * (1.0 + b.d1 / b.vol_adj) / option.s
}

fn vanna(option: &VanillaOption, b: &BsTerms) -> f64 {
    -b.div_adj * b.d2 * norm_pdf(b.d1) / option.sigma
}

fn volga(option: &VanillaOption, b: &BsTerms) -> f64 {
    b.div_adj * b.d1 * b.d2 * norm_pdf(b.d1) * option.s * option.t.sqrt() / option.sigma
}

fn charm(option: &VanillaOption, b: &BsTerms) -> f64 {
    let psi = norm_pdf(b.d1)
        * (-b.d2 / (2.0 * option.t) + (option.r - option.q) / b.vol_adj);
    match option.kind {
        OptionType::Call => b.div_adj * (-option.q * norm_cdf(b.d1) + psi),
        OptionType::Put => b.div_adj * (option.q * norm_cdf(-b.d1) + psi),
    }
}

fn color(option: &VanillaOption, b: &BsTerms) -> f64 {
    let time_part = (1.0 - b.d1 * b.d2) / (2.0 * option.t);
    let drift_part = b.d1 * (option.r - option.q) / b.vol_adj;
    gamma(option, b) * (option.q + time_part + drift_part)
}

fn zomma(option: &VanillaOption, b: &BsTerms) -> f64 {
    gamma(option, b) * (b.d1 * b.d2 - 1.0) / option.sigma
}

fn phi(option: &VanillaOption, b: &BsTerms) -> f64 {
    let fac = option.t * option.s * b.div_adj;
    match option.kind {
        OptionType::Call => -fac * norm_cdf(b.d1),
        OptionType::Put => fac * norm_cdf(-b.d1),
    }
}

/// Limits as σ√t → 0. The first-order terms keep their Φ factors, which
/// [`BsTerms`] has already pushed to 0, ½ or 1; everything multiplied by
/// φ(d₁) vanishes.
fn degenerate_greeks(option: &VanillaOption, b: &BsTerms) -> Greeks {
    let (in_d1, in_d2) = (norm_cdf(b.d1), norm_cdf(b.d2));
    let (out_d1, out_d2) = (norm_cdf(-b.d1), norm_cdf(-b.d2));
    let div_part = option.q * option.s * b.div_adj;
    let cash_part = option.r * option.k * b.discount;
    let rho_fac = option.k * option.t * b.discount;
    let phi_fac = option.t * option.s * b.div_adj;

    let (delta, theta, rho, charm, phi) = match option.kind {
        OptionType::Call => (
            b.div_adj * in_d1,
            in_d1 * div_part - in_d2 * cash_part,
            rho_fac * in_d2,
            -b.div_adj * option.q * in_d1,
            -phi_fac * in_d1,
        ),
        OptionType::Put => (
            -b.div_adj * out_d1,
            -out_d1 * div_part + out_d2 * cash_part,
            -rho_fac * out_d2,
            b.div_adj * option.q * out_d1,
            phi_fac * out_d1,
        ),
    };

    Greeks {
        delta,
        theta,
        rho,
        charm,
        phi,
        ..Greeks::default()
    }
}

/// All twelve Greeks of a single option.
pub fn option_greeks(option: &VanillaOption) -> Greeks {
    let b = BsTerms::new(option);
    let greeks = if b.is_degenerate() {
        debug!(sigma = option.sigma, t = option.t, "zero volatility, using limiting Greeks");
        degenerate_greeks(option, &b)
    } else {
        Greeks {
            delta: delta(option, &b),
            gamma: gamma(option, &b),
            theta: theta(option, &b),
            vega: vega(option, &b),
            rho: rho(option, &b),
            speed: speed(option, &b),
            vanna: vanna(option, &b),
            volga: volga(option, &b),
            charm: charm(option, &b),
            color: color(option, &b),
            zomma: zomma(option, &b),
            phi: phi(option, &b),
        }
    };

    if !greeks.is_finite() {
        warn!(?option, "non-finite Greeks");
    }
    greeks
}

/// A single Greek of a single option.
pub fn option_greek(option: &VanillaOption, greek: Greek) -> f64 {
    let b = BsTerms::new(option);
    if b.is_degenerate() {
        return degenerate_greeks(option, &b).get(greek);
    }
    let formula: fn(&VanillaOption, &BsTerms) -> f64 = match greek {
        Greek::Delta => delta,
        Greek::Gamma => gamma,
        Greek::Theta => theta,
        Greek::Vega => vega,
        Greek::Rho => rho,
        Greek::Speed => speed,
        Greek::Vanna => vanna,
        Greek::Volga => volga,
        Greek::Charm => charm,
        Greek::Color => color,
        Greek::Zomma => zomma,
        Greek::Phi => phi,
    };
    formula(option, &b)
}

/// Greeks of an option or portfolio; portfolios sum share-weighted Greeks.
pub fn greeks<P: Position>(position: &P) -> Greeks {
    aggregate(position, option_greeks)
}

/// One Greek of an option or portfolio.
pub fn greek<P: Position>(position: &P, which: Greek) -> f64 {
    aggregate(position, |option| option_greek(option, which))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruments::portfolio::Portfolio;
    use approx::assert_relative_eq;

    fn atm_call() -> VanillaOption {
        VanillaOption::new(100.0, 100.0, 1.0, 0.2, 0.05)
    }

    #[test]
    fn test_atm_call_reference_greeks() {
        let g = option_greeks(&atm_call());
        assert_relative_eq!(g.delta, 0.6368306511756191, max_relative = 1e-10);
        assert_relative_eq!(g.gamma, 0.018762017345846895, max_relative = 1e-10);
        assert_relative_eq!(g.theta, -6.414027546438197, max_relative = 1e-10);
        assert_relative_eq!(g.vega, 37.52403469169379, max_relative = 1e-10);
        assert_relative_eq!(g.rho, 53.232481545376345, max_relative = 1e-10);
        assert_relative_eq!(g.speed, -0.0005159554770107896, max_relative = 1e-9);
        assert_relative_eq!(g.vanna, -0.28143026018770345, max_relative = 1e-10);
        assert_relative_eq!(g.volga, 9.85005910656962, max_relative = 1e-10);
        assert_relative_eq!(g.charm, 0.06566706071046413, max_relative = 1e-9);
        assert_relative_eq!(g.color, 0.01053018223535657, max_relative = 1e-9);
        assert_relative_eq!(g.zomma, -0.08888505717594967, max_relative = 1e-10);
        assert_relative_eq!(g.phi, -63.68306511756191, max_relative = 1e-10);
    }

    #[test]
    fn test_put_reference_greeks() {
        let g = option_greeks(&atm_call().put());
        assert_relative_eq!(g.delta, -0.3631693488243809, max_relative = 1e-10);
        assert_relative_eq!(g.theta, -1.657880423934626, max_relative = 1e-10);
        assert_relative_eq!(g.rho, -41.89046090469506, max_relative = 1e-10);
        assert_relative_eq!(g.phi, 36.31693488243809, max_relative = 1e-10);
        assert_relative_eq!(g.charm, 0.06566706071046413, max_relative = 1e-9);
    }

    #[test]
    fn test_single_greek_matches_full_set() {
        let option = VanillaOption::new(105.0, 95.0, 0.5, 0.3, 0.03).with_dividend(0.02).put();
        let all = option_greeks(&option);
        for greek in Greek::ALL {
            assert_eq!(option_greek(&option, greek), all.get(greek), "{}", greek);
        }
    }

    #[test]
    fn test_map_has_exact_keys() {
        let map = option_greeks(&atm_call()).to_map();
        let keys: Vec<_> = map.keys().copied().collect();
        let mut expected = vec![
            "Delta", "Gamma", "Theta", "Vega", "Rho", "Speed", "Vanna", "Volga", "Charm", "Color",
            "Zomma", "Phi",
        ];
        expected.sort();
        assert_eq!(keys, expected);
    }

    #[test]
    fn test_iter_is_canonical_order() {
        let names: Vec<_> = Greeks::default().iter().map(|(g, _)| g.name()).collect();
        assert_eq!(names[0], "Delta");
        assert_eq!(names[2], "Theta");
        assert_eq!(names[11], "Phi");
    }

    #[test]
    fn test_zero_volatility_limits() {
        // Forward is above the strike: the call is surely exercised
        let option = VanillaOption::new(100.0, 90.0, 1.0, 0.0, 0.05).with_dividend(0.01);
        let g = option_greeks(&option);
        let div_adj = (-0.01f64).exp();
        let discount = (-0.05f64).exp();
        assert_relative_eq!(g.delta, div_adj, max_relative = 1e-15);
        assert_relative_eq!(g.rho, 90.0 * discount, max_relative = 1e-15);
        assert_relative_eq!(
            g.theta,
            0.01 * 100.0 * div_adj - 0.05 * 90.0 * discount,
            max_relative = 1e-14
        );
        assert_eq!(g.gamma, 0.0);
        assert_eq!(g.vega, 0.0);
        assert_eq!(g.speed, 0.0);
        assert_eq!(g.zomma, 0.0);
        assert!(g.is_finite());

        let put = option_greeks(&option.put());
        assert_eq!(put.delta, 0.0);
        assert_eq!(put.rho, 0.0);
        assert!(put.is_finite());
    }

    #[test]
    fn test_expired_option_has_finite_greeks() {
        let itm = VanillaOption::new(110.0, 100.0, 0.0, 0.2, 0.05);
        let g = option_greeks(&itm);
        assert_eq!(g.delta, 1.0);
        assert_eq!(g.gamma, 0.0);
        assert_eq!(g.rho, 0.0);
        assert_eq!(g.phi, 0.0);
        assert_eq!(option_greeks(&itm.put()).delta, 0.0);
    }

    #[test]
    fn test_at_the_forward_convention() {
        // r = q = 0 and S = K puts the forward exactly on the strike
        let option = VanillaOption::new(100.0, 100.0, 1.0, 0.0, 0.0);
        let g = option_greeks(&option);
        assert_eq!(g.delta, 0.5);
        assert_eq!(g.gamma, 0.0);
        assert_eq!(g.speed, 0.0);
        assert_eq!(g.color, 0.0);
        assert_eq!(g.charm, 0.0);
        assert!(g.is_finite());

        // A tiny but positive σ shows the true, diverging Gamma
        let near = option.with_parameter(crate::OptionParam::Volatility, 1e-6);
        assert!(option_greek(&near, Greek::Gamma) > 1000.0);
    }

    #[test]
    fn test_negative_volatility_and_nan_give_nan_greeks() {
        let negative = atm_call().with_parameter(crate::OptionParam::Volatility, -0.2);
        let g = option_greeks(&negative);
        assert!(g.delta.is_nan());
        assert!(g.gamma.is_nan());
        assert!(g.vega.is_nan());

        let nan_spot = VanillaOption::new(f64::NAN, 100.0, 0.0, 0.2, 0.05);
        assert!(option_greeks(&nan_spot).delta.is_nan());
        assert!(option_greek(&nan_spot, Greek::Delta).is_nan());
    }

    #[test]
    fn test_portfolio_greeks_are_share_weighted() {
        let call = atm_call();
        let put = atm_call().put();
        let portfolio = Portfolio::new(vec![call, put], vec![1.0, 1.0]).unwrap();
        let straddle = greeks(&portfolio);
        let (gc, gp) = (option_greeks(&call), option_greeks(&put));
        assert_relative_eq!(straddle.delta, gc.delta + gp.delta, max_relative = 1e-12);
        assert_relative_eq!(straddle.gamma, 2.0 * gc.gamma, max_relative = 1e-12);
        assert_relative_eq!(greek(&portfolio, Greek::Vega), 2.0 * gc.vega, max_relative = 1e-12);

        let short = portfolio.negate();
        assert_relative_eq!(greeks(&short).vega, -straddle.vega, max_relative = 1e-12);
    }

    #[test]
    fn test_display_lists_every_greek() {
        let text = option_greeks(&atm_call()).to_string();
        assert_eq!(text.lines().count(), 12);
        assert!(text.starts_with("Delta"));
        assert!(text.contains("Zomma"));
    }
}
