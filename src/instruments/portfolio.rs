// src/instruments/portfolio.rs
//! Weighted collections of vanilla options
//!
//! A [`Portfolio`] is an ordered list of (option, share) pairs. Shares are
//! signed: positive is long, negative is short. Two invariants hold after
//! every operation:
//!
//! - no holding carries a zero share;
//! - options are matched by value equality, so combining two portfolios that
//!   both hold an equal option sums the shares into a single holding.
//!
//! Each portfolio owns its option values outright. Combining or copying never
//! shares an option between two portfolios, so in-place mutation of one
//! cannot leak into another.

use crate::error::{PricingError, PricingResult};
use crate::instruments::option::{OptionParam, ShockFlags, Shocks, VanillaOption};
use crate::instruments::payoffs::PayoffGrid;
use ndarray::Array1;

/// One line of a portfolio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Holding {
    pub option: VanillaOption,
    pub share: f64,
}

/// Right-hand side of [`Portfolio::combine`].
///
/// A portfolio merges holdings; a scalar is added to every share.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Portfolio(Portfolio),
    Scalar(f64),
}

impl From<Portfolio> for Operand {
    fn from(portfolio: Portfolio) -> Self {
        Operand::Portfolio(portfolio)
    }
}

impl From<&Portfolio> for Operand {
    fn from(portfolio: &Portfolio) -> Self {
        Operand::Portfolio(portfolio.clone())
    }
}

impl From<f64> for Operand {
    fn from(value: f64) -> Self {
        Operand::Scalar(value)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Portfolio {
    holdings: Vec<Holding>,
}

impl Portfolio {
    /// Build a portfolio from parallel option and share lists.
    ///
    /// Holdings with a zero share are dropped.
    pub fn new(options: Vec<VanillaOption>, shares: Vec<f64>) -> PricingResult<Self> {
        if options.len() != shares.len() {
            return Err(PricingError::LengthMismatch {
                options: options.len(),
                shares: shares.len(),
            });
        }
        Ok(Self::from_holdings(options.into_iter().zip(shares)))
    }

    /// One share of each option.
    pub fn from_options(options: impl IntoIterator<Item = VanillaOption>) -> Self {
        Self::from_holdings(options.into_iter().map(|option| (option, 1.0)))
    }

    /// Build from (option, share) pairs, keeping their order.
    ///
    /// Pairs are taken as given: equal options listed twice stay as two
    /// holdings. Only [`combine`](Self::combine) merges.
    pub fn from_holdings(pairs: impl IntoIterator<Item = (VanillaOption, f64)>) -> Self {
        let holdings = pairs
            .into_iter()
            .filter(|&(_, share)| share != 0.0)
            .map(|(option, share)| Holding { option, share })
            .collect();
        Portfolio { holdings }
    }

    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Holding> {
        self.holdings.iter()
    }

    pub fn options(&self) -> Vec<VanillaOption> {
        self.holdings.iter().map(|h| h.option).collect()
    }

    pub fn shares(&self) -> Vec<f64> {
        self.holdings.iter().map(|h| h.share).collect()
    }

    fn drop_empty(&mut self) {
        self.holdings.retain(|h| h.share != 0.0);
    }

    /// Merge `other` into a copy of this portfolio.
    ///
    /// With a portfolio operand each incoming holding is added to the first
    /// existing holding with an equal option, or appended when none matches.
    /// With a scalar operand the scalar is added to every share.
    pub fn combine(&self, other: impl Into<Operand>) -> Self {
        let mut combined = self.clone();
        combined.combine_in_place(other);
        combined
    }

    pub fn combine_in_place(&mut self, other: impl Into<Operand>) {
        match other.into() {
            Operand::Portfolio(other) => {
                for incoming in other.holdings {
                    match self
                        .holdings
                        .iter()
                        .position(|existing| existing.option == incoming.option)
                    {
                        Some(i) => self.holdings[i].share += incoming.share,
                        None => self.holdings.push(incoming),
                    }
                }
            }
            Operand::Scalar(value) => {
                for holding in &mut self.holdings {
                    holding.share += value;
                }
            }
        }
        self.drop_empty();
    }

    /// The short of this portfolio: every share sign-flipped.
    pub fn negate(&self) -> Self {
        let mut negated = self.clone();
        negated.negate_in_place();
        negated
    }

    pub fn negate_in_place(&mut self) {
        for holding in &mut self.holdings {
            holding.share = -holding.share;
        }
    }

    /// `self.combine(other.negate())`; a scalar operand is subtracted from every share.
    pub fn subtract(&self, other: impl Into<Operand>) -> Self {
        let negated = match other.into() {
            Operand::Portfolio(other) => Operand::Portfolio(other.negate()),
            Operand::Scalar(value) => Operand::Scalar(-value),
        };
        self.combine(negated)
    }

    pub fn scale(&self, factor: f64) -> Self {
        let mut scaled = self.clone();
        scaled.scale_in_place(factor);
        scaled
    }

    pub fn scale_in_place(&mut self, factor: f64) {
        for holding in &mut self.holdings {
            holding.share *= factor;
        }
        self.drop_empty();
    }

    /// Apply [`VanillaOption::shocked`] to every option, keeping shares.
    pub fn shocked(&self, shocks: &Shocks, flags: ShockFlags) -> Self {
        Self::from_holdings(
            self.holdings
                .iter()
                .map(|h| (h.option.shocked(shocks, flags), h.share)),
        )
    }

    pub fn shock_in_place(&mut self, shocks: &Shocks, flags: ShockFlags) {
        for holding in &mut self.holdings {
            holding.option.shock_in_place(shocks, flags);
        }
    }

    /// Copy with one parameter of every option set to `value`.
    pub fn with_parameter(&self, param: OptionParam, value: f64) -> Self {
        Self::from_holdings(
            self.holdings
                .iter()
                .map(|h| (h.option.with_parameter(param, value), h.share)),
        )
    }

    pub fn set_parameter(&mut self, param: OptionParam, value: f64) {
        for holding in &mut self.holdings {
            holding.option.set_parameter(param, value);
        }
    }

    pub fn with_named_parameter(&self, name: &str, value: f64) -> PricingResult<Self> {
        Ok(self.with_parameter(name.parse()?, value))
    }

    pub fn set_named_parameter(&mut self, name: &str, value: f64) -> PricingResult<()> {
        self.set_parameter(name.parse()?, value);
        Ok(())
    }

    /// Share-weighted terminal payoff for each price in `prices`.
    pub fn payoff_at(&self, prices: &[f64]) -> Array1<f64> {
        self.holdings
            .iter()
            .fold(Array1::zeros(prices.len()), |acc, h| {
                acc + h.option.payoff_at(prices) * h.share
            })
    }

    /// Payoff over the default grid, 100 points on `[0, 2 * max strike]`.
    pub fn payoff(&self) -> Array1<f64> {
        self.payoff_over(PayoffGrid::default().prices(self.max_strike()))
    }

    /// Payoff over a custom grid anchored on the largest strike, checked with
    /// [`PayoffGrid::validate`].
    pub fn payoff_on(&self, grid: &PayoffGrid) -> PricingResult<Array1<f64>> {
        grid.validate()?;
        Ok(self.payoff_over(grid.prices(self.max_strike())))
    }

    // linspace output is contiguous, so the slice view always exists
    fn payoff_over(&self, prices: Array1<f64>) -> Array1<f64> {
        self.payoff_at(prices.as_slice().unwrap_or(&[]))
    }

    /// Largest strike held, 0 for an empty portfolio.
    pub fn max_strike(&self) -> f64 {
        self.holdings
            .iter()
            .map(|h| h.option.k)
            .fold(0.0, f64::max)
    }
}

impl From<VanillaOption> for Portfolio {
    fn from(option: VanillaOption) -> Self {
        Portfolio::from_options([option])
    }
}

impl FromIterator<VanillaOption> for Portfolio {
    fn from_iter<I: IntoIterator<Item = VanillaOption>>(iter: I) -> Self {
        Portfolio::from_options(iter)
    }
}

impl FromIterator<(VanillaOption, f64)> for Portfolio {
    fn from_iter<I: IntoIterator<Item = (VanillaOption, f64)>>(iter: I) -> Self {
        Portfolio::from_holdings(iter)
    }
}

impl<'a> IntoIterator for &'a Portfolio {
    type Item = &'a Holding;
    type IntoIter = std::slice::Iter<'a, Holding>;

    fn into_iter(self) -> Self::IntoIter {
        self.holdings.iter()
    }
}
