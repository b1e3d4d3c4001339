// src/analytics/aggregate.rs
//! Share-weighted aggregation of per-option results
//!
//! Any valuation that is defined for a single [`VanillaOption`] extends to a
//! position by summing `f(option_i) * share_i` over its legs. A single option
//! is a position with one leg of weight 1, so the same code path serves both.

use crate::instruments::option::{OptionParam, VanillaOption};
use crate::instruments::portfolio::Portfolio;
use std::iter::Sum;
use std::ops::Mul;

/// Something that can be valued leg by leg.
pub trait Position {
    /// Every constituent option with its signed weight.
    fn legs(&self) -> impl Iterator<Item = (&VanillaOption, f64)>;

    /// Copy of the position with one parameter of every option set to `value`.
    fn with_parameter(&self, param: OptionParam, value: f64) -> Self
    where
        Self: Sized;
}

impl Position for VanillaOption {
    fn legs(&self) -> impl Iterator<Item = (&VanillaOption, f64)> {
        std::iter::once((self, 1.0))
    }

    fn with_parameter(&self, param: OptionParam, value: f64) -> Self {
        VanillaOption::with_parameter(self, param, value)
    }
}

impl Position for Portfolio {
    fn legs(&self) -> impl Iterator<Item = (&VanillaOption, f64)> {
        self.iter().map(|h| (&h.option, h.share))
    }

    fn with_parameter(&self, param: OptionParam, value: f64) -> Self {
        Portfolio::with_parameter(self, param, value)
    }
}

/// Σ `per_option(option_i) * share_i` over the legs of `position`.
pub fn aggregate<P, T, F>(position: &P, per_option: F) -> T
where
    P: Position,
    T: Mul<f64, Output = T> + Sum<T>,
    F: Fn(&VanillaOption) -> T,
{
    position
        .legs()
        .map(|(option, share)| per_option(option) * share)
        .sum()
}
