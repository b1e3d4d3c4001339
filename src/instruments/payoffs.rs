// src/instruments/payoffs.rs
//! Terminal payoff profiles for European vanilla options
//!
//! ## European Options
//! - **Call**: max(S_T - K, 0) - right to buy at strike K
//! - **Put**: max(K - S_T, 0) - right to sell at strike K
//!
//! Payoffs are evaluated elementwise over a series of hypothetical terminal
//! prices. When the caller gives no series, a [`PayoffGrid`] spans
//! `[0, upper_multiple * K]`.

use crate::error::{validation::*, PricingError, PricingResult};
use crate::instruments::option::OptionType;
use ndarray::Array1;

/// Grid of hypothetical terminal prices used when no price series is supplied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayoffGrid {
    pub points: usize,
    pub upper_multiple: f64, // Grid ends at upper_multiple * reference strike
}

impl PayoffGrid {
    /// Validate the grid configuration
    pub fn validate(&self) -> PricingResult<()> {
        if self.points == 0 {
            return Err(PricingError::InvalidConfiguration {
                field: "points".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        validate_positive("upper_multiple", self.upper_multiple)?;
        Ok(())
    }

    /// Equally spaced prices from 0 to `upper_multiple * reference_strike`, inclusive.
    pub fn prices(&self, reference_strike: f64) -> Array1<f64> {
        Array1::linspace(0.0, self.upper_multiple * reference_strike, self.points)
    }
}

impl Default for PayoffGrid {
    fn default() -> Self {
        PayoffGrid {
            points: 100,
            upper_multiple: 2.0,
        }
    }
}

/// Intrinsic value at a single terminal price. NaN inputs give NaN.
pub fn intrinsic_value(kind: OptionType, k: f64, price: f64) -> f64 {
    let diff = match kind {
        OptionType::Call => price - k,
        OptionType::Put => k - price,
    };
    // f64::max drops NaN
    if diff.is_nan() {
        diff
    } else {
        diff.max(0.0)
    }
}

/// Intrinsic value of one option for every terminal price in `prices`.
pub fn intrinsic(kind: OptionType, k: f64, prices: &[f64]) -> Array1<f64> {
    prices
        .iter()
        .map(|&p| intrinsic_value(kind, k, p))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grid_spans_twice_the_strike() {
        let grid = PayoffGrid::default();
        let prices = grid.prices(50.0);
        assert_eq!(prices.len(), 100);
        assert_eq!(prices[0], 0.0);
        assert!((prices[99] - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_grid_validation() {
        assert!(PayoffGrid::default().validate().is_ok());

        let empty = PayoffGrid {
            points: 0,
            ..Default::default()
        };
        assert!(matches!(
            empty.validate(),
            Err(PricingError::InvalidConfiguration { .. })
        ));

        let negative = PayoffGrid {
            upper_multiple: -1.0,
            ..Default::default()
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_intrinsic_call_and_put() {
        let prices = [80.0, 100.0, 120.0];
        let call = intrinsic(OptionType::Call, 100.0, &prices);
        let put = intrinsic(OptionType::Put, 100.0, &prices);
        assert_eq!(call.to_vec(), vec![0.0, 0.0, 20.0]);
        assert_eq!(put.to_vec(), vec![20.0, 0.0, 0.0]);
    }

    #[test]
    fn test_intrinsic_keeps_nan() {
        assert!(intrinsic_value(OptionType::Call, 100.0, f64::NAN).is_nan());
        assert!(intrinsic_value(OptionType::Put, f64::NAN, 90.0).is_nan());

        let payoff = intrinsic(OptionType::Call, 100.0, &[f64::NAN, 120.0]);
        assert!(payoff[0].is_nan());
        assert_eq!(payoff[1], 20.0);
    }
}
