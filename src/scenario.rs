// src/scenario.rs
//! One-parameter scenario sweeps
//!
//! A sweep revalues a position once per value of a single parameter, every
//! other parameter held fixed:
//! ```text
//! result_i = target(position with param = values_i)
//! ```
//! The position itself is never modified.

use crate::analytics::aggregate::Position;
use crate::error::PricingResult;
use crate::instruments::option::OptionParam;
use tracing::debug;

/// Sweep a parameter addressed by name (`S`, `K`, `t`, `sigma`, `r` or `q`).
///
/// # Errors
///
/// `PricingError::InvalidField` when `parameter` names no option field,
/// even if `values` is empty.
///
/// # Example
/// ```rust
/// use vanilla_bs::{price, sweep, VanillaOption};
///
/// let call = VanillaOption::new(100.0, 100.0, 1.0, 0.2, 0.05);
/// let prices = sweep(&call, "S", &[90.0, 100.0, 110.0], price).unwrap();
/// assert_eq!(prices.len(), 3);
/// assert!(prices[0] < prices[1] && prices[1] < prices[2]);
/// ```
pub fn sweep<P, T, F>(position: &P, parameter: &str, values: &[f64], target: F) -> PricingResult<Vec<T>>
where
    P: Position,
    F: Fn(&P) -> T,
{
    let param: OptionParam = parameter.parse()?;
    Ok(sweep_parameter(position, param, values, target))
}

/// Sweep a parameter addressed by [`OptionParam`].
pub fn sweep_parameter<P, T, F>(position: &P, param: OptionParam, values: &[f64], target: F) -> Vec<T>
where
    P: Position,
    F: Fn(&P) -> T,
{
    debug!(%param, points = values.len(), "running scenario sweep");
    values
        .iter()
        .map(|&value| target(&position.with_parameter(param, value)))
        .collect()
}
