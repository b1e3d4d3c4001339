//! Closed-form valuation and risk
pub mod aggregate;
pub mod bs_analytic;
pub mod greeks;

pub use aggregate::{aggregate, Position};
pub use bs_analytic::{option_price, price, BsTerms};
pub use greeks::{greek, greeks, option_greek, option_greeks, Greek, Greeks};
