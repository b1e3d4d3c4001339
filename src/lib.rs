//! # vanilla-bs: Closed-Form Black-Scholes Risk for Option Portfolios
//!
//! A Rust library for pricing European vanilla options and portfolios of
//! them under the Black-Scholes model, decomposing their risk into twelve
//! analytic Greeks and revaluing them across parameter scenarios.
//!
//! ## Key Features
//!
//! - **Value-type instruments**: `VanillaOption` and `Portfolio` with exact
//!   equality and pure/in-place transformation pairs
//! - **Portfolio algebra**: combine, negate, subtract and scale, merging equal options
//! - **Complete Greeks**: Delta through Phi, first to third order, in closed form
//! - **Scenario sweeps**: revalue any position across a range of one parameter
//! - **Degenerate inputs**: expiry and zero volatility price at their limits
//!   instead of dividing by zero
//!
//! ## Quick Start
//!
//! ```rust
//! use vanilla_bs::{greeks, price, Portfolio, VanillaOption};
//!
//! // At-the-money one-year call, 20% vol, 5% rate
//! let call = VanillaOption::new(100.0, 100.0, 1.0, 0.2, 0.05);
//! assert!((price(&call) - 10.4506).abs() < 1e-4);
//!
//! // Long straddle: one call plus one put
//! let straddle = Portfolio::from_options([call, call.put()]);
//! let risk = greeks(&straddle);
//! assert!(risk.gamma > 0.0);
//! println!("{}", risk);
//! ```
//!
//! ## Logging
//!
//! The library emits `tracing` events (sweeps at `debug`, every priced
//! option at `trace`, non-finite results at `warn`) and never installs a
//! subscriber.

// Module declarations
pub mod analytics;
pub mod error;
pub mod instruments;
pub mod math_utils;
pub mod scenario;

// Re-export commonly used types for convenience
pub use analytics::{greek, greeks, price, Greek, Greeks, Position};
pub use error::{PricingError, PricingResult};
pub use instruments::{
    Holding, Operand, OptionParam, OptionType, PayoffGrid, Portfolio, ShockFlags, Shocks,
    VanillaOption,
};
pub use scenario::{sweep, sweep_parameter};
