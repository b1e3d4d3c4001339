// src/analytics/bs_analytic.rs
//! Analytical Black-Scholes pricing for European options
//!
//! # Mathematical Foundation
//!
//! Under the Black-Scholes model with continuous dividend yield q, the
//! underlying follows:
//! ```text
//! dS_t = (r - q) S_t dt + σ S_t dW_t
//! ```
//!
//! The call price is
//! ```text
//! C = (F*Φ(d₁) - K*Φ(d₂)) * e^(-rt),    F = S*e^(-qt) / e^(-rt)
//! d₁ = [ln(S/K) + (r - q + σ²/2)t] / (σ√t)
//! d₂ = d₁ - σ√t
//! ```
//! and the put follows from put-call parity, `P = C - (F - K)*e^(-rt)`.
//!
//! # Degenerate volatility
//!
//! When σ√t is zero the diffusion term vanishes:
//! - `t == 0`: the price is the intrinsic payoff at S, exactly;
//! - `σ == 0, t > 0`: the terminal price is the forward with certainty and the
//!   price is the discounted forward intrinsic value.
//!
//! Negative t or σ, and NaN inputs, are not guarded; they come back as NaN.

use crate::analytics::aggregate::{aggregate, Position};
use crate::instruments::option::{OptionType, VanillaOption};
use crate::instruments::payoffs::intrinsic_value;
use crate::math_utils::norm_cdf;
use tracing::{debug, trace, warn};

/// Intermediate quantities shared by the price and every Greek.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BsTerms {
    pub d1: f64,
    pub d2: f64,
    pub vol_adj: f64,  // σ√t
    pub div_adj: f64,  // e^(-qt)
    pub discount: f64, // e^(-rt)
    pub forward: f64,  // S e^(-qt) / e^(-rt)
}

impl BsTerms {
    pub fn new(option: &VanillaOption) -> Self {
        // A negative σ has no meaning in the model; poison every term with it
        let vol_adj = if option.sigma < 0.0 {
            f64::NAN
        } else {
            option.sigma * option.t.sqrt()
        };
        let div_adj = (-option.q * option.t).exp();
        let discount = (-option.r * option.t).exp();
        let forward = option.s * div_adj / discount;

        let numerator = (option.s / option.k).ln()
            + (option.r - option.q + 0.5 * option.sigma * option.sigma) * option.t;

        let (d1, d2) = if vol_adj == 0.0 {
            // Limit of d₁, d₂ as σ√t → 0 taken by the sign of the log-moneyness
            let limit = if numerator > 0.0 {
                f64::INFINITY
            } else if numerator < 0.0 {
                f64::NEG_INFINITY
            } else if numerator == 0.0 {
                0.0
            } else {
                f64::NAN
            };
            (limit, limit)
        } else {
            let d1 = numerator / vol_adj;
            (d1, d1 - vol_adj)
        };

        BsTerms {
            d1,
            d2,
            vol_adj,
            div_adj,
            discount,
            forward,
        }
    }

    /// σ√t is zero: no diffusion left between now and expiry.
    pub fn is_degenerate(&self) -> bool {
        self.vol_adj == 0.0
    }
}

/// Black-Scholes fair value of a single option
///
/// # Returns
/// Present value of the option, or its intrinsic value at expiry
pub fn option_price(option: &VanillaOption) -> f64 {
    if option.t == 0.0 {
        return intrinsic_value(option.kind, option.k, option.s);
    }

    let terms = BsTerms::new(option);
    let price = if terms.is_degenerate() {
        debug!(sigma = option.sigma, t = option.t, "zero volatility, pricing off the forward");
        terms.discount * intrinsic_value(option.kind, option.k, terms.forward)
    } else {
        let stock_part = terms.forward * norm_cdf(terms.d1);
        let cash_part = option.k * norm_cdf(terms.d2);
        let call_price = (stock_part - cash_part) * terms.discount;
        match option.kind {
            OptionType::Call => call_price,
            OptionType::Put => call_price - (terms.forward - option.k) * terms.discount,
        }
    };

    trace!(s = option.s, k = option.k, t = option.t, price, "priced option");
    if !price.is_finite() {
        warn!(?option, price, "non-finite option price");
    }
    price
}

/// Fair value of an option or portfolio; portfolios sum share-weighted prices.
pub fn price<P: Position>(position: &P) -> f64 {
    aggregate(position, option_price)
}
