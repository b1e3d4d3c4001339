// src/error.rs
use thiserror::Error;

/// Error types for the vanilla-bs library
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    /// A parameter name outside `S`, `K`, `t`, `sigma`, `r`, `q`
    #[error("Invalid option field '{name}': expected one of S, K, t, sigma, r, q")]
    InvalidField { name: String },

    /// Invalid parameter values
    #[error("Invalid parameter '{parameter}' = {value}: {constraint}")]
    InvalidParameters {
        parameter: String,
        value: f64,
        constraint: String,
    },

    /// Options and shares supplied with different lengths
    #[error("Portfolio needs one share per option: got {options} options and {shares} shares")]
    LengthMismatch { options: usize, shares: usize },

    /// Invalid configuration
    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfiguration { field: String, reason: String },
}

/// Result type alias for vanilla-bs operations
pub type PricingResult<T> = Result<T, PricingError>;

/// Validation utilities
pub mod validation {
    use super::{PricingError, PricingResult};

    /// Validate that a parameter is positive
    pub fn validate_positive(name: &str, value: f64) -> PricingResult<()> {
        if value > 0.0 && value.is_finite() {
            Ok(())
        } else {
            Err(PricingError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be positive (> 0)".to_string(),
            })
        }
    }

    /// Validate that a parameter is non-negative
    pub fn validate_non_negative(name: &str, value: f64) -> PricingResult<()> {
        if value >= 0.0 && value.is_finite() {
            Ok(())
        } else {
            Err(PricingError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be non-negative (≥ 0)".to_string(),
            })
        }
    }

    /// Validate that a value is finite and not NaN
    pub fn validate_finite(name: &str, value: f64) -> PricingResult<()> {
        if !value.is_finite() {
            Err(PricingError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be finite (not NaN or infinite)".to_string(),
            })
        } else {
            Ok(())
        }
    }
}
