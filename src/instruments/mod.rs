//! Option and portfolio data model
pub mod option;
pub mod payoffs;
pub mod portfolio;

pub use option::{OptionParam, OptionType, ShockFlags, Shocks, VanillaOption};
pub use payoffs::PayoffGrid;
pub use portfolio::{Holding, Operand, Portfolio};
