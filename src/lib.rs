//! # levercalc
//! Leverage sizing and liquidation risk calculator.
//!
//! Seven scalar inputs (price, expected daily return, daily volatility,
//! funding rate, trading fee, capital and leverage) are turned into position
//! size, net return, Kelly leverage, liquidation price and a risk verdict in
//! a single closed-form pass.
//!
//! ```
//! use levercalc::{compute, LeverageInputs};
//!
//! let inputs = LeverageInputs::new(50_000.0, 0.005, 0.04, 0.0006, 0.001, 1_000.0, 5.0);
//! let analysis = compute(&inputs).unwrap();
//! assert_eq!(analysis.position_size, 5_000.0);
//! assert!(analysis.is_liquidation_risk());
//! ```

pub use crate::utils::error::{Error, Result};

pub mod cli;
pub mod config;
pub mod report;
pub mod risk;
pub mod utils;

pub use crate::risk::leverage::{
    compute, compute_with_policy, InputField, KellyPolicy, LeverageAnalysis, LeverageInputs,
};
pub use crate::risk::RiskVerdict;
