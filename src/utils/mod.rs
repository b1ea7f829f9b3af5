//! Utility functions and types for the calculator.

pub mod error;
pub mod fs;
pub mod logging;

pub use error::{Error, Result};
pub use logging::init_logging;
