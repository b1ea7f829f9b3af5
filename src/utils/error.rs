//! Error handling for the leverage calculator.

use crate::risk::leverage::InputField;
use thiserror::Error;

/// Main error type for the calculator
#[derive(Debug, Error)]
pub enum Error {
    /// A user-supplied input could not be parsed or failed a sanity check
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: InputField, reason: String },

    /// Inputs were accepted but a formula has no finite answer for them
    #[error("Degenerate input: {quantity} {reason}")]
    DegenerateInput { quantity: String, reason: String },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML deserialization errors
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),

    /// CSV export errors
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Invalid argument errors
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Other errors
    #[error("Error: {0}")]
    Other(String),
}

impl Error {
    pub fn invalid_input(field: InputField, reason: impl Into<String>) -> Self {
        Error::InvalidInput { field, reason: reason.into() }
    }

    pub fn degenerate(quantity: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::DegenerateInput { quantity: quantity.into(), reason: reason.into() }
    }

    /// The offending input field, if this error is tied to one.
    pub fn field(&self) -> Option<InputField> {
        match self {
            | Error::InvalidInput { field, .. } => Some(*field),
            | _ => None,
        }
    }
}

/// Result type for the calculator
pub type Result<T> = std::result::Result<T, Error>;

impl From<&str> for Error {
    fn from(err: &str) -> Self {
        Error::Other(err.to_string())
    }
}

impl From<String> for Error {
    fn from(err: String) -> Self {
        Error::Other(err)
    }
}

// Allow automatic conversion from anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(format!("{err:#}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let config_error = Error::ConfigError("missing field".to_string());
        assert_eq!(config_error.to_string(), "Configuration error: missing field");

        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let wrapped_io_error = Error::from(io_error);
        assert!(wrapped_io_error.to_string().contains("I/O error"));

        let str_error = Error::from("custom error");
        assert_eq!(str_error.to_string(), "Error: custom error");
    }

    #[test]
    fn test_invalid_input_names_field() {
        let err = Error::invalid_input(InputField::Price, "must be greater than 0");
        assert_eq!(err.to_string(), "Invalid input for price: must be greater than 0");
        assert_eq!(err.field(), Some(InputField::Price));
    }

    #[test]
    fn test_degenerate_display() {
        let err = Error::degenerate("kelly_leverage", "is undefined when volatility is 0");
        assert_eq!(
            err.to_string(),
            "Degenerate input: kelly_leverage is undefined when volatility is 0"
        );
        assert_eq!(err.field(), None);
    }
}
