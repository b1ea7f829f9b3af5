//! Configuration module for the leverage calculator

mod template;

use crate::risk::lambda_curve::LambdaCurveParams;
use crate::risk::leverage::{InputField, KellyPolicy, LeverageInputs};
use crate::utils::error::{Error, Result};
use crate::utils::fs;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

pub use template::{generate_commented_config_template, generate_config_template};

/// File name looked up in the working directory by [`Config::load`].
pub const LOCAL_CONFIG_FILE: &str = "levercalc.toml";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Configuration file version
    pub version: String,

    /// Optional defaults for the seven calculator inputs
    #[serde(default)]
    pub inputs: InputDefaults,

    /// Report rendering
    #[serde(default)]
    pub report: ReportConfig,

    /// Risk handling
    #[serde(default)]
    pub risk: RiskConfig,

    /// Lambda curve sweep defaults
    #[serde(default)]
    pub sweep: SweepConfig,
}

/// Per-field fallbacks used when an input is not given on the command line
/// or is left blank at the prompt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputDefaults {
    pub price: Option<f64>,
    pub mu: Option<f64>,
    pub volatility: Option<f64>,
    pub funding_rate: Option<f64>,
    pub trading_fee: Option<f64>,
    pub capital: Option<f64>,
    pub leverage: Option<f64>,
}

impl InputDefaults {
    pub fn get(&self, field: InputField) -> Option<f64> {
        match field {
            | InputField::Price => self.price,
            | InputField::Mu => self.mu,
            | InputField::Volatility => self.volatility,
            | InputField::FundingRate => self.funding_rate,
            | InputField::TradingFee => self.trading_fee,
            | InputField::Capital => self.capital,
            | InputField::Leverage => self.leverage,
        }
    }

    pub fn set(&mut self, field: InputField, value: Option<f64>) {
        let slot = match field {
            | InputField::Price => &mut self.price,
            | InputField::Mu => &mut self.mu,
            | InputField::Volatility => &mut self.volatility,
            | InputField::FundingRate => &mut self.funding_rate,
            | InputField::TradingFee => &mut self.trading_fee,
            | InputField::Capital => &mut self.capital,
            | InputField::Leverage => &mut self.leverage,
        };
        *slot = value;
    }

    /// Overlay `overrides` on top of these defaults.
    pub fn merged_with(&self, overrides: &InputDefaults) -> InputDefaults {
        let mut merged = self.clone();
        for field in InputField::ALL {
            if let Some(value) = overrides.get(field) {
                merged.set(field, Some(value));
            }
        }
        merged
    }

    /// Build a complete input set; fails on the first field with no value.
    pub fn resolve(&self) -> Result<LeverageInputs> {
        let value = |field: InputField| {
            self.get(field)
                .ok_or_else(|| Error::invalid_input(field, "no value provided"))
        };
        Ok(LeverageInputs {
            price: value(InputField::Price)?,
            mu: value(InputField::Mu)?,
            volatility: value(InputField::Volatility)?,
            funding_rate: value(InputField::FundingRate)?,
            trading_fee: value(InputField::TradingFee)?,
            capital: value(InputField::Capital)?,
            leverage: value(InputField::Leverage)?,
        })
    }
}

/// Report rendering configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Asset ticker shown in the header and prompts
    pub asset_symbol: String,
    /// Decimal places for currency, ratio and percentage fields
    pub decimals: usize,
    /// Highlight the verdict when writing to a terminal
    pub color: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { asset_symbol: "BTC".to_string(), decimals: 2, color: true }
    }
}

/// Risk handling configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    /// What to do with zero volatility: `flag` (Kelly undefined) or `reject`
    #[serde(default)]
    pub zero_volatility: KellyPolicy,
}

/// Lambda curve defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Quantities to compare, one curve each
    pub quantities: Vec<f64>,
    pub current_price: f64,
    pub entry_price: f64,
    pub wealth: f64,
    pub min_leverage: f64,
    pub max_leverage: f64,
    pub points: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        let base = LambdaCurveParams::default();
        Self {
            quantities: vec![1.0, 5.0],
            current_price: base.current_price,
            entry_price: base.entry_price,
            wealth: base.wealth,
            min_leverage: base.min_leverage,
            max_leverage: base.max_leverage,
            points: base.points,
        }
    }
}

impl SweepConfig {
    /// Curve parameters for the first configured quantity.
    pub fn base_params(&self) -> LambdaCurveParams {
        LambdaCurveParams {
            quantity: self.quantities.first().copied().unwrap_or(1.0),
            current_price: self.current_price,
            entry_price: self.entry_price,
            wealth: self.wealth,
            min_leverage: self.min_leverage,
            max_leverage: self.max_leverage,
            points: self.points,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            inputs: InputDefaults::default(),
            report: ReportConfig::default(),
            risk: RiskConfig::default(),
            sweep: SweepConfig::default(),
        }
    }
}

impl Config {
    /// Serialize default config to TOML string
    pub fn default_toml() -> Result<String> {
        Ok(toml::to_string_pretty(&Self::default())?)
    }

    /// Load configuration from a specific file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_file(&path).map_err(|e| {
            Error::ConfigError(format!("Failed to read config file {:?}: {:#}", path.as_ref(), e))
        })?;
        let mut cfg: Self = toml::from_str(&content)
            .map_err(|e| Error::ConfigError(format!("Failed to parse config file: {}", e)))?;
        cfg.merge_env()?;
        Ok(cfg)
    }

    /// Save the configuration to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {}", e)))?;
        fs::write_file(path, content).map_err(|e| {
            Error::ConfigError(format!("Failed to write config file {:?}: {:#}", path, e))
        })?;
        Ok(())
    }

    /// Validate the configuration for required fields and reasonable values
    pub fn validate(&self) -> Result<()> {
        if self.version.trim().is_empty() {
            return Err(Error::ConfigError(
                "Config version must be set (e.g., '0.1.0')".to_string(),
            ));
        }
        if self.report.asset_symbol.trim().is_empty() {
            return Err(Error::ConfigError("report.asset_symbol must be set".to_string()));
        }
        if self.report.decimals > 10 {
            return Err(Error::ConfigError("report.decimals cannot exceed 10".to_string()));
        }
        for field in InputField::ALL {
            if let Some(value) = self.inputs.get(field) {
                if !value.is_finite() {
                    return Err(Error::ConfigError(format!(
                        "inputs.{} must be a finite number",
                        field
                    )));
                }
            }
        }
        if self.sweep.quantities.is_empty() {
            return Err(Error::ConfigError("sweep.quantities must not be empty".to_string()));
        }
        let base = self.sweep.base_params();
        for &quantity in &self.sweep.quantities {
            LambdaCurveParams { quantity, ..base.clone() }
                .validate()
                .map_err(|e| Error::ConfigError(format!("Invalid sweep settings: {}", e)))?;
        }
        Ok(())
    }

    /// Path of the per-user config file (`<config_dir>/levercalc/config.toml`)
    pub fn user_config_path() -> Option<PathBuf> {
        fs::config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        // Try to load from current directory
        if Path::new(LOCAL_CONFIG_FILE).exists() {
            return Self::from_file(LOCAL_CONFIG_FILE);
        }

        // Try to load from user config directory
        if let Some(path) = Self::user_config_path() {
            if path.exists() {
                return Self::from_file(path);
            }
        }

        // Return default config if no config file found
        let mut config = Self::default();
        config.merge_env()?;
        Ok(config)
    }

    /// Load from an explicit path when given, otherwise from default locations
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            | Some(path) => Self::from_file(path)?,
            | None => Self::load()?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Merge environment variables into the configuration
    pub fn merge_env(&mut self) -> Result<()> {
        if let Ok(symbol) = env::var("LEVERCALC_ASSET") {
            self.report.asset_symbol = symbol;
        }

        if let Ok(decimals) = env::var("LEVERCALC_DECIMALS") {
            self.report.decimals = decimals.trim().parse().map_err(|_| {
                Error::ConfigError(format!("LEVERCALC_DECIMALS is not an integer: {decimals:?}"))
            })?;
        }

        for field in InputField::ALL {
            let key = format!("LEVERCALC_{}", field.name().to_uppercase());
            if let Ok(raw) = env::var(&key) {
                let value: f64 = raw.trim().parse().map_err(|_| {
                    Error::ConfigError(format!("{key} is not a number: {raw:?}"))
                })?;
                self.inputs.set(field, Some(value));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.report.asset_symbol, "BTC");
        assert_eq!(config.report.decimals, 2);
        assert_eq!(config.risk.zero_volatility, KellyPolicy::Flag);
        assert_eq!(config.sweep.quantities, vec![1.0, 5.0]);
        assert!(config.inputs.price.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("levercalc.toml");

        let mut config = Config::default();
        config.report.asset_symbol = "ETH".to_string();
        config.inputs.price = Some(3_000.0);
        config.risk.zero_volatility = KellyPolicy::Reject;

        config.save(&config_path).unwrap();

        let loaded_config = Config::from_file(&config_path).unwrap();
        assert_eq!(loaded_config.report.asset_symbol, "ETH");
        assert_eq!(loaded_config.inputs.price, Some(3_000.0));
        assert_eq!(loaded_config.inputs.mu, None);
        assert_eq!(loaded_config.risk.zero_volatility, KellyPolicy::Reject);
    }

    #[test]
    fn test_partial_file_uses_section_defaults() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("levercalc.toml");
        std::fs::write(&config_path, "version = \"0.1.0\"\n\n[inputs]\ncapital = 2500.0\n")
            .unwrap();

        let config = Config::from_file(&config_path).unwrap();
        assert_eq!(config.inputs.capital, Some(2_500.0));
        assert_eq!(config.report, ReportConfig::default());
        assert_eq!(config.sweep, SweepConfig::default());
    }

    #[test]
    fn test_merge_env() {
        temp_env::with_vars(
            vec![
                ("LEVERCALC_ASSET", Some("SOL")),
                ("LEVERCALC_PRICE", Some("150.5")),
                ("LEVERCALC_LEVERAGE", Some("3")),
            ],
            || {
                let mut config = Config::default();
                config.merge_env().unwrap();

                assert_eq!(config.report.asset_symbol, "SOL");
                assert_eq!(config.inputs.price, Some(150.5));
                assert_eq!(config.inputs.leverage, Some(3.0));
            },
        );
    }

    #[test]
    fn test_merge_env_rejects_garbage() {
        temp_env::with_var("LEVERCALC_CAPITAL", Some("lots"), || {
            let mut config = Config::default();
            assert_matches!(config.merge_env(), Err(Error::ConfigError(_)));
        });
    }

    #[test]
    fn test_validate_rejects_bad_sweep() {
        let mut config = Config::default();
        config.sweep.min_leverage = 10.0;
        assert_matches!(config.validate(), Err(Error::ConfigError(_)));

        let mut config = Config::default();
        config.sweep.quantities.clear();
        assert_matches!(config.validate(), Err(Error::ConfigError(_)));
    }

    #[test]
    fn test_resolve_inputs() {
        let defaults = InputDefaults {
            price: Some(50_000.0),
            mu: Some(0.005),
            volatility: Some(0.04),
            funding_rate: Some(0.0006),
            trading_fee: Some(0.001),
            capital: Some(1_000.0),
            leverage: None,
        };
        assert_matches!(
            defaults.resolve(),
            Err(Error::InvalidInput { field: InputField::Leverage, .. })
        );

        let overrides = InputDefaults { leverage: Some(5.0), ..Default::default() };
        let inputs = defaults.merged_with(&overrides).resolve().unwrap();
        assert_eq!(inputs.leverage, 5.0);
        assert_eq!(inputs.price, 50_000.0);
    }
}
