//! Configuration template generation

use crate::config::Config;
use crate::utils::error::Result;
use crate::utils::fs;
use std::path::Path;

/// Generate a default configuration file at the specified path
pub fn generate_config_template<P: AsRef<Path>>(path: P) -> Result<()> {
    Config::default().save(path)
}

/// Generate a configuration file with comments explaining each field
pub fn generate_commented_config_template<P: AsRef<Path>>(path: P) -> Result<()> {
    let toml_str = r#"# levercalc Configuration
# This is a template configuration file with all available options.
# Uncomment and modify the values as needed.

version = "0.1.0"

[inputs]
# Defaults for the calculator inputs. Any value set here is used when the
# matching --flag is omitted or the prompt is answered with a blank line.
# All rates are decimal fractions (0.005 = 0.5%).
# price = 50000.0        # asset price in USD
# mu = 0.005             # expected daily return
# volatility = 0.04      # daily volatility
# funding_rate = 0.0006  # daily funding rate
# trading_fee = 0.001    # fee per trade
# capital = 1000.0       # trading capital in USD
# leverage = 5.0         # leverage multiplier

[report]
# Asset ticker shown in the report header and prompts
asset_symbol = "BTC"

# Decimal places for prices, amounts and percentages (0-10)
decimals = 2

# Highlight the risk verdict when writing to a terminal
color = true

[risk]
# Zero volatility makes Kelly leverage undefined.
#   "flag"   - report it as undefined and continue
#   "reject" - abort with an error
zero_volatility = "flag"

[sweep]
# Lambda curve: lambda(L) = 1 / (Q * (P1 * L - P0))
# One curve is produced per quantity (Q)
quantities = [1.0, 5.0]

# Current price (P1) and purchase price (P0)
current_price = 100000.0
entry_price = 80000.0

# Additional wealth outside the position (V), used for marginal utility
wealth = 10000.0

# Leverage grid, endpoints included
min_leverage = 1.0
max_leverage = 5.0
points = 100
"#;

    fs::write_file(path, toml_str)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_generate_config_template() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("levercalc.toml");

        generate_commented_config_template(&config_path).unwrap();
        assert!(config_path.exists());

        let content = std::fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("levercalc Configuration"));
        assert!(content.contains("zero_volatility"));

        // The commented template must parse back to the defaults
        let parsed = Config::from_file(&config_path).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_generate_config_template_with_nonexistent_dir() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config").join("levercalc.toml");

        generate_config_template(&config_path).unwrap();
        assert!(config_path.exists());
    }
}
