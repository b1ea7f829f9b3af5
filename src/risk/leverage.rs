//! Leverage sizing calculator.
//!
//! Converts seven scalar inputs (price, expected return, volatility, funding,
//! fee, capital, leverage) into position size, net return, Kelly leverage and
//! liquidation figures in one closed-form pass.

use crate::risk::{assess_liquidation_risk, RiskVerdict};
use crate::utils::error::{Error, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one of the seven calculator inputs.
///
/// Variants are declared in prompt order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputField {
    Price,
    Mu,
    Volatility,
    FundingRate,
    TradingFee,
    Capital,
    Leverage,
}

impl InputField {
    pub const ALL: [InputField; 7] = [
        InputField::Price,
        InputField::Mu,
        InputField::Volatility,
        InputField::FundingRate,
        InputField::TradingFee,
        InputField::Capital,
        InputField::Leverage,
    ];

    /// Field name as used in config keys, CLI flags and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            | InputField::Price => "price",
            | InputField::Mu => "mu",
            | InputField::Volatility => "volatility",
            | InputField::FundingRate => "funding_rate",
            | InputField::TradingFee => "trading_fee",
            | InputField::Capital => "capital",
            | InputField::Leverage => "leverage",
        }
    }

    /// Interactive prompt text. `symbol` is the asset ticker (e.g. "BTC").
    pub fn prompt(&self, symbol: &str) -> String {
        match self {
            | InputField::Price => format!("Enter current {symbol} price (USD): "),
            | InputField::Mu => {
                "Enter expected daily return (mu, as decimal, e.g., 0.005 for 0.5%): ".to_string()
            }
            | InputField::Volatility => {
                "Enter daily volatility (as decimal, e.g., 0.04 for 4%): ".to_string()
            }
            | InputField::FundingRate => {
                "Enter daily funding rate (as decimal, e.g., 0.0006 for 0.06%): ".to_string()
            }
            | InputField::TradingFee => {
                "Enter trading fee per trade (as decimal, e.g., 0.001 for 0.1%): ".to_string()
            }
            | InputField::Capital => "Enter trading capital (USD): ".to_string(),
            | InputField::Leverage => "Enter desired leverage (e.g., 5 for 5x): ".to_string(),
        }
    }
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a zero volatility input is treated when computing Kelly leverage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KellyPolicy {
    /// Report Kelly leverage as undefined and carry on.
    #[default]
    Flag,
    /// Abort with `Error::DegenerateInput`.
    Reject,
}

/// The seven scalar inputs of one calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeverageInputs {
    /// Asset price in USD per unit
    pub price: f64,
    /// Expected daily return (decimal fraction)
    pub mu: f64,
    /// Daily volatility (decimal fraction)
    pub volatility: f64,
    /// Daily funding rate (decimal fraction)
    pub funding_rate: f64,
    /// Trading fee per trade (decimal fraction)
    pub trading_fee: f64,
    /// Trading capital in USD
    pub capital: f64,
    /// Chosen leverage multiplier
    pub leverage: f64,
}

impl LeverageInputs {
    pub fn new(
        price: f64, mu: f64, volatility: f64, funding_rate: f64, trading_fee: f64, capital: f64,
        leverage: f64,
    ) -> Self {
        Self { price, mu, volatility, funding_rate, trading_fee, capital, leverage }
    }

    pub fn get(&self, field: InputField) -> f64 {
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

    /// Check finiteness and the sanity bounds (price, capital and leverage
    /// strictly positive, volatility non-negative).
    pub fn validate(&self) -> Result<()> {
        for field in InputField::ALL {
            if !self.get(field).is_finite() {
                return Err(Error::invalid_input(field, "must be a finite number"));
            }
        }
        for field in [InputField::Price, InputField::Capital, InputField::Leverage] {
            let value = self.get(field);
            if value <= 0.0 {
                return Err(Error::invalid_input(
                    field,
                    format!("must be greater than 0 (got {value})"),
                ));
            }
        }
        if self.volatility < 0.0 {
            return Err(Error::invalid_input(
                InputField::Volatility,
                format!("must not be negative (got {})", self.volatility),
            ));
        }
        if self.trading_fee < 0.0 {
            warn!("trading_fee is negative ({}); treating it as a rebate", self.trading_fee);
        }
        Ok(())
    }
}

/// Full result of one calculation: echoed inputs plus every derived value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeverageAnalysis {
    pub inputs: LeverageInputs,
    /// `mu * leverage`
    pub gross_return: f64,
    /// Net return before clamping; may be negative
    pub raw_net_return: f64,
    /// Net daily return (mp), clamped at zero
    pub net_return: f64,
    /// True when a negative net return was reported as zero
    pub net_return_clamped: bool,
    /// `net_return / mu`, or 0 when mu is 0
    pub lambda: f64,
    /// `(mu - funding_rate) / volatility²`; `None` when volatility is 0
    pub kelly_leverage: Option<f64>,
    pub position_size: f64,
    pub asset_amount: f64,
    /// Distance from the current price to the full-loss price
    pub liquidation_price_drop: f64,
    pub liquidation_price: f64,
    /// `liquidation_price_drop / price`
    pub liquidation_drop_ratio: f64,
    /// Loss from a one-volatility adverse move
    pub adverse_move_loss: f64,
    /// `adverse_move_loss / capital`
    pub adverse_loss_ratio: f64,
    pub net_profit: f64,
    pub verdict: RiskVerdict,
}

impl LeverageAnalysis {
    pub fn is_liquidation_risk(&self) -> bool {
        self.verdict.is_warning()
    }
}

/// Run the calculation with the default Kelly policy (flag zero volatility).
pub fn compute(inputs: &LeverageInputs) -> Result<LeverageAnalysis> {
    compute_with_policy(inputs, KellyPolicy::Flag)
}

pub fn compute_with_policy(inputs: &LeverageInputs, policy: KellyPolicy) -> Result<LeverageAnalysis> {
    inputs.validate()?;
    let LeverageInputs { price, mu, volatility, funding_rate, trading_fee, capital, leverage } =
        *inputs;

    let gross_return = mu * leverage;
    let raw_net_return = gross_return - trading_fee - funding_rate;
    let net_return_clamped = raw_net_return < 0.0;
    let net_return = if net_return_clamped { 0.0 } else { raw_net_return };
    if net_return_clamped {
        warn!(
            "net return {:.4}% is negative after fees and funding; reporting 0",
            raw_net_return * 100.0
        );
    }

    let lambda = if mu != 0.0 { net_return / mu } else { 0.0 };

    let kelly_leverage = if volatility == 0.0 {
        match policy {
            | KellyPolicy::Flag => {
                warn!("volatility is 0; Kelly leverage is undefined");
                None
            }
            | KellyPolicy::Reject => {
                return Err(Error::degenerate(
                    "kelly_leverage",
                    "is undefined when volatility is 0",
                ));
            }
        }
    } else {
        Some((mu - funding_rate) / (volatility * volatility))
    };

    let position_size = capital * leverage;
    let asset_amount = position_size / price;
    let liquidation_price_drop = (capital / position_size) * price;
    let adverse_move_loss = volatility * price * asset_amount * leverage;
    let net_profit = net_return * capital;
    let liquidation_price = price - liquidation_price_drop;
    let liquidation_drop_ratio = liquidation_price_drop / price;
    let adverse_loss_ratio = adverse_move_loss / capital;

    let derived = [
        ("gross_return", gross_return),
        ("net_return", raw_net_return),
        ("lambda", lambda),
        ("kelly_leverage", kelly_leverage.unwrap_or(0.0)),
        ("position_size", position_size),
        ("asset_amount", asset_amount),
        ("liquidation_price_drop", liquidation_price_drop),
        ("adverse_move_loss", adverse_move_loss),
        ("net_profit", net_profit),
        ("liquidation_price", liquidation_price),
        ("liquidation_drop_ratio", liquidation_drop_ratio),
        ("adverse_loss_ratio", adverse_loss_ratio),
    ];
    if let Some((name, value)) = derived.iter().find(|(_, v)| !v.is_finite()) {
        return Err(Error::degenerate(*name, format!("is not finite ({value})")));
    }

    let verdict = assess_liquidation_risk(adverse_move_loss, capital, volatility, kelly_leverage);
    debug!(
        "computed leverage analysis: position={position_size} kelly={kelly_leverage:?} \
         adverse_loss={adverse_move_loss} verdict={verdict:?}"
    );

    Ok(LeverageAnalysis {
        inputs: *inputs,
        gross_return,
        raw_net_return,
        net_return,
        net_return_clamped,
        lambda,
        kelly_leverage,
        position_size,
        asset_amount,
        liquidation_price_drop,
        liquidation_price,
        liquidation_drop_ratio,
        adverse_move_loss,
        adverse_loss_ratio,
        net_profit,
        verdict,
    })
}
