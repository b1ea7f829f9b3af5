//! Risk assessment for leveraged positions.
//! The verdict is a pure function of values the calculator already derived,
//! so it can be reused by any front end without extra state.

use serde::{Deserialize, Serialize};

pub mod lambda_curve;
pub mod leverage;

/// Outcome of the liquidation check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RiskVerdict {
    /// A one-volatility adverse move leaves margin intact.
    Manageable,
    /// A one-volatility adverse move consumes the whole capital.
    LiquidationRisk {
        /// Size of the adverse move as a percentage (volatility × 100)
        adverse_move_pct: f64,
        /// Kelly leverage to fall back to; `None` when undefined
        suggested_leverage: Option<f64>,
    },
}

impl RiskVerdict {
    pub fn is_warning(&self) -> bool {
        matches!(self, RiskVerdict::LiquidationRisk { .. })
    }
}

/// Flag liquidation risk when the loss from an adverse move of one daily
/// volatility reaches the posted capital.
///
/// Liquidation happens at 100% margin consumption, so a loss equal to the
/// capital already counts.
pub fn assess_liquidation_risk(
    adverse_move_loss: f64, capital: f64, volatility: f64, kelly_leverage: Option<f64>,
) -> RiskVerdict {
    if adverse_move_loss >= capital {
        RiskVerdict::LiquidationRisk {
            adverse_move_pct: volatility * 100.0,
            suggested_leverage: kelly_leverage,
        }
    } else {
        RiskVerdict::Manageable
    }
}
