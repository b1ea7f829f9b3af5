//! Lambda-vs-leverage curve.
//!
//! For a holding of `quantity` units bought at `entry_price` and now worth
//! `current_price`, the risk multiplier at leverage `L` is
//! `λ(L) = 1 / (Q * (P1 * L - P0))` and the marginal utility of the holding
//! given extra wealth `V` is `MU = P1 / (P1 * Q + V)`.

use crate::utils::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Parameters for one curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LambdaCurveParams {
    /// Q: units held
    pub quantity: f64,
    /// P1: current price
    pub current_price: f64,
    /// P0: purchase price
    pub entry_price: f64,
    /// V: additional wealth outside the position
    pub wealth: f64,
    pub min_leverage: f64,
    pub max_leverage: f64,
    /// Number of grid points, endpoints included
    pub points: usize,
}

impl Default for LambdaCurveParams {
    fn default() -> Self {
        Self {
            quantity: 1.0,
            current_price: 100_000.0,
            entry_price: 80_000.0,
            wealth: 10_000.0,
            min_leverage: 1.0,
            max_leverage: 5.0,
            points: 100,
        }
    }
}

impl LambdaCurveParams {
    pub fn validate(&self) -> Result<()> {
        let values = [
            ("quantity", self.quantity),
            ("current_price", self.current_price),
            ("entry_price", self.entry_price),
            ("wealth", self.wealth),
            ("min_leverage", self.min_leverage),
            ("max_leverage", self.max_leverage),
        ];
        if let Some((name, value)) = values.iter().find(|(_, v)| !v.is_finite()) {
            return Err(Error::InvalidArgument(format!("{name} must be finite (got {value})")));
        }
        if self.points == 0 {
            return Err(Error::InvalidArgument("points must be at least 1".to_string()));
        }
        if self.min_leverage > self.max_leverage {
            return Err(Error::InvalidArgument(format!(
                "min_leverage ({}) must not exceed max_leverage ({})",
                self.min_leverage, self.max_leverage
            )));
        }
        Ok(())
    }

    /// λ at a single leverage; `None` where `P1 * L == P0`.
    pub fn lambda_at(&self, leverage: f64) -> Option<f64> {
        let denominator = self.quantity * (self.current_price * leverage - self.entry_price);
        if denominator == 0.0 {
            None
        } else {
            Some(1.0 / denominator)
        }
    }

    pub fn marginal_utility(&self) -> Result<f64> {
        let denominator = self.current_price * self.quantity + self.wealth;
        if denominator == 0.0 {
            return Err(Error::degenerate(
                "marginal_utility",
                "is undefined when current_price * quantity + wealth is 0",
            ));
        }
        Ok(self.current_price / denominator)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LambdaPoint {
    pub leverage: f64,
    pub lambda: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LambdaCurve {
    pub params: LambdaCurveParams,
    pub marginal_utility: f64,
    pub points: Vec<LambdaPoint>,
}

/// `n` evenly spaced values from `start` to `end`, both included.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        | 0 => Vec::new(),
        | 1 => vec![start],
        | _ => {
            let step = (end - start) / (n - 1) as f64;
            let mut values: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            values[n - 1] = end;
            values
        }
    }
}

pub fn compute_curve(params: &LambdaCurveParams) -> Result<LambdaCurve> {
    params.validate()?;
    let marginal_utility = params.marginal_utility()?;
    let points = linspace(params.min_leverage, params.max_leverage, params.points)
        .into_iter()
        .map(|leverage| LambdaPoint { leverage, lambda: params.lambda_at(leverage) })
        .collect();
    Ok(LambdaCurve { params: params.clone(), marginal_utility, points })
}

/// One curve per quantity, sharing every other parameter with `base`.
pub fn compute_curves(base: &LambdaCurveParams, quantities: &[f64]) -> Result<Vec<LambdaCurve>> {
    if quantities.is_empty() {
        return Err(Error::InvalidArgument("at least one quantity is required".to_string()));
    }
    quantities
        .iter()
        .map(|&quantity| compute_curve(&LambdaCurveParams { quantity, ..base.clone() }))
        .collect()
}
