//! Report rendering.
//!
//! Text output follows a fixed line order; every currency and ratio field is
//! printed in fixed point with `ReportConfig::decimals` places and every rate
//! as a percentage (value × 100).

use crate::config::ReportConfig;
use crate::risk::lambda_curve::LambdaCurve;
use crate::risk::leverage::LeverageAnalysis;
use crate::risk::RiskVerdict;
use crate::utils::error::Result;
use crate::utils::fs::ensure_dir;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

fn fixed(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, value)
}

fn percent(ratio: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, ratio * 100.0)
}

fn kelly_text(kelly: Option<f64>, decimals: usize) -> String {
    match kelly {
        | Some(k) => format!("{}x", fixed(k, decimals)),
        | None => "undefined (zero volatility)".to_string(),
    }
}

/// Everything above the verdict, one metric per line, newline terminated.
pub fn render_body(analysis: &LeverageAnalysis, cfg: &ReportConfig) -> String {
    let d = cfg.decimals;
    let sym = cfg.asset_symbol.as_str();
    let inputs = &analysis.inputs;
    let mu_pct = percent(inputs.mu, d);
    let vol_pct = percent(inputs.volatility, d);

    let lines = [
        format!("=== {sym} Leverage Trading Analysis ==="),
        format!("{sym} Price: ${}", fixed(inputs.price, d)),
        format!("Expected Daily Return (mu): {mu_pct}%"),
        format!("Daily Volatility: {vol_pct}%"),
        format!(
            "Position Size: ${} ({} {sym})",
            fixed(analysis.position_size, d),
            fixed(analysis.asset_amount, d)
        ),
        format!("Net Daily Return (mp): {}%", percent(analysis.net_return, d)),
        format!("Optimal Risk Level (lambda): {}", fixed(analysis.lambda, d)),
        format!("Kelly Criterion Leverage: {}", kelly_text(analysis.kelly_leverage, d)),
        format!("Net Profit for {mu_pct}% {sym} Move: ${}", fixed(analysis.net_profit, d)),
        format!(
            "Liquidation Price: ~${} ({}% drop)",
            fixed(analysis.liquidation_price, d),
            percent(analysis.liquidation_drop_ratio, d)
        ),
        format!(
            "Loss from {vol_pct}% Adverse Move: ${} ({}% of capital)",
            fixed(analysis.adverse_move_loss, d),
            percent(analysis.adverse_loss_ratio, d)
        ),
    ];

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// The closing warning or all-clear message, without a trailing newline.
pub fn render_verdict(analysis: &LeverageAnalysis, cfg: &ReportConfig) -> String {
    let d = cfg.decimals;
    match analysis.verdict {
        | RiskVerdict::LiquidationRisk { adverse_move_pct, suggested_leverage } => {
            let advice = match suggested_leverage {
                | Some(k) => format!("Consider lowering leverage to ~{}x.", fixed(k, d)),
                | None => "Consider lowering leverage (Kelly leverage is undefined at zero \
                           volatility)."
                    .to_string(),
            };
            format!(
                "WARNING: A {}% adverse move risks liquidation!\n{advice}",
                fixed(adverse_move_pct, d)
            )
        }
        | RiskVerdict::Manageable => "Risk level is manageable with current leverage.".to_string(),
    }
}

/// Body, a blank line, then the verdict.
pub fn render_report(analysis: &LeverageAnalysis, cfg: &ReportConfig) -> String {
    format!("{}\n{}\n", render_body(analysis, cfg), render_verdict(analysis, cfg))
}

pub fn render_json(analysis: &LeverageAnalysis) -> Result<String> {
    Ok(serde_json::to_string_pretty(analysis)?)
}

pub fn render_curves_json(curves: &[LambdaCurve]) -> Result<String> {
    Ok(serde_json::to_string_pretty(curves)?)
}

fn quantity_label(quantity: f64) -> String {
    format!("Q={quantity}")
}

/// Side-by-side λ table, one column per curve. Curves must share a grid.
pub fn render_curve_table(curves: &[LambdaCurve]) -> String {
    let mut out = String::from("=== Lambda vs. Leverage ===\n");
    for curve in curves {
        out.push_str(&format!(
            "Marginal Utility ({}): {:.6}\n",
            quantity_label(curve.params.quantity),
            curve.marginal_utility
        ));
    }
    out.push('\n');

    out.push_str(&format!("{:>10}", "Leverage"));
    for curve in curves {
        out.push_str(&format!("{:>18}", format!("λ ({})", quantity_label(curve.params.quantity))));
    }
    out.push('\n');

    let rows = curves.first().map(|c| c.points.len()).unwrap_or(0);
    for row in 0..rows {
        out.push_str(&format!("{:>10.4}", curves[0].points[row].leverage));
        for curve in curves {
            let cell = match curve.points.get(row).and_then(|p| p.lambda) {
                | Some(lambda) => format!("{lambda:.6e}"),
                | None => "undefined".to_string(),
            };
            out.push_str(&format!("{cell:>18}"));
        }
        out.push('\n');
    }
    out
}

#[derive(Debug, Serialize)]
struct CurveRow {
    quantity: f64,
    leverage: f64,
    lambda: Option<f64>,
    marginal_utility: f64,
}

/// Long-format CSV: one row per (quantity, leverage) point. Undefined λ is an empty cell.
pub fn write_curve_csv_to<W: Write>(writer: W, curves: &[LambdaCurve]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().has_headers(true).from_writer(writer);
    for curve in curves {
        for point in &curve.points {
            wtr.serialize(CurveRow {
                quantity: curve.params.quantity,
                leverage: point.leverage,
                lambda: point.lambda,
                marginal_utility: curve.marginal_utility,
            })?;
        }
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_curve_csv(path: &Path, curves: &[LambdaCurve]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_dir(parent)?;
        }
    }
    let file = std::fs::File::create(path)?;
    write_curve_csv_to(file, curves)
}
