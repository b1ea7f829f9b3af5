//! Interactive input adapter.
//!
//! Asks for the seven calculator inputs in order over any reader/writer pair,
//! so the same code drives a terminal session and the unit tests.

use std::io::{BufRead, Write};

use crate::config::InputDefaults;
use crate::risk::leverage::{InputField, LeverageInputs};
use crate::utils::error::{Error, Result};

/// Parse one answer. Blank answers fall back to `default`.
pub fn parse_answer(field: InputField, answer: &str, default: Option<f64>) -> Result<f64> {
    let trimmed = answer.trim();
    if trimmed.is_empty() {
        return default.ok_or_else(|| Error::invalid_input(field, "no value provided"));
    }
    trimmed
        .parse::<f64>()
        .map_err(|_| Error::invalid_input(field, format!("'{trimmed}' is not a number")))
}

fn ask<R: BufRead, W: Write>(
    reader: &mut R, writer: &mut W, field: InputField, symbol: &str, default: Option<f64>,
) -> Result<f64> {
    let prompt = field.prompt(symbol);
    match default {
        | Some(value) => write!(writer, "{} [{}] ", prompt.trim_end(), value)?,
        | None => write!(writer, "{prompt}")?,
    }
    writer.flush()?;

    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(Error::invalid_input(field, "input ended before a value was entered"));
    }
    let value = parse_answer(field, &line, default)?;
    log::debug!("read {field} = {value}");
    Ok(value)
}

/// Prompt for every input in order and return them unvalidated.
///
/// Stops at the first unreadable answer so nothing is computed from partial input.
pub fn read_inputs<R: BufRead, W: Write>(
    reader: &mut R, writer: &mut W, defaults: &InputDefaults, symbol: &str,
) -> Result<LeverageInputs> {
    let mut values = [0.0; 7];
    for (slot, field) in values.iter_mut().zip(InputField::ALL) {
        *slot = ask(reader, writer, field, symbol, defaults.get(field))?;
    }
    let [price, mu, volatility, funding_rate, trading_fee, capital, leverage] = values;
    Ok(LeverageInputs { price, mu, volatility, funding_rate, trading_fee, capital, leverage })
}
