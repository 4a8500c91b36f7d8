//! S and W formula inputs and evaluators.
//!
//! ```text
//! S = Z / (Y + V)
//! W = (Z × M) / (Y × T + V)
//! ```
//!
//! | symbol | field |
//! |--------|-------|
//! | Z | `old_time` in decimal hours |
//! | Y | `training_time` in decimal hours |
//! | V | `new_effort` |
//! | M | `old_cost` |
//! | T | `new_cost` |
//!
//! Evaluators only guard the denominator. Effort and cost ranges are
//! checked by [`SFormulaInputs::validate`] / [`WFormulaInputs::validate`],
//! which callers run before evaluating.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::time::{round_to, TimeValue};
use crate::error::EngineError;

/// Effort scores live on a 1-10 scale.
pub const MIN_EFFORT: f64 = 1.0;
pub const MAX_EFFORT: f64 = 10.0;

/// Decimal places carried by every value number.
pub const VALUE_NUMBER_PLACES: usize = 3;

/// Which formula produced a value number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormulaKind {
    #[serde(rename = "s_formula")]
    S,
    #[serde(rename = "w_formula")]
    W,
}

impl FormulaKind {
    /// Wire/storage identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            FormulaKind::S => "s_formula",
            FormulaKind::W => "w_formula",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "s_formula" | "S" | "s" => Some(FormulaKind::S),
            "w_formula" | "W" | "w" => Some(FormulaKind::W),
            _ => None,
        }
    }

    /// Human label used in rationale text.
    pub fn label(&self) -> &'static str {
        match self {
            FormulaKind::S => "S-formula",
            FormulaKind::W => "W-formula",
        }
    }
}

impl fmt::Display for FormulaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Efficiency scenario without cost bias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SFormulaInputs {
    pub old_time: TimeValue,
    pub old_effort: f64,
    pub training_time: TimeValue,
    pub new_effort: f64,
}

/// Efficiency scenario weighted by old and new costs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WFormulaInputs {
    pub old_time: TimeValue,
    pub old_effort: f64,
    pub training_time: TimeValue,
    pub new_effort: f64,
    pub old_cost: f64,
    pub new_cost: f64,
}

fn check_effort(field: &str, value: f64) -> Result<(), EngineError> {
    if !value.is_finite() || !(MIN_EFFORT..=MAX_EFFORT).contains(&value) {
        return Err(EngineError::invalid(
            field,
            format!("must be between {MIN_EFFORT} and {MAX_EFFORT}, got {value}"),
        ));
    }
    Ok(())
}

fn check_cost(field: &str, value: f64) -> Result<(), EngineError> {
    if !value.is_finite() || value < 0.0 {
        return Err(EngineError::invalid(
            field,
            format!("must be a non-negative amount, got {value}"),
        ));
    }
    Ok(())
}

impl SFormulaInputs {
    /// Check the effort fields against the 1-10 scale.
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidInput`] naming the first offending field.
    pub fn validate(&self) -> Result<(), EngineError> {
        check_effort("old_effort", self.old_effort)?;
        check_effort("new_effort", self.new_effort)
    }
}

impl WFormulaInputs {
    /// Check effort fields against the 1-10 scale and costs for non-negativity.
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidInput`] naming the first offending field.
    pub fn validate(&self) -> Result<(), EngineError> {
        check_effort("old_effort", self.old_effort)?;
        check_effort("new_effort", self.new_effort)?;
        check_cost("old_cost", self.old_cost)?;
        check_cost("new_cost", self.new_cost)
    }
}

fn quotient(
    formula: FormulaKind,
    numerator: f64,
    denominator: f64,
) -> Result<f64, EngineError> {
    if denominator == 0.0 {
        return Err(EngineError::DivisionByZero {
            formula: formula.label(),
        });
    }
    let value = round_to(numerator / denominator, VALUE_NUMBER_PLACES);
    if !value.is_finite() {
        return Err(EngineError::invalid(
            "value_number",
            format!("{formula} produced a non-finite result"),
        ));
    }
    Ok(value)
}

/// `round(Z / (Y + V), 3)`.
///
/// `old_effort` does not take part in the quotient.
///
/// # Errors
/// Returns [`EngineError::DivisionByZero`] when `Y + V == 0`.
pub fn evaluate_s_formula(inputs: &SFormulaInputs) -> Result<f64, EngineError> {
    let z = inputs.old_time.decimal_hours();
    let y = inputs.training_time.decimal_hours();
    let v = inputs.new_effort;
    quotient(FormulaKind::S, z, y + v)
}

/// `round((Z × M) / (Y × T + V), 3)`.
///
/// # Errors
/// Returns [`EngineError::DivisionByZero`] when `Y × T + V == 0`.
pub fn evaluate_w_formula(inputs: &WFormulaInputs) -> Result<f64, EngineError> {
    let z = inputs.old_time.decimal_hours();
    let m = inputs.old_cost;
    let y = inputs.training_time.decimal_hours();
    let t = inputs.new_cost;
    let v = inputs.new_effort;
    quotient(FormulaKind::W, z * m, (y * t) + v)
}
