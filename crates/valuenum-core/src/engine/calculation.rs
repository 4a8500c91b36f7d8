//! Calculation results.
//!
//! A [`CalculationResult`] is created once per evaluation and never
//! mutated afterwards. Persisting it is the caller's job.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::formula::{
    evaluate_s_formula, evaluate_w_formula, FormulaKind, SFormulaInputs, WFormulaInputs,
};
use super::tier::{classify, Tier};
use crate::error::EngineError;

/// The input record a result was computed from.
///
/// W is listed first so untagged decoding keeps the cost fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CalculationInputs {
    W(WFormulaInputs),
    S(SFormulaInputs),
}

impl CalculationInputs {
    pub fn kind(&self) -> FormulaKind {
        match self {
            CalculationInputs::S(_) => FormulaKind::S,
            CalculationInputs::W(_) => FormulaKind::W,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    id: String,
    #[serde(rename = "calculation_type")]
    formula_kind: FormulaKind,
    inputs: CalculationInputs,
    value_number: f64,
    #[serde(rename = "recommendation")]
    tier: Tier,
    #[serde(rename = "explanation")]
    rationale: String,
    #[serde(rename = "timestamp")]
    computed_at: DateTime<Utc>,
}

impl CalculationResult {
    fn from_value(inputs: CalculationInputs, value_number: f64) -> Self {
        let formula_kind = inputs.kind();
        let (tier, rationale) = classify(value_number, formula_kind);
        Self {
            id: Uuid::new_v4().to_string(),
            formula_kind,
            inputs,
            value_number,
            tier,
            rationale,
            computed_at: Utc::now().trunc_subsecs(6),
        }
    }

    /// Rebuild a stored result. Tier and rationale are taken as recorded.
    pub(crate) fn restore(
        id: String,
        inputs: CalculationInputs,
        value_number: f64,
        tier: Tier,
        rationale: String,
        computed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            formula_kind: inputs.kind(),
            inputs,
            value_number,
            tier,
            rationale,
            computed_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn formula_kind(&self) -> FormulaKind {
        self.formula_kind
    }

    pub fn inputs(&self) -> &CalculationInputs {
        &self.inputs
    }

    pub fn value_number(&self) -> f64 {
        self.value_number
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn rationale(&self) -> &str {
        &self.rationale
    }

    pub fn computed_at(&self) -> DateTime<Utc> {
        self.computed_at
    }
}

/// Evaluate the S-formula and classify the result.
///
/// # Errors
/// Propagates [`EngineError::DivisionByZero`] from the evaluator.
pub fn calculate_s(inputs: SFormulaInputs) -> Result<CalculationResult, EngineError> {
    let value = evaluate_s_formula(&inputs)?;
    Ok(CalculationResult::from_value(CalculationInputs::S(inputs), value))
}

/// Evaluate the W-formula and classify the result.
///
/// # Errors
/// Propagates [`EngineError::DivisionByZero`] from the evaluator.
pub fn calculate_w(inputs: WFormulaInputs) -> Result<CalculationResult, EngineError> {
    let value = evaluate_w_formula(&inputs)?;
    Ok(CalculationResult::from_value(CalculationInputs::W(inputs), value))
}

/// Validate, then evaluate whichever formula the inputs belong to.
///
/// # Errors
/// [`EngineError::InvalidInput`] from validation or
/// [`EngineError::DivisionByZero`] from evaluation.
pub fn calculate(inputs: CalculationInputs) -> Result<CalculationResult, EngineError> {
    match inputs {
        CalculationInputs::S(s) => {
            s.validate()?;
            calculate_s(s)
        }
        CalculationInputs::W(w) => {
            w.validate()?;
            calculate_w(w)
        }
    }
}
