//! Value Engine.
//!
//! Stateless arithmetic: normalize time inputs, evaluate the S or W
//! formula, classify the resulting Value Number into a recommendation
//! tier. Nothing here performs I/O or holds shared state.

mod calculation;
mod formula;
mod tier;
mod time;

pub use calculation::{calculate, calculate_s, calculate_w, CalculationInputs, CalculationResult};
pub use formula::{
    evaluate_s_formula, evaluate_w_formula, FormulaKind, SFormulaInputs, WFormulaInputs,
    MAX_EFFORT, MIN_EFFORT, VALUE_NUMBER_PLACES,
};
pub use tier::{classify, tier_for, Tier};
pub use time::{normalize_time, TimeValue, MAX_HOURS, MAX_MINUTES};
