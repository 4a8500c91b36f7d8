//! Integration tests for the Value Engine.
//!
//! Reference scenarios are checked exactly; the algebraic properties
//! (monotone time normalization, determinism, 3-decimal rounding) are
//! checked with proptest over the full valid input ranges.

use proptest::prelude::*;
use valuenum_core::{
    calculate_s, calculate_w, classify, evaluate_s_formula, evaluate_w_formula, normalize_time,
    EngineError, FormulaKind, SFormulaInputs, Tier, TimeValue, WFormulaInputs,
};

fn time(h: i64, m: i64) -> TimeValue {
    TimeValue::new(h, m).unwrap()
}

#[test]
fn test_s_formula_reference_scenario() {
    let inputs = SFormulaInputs {
        old_time: time(2, 30),
        old_effort: 7.0,
        training_time: time(1, 0),
        new_effort: 4.0,
    };
    let result = calculate_s(inputs).unwrap();
    assert_eq!(result.value_number(), 0.5);
    assert_eq!(result.tier(), Tier::NoGo);
}

#[test]
fn test_w_formula_reference_scenario() {
    let inputs = WFormulaInputs {
        old_time: time(2, 30),
        old_effort: 7.0,
        training_time: time(1, 0),
        new_effort: 4.0,
        old_cost: 1000.0,
        new_cost: 300.0,
    };
    let result = calculate_w(inputs).unwrap();
    assert_eq!(result.value_number(), 8.224);
    assert_eq!(result.tier(), Tier::StrongGo);
}

#[test]
fn test_degenerate_s_formula_is_rejected_not_infinite() {
    let inputs = SFormulaInputs {
        old_time: time(2, 30),
        old_effort: 7.0,
        training_time: time(0, 0),
        new_effort: 0.0,
    };
    assert_eq!(
        evaluate_s_formula(&inputs),
        Err(EngineError::DivisionByZero { formula: "S-formula" })
    );
    assert!(calculate_s(inputs).is_err());
}

#[test]
fn test_tier_boundaries_are_exact() {
    assert_eq!(classify(2.0, FormulaKind::S).0, Tier::StrongGo);
    assert_eq!(classify(1.999, FormulaKind::S).0, Tier::Go);
    assert_eq!(classify(1.8, FormulaKind::W).0, Tier::StrongGo);
    assert_eq!(classify(0.9, FormulaKind::W).0, Tier::Caution);
}

#[test]
fn test_w_value_just_below_caution_stays_no_go() {
    let inputs = WFormulaInputs {
        old_time: time(1, 0),
        old_effort: 5.0,
        training_time: time(0, 0),
        new_effort: 1.0,
        old_cost: 0.8995,
        new_cost: 100.0,
    };
    let result = calculate_w(inputs).unwrap();
    assert_eq!(result.value_number(), 0.899);
    assert_eq!(result.tier(), Tier::NoGo);
}

#[test]
fn test_value_number_feeds_classification() {
    // 3h / (0.5h + 1.0) = 2.0 exactly, the STRONG_GO floor for S.
    let inputs = SFormulaInputs {
        old_time: time(3, 0),
        old_effort: 5.0,
        training_time: time(0, 30),
        new_effort: 1.0,
    };
    let result = calculate_s(inputs).unwrap();
    assert_eq!(result.value_number(), 2.0);
    assert_eq!(result.tier(), Tier::StrongGo);
}

fn arb_time() -> impl Strategy<Value = TimeValue> {
    (0i64..=9999, 0i64..=59).prop_map(|(h, m)| time(h, m))
}

fn arb_s_inputs() -> impl Strategy<Value = SFormulaInputs> {
    (arb_time(), 1.0f64..=10.0, arb_time(), 1.0f64..=10.0).prop_map(
        |(old_time, old_effort, training_time, new_effort)| SFormulaInputs {
            old_time,
            old_effort,
            training_time,
            new_effort,
        },
    )
}

fn arb_w_inputs() -> impl Strategy<Value = WFormulaInputs> {
    (arb_s_inputs(), 0.0f64..1_000_000.0, 0.0f64..1_000_000.0).prop_map(|(s, old_cost, new_cost)| {
        WFormulaInputs {
            old_time: s.old_time,
            old_effort: s.old_effort,
            training_time: s.training_time,
            new_effort: s.new_effort,
            old_cost,
            new_cost,
        }
    })
}

/// Correctly rounded reference: format the exact binary value.
fn rounded3(value: f64) -> f64 {
    format!("{value:.3}").parse().unwrap()
}

proptest! {
    #[test]
    fn normalize_time_is_monotone(h in 0i64..9999, m in 0i64..59) {
        let here = normalize_time(h, m).unwrap();
        prop_assert!(here <= normalize_time(h, m + 1).unwrap());
        prop_assert!(here <= normalize_time(h + 1, m).unwrap());
    }

    #[test]
    fn last_minute_precedes_next_hour(h in 0i64..9999) {
        prop_assert!(normalize_time(h, 59).unwrap() < normalize_time(h + 1, 0).unwrap());
    }

    #[test]
    fn s_formula_is_deterministic_and_rounded(inputs in arb_s_inputs()) {
        let first = evaluate_s_formula(&inputs).unwrap();
        prop_assert_eq!(first, evaluate_s_formula(&inputs).unwrap());
        let z = inputs.old_time.decimal_hours();
        let y = inputs.training_time.decimal_hours();
        prop_assert_eq!(first, rounded3(z / (y + inputs.new_effort)));
    }

    #[test]
    fn w_formula_is_deterministic_and_rounded(inputs in arb_w_inputs()) {
        let first = evaluate_w_formula(&inputs).unwrap();
        prop_assert_eq!(first, evaluate_w_formula(&inputs).unwrap());
        let z = inputs.old_time.decimal_hours();
        let y = inputs.training_time.decimal_hours();
        let exact = (z * inputs.old_cost) / (y * inputs.new_cost + inputs.new_effort);
        prop_assert_eq!(first, rounded3(exact));
    }

    #[test]
    fn repeated_results_agree_but_differ_in_identity(inputs in arb_w_inputs()) {
        let a = calculate_w(inputs.clone()).unwrap();
        let b = calculate_w(inputs).unwrap();
        prop_assert_eq!(a.value_number(), b.value_number());
        prop_assert_eq!(a.tier(), b.tier());
        prop_assert_ne!(a.id(), b.id());
    }

    #[test]
    fn tier_is_a_function_of_value_and_kind(inputs in arb_s_inputs()) {
        let result = calculate_s(inputs).unwrap();
        let (tier, rationale) = classify(result.value_number(), FormulaKind::S);
        prop_assert_eq!(result.tier(), tier);
        prop_assert_eq!(result.rationale(), rationale.as_str());
    }
}
