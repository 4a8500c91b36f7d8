//! Recommendation tiers.
//!
//! | kind | STRONG_GO | GO | CAUTION | NO_GO |
//! |------|-----------|----|---------|-------|
//! | S | ≥ 2.0 | ≥ 1.5 | ≥ 1.0 | < 1.0 |
//! | W | ≥ 1.8 | ≥ 1.3 | ≥ 0.9 | < 0.9 |
//!
//! Cut points are checked top-down, lower bound inclusive.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::formula::FormulaKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    NoGo,
    Caution,
    Go,
    StrongGo,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::StrongGo => "strong_go",
            Tier::Go => "go",
            Tier::Caution => "caution",
            Tier::NoGo => "no_go",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "strong_go" => Some(Tier::StrongGo),
            "go" => Some(Tier::Go),
            "caution" => Some(Tier::Caution),
            "no_go" => Some(Tier::NoGo),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::StrongGo => "Strong Go",
            Tier::Go => "Go",
            Tier::Caution => "Caution",
            Tier::NoGo => "No Go",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lower bounds for STRONG_GO, GO and CAUTION; anything below is NO_GO.
const S_CUTS: [(f64, Tier); 3] = [
    (2.0, Tier::StrongGo),
    (1.5, Tier::Go),
    (1.0, Tier::Caution),
];

const W_CUTS: [(f64, Tier); 3] = [
    (1.8, Tier::StrongGo),
    (1.3, Tier::Go),
    (0.9, Tier::Caution),
];

fn cuts(kind: FormulaKind) -> &'static [(f64, Tier); 3] {
    match kind {
        FormulaKind::S => &S_CUTS,
        FormulaKind::W => &W_CUTS,
    }
}

fn phrase(kind: FormulaKind, tier: Tier) -> &'static str {
    match (kind, tier) {
        (FormulaKind::S, Tier::StrongGo) => "Excellent efficiency gain",
        (FormulaKind::S, Tier::Go) => "Good efficiency gain",
        (FormulaKind::S, Tier::Caution) => "Marginal efficiency gain",
        (FormulaKind::S, Tier::NoGo) => "Insufficient efficiency gain",
        (FormulaKind::W, Tier::StrongGo) => "Excellent cost-adjusted return",
        (FormulaKind::W, Tier::Go) => "Good cost-adjusted return",
        (FormulaKind::W, Tier::Caution) => "Marginal cost-adjusted return",
        (FormulaKind::W, Tier::NoGo) => "Poor cost-adjusted return",
    }
}

/// Tier for a value number, without the rationale text.
pub fn tier_for(value_number: f64, kind: FormulaKind) -> Tier {
    cuts(kind)
        .iter()
        .find(|(lower, _)| value_number >= *lower)
        .map(|(_, tier)| *tier)
        .unwrap_or(Tier::NoGo)
}

/// Classify a value number and explain the verdict.
pub fn classify(value_number: f64, kind: FormulaKind) -> (Tier, String) {
    let tier = tier_for(value_number, kind);
    let rationale = format!(
        "{}: the {} Value Number of {:.2} rates as {}.",
        phrase(kind, tier),
        kind.label(),
        value_number,
        tier.label()
    );
    (tier, rationale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s_boundaries_are_inclusive() {
        assert_eq!(tier_for(2.0, FormulaKind::S), Tier::StrongGo);
        assert_eq!(tier_for(1.999, FormulaKind::S), Tier::Go);
        assert_eq!(tier_for(1.5, FormulaKind::S), Tier::Go);
        assert_eq!(tier_for(1.499, FormulaKind::S), Tier::Caution);
        assert_eq!(tier_for(1.0, FormulaKind::S), Tier::Caution);
        assert_eq!(tier_for(0.999, FormulaKind::S), Tier::NoGo);
        assert_eq!(tier_for(0.0, FormulaKind::S), Tier::NoGo);
    }

    #[test]
    fn w_boundaries_are_inclusive() {
        assert_eq!(tier_for(1.8, FormulaKind::W), Tier::StrongGo);
        assert_eq!(tier_for(1.799, FormulaKind::W), Tier::Go);
        assert_eq!(tier_for(1.3, FormulaKind::W), Tier::Go);
        assert_eq!(tier_for(1.299, FormulaKind::W), Tier::Caution);
        assert_eq!(tier_for(0.9, FormulaKind::W), Tier::Caution);
        assert_eq!(tier_for(0.899, FormulaKind::W), Tier::NoGo);
    }

    #[test]
    fn same_value_differs_by_formula() {
        assert_eq!(tier_for(1.9, FormulaKind::S), Tier::Go);
        assert_eq!(tier_for(1.9, FormulaKind::W), Tier::StrongGo);
    }

    #[test]
    fn rationale_embeds_kind_value_and_phrase() {
        let (tier, rationale) = classify(2.3456, FormulaKind::S);
        assert_eq!(tier, Tier::StrongGo);
        assert_eq!(
            rationale,
            "Excellent efficiency gain: the S-formula Value Number of 2.35 rates as Strong Go."
        );

        let (_, rationale) = classify(0.5, FormulaKind::W);
        assert!(rationale.starts_with("Poor cost-adjusted return"));
        assert!(rationale.contains("W-formula"));
        assert!(rationale.contains("0.50"));
    }

    #[test]
    fn tiers_order_from_worst_to_best() {
        assert!(Tier::StrongGo > Tier::Go);
        assert!(Tier::Caution > Tier::NoGo);
        assert_eq!(Tier::parse(Tier::Caution.as_str()), Some(Tier::Caution));
    }
}
