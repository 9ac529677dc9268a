// Value grading: WAR per million dollars of salary -> letter grade.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::DOLLARS_PER_MILLION;

/// Salary-efficiency grade, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GradeTier {
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A-")]
    AMinus,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "F")]
    F,
}

impl GradeTier {
    /// All tiers from best to worst.
    pub const ALL: [GradeTier; 9] = [
        GradeTier::APlus,
        GradeTier::A,
        GradeTier::AMinus,
        GradeTier::BPlus,
        GradeTier::B,
        GradeTier::CPlus,
        GradeTier::C,
        GradeTier::D,
        GradeTier::F,
    ];

    /// Lower bound (inclusive) of WAR per million for this tier. `F` has
    /// no lower bound.
    pub fn min_war_per_million(&self) -> Option<f64> {
        match self {
            GradeTier::APlus => Some(1.00),
            GradeTier::A => Some(0.50),
            GradeTier::AMinus => Some(0.30),
            GradeTier::BPlus => Some(0.20),
            GradeTier::B => Some(0.15),
            GradeTier::CPlus => Some(0.125),
            GradeTier::C => Some(0.10),
            GradeTier::D => Some(0.075),
            GradeTier::F => None,
        }
    }

    /// First tier whose lower bound `war_per_million` meets, checked high to
    /// low. Total: NaN, zero and negative values all grade `F`.
    pub fn from_war_per_million(war_per_million: f64) -> GradeTier {
        GradeTier::ALL
            .into_iter()
            .find(|tier| {
                tier.min_war_per_million()
                    .is_some_and(|min| war_per_million >= min)
            })
            .unwrap_or(GradeTier::F)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            GradeTier::APlus => "A+",
            GradeTier::A => "A",
            GradeTier::AMinus => "A-",
            GradeTier::BPlus => "B+",
            GradeTier::B => "B",
            GradeTier::CPlus => "C+",
            GradeTier::C => "C",
            GradeTier::D => "D",
            GradeTier::F => "F",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GradeTier::APlus => "Elite",
            GradeTier::A => "Excellent",
            GradeTier::AMinus => "Great",
            GradeTier::BPlus => "Very Good",
            GradeTier::B => "Good",
            GradeTier::CPlus => "Above Avg",
            GradeTier::C => "Fair",
            GradeTier::D => "Below Avg",
            GradeTier::F => "Overpaid",
        }
    }

    /// Badge color for presentation layers.
    pub fn color(&self) -> &'static str {
        match self {
            GradeTier::APlus => "#10b981",
            GradeTier::A => "#22c55e",
            GradeTier::AMinus => "#84cc16",
            GradeTier::BPlus => "#eab308",
            GradeTier::B => "#f59e0b",
            GradeTier::CPlus => "#fb923c",
            GradeTier::C => "#94a3b8",
            GradeTier::D => "#ef4444",
            GradeTier::F => "#dc2626",
        }
    }
}

impl fmt::Display for GradeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.symbol(), self.label())
    }
}

/// WAR per million dollars of salary. A zero salary yields 0.0.
pub fn war_per_million(war: f64, annual_salary: u64) -> f64 {
    if annual_salary == 0 {
        return 0.0;
    }
    war / (annual_salary as f64 / DOLLARS_PER_MILLION)
}

/// Grade a WAR figure against a salary.
pub fn grade(war: f64, annual_salary: u64) -> GradeTier {
    GradeTier::from_war_per_million(war_per_million(war, annual_salary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn lower_bounds_are_inclusive() {
        assert_eq!(GradeTier::from_war_per_million(0.15), GradeTier::B);
        assert_eq!(GradeTier::from_war_per_million(1.0), GradeTier::APlus);
        assert_eq!(GradeTier::from_war_per_million(0.125), GradeTier::CPlus);
        assert_eq!(GradeTier::from_war_per_million(0.075), GradeTier::D);
        assert_eq!(GradeTier::from_war_per_million(0.0749), GradeTier::F);
    }

    #[test]
    fn each_threshold_maps_to_its_tier() {
        for tier in GradeTier::ALL {
            if let Some(min) = tier.min_war_per_million() {
                assert_eq!(GradeTier::from_war_per_million(min), tier);
            }
        }
    }

    #[test]
    fn six_war_at_seven_and_a_half_million_is_an_a() {
        let wpm = war_per_million(6.0, 7_500_000);
        assert!(approx_eq(wpm, 0.80, 1e-12));
        let g = grade(6.0, 7_500_000);
        assert_eq!(g, GradeTier::A);
        assert_eq!(g.label(), "Excellent");
    }

    #[test]
    fn non_positive_and_nan_fall_through_to_f() {
        assert_eq!(GradeTier::from_war_per_million(0.0), GradeTier::F);
        assert_eq!(GradeTier::from_war_per_million(-3.0), GradeTier::F);
        assert_eq!(GradeTier::from_war_per_million(f64::NAN), GradeTier::F);
        assert_eq!(grade(5.0, 0), GradeTier::F);
    }

    #[test]
    fn thresholds_descend_strictly() {
        let mins: Vec<f64> = GradeTier::ALL
            .iter()
            .filter_map(|t| t.min_war_per_million())
            .collect();
        assert!(mins.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn serializes_as_symbol() {
        let json = serde_json::to_string(&GradeTier::AMinus).unwrap();
        assert_eq!(json, "\"A-\"");
    }

    proptest! {
        #[test]
        fn exactly_one_tier_matches(wpm in -10.0f64..10.0) {
            let tier = GradeTier::from_war_per_million(wpm);
            let matching: Vec<GradeTier> = GradeTier::ALL
                .into_iter()
                .filter(|t| {
                    let above_min = t.min_war_per_million().map_or(true, |min| wpm >= min);
                    let better = GradeTier::ALL
                        .into_iter()
                        .take_while(|b| b != t)
                        .any(|b| b.min_war_per_million().is_some_and(|min| wpm >= min));
                    above_min && !better
                })
                .collect();
            prop_assert_eq!(matching, vec![tier]);
        }

        #[test]
        fn grade_is_monotone(a in -2.0f64..3.0, b in -2.0f64..3.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            // Better tiers sort first.
            prop_assert!(GradeTier::from_war_per_million(hi) <= GradeTier::from_war_per_million(lo));
        }
    }
}
