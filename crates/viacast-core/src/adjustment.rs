// Statistical adjustment pipeline: raw OPS -> boosted OPS -> regressed OPS.
//
// Each boost multiplies the running total. Missing quality or
// expected-outcome profiles leave their boost at exactly 1.0.

use serde::Serialize;
use tracing::warn;

use crate::constants::{
    AVG_EV_BASELINE, AVG_EV_SPAN, BARREL_BASELINE, BARREL_SPAN, MAX_EV_BASELINE, MAX_EV_SPAN,
    OPS_TO_WOBA, PERFORMANCE_MAX_BOOST, PERFORMANCE_SLOPE, STATCAST_BARREL_WEIGHT,
    STATCAST_EV_WEIGHT, STATCAST_MAX_EV_WEIGHT, XWOBA_MAX_BOOST, XWOBA_NOISE_FLOOR, XWOBA_SLOPE,
};
use crate::tables::{ExpectedOutcomeProfile, QualityProfile};

// ---------------------------------------------------------------------------
// Batted-ball quality
// ---------------------------------------------------------------------------

/// Batted-ball quality on a 0 (league average or worse) to 1 (elite) scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QualityScores {
    pub exit_velocity: f64,
    pub max_exit_velocity: f64,
    pub barrel_rate: f64,
}

fn unit_score(value: f64, baseline: f64, span: f64) -> f64 {
    let score = (value - baseline) / span;
    if score.is_finite() {
        score.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

pub fn quality_scores(profile: &QualityProfile) -> QualityScores {
    QualityScores {
        exit_velocity: unit_score(profile.avg_exit_velocity, AVG_EV_BASELINE, AVG_EV_SPAN),
        max_exit_velocity: unit_score(profile.max_exit_velocity, MAX_EV_BASELINE, MAX_EV_SPAN),
        barrel_rate: unit_score(profile.barrel_rate, BARREL_BASELINE, BARREL_SPAN),
    }
}

/// `1 + 0.08·ev + 0.05·maxEv + 0.12·barrel`, or 1.0 without a profile.
/// Ranges over [1.0, 1.25].
pub fn statcast_boost(profile: Option<&QualityProfile>) -> f64 {
    match profile {
        Some(p) => {
            let s = quality_scores(p);
            1.0 + s.exit_velocity * STATCAST_EV_WEIGHT
                + s.max_exit_velocity * STATCAST_MAX_EV_WEIGHT
                + s.barrel_rate * STATCAST_BARREL_WEIGHT
        }
        None => 1.0,
    }
}

// ---------------------------------------------------------------------------
// Expected outcomes
// ---------------------------------------------------------------------------

/// Linear wOBA proxy for an OPS figure.
pub fn implied_woba(raw_ops: f64) -> f64 {
    raw_ops * OPS_TO_WOBA
}

/// Boost for a given xwOBA surplus over implied wOBA.
///
/// Only rewards hitters whose contact quality outran their results; a
/// deficit never penalizes. Surpluses at or below the noise floor give
/// exactly 1.0, and the boost is capped at 1.15.
pub fn xwoba_boost_for_diff(xwoba_diff: f64) -> f64 {
    if xwoba_diff > XWOBA_NOISE_FLOOR {
        1.0 + (xwoba_diff * XWOBA_SLOPE).min(XWOBA_MAX_BOOST)
    } else {
        1.0
    }
}

/// xwOBA boost for a hitter with `raw_ops`. A missing profile, or one with
/// a non-positive xwOBA, is neutral.
pub fn xwoba_boost(raw_ops: f64, profile: Option<&ExpectedOutcomeProfile>) -> f64 {
    match profile {
        Some(p) if p.xwoba > 0.0 => xwoba_boost_for_diff(p.xwoba - implied_woba(raw_ops)),
        _ => 1.0,
    }
}

// ---------------------------------------------------------------------------
// Performance and regression
// ---------------------------------------------------------------------------

/// Default performance boost: hitters above the elite threshold regress
/// less. `1 + min(0.15, (ops − threshold) × 0.8)`, else 1.0.
pub fn default_performance_boost(raw_ops: f64, elite_threshold: f64) -> f64 {
    if raw_ops > elite_threshold {
        1.0 + ((raw_ops - elite_threshold) * PERFORMANCE_SLOPE).min(PERFORMANCE_MAX_BOOST)
    } else {
        1.0
    }
}

/// Blend toward the league mean, trusting the player's own figure in
/// proportion to `pa_reliability`.
pub fn regress_to_league(final_adjusted_ops: f64, league_ops: f64, pa_reliability: f64) -> f64 {
    let rel = pa_reliability.clamp(0.0, 1.0);
    final_adjusted_ops * rel + league_ops * (1.0 - rel)
}

/// Replace a non-finite or non-positive pluggable boost with 1.0.
pub fn sanitize_boost(name: &str, value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        warn!("{} boost {} is not strictly positive; using 1.0", name, value);
        1.0
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// The four multiplicative factors applied to raw OPS.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Boosts {
    pub age: f64,
    pub performance: f64,
    pub statcast: f64,
    pub xwoba: f64,
}

impl Boosts {
    pub fn neutral() -> Self {
        Boosts {
            age: 1.0,
            performance: 1.0,
            statcast: 1.0,
            xwoba: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AdjustmentInput<'a> {
    pub raw_ops: f64,
    /// From the age curve; sanitized before use.
    pub age_boost: f64,
    /// Externally supplied trend factor; sanitized before use.
    pub performance_boost: f64,
    pub quality: Option<&'a QualityProfile>,
    pub expected: Option<&'a ExpectedOutcomeProfile>,
    pub pa_reliability: f64,
    pub league_ops: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AdjustedPerformance {
    pub boosts: Boosts,
    /// Raw OPS after the age, performance and statcast boosts.
    pub adjusted_ops: f64,
    /// `adjusted_ops` after the xwOBA boost.
    pub final_adjusted_ops: f64,
    /// `final_adjusted_ops` regressed toward the league mean.
    pub projected_ops: f64,
}

/// Run the full adjustment pipeline.
pub fn adjust(input: &AdjustmentInput<'_>) -> AdjustedPerformance {
    let boosts = Boosts {
        age: sanitize_boost("age", input.age_boost),
        performance: sanitize_boost("performance", input.performance_boost),
        statcast: statcast_boost(input.quality),
        xwoba: xwoba_boost(input.raw_ops, input.expected),
    };

    let adjusted_ops = input.raw_ops * boosts.age * boosts.performance * boosts.statcast;
    let final_adjusted_ops = adjusted_ops * boosts.xwoba;
    let projected_ops = regress_to_league(final_adjusted_ops, input.league_ops, input.pa_reliability);

    AdjustedPerformance {
        boosts,
        adjusted_ops,
        final_adjusted_ops,
        projected_ops,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    fn base_input(raw_ops: f64) -> AdjustmentInput<'static> {
        AdjustmentInput {
            raw_ops,
            age_boost: 1.0,
            performance_boost: 1.0,
            quality: None,
            expected: None,
            pa_reliability: 1.0,
            league_ops: 0.720,
        }
    }

    #[test]
    fn neutral_player_passes_through_unchanged() {
        let out = adjust(&base_input(0.850));
        assert_eq!(out.boosts, Boosts::neutral());
        assert_eq!(out.final_adjusted_ops, out.adjusted_ops);
        assert!(approx_eq(out.projected_ops, 0.850, 1e-12));
    }

    #[test]
    fn statcast_boost_at_league_average_is_neutral() {
        let avg = QualityProfile {
            avg_exit_velocity: 86.0,
            max_exit_velocity: 104.0,
            barrel_rate: 6.0,
        };
        assert!(approx_eq(statcast_boost(Some(&avg)), 1.0, 1e-12));
        assert_eq!(statcast_boost(None), 1.0);
    }

    #[test]
    fn statcast_boost_caps_at_elite() {
        let elite = QualityProfile {
            avg_exit_velocity: 97.0,
            max_exit_velocity: 120.0,
            barrel_rate: 25.0,
        };
        assert!(approx_eq(statcast_boost(Some(&elite)), 1.25, 1e-12));
    }

    #[test]
    fn statcast_boost_partial_scores() {
        // ev 0.5, max 0.25, barrel 0.4
        let p = QualityProfile {
            avg_exit_velocity: 90.0,
            max_exit_velocity: 106.0,
            barrel_rate: 10.0,
        };
        let expected = 1.0 + 0.5 * 0.08 + 0.25 * 0.05 + 0.4 * 0.12;
        assert!(approx_eq(statcast_boost(Some(&p)), expected, 1e-12));
    }

    #[test]
    fn weak_contact_never_penalizes() {
        let weak = QualityProfile {
            avg_exit_velocity: 80.0,
            max_exit_velocity: 98.0,
            barrel_rate: 1.0,
        };
        assert!(approx_eq(statcast_boost(Some(&weak)), 1.0, 1e-12));
    }

    #[test]
    fn xwoba_boost_threshold_and_cap() {
        assert_eq!(xwoba_boost_for_diff(0.01), 1.0);
        assert_eq!(xwoba_boost_for_diff(-0.2), 1.0);
        assert!(approx_eq(xwoba_boost_for_diff(0.05), 1.075, 1e-12));
        assert!(approx_eq(xwoba_boost_for_diff(0.5), 1.15, 1e-12));
    }

    #[test]
    fn xwoba_boost_from_profile() {
        // implied wOBA for .700 OPS = .301; xwOBA .341 -> diff .040 -> 1.06
        let p = ExpectedOutcomeProfile {
            xwoba: 0.341,
            xba: 0.260,
            xslg: 0.450,
        };
        assert!(approx_eq(xwoba_boost(0.700, Some(&p)), 1.06, 1e-9));
    }

    #[test]
    fn non_positive_xwoba_is_neutral() {
        let p = ExpectedOutcomeProfile {
            xwoba: 0.0,
            xba: 0.0,
            xslg: 0.0,
        };
        assert_eq!(xwoba_boost(0.500, Some(&p)), 1.0);
        assert_eq!(xwoba_boost(0.500, None), 1.0);
    }

    #[test]
    fn xwoba_boost_applies_after_other_boosts() {
        let p = ExpectedOutcomeProfile {
            xwoba: 0.341,
            xba: 0.260,
            xslg: 0.450,
        };
        let input = AdjustmentInput {
            age_boost: 1.1,
            expected: Some(&p),
            ..base_input(0.700)
        };
        let out = adjust(&input);
        assert!(approx_eq(out.adjusted_ops, 0.770, 1e-12));
        assert!(approx_eq(out.final_adjusted_ops, 0.770 * 1.06, 1e-9));
    }

    #[test]
    fn performance_boost_above_threshold() {
        assert_eq!(default_performance_boost(0.800, 0.800), 1.0);
        assert!(approx_eq(default_performance_boost(0.900, 0.800), 1.08, 1e-12));
        assert!(approx_eq(default_performance_boost(1.200, 0.800), 1.15, 1e-12));
    }

    #[test]
    fn regression_blends_toward_league() {
        assert!(approx_eq(regress_to_league(0.900, 0.720, 0.5), 0.810, 1e-12));
        assert!(approx_eq(regress_to_league(0.900, 0.720, 0.0), 0.720, 1e-12));
    }

    #[test]
    fn bad_pluggable_boosts_become_neutral() {
        let input = AdjustmentInput {
            age_boost: f64::NAN,
            performance_boost: -0.5,
            ..base_input(0.750)
        };
        let out = adjust(&input);
        assert_eq!(out.boosts.age, 1.0);
        assert_eq!(out.boosts.performance, 1.0);
        assert!(approx_eq(out.projected_ops, 0.750, 1e-12));
    }

    proptest! {
        #[test]
        fn xwoba_boost_is_monotone_and_capped(a in 0.0f64..1.0, b in 0.0f64..1.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let boost_lo = xwoba_boost_for_diff(lo);
            let boost_hi = xwoba_boost_for_diff(hi);
            prop_assert!(boost_lo <= boost_hi);
            prop_assert!(boost_hi <= 1.15);
            prop_assert!(boost_lo >= 1.0);
        }

        #[test]
        fn projected_ops_is_positive_and_finite(
            raw_ops in 0.0f64..2.0,
            age in -5.0f64..5.0,
            rel in 0.0f64..1.0,
            ev in 70.0f64..100.0,
            xwoba in -0.1f64..0.6,
        ) {
            let q = QualityProfile { avg_exit_velocity: ev, max_exit_velocity: ev + 18.0, barrel_rate: ev - 80.0 };
            let x = ExpectedOutcomeProfile { xwoba, xba: 0.0, xslg: 0.0 };
            let input = AdjustmentInput {
                raw_ops,
                age_boost: age,
                performance_boost: 1.0,
                quality: Some(&q),
                expected: Some(&x),
                pa_reliability: rel,
                league_ops: 0.720,
            };
            let out = adjust(&input);
            prop_assert!(out.projected_ops.is_finite());
            prop_assert!(out.projected_ops >= 0.0);
            prop_assert!(out.boosts.age > 0.0 && out.boosts.xwoba >= 1.0 && out.boosts.statcast >= 1.0);
        }
    }
}
