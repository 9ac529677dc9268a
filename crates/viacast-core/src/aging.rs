// Age curves: how a player's value scales with age at his position.

use crate::config::AgingTable;
use crate::constants::{
    POST_PEAK_FACTOR_MIN, PRE_PEAK_FACTOR_MAX, PRE_PEAK_FACTOR_MIN, PRE_PEAK_GROWTH_CAP,
    PRE_PEAK_GROWTH_PER_YEAR, PRE_PEAK_RISK_PER_YEAR,
};
use crate::position::Position;

/// A pluggable age curve.
///
/// `factor` is the multiplier on a player's value at `age`, 1.0 at the
/// peak. Any `Fn(u32, Position) -> f64` is an `AgeCurve`, so tests and
/// callers can supply a closure.
pub trait AgeCurve: Send + Sync {
    fn factor(&self, age: u32, position: Position) -> f64;

    /// Multiplier applied to a rate stat. Rates move half as much as
    /// counting value.
    fn rate_boost(&self, age: u32, position: Position) -> f64 {
        0.5 + 0.5 * self.factor(age, position)
    }
}

impl<F> AgeCurve for F
where
    F: Fn(u32, Position) -> f64 + Send + Sync,
{
    fn factor(&self, age: u32, position: Position) -> f64 {
        self(age, position)
    }
}

/// Default curve driven by the configured per-position peak and decline.
#[derive(Debug, Clone)]
pub struct PositionalAgeCurve {
    table: AgingTable,
}

impl PositionalAgeCurve {
    pub fn new(table: AgingTable) -> Self {
        PositionalAgeCurve { table }
    }
}

impl AgeCurve for PositionalAgeCurve {
    fn factor(&self, age: u32, position: Position) -> f64 {
        let params = self.table.params(position);
        aging_factor(age, params.peak_age, params.decline_rate)
    }
}

/// Value multiplier at `age` for a player peaking at `peak_age`.
///
/// Before the peak, expected growth is offset by development risk and the
/// result is clamped to [0.85, 1.15]. After it, value declines linearly
/// at `decline_rate` per year down to a floor of 0.25.
pub fn aging_factor(age: u32, peak_age: u32, decline_rate: f64) -> f64 {
    if age <= peak_age {
        let years_to_peak = f64::from(peak_age - age);
        let growth = 1.0 + (PRE_PEAK_GROWTH_PER_YEAR * years_to_peak).min(PRE_PEAK_GROWTH_CAP);
        let risk = 1.0 - PRE_PEAK_RISK_PER_YEAR * years_to_peak;
        (growth * risk).clamp(PRE_PEAK_FACTOR_MIN, PRE_PEAK_FACTOR_MAX)
    } else {
        let years_past = f64::from(age - peak_age);
        (1.0 - decline_rate * years_past).max(POST_PEAK_FACTOR_MIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn factor_is_one_at_peak() {
        assert!(approx_eq(aging_factor(27, 27, 0.04), 1.0, 1e-12));
    }

    #[test]
    fn pre_peak_growth_net_of_risk() {
        // 4 years out: (1 + 0.10) * (1 - 0.06) = 1.034
        assert!(approx_eq(aging_factor(23, 27, 0.04), 1.034, 1e-12));
        // 10 years out: (1 + 0.15) * (1 - 0.15) = 0.9775
        assert!(approx_eq(aging_factor(17, 27, 0.04), 0.9775, 1e-12));
    }

    #[test]
    fn pre_peak_factor_is_clamped() {
        // 20 years out: 1.15 * 0.70 = 0.805, clamped up to 0.85
        assert!(approx_eq(aging_factor(7, 27, 0.04), 0.85, 1e-12));
    }

    #[test]
    fn post_peak_decline_and_floor() {
        assert!(approx_eq(aging_factor(32, 27, 0.04), 0.80, 1e-12));
        assert!(approx_eq(aging_factor(60, 27, 0.04), 0.25, 1e-12));
    }

    #[test]
    fn positional_curve_uses_configured_peak() {
        let curve = PositionalAgeCurve::new(AgingTable::default());
        // SS peaks at 26, DH at 29.
        assert!(approx_eq(curve.factor(26, Position::ShortStop), 1.0, 1e-12));
        assert!(approx_eq(curve.factor(29, Position::DesignatedHitter), 1.0, 1e-12));
        assert!(approx_eq(curve.factor(30, Position::ShortStop), 0.84, 1e-12));
    }

    #[test]
    fn rate_boost_moves_half_as_much() {
        let curve = PositionalAgeCurve::new(AgingTable::default());
        assert!(approx_eq(curve.rate_boost(26, Position::ShortStop), 1.0, 1e-12));
        assert!(approx_eq(curve.rate_boost(30, Position::ShortStop), 0.92, 1e-12));
    }

    #[test]
    fn closures_are_age_curves() {
        let flat = |_age: u32, _pos: Position| 1.0;
        assert!(approx_eq(flat.rate_boost(40, Position::Catcher), 1.0, 1e-12));
    }
}
