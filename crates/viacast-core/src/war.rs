// WAR composition: per-component run values summed and converted to wins.

use serde::Serialize;

use crate::constants::{
    BATTING_RUNS_PER_PA, DEFENSIVE_DECAY_PER_YEAR, DRS_BLEND, DRS_RUN_VALUE, FULL_SEASON_RUN_PA,
    OAA_BLEND, OAA_RUN_VALUE, RUNS_PER_WIN, SPEED_FLOOR_RUNS, SPEED_TIERS, WRC_PLUS_MAX,
    WRC_PLUS_MIN,
};
use crate::position::Position;
use crate::tables::{DefensiveProfile, SprintSpeed};

/// Fraction of a full season's counting runs earned over `est_pa`.
fn season_share(est_pa: f64) -> f64 {
    est_pa / FULL_SEASON_RUN_PA
}

// ---------------------------------------------------------------------------
// Batting
// ---------------------------------------------------------------------------

/// OPS-based wRC+ proxy, rounded and clamped to [70, 170].
pub fn wrc_plus(projected_ops: f64, league_ops: f64) -> f64 {
    let raw = (projected_ops / league_ops * 100.0).round();
    if raw.is_nan() {
        return 100.0;
    }
    raw.clamp(WRC_PLUS_MIN, WRC_PLUS_MAX)
}

pub fn batting_runs(wrc_plus: f64, est_pa: f64) -> f64 {
    (wrc_plus - 100.0) / 100.0 * est_pa * BATTING_RUNS_PER_PA
}

// ---------------------------------------------------------------------------
// Defense
// ---------------------------------------------------------------------------

/// Defensive value retained at `age`: 1.0 through the position's defensive
/// peak, then 6% less per year, never below zero.
pub fn defensive_aging(age: u32, position: Position) -> f64 {
    let years_past = age.saturating_sub(position.defensive_peak());
    (1.0 - f64::from(years_past) * DEFENSIVE_DECAY_PER_YEAR).max(0.0)
}

/// Blended OAA/DRS runs, aged and scaled to playing time. Zero without a
/// profile.
pub fn defensive_runs(
    profile: Option<&DefensiveProfile>,
    age: u32,
    position: Position,
    est_pa: f64,
) -> f64 {
    let Some(p) = profile else {
        return 0.0;
    };
    let blended = f64::from(p.outs_above_average) * OAA_RUN_VALUE * OAA_BLEND
        + f64::from(p.defensive_runs_saved) * DRS_RUN_VALUE * DRS_BLEND;
    blended * defensive_aging(age, position) * season_share(est_pa)
}

// ---------------------------------------------------------------------------
// Baserunning
// ---------------------------------------------------------------------------

/// Runs per full season for a sprint speed. Step function; a speed exactly
/// on a boundary takes the higher tier.
pub fn speed_tier_runs(feet_per_second: f64) -> f64 {
    SPEED_TIERS
        .iter()
        .find(|(min_speed, _)| feet_per_second >= *min_speed)
        .map(|(_, runs)| *runs)
        .unwrap_or(SPEED_FLOOR_RUNS)
}

pub fn baserunning_runs(speed: Option<&SprintSpeed>, est_pa: f64) -> f64 {
    match speed {
        Some(s) => speed_tier_runs(s.feet_per_second) * season_share(est_pa),
        None => 0.0,
    }
}

// ---------------------------------------------------------------------------
// Composition
// ---------------------------------------------------------------------------

/// Each run component of a WAR estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunBreakdown {
    pub batting: f64,
    pub defense: f64,
    pub baserunning: f64,
    pub positional: f64,
    pub replacement: f64,
}

impl RunBreakdown {
    pub fn total(&self) -> f64 {
        self.batting + self.defense + self.baserunning + self.positional + self.replacement
    }

    pub fn war(&self) -> f64 {
        self.total() / RUNS_PER_WIN
    }
}

/// Everything the run model needs for one player.
#[derive(Debug, Clone, Copy)]
pub struct CompositionInput<'a> {
    pub projected_ops: f64,
    pub league_ops: f64,
    pub est_pa: f64,
    pub age: u32,
    pub position: Position,
    /// Positional adjustment per 600 PA.
    pub positional_runs: f64,
    /// Replacement-level runs per 600 PA.
    pub replacement_runs: f64,
    pub defense: Option<&'a DefensiveProfile>,
    pub sprint_speed: Option<&'a SprintSpeed>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Composition {
    pub wrc_plus: f64,
    pub runs: RunBreakdown,
    pub war: f64,
}

pub fn compose(input: &CompositionInput<'_>) -> Composition {
    let wrc = wrc_plus(input.projected_ops, input.league_ops);
    let share = season_share(input.est_pa);
    let runs = RunBreakdown {
        batting: batting_runs(wrc, input.est_pa),
        defense: defensive_runs(input.defense, input.age, input.position, input.est_pa),
        baserunning: baserunning_runs(input.sprint_speed, input.est_pa),
        positional: input.positional_runs * share,
        replacement: input.replacement_runs * share,
    };
    Composition {
        wrc_plus: wrc,
        runs,
        war: runs.war(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn defensive_runs_worked_example() {
        let p = DefensiveProfile {
            outs_above_average: 8,
            defensive_runs_saved: 1,
        };
        let runs = defensive_runs(Some(&p), 25, Position::ShortStop, 600.0);
        assert!(approx_eq(runs, 10.25, 1e-9));
    }

    #[test]
    fn defensive_runs_absent_is_zero() {
        assert_eq!(defensive_runs(None, 25, Position::ShortStop, 600.0), 0.0);
    }

    #[test]
    fn defensive_aging_by_position_group() {
        assert!(approx_eq(defensive_aging(26, Position::ShortStop), 1.0, 1e-12));
        assert!(approx_eq(defensive_aging(29, Position::ShortStop), 0.82, 1e-12));
        assert!(approx_eq(defensive_aging(29, Position::CenterField), 0.94, 1e-12));
        assert_eq!(defensive_aging(60, Position::Catcher), 0.0);
    }

    #[test]
    fn speed_tiers_take_higher_tier_on_boundary() {
        assert_eq!(speed_tier_runs(29.8), 6.0);
        assert_eq!(speed_tier_runs(29.5), 6.0);
        assert_eq!(speed_tier_runs(29.49), 4.0);
        assert_eq!(speed_tier_runs(28.5), 4.0);
        assert_eq!(speed_tier_runs(28.0), 3.0);
        assert_eq!(speed_tier_runs(27.0), 1.5);
        assert_eq!(speed_tier_runs(26.0), 0.0);
        assert_eq!(speed_tier_runs(25.99), -2.0);
    }

    #[test]
    fn baserunning_worked_example() {
        let s = SprintSpeed {
            feet_per_second: 29.8,
        };
        assert!(approx_eq(baserunning_runs(Some(&s), 600.0), 6.0, 1e-12));
        assert!(approx_eq(baserunning_runs(Some(&s), 300.0), 3.0, 1e-12));
        assert_eq!(baserunning_runs(None, 600.0), 0.0);
    }

    #[test]
    fn wrc_plus_rounds_and_clamps() {
        assert_eq!(wrc_plus(0.720, 0.720), 100.0);
        assert_eq!(wrc_plus(0.850, 0.720), 118.0);
        assert_eq!(wrc_plus(2.000, 0.720), 170.0);
        assert_eq!(wrc_plus(0.300, 0.720), 70.0);
    }

    #[test]
    fn batting_runs_scale_with_playing_time() {
        assert!(approx_eq(batting_runs(120.0, 600.0), 14.4, 1e-9));
        assert!(approx_eq(batting_runs(100.0, 600.0), 0.0, 1e-12));
    }

    #[test]
    fn compose_sums_components_over_runs_per_win() {
        let d = DefensiveProfile {
            outs_above_average: 8,
            defensive_runs_saved: 1,
        };
        let s = SprintSpeed {
            feet_per_second: 29.8,
        };
        let input = CompositionInput {
            projected_ops: 0.864,
            league_ops: 0.720,
            est_pa: 600.0,
            age: 25,
            position: Position::ShortStop,
            positional_runs: 7.5,
            replacement_runs: 20.0,
            defense: Some(&d),
            sprint_speed: Some(&s),
        };
        let out = compose(&input);

        // wRC+ 120 -> 14.4 batting runs
        assert_eq!(out.wrc_plus, 120.0);
        let expected_runs = 14.4 + 10.25 + 6.0 + 7.5 + 20.0;
        assert!(approx_eq(out.runs.total(), expected_runs, 1e-9));
        assert!(approx_eq(out.war, expected_runs / 9.5, 1e-9));
    }

    #[test]
    fn missing_profiles_zero_their_terms() {
        let input = CompositionInput {
            projected_ops: 0.720,
            league_ops: 0.720,
            est_pa: 600.0,
            age: 30,
            position: Position::FirstBase,
            positional_runs: -12.5,
            replacement_runs: 20.0,
            defense: None,
            sprint_speed: None,
        };
        let out = compose(&input);
        assert_eq!(out.runs.defense, 0.0);
        assert_eq!(out.runs.baserunning, 0.0);
        assert!(approx_eq(out.war, 7.5 / 9.5, 1e-12));
    }
}
