// Forward trajectory: year-by-year outlook from a single-season projection.

use serde::Serialize;

use crate::aging::AgeCurve;
use crate::constants::{
    MAX_PROJECTION_AGE, TRAJECTORY_OPS_FLOOR, TRAJECTORY_WAR_FLOOR, TRAJECTORY_WRC_PLUS_FLOOR,
};
use crate::position::Position;

/// One projected future season.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeasonOutlook {
    pub age: u32,
    /// 0 for the projected season itself.
    pub season_offset: u32,
    pub war: f64,
    pub wrc_plus: f64,
    pub ops: f64,
}

/// Scale a projection across the next `years` seasons with `curve`.
///
/// Stops early once the player would pass `MAX_PROJECTION_AGE`.
pub fn project_forward(
    war: f64,
    wrc_plus: f64,
    projected_ops: f64,
    age: u32,
    position: Position,
    years: u32,
    curve: &dyn AgeCurve,
) -> Vec<SeasonOutlook> {
    (0..years)
        .map(|offset| (offset, age + offset))
        .take_while(|&(_, season_age)| season_age <= MAX_PROJECTION_AGE)
        .map(|(offset, season_age)| {
            let f = curve.factor(season_age, position);
            SeasonOutlook {
                age: season_age,
                season_offset: offset,
                war: (war * f).max(TRAJECTORY_WAR_FLOOR),
                wrc_plus: (100.0 + (wrc_plus - 100.0) * f)
                    .round()
                    .max(TRAJECTORY_WRC_PLUS_FLOOR),
                ops: (projected_ops * curve.rate_boost(season_age, position))
                    .max(TRAJECTORY_OPS_FLOOR),
            }
        })
        .collect()
}

/// Sum of positive WAR across the outlook; negative seasons count as zero.
pub fn cumulative_war(outlook: &[SeasonOutlook]) -> f64 {
    outlook.iter().map(|s| s.war.max(0.0)).sum()
}
