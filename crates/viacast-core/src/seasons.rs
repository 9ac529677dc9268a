// Multi-season aggregation into the single raw line the pipeline consumes.

use serde::{Deserialize, Serialize};

use crate::constants::{MIN_SEASON_PA, SEASON_WEIGHTS};

/// One season of a player's batting record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeasonLine {
    pub season: u16,
    pub plate_appearances: u32,
    pub ops: f64,
}

/// Weighted blend of a player's recent seasons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AggregatedLine {
    pub raw_ops: f64,
    pub raw_pa: f64,
    pub seasons_used: usize,
}

/// Blend the most recent qualifying seasons, newest weighted heaviest.
///
/// Seasons with `MIN_SEASON_PA` or fewer plate appearances are ignored.
/// Returns `None` when no season qualifies.
pub fn aggregate_seasons(seasons: &[SeasonLine]) -> Option<AggregatedLine> {
    let mut qualifying: Vec<&SeasonLine> = seasons
        .iter()
        .filter(|s| s.plate_appearances > MIN_SEASON_PA && s.ops.is_finite())
        .collect();
    if qualifying.is_empty() {
        return None;
    }
    qualifying.sort_by(|a, b| b.season.cmp(&a.season));

    let mut weight_sum = 0.0;
    let mut ops_sum = 0.0;
    let mut pa_sum = 0.0;
    for (season, weight) in qualifying.iter().zip(SEASON_WEIGHTS) {
        weight_sum += weight;
        ops_sum += weight * season.ops;
        pa_sum += weight * f64::from(season.plate_appearances);
    }

    Some(AggregatedLine {
        raw_ops: ops_sum / weight_sum,
        raw_pa: pa_sum / weight_sum,
        seasons_used: qualifying.len().min(SEASON_WEIGHTS.len()),
    })
}
