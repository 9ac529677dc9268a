// Fixed model coefficients.
//
// Everything here is part of the model definition rather than league
// context, so none of it is read from config. League-level inputs (league
// OPS, replacement runs, per-position aging) live in `config.rs`.

// ---------------------------------------------------------------------------
// Batted-ball quality (statcast) boost
// ---------------------------------------------------------------------------

/// Weight of the average exit velocity score in the statcast boost.
pub const STATCAST_EV_WEIGHT: f64 = 0.08;
/// Weight of the max exit velocity score in the statcast boost.
pub const STATCAST_MAX_EV_WEIGHT: f64 = 0.05;
/// Weight of the barrel rate score in the statcast boost.
pub const STATCAST_BARREL_WEIGHT: f64 = 0.12;

/// League-average exit velocity (mph). Scores 0.
pub const AVG_EV_BASELINE: f64 = 86.0;
/// Exit velocity range from average to elite (94 mph scores 1).
pub const AVG_EV_SPAN: f64 = 8.0;
/// League-average max exit velocity (mph).
pub const MAX_EV_BASELINE: f64 = 104.0;
pub const MAX_EV_SPAN: f64 = 8.0;
/// League-average barrel rate (percent).
pub const BARREL_BASELINE: f64 = 6.0;
pub const BARREL_SPAN: f64 = 10.0;

// ---------------------------------------------------------------------------
// Expected-outcome (xwOBA) boost
// ---------------------------------------------------------------------------

/// Linear proxy from OPS to an implied wOBA.
pub const OPS_TO_WOBA: f64 = 0.43;
/// xwOBA surplus at or below this is treated as noise.
pub const XWOBA_NOISE_FLOOR: f64 = 0.01;
/// Boost per point of xwOBA surplus.
pub const XWOBA_SLOPE: f64 = 1.5;
/// Largest boost the xwOBA surplus can add on top of 1.0.
pub const XWOBA_MAX_BOOST: f64 = 0.15;

// ---------------------------------------------------------------------------
// Default performance boost
// ---------------------------------------------------------------------------

pub const PERFORMANCE_SLOPE: f64 = 0.8;
pub const PERFORMANCE_MAX_BOOST: f64 = 0.15;

// ---------------------------------------------------------------------------
// Run model
// ---------------------------------------------------------------------------

/// Plate appearances that define one full season of playing time for
/// counting-run components.
pub const FULL_SEASON_RUN_PA: f64 = 600.0;

/// Runs per out above average.
pub const OAA_RUN_VALUE: f64 = 1.75;
/// Runs per defensive run saved (directional adjustment).
pub const DRS_RUN_VALUE: f64 = 1.5;
pub const OAA_BLEND: f64 = 0.70;
pub const DRS_BLEND: f64 = 0.30;
/// Fraction of defensive value lost per year past the defensive peak.
pub const DEFENSIVE_DECAY_PER_YEAR: f64 = 0.06;
/// Defensive peak for catchers and middle infielders.
pub const DEFENSIVE_PEAK_PREMIUM: u32 = 26;
/// Defensive peak for everyone else.
pub const DEFENSIVE_PEAK_STANDARD: u32 = 28;

/// Sprint speed tiers, highest first: (minimum ft/s, runs per 600 PA).
pub const SPEED_TIERS: [(f64, f64); 5] = [
    (29.5, 6.0),
    (28.5, 4.0),
    (28.0, 3.0),
    (27.0, 1.5),
    (26.0, 0.0),
];
/// Runs per 600 PA for anyone slower than the last tier.
pub const SPEED_FLOOR_RUNS: f64 = -2.0;

/// Batting runs per PA per point of wRC+ above 100 (scaled by 1/100).
pub const BATTING_RUNS_PER_PA: f64 = 0.12;
pub const WRC_PLUS_MIN: f64 = 70.0;
pub const WRC_PLUS_MAX: f64 = 170.0;

/// Runs-per-win conversion.
pub const RUNS_PER_WIN: f64 = 9.5;

// ---------------------------------------------------------------------------
// Age curve and trajectory
// ---------------------------------------------------------------------------

pub const PRE_PEAK_GROWTH_PER_YEAR: f64 = 0.025;
pub const PRE_PEAK_GROWTH_CAP: f64 = 0.15;
/// Development risk discount per year before peak.
pub const PRE_PEAK_RISK_PER_YEAR: f64 = 0.015;
pub const PRE_PEAK_FACTOR_MIN: f64 = 0.85;
pub const PRE_PEAK_FACTOR_MAX: f64 = 1.15;
pub const POST_PEAK_FACTOR_MIN: f64 = 0.25;

/// No forward projection past this age.
pub const MAX_PROJECTION_AGE: u32 = 42;
pub const TRAJECTORY_WAR_FLOOR: f64 = -1.0;
pub const TRAJECTORY_OPS_FLOOR: f64 = 0.500;
pub const TRAJECTORY_WRC_PLUS_FLOOR: f64 = 60.0;

// ---------------------------------------------------------------------------
// Season aggregation
// ---------------------------------------------------------------------------

/// Seasons with this many PA or fewer are ignored.
pub const MIN_SEASON_PA: u32 = 30;
/// Weights for the most recent seasons, newest first.
pub const SEASON_WEIGHTS: [f64; 3] = [5.0, 4.0, 3.0];

// ---------------------------------------------------------------------------
// Salary
// ---------------------------------------------------------------------------

pub const DOLLARS_PER_MILLION: f64 = 1_000_000.0;
