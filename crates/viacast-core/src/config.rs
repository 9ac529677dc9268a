// Configuration loading and parsing (engine.toml).

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::position::{Position, CONFIGURED_POSITIONS};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to write default config: {message}")]
    DefaultsWriteError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub model: ModelConfig,
    pub data_paths: DataPaths,
}

/// League context and tunable model inputs. Fixed coefficients live in
/// `constants.rs`.
#[derive(Debug, Clone, Default)]
pub struct ModelConfig {
    pub league: LeagueConfig,
    pub regression: RegressionConfig,
    pub playing_time: PlayingTimeConfig,
    pub performance: PerformanceConfig,
    pub aging: AgingTable,
}

// ---------------------------------------------------------------------------
// engine.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire engine.toml file.
#[derive(Debug, Clone, Deserialize)]
struct EngineFile {
    league: LeagueConfig,
    regression: RegressionConfig,
    playing_time: PlayingTimeConfig,
    performance: PerformanceConfig,
    positions: BTreeMap<String, AgingParams>,
    fallback_position: AgingParams,
    data_paths: DataPaths,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    /// League-average OPS; the regression target and the wRC+ baseline.
    pub league_ops: f64,
    /// Salary assumed for players missing from the compensation table.
    pub league_minimum_salary: u64,
    /// Replacement-level runs per 600 PA.
    pub replacement_runs: f64,
}

impl Default for LeagueConfig {
    fn default() -> Self {
        LeagueConfig {
            league_ops: 0.720,
            league_minimum_salary: 760_000,
            replacement_runs: 20.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegressionConfig {
    pub full_season_pa: f64,
    pub max_reliability: f64,
}

impl Default for RegressionConfig {
    fn default() -> Self {
        RegressionConfig {
            full_season_pa: 700.0,
            max_reliability: 0.90,
        }
    }
}

impl RegressionConfig {
    /// Share of a full season the player's sample represents, capped at
    /// `max_reliability`.
    pub fn reliability(&self, raw_pa: f64) -> f64 {
        (raw_pa / self.full_season_pa).clamp(0.0, self.max_reliability)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayingTimeConfig {
    pub pa_factor: f64,
    pub max_pa: f64,
}

impl Default for PlayingTimeConfig {
    fn default() -> Self {
        PlayingTimeConfig {
            pa_factor: 0.95,
            max_pa: 680.0,
        }
    }
}

impl PlayingTimeConfig {
    /// Estimated plate appearances for the projected season.
    pub fn estimate_pa(&self, raw_pa: f64) -> f64 {
        (raw_pa * self.pa_factor).clamp(0.0, self.max_pa)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PerformanceConfig {
    /// OPS above which the default performance boost kicks in.
    pub elite_ops_threshold: f64,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        PerformanceConfig {
            elite_ops_threshold: 0.800,
        }
    }
}

/// Per-position aging and positional value.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct AgingParams {
    pub peak_age: u32,
    /// Fraction of value lost per year past the peak.
    pub decline_rate: f64,
    /// Positional adjustment, runs per 600 PA.
    pub positional_runs: f64,
}

impl AgingParams {
    const fn new(peak_age: u32, decline_rate: f64, positional_runs: f64) -> Self {
        AgingParams {
            peak_age,
            decline_rate,
            positional_runs,
        }
    }
}

/// Aging parameters keyed by position, with a fallback for positions the
/// table does not name.
#[derive(Debug, Clone)]
pub struct AgingTable {
    by_position: HashMap<Position, AgingParams>,
    fallback: AgingParams,
}

impl AgingTable {
    pub fn new(by_position: HashMap<Position, AgingParams>, fallback: AgingParams) -> Self {
        AgingTable {
            by_position,
            fallback,
        }
    }

    pub fn params(&self, position: Position) -> AgingParams {
        self.by_position
            .get(&position)
            .copied()
            .unwrap_or(self.fallback)
    }

    pub fn fallback(&self) -> AgingParams {
        self.fallback
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, AgingParams)> + '_ {
        self.by_position.iter().map(|(pos, p)| (*pos, *p))
    }
}

impl Default for AgingTable {
    fn default() -> Self {
        let params = [
            AgingParams::new(27, 0.042, -12.5),
            AgingParams::new(28, 0.032, -12.5),
            AgingParams::new(27, 0.038, 2.5),
            AgingParams::new(27, 0.035, 2.5),
            AgingParams::new(26, 0.040, 7.5),
            AgingParams::new(28, 0.033, -7.5),
            AgingParams::new(27, 0.037, 2.5),
            AgingParams::new(28, 0.034, -7.5),
            AgingParams::new(29, 0.030, -17.5),
        ];
        let by_position = CONFIGURED_POSITIONS
            .iter()
            .copied()
            .zip(params)
            .collect();
        AgingTable::new(by_position, AgingParams::new(28, 0.035, 0.0))
    }
}

/// Paths to the lookup tables and the stat-line file, relative to the base
/// directory unless absolute.
#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub career_war: String,
    pub quality: String,
    pub expected_outcomes: String,
    pub defense: String,
    pub sprint_speed: String,
    pub compensation: String,
    pub stat_lines: String,
}

impl DataPaths {
    /// Resolve every path against `base_dir`.
    pub fn resolved(&self, base_dir: &Path) -> DataPaths {
        let join = |p: &String| base_dir.join(p).to_string_lossy().into_owned();
        DataPaths {
            career_war: join(&self.career_war),
            quality: join(&self.quality),
            expected_outcomes: join(&self.expected_outcomes),
            defense: join(&self.defense),
            sprint_speed: join(&self.sprint_speed),
            compensation: join(&self.compensation),
            stat_lines: join(&self.stat_lines),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/engine.toml` relative to `base_dir`.
///
/// Does not auto-copy defaults; prefer `load_config()` for that.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let engine_path = base_dir.join("config").join("engine.toml");
    let engine_text = read_file(&engine_path)?;
    let engine_file: EngineFile =
        toml::from_str(&engine_text).map_err(|e| ConfigError::ParseError {
            path: engine_path.clone(),
            source: e,
        })?;

    let mut by_position = HashMap::new();
    for (key, params) in engine_file.positions {
        let position =
            Position::from_str_pos(&key).ok_or_else(|| ConfigError::ValidationError {
                field: format!("positions.{key}"),
                message: "not a recognized fielding position".into(),
            })?;
        by_position.insert(position, params);
    }

    let config = Config {
        model: ModelConfig {
            league: engine_file.league,
            regression: engine_file.regression,
            playing_time: engine_file.playing_time,
            performance: engine_file.performance,
            aging: AgingTable::new(by_position, engine_file.fallback_position),
        },
        data_paths: engine_file.data_paths,
    };

    validate(&config)?;

    Ok(config)
}

/// Shipped `defaults/engine.toml`, compiled into the binary.
pub const DEFAULT_ENGINE_TOML: &str = include_str!("../defaults/engine.toml");

/// Write the default `config/engine.toml` under `base_dir` unless one exists.
///
/// Returns the path written, or `None` when an existing file was kept.
pub fn ensure_engine_config(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let config_dir = base_dir.join("config");
    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsWriteError {
        message: format!("failed to create {}: {e}", config_dir.display()),
    })?;

    let target = config_dir.join("engine.toml");
    match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&target)
    {
        Ok(mut dest) => {
            std::io::Write::write_all(&mut dest, DEFAULT_ENGINE_TOML.as_bytes()).map_err(|e| {
                ConfigError::DefaultsWriteError {
                    message: format!("failed to write {}: {e}", target.display()),
                }
            })?;
            Ok(Some(target))
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(None),
        Err(e) => Err(ConfigError::DefaultsWriteError {
            message: format!("failed to create {}: {e}", target.display()),
        }),
    }
}

/// Load config relative to the current working directory, writing the
/// default engine.toml first if none exists.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_engine_config(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn invalid(field: impl Into<String>, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let model = &config.model;

    let positive_fields: &[(&str, f64)] = &[
        ("league.league_ops", model.league.league_ops),
        ("regression.full_season_pa", model.regression.full_season_pa),
        ("playing_time.max_pa", model.playing_time.max_pa),
        (
            "performance.elite_ops_threshold",
            model.performance.elite_ops_threshold,
        ),
    ];
    for (name, val) in positive_fields {
        if !val.is_finite() || *val <= 0.0 {
            return Err(invalid(*name, format!("must be > 0, got {val}")));
        }
    }

    if model.league.league_minimum_salary == 0 {
        return Err(invalid("league.league_minimum_salary", "must be greater than 0"));
    }

    if !model.league.replacement_runs.is_finite() {
        return Err(invalid(
            "league.replacement_runs",
            format!("must be finite, got {}", model.league.replacement_runs),
        ));
    }

    let unit_fields: &[(&str, f64)] = &[
        ("regression.max_reliability", model.regression.max_reliability),
        ("playing_time.pa_factor", model.playing_time.pa_factor),
    ];
    for (name, val) in unit_fields {
        if val.is_nan() || *val <= 0.0 || *val > 1.0 {
            return Err(invalid(
                *name,
                format!("must be in (0.0, 1.0], got {val}"),
            ));
        }
    }

    for (position, params) in model.aging.iter() {
        validate_aging(&format!("positions.{position}"), &params)?;
    }
    validate_aging("fallback_position", &model.aging.fallback())?;

    Ok(())
}

fn validate_aging(prefix: &str, params: &AgingParams) -> Result<(), ConfigError> {
    if params.peak_age == 0 {
        return Err(invalid(format!("{prefix}.peak_age"), "must be greater than 0"));
    }
    if !(0.0..1.0).contains(&params.decline_rate) {
        return Err(invalid(
            format!("{prefix}.decline_rate"),
            format!("must be in [0.0, 1.0), got {}", params.decline_rate),
        ));
    }
    if !params.positional_runs.is_finite() {
        return Err(invalid(
            format!("{prefix}.positional_runs"),
            format!("must be finite, got {}", params.positional_runs),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
