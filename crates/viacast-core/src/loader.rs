// Lookup-table and stat-line loading.
//
// JSON tables come from the acquisition scripts as objects keyed by player
// id or name; CSV tables follow Baseball Savant export headers. Objects are
// read in file order (serde_json `preserve_order`), which fixes the
// tie-break for normalized-name collisions.

use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

use crate::config::DataPaths;
use crate::identity::{PlayerId, PlayerIdentity};
use crate::position::Position;
use crate::seasons::SeasonLine;
use crate::tables::{
    CareerRecord, Compensation, DefensiveProfile, ExpectedOutcomeProfile, IdTable,
    LookupTables, NameTable, QualityProfile, SprintSpeed,
};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Stat-line rows
// ---------------------------------------------------------------------------

/// Every season row loaded for one player, grouped in first-seen order.
///
/// `age` and `position` come from the player's most recent season row that
/// carries them; either may be absent.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRow {
    pub identity: PlayerIdentity,
    pub age: Option<u32>,
    pub position: Option<Position>,
    pub seasons: Vec<SeasonLine>,
}

// ---------------------------------------------------------------------------
// Raw serde structs (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawCareer {
    name: String,
    careerWAR: f64,
}

#[derive(Debug, Deserialize)]
struct RawExpected {
    xwoba: f64,
    #[serde(default)]
    xba: f64,
    #[serde(default)]
    xslg: f64,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawQuality {
    Name: String,
    #[serde(alias = "avg_hit_speed")]
    avgEV: f64,
    #[serde(alias = "max_hit_speed")]
    maxEV: f64,
    #[serde(alias = "brl_percent")]
    barrelPct: f64,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawDefense {
    Name: String,
    #[serde(alias = "outs_above_average")]
    OAA: f64,
    #[serde(default)]
    DRS: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawSprintSpeed {
    Name: String,
    #[serde(alias = "Speed", alias = "sprint_speed")]
    SprintSpeed: f64,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawStatLine {
    #[serde(default)]
    PlayerId: Option<u64>,
    Name: String,
    #[serde(default)]
    Age: Option<u32>,
    #[serde(default)]
    Pos: Option<String>,
    Season: u16,
    PA: f64,
    OPS: f64,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

fn insert_named<R>(table: &mut NameTable<R>, kind: &str, name: String, record: R) {
    if name.is_empty() {
        warn!("skipping {} entry with an empty name", kind);
        return;
    }
    if !table.insert(name.clone(), record) {
        warn!("duplicate {} entry for '{}', keeping first", kind, name);
    }
}

fn open(path: &Path) -> Result<std::fs::File, TableError> {
    std::fs::File::open(path).map_err(|e| TableError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

fn json_err(path: &Path) -> impl FnOnce(serde_json::Error) -> TableError + '_ {
    move |e| TableError::Json {
        path: path.display().to_string(),
        source: e,
    }
}

fn csv_err(path: &Path) -> impl FnOnce(csv::Error) -> TableError + '_ {
    move |e| TableError::Csv {
        path: path.display().to_string(),
        source: e,
    }
}

type JsonObject = serde_json::Map<String, serde_json::Value>;

// ---------------------------------------------------------------------------
// Reader-based loaders (private, enable testing without temp files)
// ---------------------------------------------------------------------------

fn load_career_from_reader<R: Read>(rdr: R) -> Result<IdTable<CareerRecord>, serde_json::Error> {
    let object: JsonObject = serde_json::from_reader(rdr)?;
    let mut table = IdTable::new();
    for (key, value) in object {
        let Ok(id) = key.trim().parse::<u64>() else {
            warn!("skipping career WAR entry with non-numeric id '{}'", key);
            continue;
        };
        let raw: RawCareer = match serde_json::from_value(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("skipping malformed career WAR entry {}: {}", id, e);
                continue;
            }
        };
        if !raw.careerWAR.is_finite() {
            warn!("skipping career WAR entry {}: non-finite careerWAR", id);
            continue;
        }
        let record = CareerRecord {
            name: raw.name.trim().to_string(),
            career_war: raw.careerWAR,
        };
        if !table.insert(PlayerId(id), record) {
            warn!("duplicate career WAR id {}, keeping first", id);
        }
    }
    Ok(table)
}

fn load_expected_from_reader<R: Read>(
    rdr: R,
) -> Result<NameTable<ExpectedOutcomeProfile>, serde_json::Error> {
    let object: JsonObject = serde_json::from_reader(rdr)?;
    let mut table = NameTable::new();
    for (name, value) in object {
        let name = name.trim().to_string();
        let raw: RawExpected = match serde_json::from_value(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("skipping malformed expected-outcome entry '{}': {}", name, e);
                continue;
            }
        };
        if !all_finite(&[raw.xwoba, raw.xba, raw.xslg]) {
            warn!("skipping expected-outcome entry '{}': non-finite value", name);
            continue;
        }
        let profile = ExpectedOutcomeProfile {
            xwoba: raw.xwoba,
            xba: raw.xba,
            xslg: raw.xslg,
        };
        insert_named(&mut table, "expected-outcome", name, profile);
    }
    Ok(table)
}

fn load_compensation_from_reader<R: Read>(
    rdr: R,
) -> Result<NameTable<Compensation>, serde_json::Error> {
    let object: JsonObject = serde_json::from_reader(rdr)?;
    let mut table = NameTable::new();
    for (name, value) in object {
        let name = name.trim().to_string();
        let salary = value
            .as_u64()
            .or_else(|| value.as_f64().filter(|s| s.is_finite() && *s >= 1.0).map(|s| s.round() as u64));
        match salary {
            Some(annual_salary) if annual_salary > 0 => {
                insert_named(&mut table, "compensation", name, Compensation { annual_salary });
            }
            _ => warn!("skipping compensation entry '{}': salary {} is not positive", name, value),
        }
    }
    Ok(table)
}

fn load_quality_from_reader<R: Read>(rdr: R) -> Result<NameTable<QualityProfile>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut table = NameTable::new();
    for result in reader.deserialize::<RawQuality>() {
        match result {
            Ok(raw) => {
                if !all_finite(&[raw.avgEV, raw.maxEV, raw.barrelPct]) {
                    warn!("skipping quality row '{}': non-finite value", raw.Name.trim());
                    continue;
                }
                let profile = QualityProfile {
                    avg_exit_velocity: raw.avgEV,
                    max_exit_velocity: raw.maxEV,
                    barrel_rate: raw.barrelPct,
                };
                insert_named(&mut table, "quality", raw.Name.trim().to_string(), profile);
            }
            Err(e) => {
                warn!("skipping malformed quality row: {}", e);
            }
        }
    }
    Ok(table)
}

fn load_defense_from_reader<R: Read>(rdr: R) -> Result<NameTable<DefensiveProfile>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut table = NameTable::new();
    for result in reader.deserialize::<RawDefense>() {
        match result {
            Ok(raw) => {
                let drs = raw.DRS.unwrap_or(0.0);
                if !all_finite(&[raw.OAA, drs]) {
                    warn!("skipping defense row '{}': non-finite value", raw.Name.trim());
                    continue;
                }
                let profile = DefensiveProfile {
                    outs_above_average: raw.OAA.round() as i32,
                    defensive_runs_saved: drs.round() as i32,
                };
                insert_named(&mut table, "defense", raw.Name.trim().to_string(), profile);
            }
            Err(e) => {
                warn!("skipping malformed defense row: {}", e);
            }
        }
    }
    Ok(table)
}

fn load_sprint_speed_from_reader<R: Read>(rdr: R) -> Result<NameTable<SprintSpeed>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut table = NameTable::new();
    for result in reader.deserialize::<RawSprintSpeed>() {
        match result {
            Ok(raw) => {
                if !raw.SprintSpeed.is_finite() || raw.SprintSpeed <= 0.0 {
                    warn!(
                        "skipping sprint speed row '{}': invalid speed {}",
                        raw.Name.trim(),
                        raw.SprintSpeed
                    );
                    continue;
                }
                let speed = SprintSpeed {
                    feet_per_second: raw.SprintSpeed,
                };
                insert_named(&mut table, "sprint speed", raw.Name.trim().to_string(), speed);
            }
            Err(e) => {
                warn!("skipping malformed sprint speed row: {}", e);
            }
        }
    }
    Ok(table)
}

fn load_stat_lines_from_reader<R: Read>(rdr: R) -> Result<Vec<PlayerRow>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut rows: Vec<PlayerRow> = Vec::new();
    // Season that supplied each player's current age and position.
    let mut sources: Vec<FieldSeasons> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for result in reader.deserialize::<RawStatLine>() {
        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                warn!("skipping malformed stat line: {}", e);
                continue;
            }
        };
        let name = raw.Name.trim().to_string();
        if name.is_empty() {
            warn!("skipping stat line with an empty name");
            continue;
        }
        if !all_finite(&[raw.PA, raw.OPS]) || raw.PA < 0.0 || raw.OPS < 0.0 {
            warn!("skipping season {} for '{}': invalid PA/OPS", raw.Season, name);
            continue;
        }

        let key = match raw.PlayerId {
            Some(id) => format!("id:{id}"),
            None => format!("name:{name}"),
        };
        let idx = *index.entry(key).or_insert_with(|| {
            rows.push(PlayerRow {
                identity: PlayerIdentity::new(raw.PlayerId.map(PlayerId), name.clone()),
                age: None,
                position: None,
                seasons: Vec::new(),
            });
            sources.push(FieldSeasons::default());
            rows.len() - 1
        });

        let row = &mut rows[idx];
        row.seasons.push(SeasonLine {
            season: raw.Season,
            plate_appearances: raw.PA.round() as u32,
            ops: raw.OPS,
        });

        let src = &mut sources[idx];
        if let Some(age) = raw.Age {
            if is_newer(raw.Season, src.age) {
                src.age = Some(raw.Season);
                row.age = Some(age);
            }
        }
        if let Some(pos) = raw.Pos.as_deref().filter(|p| !p.trim().is_empty()) {
            match Position::from_str_pos(pos) {
                Some(position) if is_newer(raw.Season, src.position) => {
                    src.position = Some(raw.Season);
                    row.position = Some(position);
                }
                Some(_) => {}
                None => warn!("'{}' has non-fielding position '{}'", name, pos),
            }
        }
    }
    Ok(rows)
}

#[derive(Default)]
struct FieldSeasons {
    age: Option<u16>,
    position: Option<u16>,
}

/// Ties go to the later row.
fn is_newer(season: u16, current: Option<u16>) -> bool {
    current.map_or(true, |seen| season >= seen)
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

/// Load the career WAR table (`{ "<id>": { "name", "careerWAR" } }`).
pub fn load_career_war(path: &Path) -> Result<IdTable<CareerRecord>, TableError> {
    load_career_from_reader(open(path)?).map_err(json_err(path))
}

/// Load expected outcomes (`{ "<name>": { "xwoba", "xba", "xslg" } }`).
pub fn load_expected_outcomes(
    path: &Path,
) -> Result<NameTable<ExpectedOutcomeProfile>, TableError> {
    load_expected_from_reader(open(path)?).map_err(json_err(path))
}

/// Load salaries (`{ "<name>": salary }`).
pub fn load_compensation(path: &Path) -> Result<NameTable<Compensation>, TableError> {
    load_compensation_from_reader(open(path)?).map_err(json_err(path))
}

pub fn load_quality(path: &Path) -> Result<NameTable<QualityProfile>, TableError> {
    load_quality_from_reader(open(path)?).map_err(csv_err(path))
}

pub fn load_defense(path: &Path) -> Result<NameTable<DefensiveProfile>, TableError> {
    load_defense_from_reader(open(path)?).map_err(csv_err(path))
}

pub fn load_sprint_speed(path: &Path) -> Result<NameTable<SprintSpeed>, TableError> {
    load_sprint_speed_from_reader(open(path)?).map_err(csv_err(path))
}

/// Load every lookup table named in `paths`.
pub fn load_tables(paths: &DataPaths) -> Result<LookupTables, TableError> {
    let tables = LookupTables {
        career_war: load_career_war(Path::new(&paths.career_war))?,
        quality: load_quality(Path::new(&paths.quality))?,
        expected_outcomes: load_expected_outcomes(Path::new(&paths.expected_outcomes))?,
        defense: load_defense(Path::new(&paths.defense))?,
        sprint_speed: load_sprint_speed(Path::new(&paths.sprint_speed))?,
        compensation: load_compensation(Path::new(&paths.compensation))?,
    };

    info!(
        "loaded lookup tables: career_war={} quality={} expected={} defense={} sprint_speed={} compensation={}",
        tables.career_war.len(),
        tables.quality.len(),
        tables.expected_outcomes.len(),
        tables.defense.len(),
        tables.sprint_speed.len(),
        tables.compensation.len(),
    );

    Ok(tables)
}

/// Load per-season stat lines (`PlayerId,Name,Age,Pos,Season,PA,OPS`),
/// grouped by player. Rows with a `PlayerId` group by id, the rest by name.
pub fn load_stat_lines(path: &Path) -> Result<Vec<PlayerRow>, TableError> {
    let rows = load_stat_lines_from_reader(open(path)?).map_err(csv_err(path))?;
    if rows.is_empty() {
        return Err(TableError::Validation(format!(
            "stat line file {} produced zero valid rows",
            path.display()
        )));
    }
    info!("loaded stat lines for {} players", rows.len());
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
