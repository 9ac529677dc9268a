// Immutable lookup tables and the records they hold.
//
// Tables are built once (by the loaders in `loader.rs` or directly in code)
// and then only ever read through `&LookupTables`. Every table may be
// missing any given player; absence is an ordinary `None`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::identity::{
    resolve, KeyedTable, PlayerId, PlayerIdentity, ID_KEYED_ORDER, NAME_KEYED_ORDER,
};

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Career WAR keyed by registry id. `name` is the source-of-truth spelling
/// used by the normalized-name fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerRecord {
    pub name: String,
    #[serde(rename = "careerWAR")]
    pub career_war: f64,
}

/// Batted-ball quality.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityProfile {
    /// Average exit velocity, mph.
    pub avg_exit_velocity: f64,
    /// Max exit velocity, mph.
    pub max_exit_velocity: f64,
    /// Barrels per batted ball event, percent.
    pub barrel_rate: f64,
}

/// Expected outcome rates from quality of contact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpectedOutcomeProfile {
    pub xwoba: f64,
    pub xba: f64,
    pub xslg: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefensiveProfile {
    pub outs_above_average: i32,
    pub defensive_runs_saved: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SprintSpeed {
    pub feet_per_second: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compensation {
    pub annual_salary: u64,
}

/// Records that carry their own display name.
pub trait NamedRecord {
    fn name(&self) -> &str;
}

impl NamedRecord for CareerRecord {
    fn name(&self) -> &str {
        &self.name
    }
}

// ---------------------------------------------------------------------------
// IdTable
// ---------------------------------------------------------------------------

/// Records keyed by registry id, indexed by id and by stored name.
///
/// Insertion order is preserved; it decides ties in the normalized-name
/// fallback.
#[derive(Debug, Clone)]
pub struct IdTable<R> {
    records: Vec<(PlayerId, R)>,
    by_id: HashMap<PlayerId, usize>,
    by_name: HashMap<String, usize>,
}

impl<R> Default for IdTable<R> {
    fn default() -> Self {
        IdTable {
            records: Vec::new(),
            by_id: HashMap::new(),
            by_name: HashMap::new(),
        }
    }
}

impl<R: NamedRecord> IdTable<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record. A duplicate id keeps the existing record and returns
    /// `false`. A duplicate stored name is still inserted, but the name index
    /// keeps pointing at the first record with that name.
    pub fn insert(&mut self, id: PlayerId, record: R) -> bool {
        if self.by_id.contains_key(&id) {
            return false;
        }
        let idx = self.records.len();
        self.by_name.entry(record.name().to_string()).or_insert(idx);
        self.by_id.insert(id, idx);
        self.records.push((id, record));
        true
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &R)> {
        self.records.iter().map(|(id, r)| (*id, r))
    }
}

impl<R: NamedRecord> FromIterator<(PlayerId, R)> for IdTable<R> {
    fn from_iter<I: IntoIterator<Item = (PlayerId, R)>>(iter: I) -> Self {
        let mut table = IdTable::new();
        for (id, record) in iter {
            table.insert(id, record);
        }
        table
    }
}

impl<R: NamedRecord> KeyedTable for IdTable<R> {
    type Record = R;

    fn get_by_id(&self, id: PlayerId) -> Option<&R> {
        self.by_id.get(&id).map(|&idx| &self.records[idx].1)
    }

    fn get_by_name(&self, name: &str) -> Option<&R> {
        self.by_name.get(name).map(|&idx| &self.records[idx].1)
    }

    fn named_records(&self) -> Box<dyn Iterator<Item = (&str, &R)> + '_> {
        Box::new(self.records.iter().map(|(_, r)| (r.name(), r)))
    }
}

// ---------------------------------------------------------------------------
// NameTable
// ---------------------------------------------------------------------------

/// Records keyed by the player's full name exactly as the source spelled it.
#[derive(Debug, Clone)]
pub struct NameTable<R> {
    records: Vec<(String, R)>,
    by_name: HashMap<String, usize>,
}

impl<R> Default for NameTable<R> {
    fn default() -> Self {
        NameTable {
            records: Vec::new(),
            by_name: HashMap::new(),
        }
    }
}

impl<R> NameTable<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record. A duplicate name keeps the existing record and
    /// returns `false`.
    pub fn insert(&mut self, name: String, record: R) -> bool {
        if self.by_name.contains_key(&name) {
            return false;
        }
        self.by_name.insert(name.clone(), self.records.len());
        self.records.push((name, record));
        true
    }

    pub fn get(&self, name: &str) -> Option<&R> {
        self.by_name.get(name).map(|&idx| &self.records[idx].1)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<R> FromIterator<(String, R)> for NameTable<R> {
    fn from_iter<I: IntoIterator<Item = (String, R)>>(iter: I) -> Self {
        let mut table = NameTable::new();
        for (name, record) in iter {
            table.insert(name, record);
        }
        table
    }
}

impl<R> KeyedTable for NameTable<R> {
    type Record = R;

    fn get_by_name(&self, name: &str) -> Option<&R> {
        self.get(name)
    }

    fn named_records(&self) -> Box<dyn Iterator<Item = (&str, &R)> + '_> {
        Box::new(self.records.iter().map(|(n, r)| (n.as_str(), r)))
    }
}

// ---------------------------------------------------------------------------
// LookupTables
// ---------------------------------------------------------------------------

/// Every table a projection reads, bundled as one read-only context.
#[derive(Debug, Clone, Default)]
pub struct LookupTables {
    pub career_war: IdTable<CareerRecord>,
    pub quality: NameTable<QualityProfile>,
    pub expected_outcomes: NameTable<ExpectedOutcomeProfile>,
    pub defense: NameTable<DefensiveProfile>,
    pub sprint_speed: NameTable<SprintSpeed>,
    pub compensation: NameTable<Compensation>,
}

impl LookupTables {
    /// Career WAR: id, then exact name, then normalized name.
    pub fn career_for(&self, who: &PlayerIdentity) -> Option<&CareerRecord> {
        resolve(who, &self.career_war, ID_KEYED_ORDER)
    }

    pub fn quality_for(&self, who: &PlayerIdentity) -> Option<&QualityProfile> {
        resolve(who, &self.quality, NAME_KEYED_ORDER)
    }

    pub fn expected_for(&self, who: &PlayerIdentity) -> Option<&ExpectedOutcomeProfile> {
        resolve(who, &self.expected_outcomes, NAME_KEYED_ORDER)
    }

    pub fn defense_for(&self, who: &PlayerIdentity) -> Option<&DefensiveProfile> {
        resolve(who, &self.defense, NAME_KEYED_ORDER)
    }

    pub fn sprint_speed_for(&self, who: &PlayerIdentity) -> Option<&SprintSpeed> {
        resolve(who, &self.sprint_speed, NAME_KEYED_ORDER)
    }

    pub fn compensation_for(&self, who: &PlayerIdentity) -> Option<&Compensation> {
        resolve(who, &self.compensation, NAME_KEYED_ORDER)
    }
}
