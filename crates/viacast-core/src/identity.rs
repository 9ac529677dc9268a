// Player identity resolution across lookup tables that disagree on keys.
//
// The career-WAR table is keyed by numeric player id; every other table is
// keyed by the player's full name as the source spelled it. Resolution is a
// prioritized list of strategies, tried in order until one finds a record.

use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Numeric id from the primary league registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The key used to look a player up in every table.
///
/// `full_name` is always present; `id` only for players tracked in the
/// primary registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerIdentity {
    pub id: Option<PlayerId>,
    pub full_name: String,
}

impl PlayerIdentity {
    pub fn new(id: Option<PlayerId>, full_name: impl Into<String>) -> Self {
        PlayerIdentity {
            id,
            full_name: full_name.into(),
        }
    }

    /// An identity known only by name.
    pub fn named(full_name: impl Into<String>) -> Self {
        Self::new(None, full_name)
    }

    pub fn with_id(id: u64, full_name: impl Into<String>) -> Self {
        Self::new(Some(PlayerId(id)), full_name)
    }
}

impl fmt::Display for PlayerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "{} (#{})", self.full_name, id),
            None => write!(f, "{}", self.full_name),
        }
    }
}

// ---------------------------------------------------------------------------
// Name normalization
// ---------------------------------------------------------------------------

/// Fold a name into the comparison form used by every fuzzy match.
///
/// 1. Lowercase.
/// 2. Canonically decompose and drop combining marks ("í" -> "i").
/// 3. Drop everything outside `[a-z0-9 ]`.
/// 4. Collapse runs of spaces and trim.
///
/// Total and idempotent. Characters with no ASCII base letter ("ø", "ł")
/// are dropped rather than transliterated.
pub fn normalize_name(name: &str) -> String {
    let folded: String = name
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == ' ')
        .collect();

    folded
        .split(' ')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// Keyed tables and resolution strategies
// ---------------------------------------------------------------------------

/// A lookup table that can be searched by the resolution strategies.
pub trait KeyedTable {
    type Record;

    /// Direct lookup by registry id. Name-keyed tables have no id index.
    fn get_by_id(&self, _id: PlayerId) -> Option<&Self::Record> {
        None
    }

    /// Direct lookup by the name exactly as stored.
    fn get_by_name(&self, name: &str) -> Option<&Self::Record>;

    /// Every record with the name it is stored under, in insertion order.
    fn named_records(&self) -> Box<dyn Iterator<Item = (&str, &Self::Record)> + '_>;
}

/// One way of finding a player's record in a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Look up by `id`, when the identity has one.
    ExactId,
    /// Look up by `full_name` verbatim.
    ExactName,
    /// Compare normalized names against every stored record; first hit wins.
    NormalizedName,
}

/// Resolution order for id-keyed tables.
pub const ID_KEYED_ORDER: &[Strategy] = &[
    Strategy::ExactId,
    Strategy::ExactName,
    Strategy::NormalizedName,
];

/// Resolution order for name-keyed tables.
pub const NAME_KEYED_ORDER: &[Strategy] = &[Strategy::ExactName];

impl Strategy {
    /// Apply this strategy alone. Never fails; absence is `None`.
    pub fn apply<'t, T>(self, identity: &PlayerIdentity, table: &'t T) -> Option<&'t T::Record>
    where
        T: KeyedTable + ?Sized,
    {
        match self {
            Strategy::ExactId => identity.id.and_then(|id| table.get_by_id(id)),
            Strategy::ExactName => table.get_by_name(&identity.full_name),
            Strategy::NormalizedName => normalized_match(&identity.full_name, table),
        }
    }
}

/// Try each strategy in `order`; the first record found wins.
pub fn resolve<'t, T>(
    identity: &PlayerIdentity,
    table: &'t T,
    order: &[Strategy],
) -> Option<&'t T::Record>
where
    T: KeyedTable + ?Sized,
{
    order
        .iter()
        .find_map(|strategy| strategy.apply(identity, table))
}

/// A query that normalizes to nothing (e.g. a name in a non-Latin script)
/// matches nothing, rather than every record that also normalizes to nothing.
fn normalized_match<'t, T>(name: &str, table: &'t T) -> Option<&'t T::Record>
where
    T: KeyedTable + ?Sized,
{
    let target = normalize_name(name);
    if target.is_empty() {
        return None;
    }
    table
        .named_records()
        .find(|(stored, _)| normalize_name(stored) == target)
        .map(|(_, record)| record)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{CareerRecord, IdTable, NameTable, SprintSpeed};
    use proptest::{prop_assert, prop_assert_eq, proptest};

    fn career(name: &str, war: f64) -> CareerRecord {
        CareerRecord {
            name: name.into(),
            career_war: war,
        }
    }

    // -- normalization --

    #[test]
    fn strips_accents_and_lowercases() {
        assert_eq!(normalize_name("Martín Pérez"), "martin perez");
        assert_eq!(normalize_name("Martin Perez"), "martin perez");
        assert_eq!(normalize_name("Ronald Acuña Jr."), "ronald acuna jr");
    }

    #[test]
    fn drops_punctuation_and_collapses_whitespace() {
        assert_eq!(normalize_name("  J.P.   Crawford "), "jp crawford");
        assert_eq!(normalize_name("Jazz\tChisholm"), "jazzchisholm");
        assert_eq!(normalize_name("Ke'Bryan Hayes"), "kebryan hayes");
    }

    #[test]
    fn keeps_digits() {
        assert_eq!(normalize_name("Player 2"), "player 2");
    }

    #[test]
    fn empty_and_non_latin_names_normalize_to_empty() {
        assert_eq!(normalize_name(""), "");
        assert_eq!(normalize_name("   "), "");
        assert_eq!(normalize_name("大谷翔平"), "");
    }

    proptest! {
        #[test]
        fn normalization_is_idempotent(s in "\\PC{0,40}") {
            let once = normalize_name(&s);
            prop_assert_eq!(normalize_name(&once), once.clone());
        }

        #[test]
        fn normalized_output_uses_only_allowed_characters(s in "\\PC{0,40}") {
            let out = normalize_name(&s);
            prop_assert!(out.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == ' '));
            prop_assert!(!out.starts_with(' ') && !out.ends_with(' '));
            prop_assert!(!out.contains("  "));
        }
    }

    // -- resolution order --

    #[test]
    fn id_match_wins_over_name() {
        let table: IdTable<CareerRecord> = vec![
            (PlayerId(1), career("Someone Else", 3.0)),
            (PlayerId(2), career("Bobby Witt Jr.", 20.0)),
        ]
        .into_iter()
        .collect();

        let who = PlayerIdentity::with_id(1, "Bobby Witt Jr.");
        let found = resolve(&who, &table, ID_KEYED_ORDER).unwrap();
        assert_eq!(found.name, "Someone Else");
    }

    #[test]
    fn exact_name_used_when_id_missing_or_unknown() {
        let table: IdTable<CareerRecord> =
            vec![(PlayerId(7), career("Juan Soto", 35.0))].into_iter().collect();

        let no_id = PlayerIdentity::named("Juan Soto");
        assert_eq!(resolve(&no_id, &table, ID_KEYED_ORDER).unwrap().career_war, 35.0);

        let unknown_id = PlayerIdentity::with_id(999, "Juan Soto");
        assert_eq!(resolve(&unknown_id, &table, ID_KEYED_ORDER).unwrap().career_war, 35.0);
    }

    #[test]
    fn normalized_fallback_matches_accented_spelling() {
        let table: IdTable<CareerRecord> =
            vec![(PlayerId(10), career("Martin Perez", 12.5))].into_iter().collect();

        let who = PlayerIdentity::with_id(11, "Martín Pérez");
        let found = resolve(&who, &table, ID_KEYED_ORDER).unwrap();
        assert_eq!(found.name, "Martin Perez");
    }

    #[test]
    fn normalized_collision_resolves_to_first_inserted() {
        let table: IdTable<CareerRecord> = vec![
            (PlayerId(20), career("Luis García", 4.0)),
            (PlayerId(21), career("Luis Garcia", 9.0)),
        ]
        .into_iter()
        .collect();

        let who = PlayerIdentity::named("LUIS  GARCIA");
        assert_eq!(resolve(&who, &table, ID_KEYED_ORDER).unwrap().career_war, 4.0);
    }

    #[test]
    fn name_keyed_order_never_fuzzy_matches() {
        let mut table = NameTable::new();
        table.insert("Martin Perez".to_string(), SprintSpeed { feet_per_second: 27.1 });

        let who = PlayerIdentity::named("Martín Pérez");
        assert!(resolve(&who, &table, NAME_KEYED_ORDER).is_none());

        let exact = PlayerIdentity::named("Martin Perez");
        assert!(resolve(&exact, &table, NAME_KEYED_ORDER).is_some());
    }

    #[test]
    fn empty_normalized_query_matches_nothing() {
        let table: IdTable<CareerRecord> =
            vec![(PlayerId(30), career("???", 1.0))].into_iter().collect();

        let who = PlayerIdentity::named("!!!");
        assert!(Strategy::NormalizedName.apply(&who, &table).is_none());
    }

    #[test]
    fn absent_everywhere_is_none() {
        let table: IdTable<CareerRecord> = IdTable::new();
        let who = PlayerIdentity::with_id(1, "Nobody");
        assert!(resolve(&who, &table, ID_KEYED_ORDER).is_none());
    }
}
