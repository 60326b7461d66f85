//! Chord shapes: fret numbers per string, keyed by chord name.
//!
//! The built-in table covers common ukulele chords (strings G-C-E-A, fret 0
//! meaning an open string). Songs may define their own shapes, which take
//! precedence over the defaults for that song only.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The biggest usable fret.
pub const MAX_FRET: u32 = 20;

const UKULELE_CHORDS: &[(&str, [u32; 4])] = &[
    ("A", [2, 1, 0, 0]),
    ("A7", [0, 1, 0, 0]),
    ("Am", [2, 0, 0, 0]),
    ("Bb", [3, 2, 1, 1]),
    ("C", [0, 0, 0, 3]),
    ("C7", [0, 0, 0, 1]),
    ("Cm", [0, 3, 3, 3]),
    ("D", [2, 2, 2, 0]),
    ("D7", [2, 2, 2, 3]),
    ("Db", [1, 1, 1, 4]),
    ("Dm", [2, 2, 1, 0]),
    ("E7", [1, 2, 0, 2]),
    ("Eb", [3, 3, 3, 1]),
    ("F", [2, 0, 1, 0]),
    ("Fm", [1, 0, 1, 3]),
    ("G", [0, 2, 3, 2]),
    ("G7", [0, 2, 1, 2]),
];

/// Mapping of chord name to one fret number per string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChordTable {
    shapes: BTreeMap<String, Vec<u32>>,
}

impl ChordTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in ukulele chord table.
    pub fn ukulele() -> Self {
        UKULELE_CHORDS
            .iter()
            .map(|(name, frets)| (name.to_string(), frets.to_vec()))
            .collect()
    }

    /// Insert or replace a shape, returning the previous one.
    pub fn insert(&mut self, name: impl Into<String>, frets: Vec<u32>) -> Option<Vec<u32>> {
        self.shapes.insert(name.into(), frets)
    }

    pub fn get(&self, name: &str) -> Option<&[u32]> {
        self.shapes.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.shapes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u32])> {
        self.shapes.iter().map(|(n, f)| (n.as_str(), f.as_slice()))
    }

    /// Number of strings, taken from the table's shapes. `None` for an empty table.
    pub fn string_count(&self) -> Option<usize> {
        self.shapes.values().next().map(Vec::len)
    }

    /// Copy every shape of `other` into this table, replacing same-named ones.
    pub fn extend_from(&mut self, other: &ChordTable) {
        for (name, frets) in other.iter() {
            self.insert(name, frets.to_vec());
        }
    }

    /// Look up names in `local` first, then in this table.
    pub fn overlay<'a>(&'a self, local: &'a ChordTable) -> ChordLookup<'a> {
        ChordLookup {
            local,
            defaults: self,
        }
    }
}

impl FromIterator<(String, Vec<u32>)> for ChordTable {
    fn from_iter<I: IntoIterator<Item = (String, Vec<u32>)>>(iter: I) -> Self {
        Self {
            shapes: iter.into_iter().collect(),
        }
    }
}

/// Song-local shapes layered over a default table.
#[derive(Debug, Clone, Copy)]
pub struct ChordLookup<'a> {
    local: &'a ChordTable,
    defaults: &'a ChordTable,
}

impl<'a> ChordLookup<'a> {
    pub fn get(&self, name: &str) -> Option<&'a [u32]> {
        self.local.get(name).or_else(|| self.defaults.get(name))
    }
}
