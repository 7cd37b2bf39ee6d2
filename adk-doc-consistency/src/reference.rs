//! The reference table: ground truth about the reference implementation.
//!
//! A [`ReferenceTable`] is an unvalidated bag of [`SymbolFact`]s as produced by
//! a builder or loaded from disk. Before evaluation it is turned into a
//! [`ReferenceIndex`], which rejects conflicting facts and offers exact
//! `(subject path, fact kind)` lookups.

use crate::error::{CheckError, Result};
use crate::model::{FactKind, SymbolFact};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// All facts collected for one review run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceTable {
    pub facts: Vec<SymbolFact>,
}

impl ReferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_facts(facts: Vec<SymbolFact>) -> Self {
        Self { facts }
    }

    pub fn push(&mut self, fact: SymbolFact) {
        self.facts.push(fact);
    }

    pub fn extend(&mut self, facts: impl IntoIterator<Item = SymbolFact>) {
        self.facts.extend(facts);
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Validate the table and build a lookup index.
    ///
    /// Facts that repeat with an equal (normalized) value collapse into one.
    /// Facts that share a subject path and kind but disagree on the value make
    /// the whole table invalid.
    pub fn index(&self) -> Result<ReferenceIndex> {
        let mut by_path: BTreeMap<String, BTreeMap<FactKind, SymbolFact>> = BTreeMap::new();

        for fact in &self.facts {
            let kinds = by_path.entry(fact.subject_path.clone()).or_default();
            match kinds.entry(fact.kind) {
                Entry::Vacant(slot) => {
                    slot.insert(fact.clone());
                }
                Entry::Occupied(existing) => {
                    let existing = existing.get();
                    if !existing.value.matches(&fact.value, fact.kind) {
                        return Err(CheckError::InvalidReferenceTable {
                            subject_path: fact.subject_path.clone(),
                            kind: fact.kind,
                            first: existing.value.to_string(),
                            second: fact.value.to_string(),
                        });
                    }
                }
            }
        }

        let mut by_naming_key: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for path in by_path.keys() {
            by_naming_key.entry(naming_key(path)).or_default().push(path.clone());
        }

        Ok(ReferenceIndex { by_path, by_naming_key })
    }
}

impl FromIterator<SymbolFact> for ReferenceTable {
    fn from_iter<I: IntoIterator<Item = SymbolFact>>(iter: I) -> Self {
        Self { facts: iter.into_iter().collect() }
    }
}

/// Validated, read-only view of a [`ReferenceTable`].
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    by_path: BTreeMap<String, BTreeMap<FactKind, SymbolFact>>,
    /// Paths grouped by [`naming_key`], sorted within each group.
    by_naming_key: BTreeMap<String, Vec<String>>,
}

impl ReferenceIndex {
    /// The fact recorded for exactly this subject path and kind.
    pub fn lookup(&self, subject_path: &str, kind: FactKind) -> Option<&SymbolFact> {
        self.by_path.get(subject_path).and_then(|kinds| kinds.get(&kind))
    }

    /// Kinds of fact known for a subject path, in a stable order.
    pub fn kinds_for(&self, subject_path: &str) -> Vec<FactKind> {
        self.by_path
            .get(subject_path)
            .map(|kinds| kinds.keys().copied().collect())
            .unwrap_or_default()
    }

    pub fn contains_path(&self, subject_path: &str) -> bool {
        self.by_path.contains_key(subject_path)
    }

    /// Other recorded paths that differ from `subject_path` only by case,
    /// `_` or `-`.
    pub fn naming_variants<'a>(
        &'a self,
        subject_path: &'a str,
    ) -> impl Iterator<Item = &'a str> {
        self.by_naming_key
            .get(&naming_key(subject_path))
            .into_iter()
            .flatten()
            .map(String::as_str)
            .filter(move |candidate| *candidate != subject_path)
    }

    /// Number of distinct `(path, kind)` facts.
    pub fn fact_count(&self) -> usize {
        self.by_path.values().map(BTreeMap::len).sum()
    }
}

/// Fold each path segment so `proactive_audio`, `proactiveAudio` and
/// `proactive-audio` compare equal.
pub(crate) fn naming_key(path: &str) -> String {
    path.split('.')
        .map(|segment| {
            segment
                .chars()
                .filter(|c| *c != '_' && *c != '-')
                .flat_map(char::to_lowercase)
                .collect()
        })
        .collect::<Vec<String>>()
        .join(".")
}
