use serde::{Deserialize, Serialize};

use super::similarity::similarity;
use crate::model::{EmissionFactorRecord, FactorData};
use crate::parsing::normalize::normalize_name;

/// Names must be strictly more similar than this to count as a fuzzy duplicate.
pub const FUZZY_THRESHOLD: f64 = 0.85;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Exact,
    Fuzzy,
}

/// An existing record that conflicts with an incoming one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateMatch {
    pub record: EmissionFactorRecord,
    pub kind: MatchKind,
    pub similarity: f64,
}

/// Find an existing record that duplicates `candidate`.
///
/// Only records with the same category and unit are considered. An exact
/// name match (case- and space-insensitive) anywhere in the corpus wins over
/// any fuzzy match; otherwise the first record in corpus order whose name
/// similarity exceeds [`FUZZY_THRESHOLD`] is returned.
pub fn find_duplicate(
    existing: &[EmissionFactorRecord],
    candidate: &FactorData,
) -> Option<DuplicateMatch> {
    let wanted = normalize_name(&candidate.name);
    let in_scope = || existing.iter().filter(|r| same_scope(&r.data, candidate));

    if let Some(record) = in_scope().find(|r| normalize_name(&r.data.name) == wanted) {
        return Some(DuplicateMatch {
            record: record.clone(),
            kind: MatchKind::Exact,
            similarity: 1.0,
        });
    }

    in_scope()
        .map(|r| (r, similarity(&normalize_name(&r.data.name), &wanted)))
        .find(|(_, score)| *score > FUZZY_THRESHOLD)
        .map(|(record, score)| DuplicateMatch {
            record: record.clone(),
            kind: MatchKind::Fuzzy,
            similarity: score,
        })
}

/// Same category and same unit, compared exactly after trimming.
fn same_scope(a: &FactorData, b: &FactorData) -> bool {
    a.category.trim() == b.category.trim() && a.unit.trim() == b.unit.trim()
}
