use serde::{Deserialize, Serialize};
use std::fmt;

use crate::dedup::MatchKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportStatus {
    Success,
    Error,
    Warning,
    Duplicate,
}

impl fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportStatus::Success => write!(f, "success"),
            ImportStatus::Error => write!(f, "error"),
            ImportStatus::Warning => write!(f, "warning"),
            ImportStatus::Duplicate => write!(f, "duplicate"),
        }
    }
}

/// The existing record a row collided with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateRef {
    pub id: String,
    pub name: String,
    pub kind: MatchKind,
    pub similarity: f64,
}

/// What happened to one import row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportOutcome {
    /// 1-based data row index.
    pub row: usize,
    pub status: ImportStatus,
    pub message: String,
    /// Id of the record created or updated, if any.
    #[serde(default)]
    pub record_id: Option<String>,
    #[serde(default)]
    pub duplicate_of: Option<DuplicateRef>,
    #[serde(default)]
    pub kept_both: bool,
}

/// Summary of an import run. Every input row has exactly one outcome.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportReport {
    pub total: usize,
    pub success: usize,
    pub errors: usize,
    pub warnings: usize,
    /// Duplicate outcomes plus rows kept alongside their duplicate.
    pub duplicates: usize,
    pub created: usize,
    pub updated: usize,
    pub kept_both: usize,
    pub dry_run: bool,
    #[serde(default)]
    pub ignored_headers: Vec<String>,
    pub outcomes: Vec<ImportOutcome>,
}

impl ImportReport {
    pub(crate) fn push(&mut self, outcome: ImportOutcome) {
        self.total += 1;
        match outcome.status {
            ImportStatus::Success => self.success += 1,
            ImportStatus::Error => self.errors += 1,
            ImportStatus::Warning => self.warnings += 1,
            ImportStatus::Duplicate => self.duplicates += 1,
        }
        if outcome.kept_both {
            self.kept_both += 1;
            self.duplicates += 1;
        }
        self.outcomes.push(outcome);
    }

    /// Outcomes with the given status.
    pub fn with_status(&self, status: ImportStatus) -> impl Iterator<Item = &ImportOutcome> {
        self.outcomes.iter().filter(move |o| o.status == status)
    }

    /// Number of outcomes with the given status. Unlike the `duplicates`
    /// counter this never includes kept-both rows twice.
    pub fn count(&self, status: ImportStatus) -> usize {
        self.with_status(status).count()
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(row: usize, status: ImportStatus, kept_both: bool) -> ImportOutcome {
        ImportOutcome {
            row,
            status,
            message: String::new(),
            record_id: None,
            duplicate_of: None,
            kept_both,
        }
    }

    #[test]
    fn test_counters_follow_outcomes() {
        let mut report = ImportReport::default();
        report.push(outcome(1, ImportStatus::Success, false));
        report.push(outcome(2, ImportStatus::Error, false));
        report.push(outcome(3, ImportStatus::Warning, false));
        report.push(outcome(4, ImportStatus::Duplicate, false));

        assert_eq!(report.total, 4);
        assert_eq!(
            report.success + report.errors + report.warnings + report.duplicates,
            4
        );
        assert!(report.has_errors());
    }

    #[test]
    fn test_kept_both_counts_as_duplicate_too() {
        let mut report = ImportReport::default();
        report.push(outcome(1, ImportStatus::Success, true));

        assert_eq!(report.success, 1);
        assert_eq!(report.duplicates, 1);
        assert_eq!(report.kept_both, 1);
        assert_eq!(report.count(ImportStatus::Duplicate), 0);
        assert_eq!(report.outcomes.len(), 1);
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&ImportStatus::Duplicate).unwrap();
        assert_eq!(json, "\"duplicate\"");
    }
}
