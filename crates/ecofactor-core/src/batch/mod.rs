//! Concurrent approval of high-confidence factor candidates.

pub mod inserter;
pub mod manager;

pub use inserter::CatalogInserter;
pub use manager::{BatchManager, BatchRun, CancellationToken};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::EcofactorError;
use crate::store::BatchRecord;

/// How a near-duplicate is merged into the existing record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    /// Incoming non-empty fields win; empty ones keep the existing value.
    #[default]
    PreferNonEmpty,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DedupOptions {
    /// Name similarity at or above which a candidate is merged.
    pub similarity_threshold: f64,
    pub strategy: MergeStrategy,
}

impl Default for DedupOptions {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.9,
            strategy: MergeStrategy::PreferNonEmpty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOptions {
    /// Minimum confidence score for a candidate to be processed.
    pub threshold: f64,
    /// Operations run concurrently per group.
    pub batch_size: usize,
    pub dedup: Option<DedupOptions>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            threshold: 0.8,
            batch_size: 5,
            dedup: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    Success,
    Failed,
    Skipped,
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchStatus::Success => write!(f, "success"),
            BatchStatus::Failed => write!(f, "failed"),
            BatchStatus::Skipped => write!(f, "skipped"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    /// Id of the batch candidate.
    pub id: String,
    pub status: BatchStatus,
    pub message: String,
    /// Factor record created or merged into, on success.
    #[serde(default)]
    pub factor_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchProgress {
    pub current: usize,
    pub total: usize,
    pub percent: u8,
}

impl BatchProgress {
    pub fn new(current: usize, total: usize) -> Self {
        let percent = if total == 0 {
            100
        } else {
            (current.min(total) * 100 / total) as u8
        };
        Self {
            current,
            total,
            percent,
        }
    }
}

/// What a processor did with one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Processed {
    pub factor_id: String,
    /// Set when the candidate was merged into an existing record.
    pub merged_into: Option<String>,
}

/// Turns an approved candidate into a catalog entry.
#[async_trait]
pub trait BatchProcessor: Send + Sync {
    async fn process(
        &self,
        record: &BatchRecord,
        dedup: Option<&DedupOptions>,
    ) -> Result<Processed, EcofactorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_percent() {
        assert_eq!(BatchProgress::new(0, 12).percent, 0);
        assert_eq!(BatchProgress::new(5, 12).percent, 41);
        assert_eq!(BatchProgress::new(12, 12).percent, 100);
        assert_eq!(BatchProgress::new(0, 0).percent, 100);
    }

    #[test]
    fn test_default_options() {
        let o = BatchOptions::default();
        assert_eq!(o.threshold, 0.8);
        assert_eq!(o.batch_size, 5);
        assert!(o.dedup.is_none());
    }
}
