//! Persistence collaborators.
//!
//! The engine only talks to storage through [`FactorStore`] and
//! [`BatchStore`]. [`MemoryStore`] is the in-process implementation used by
//! the CLI (persisted as a JSON file) and by tests.

pub mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::EcofactorError;
use crate::model::{EmissionFactorRecord, FactorData};

/// Emission factor catalog storage.
#[async_trait]
pub trait FactorStore: Send + Sync {
    /// Every record, system and custom.
    async fn list_existing_factors(&self) -> Result<Vec<EmissionFactorRecord>, EcofactorError>;

    /// Persist a new custom record.
    async fn create_factor(&self, data: FactorData) -> Result<EmissionFactorRecord, EcofactorError>;

    /// Overwrite a custom record. System records are read-only.
    async fn update_factor(
        &self,
        id: &str,
        data: FactorData,
    ) -> Result<EmissionFactorRecord, EcofactorError>;
}

/// Final decision on a batch candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approved,
    Rejected,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Approved => write!(f, "approved"),
            Decision::Rejected => write!(f, "rejected"),
        }
    }
}

/// A machine-extracted factor candidate awaiting a decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRecord {
    pub id: String,
    #[serde(flatten)]
    pub data: FactorData,
    pub confidence_score: f64,
    #[serde(default)]
    pub decision: Option<Decision>,
}

impl BatchRecord {
    pub fn is_eligible(&self, threshold: f64) -> bool {
        self.decision.is_none() && self.confidence_score >= threshold
    }
}

/// Storage for batch candidates.
#[async_trait]
pub trait BatchStore: Send + Sync {
    /// Undecided candidates with `confidence_score >= threshold`.
    async fn list_eligible_batch_records(
        &self,
        threshold: f64,
    ) -> Result<Vec<BatchRecord>, EcofactorError>;

    async fn mark_record_decided(&self, id: &str, decision: Decision) -> Result<(), EcofactorError>;

    async fn count_eligible(&self, threshold: f64) -> Result<usize, EcofactorError> {
        Ok(self.list_eligible_batch_records(threshold).await?.len())
    }
}
