use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use super::{BatchRecord, BatchStore, Decision, FactorStore};
use crate::error::EcofactorError;
use crate::model::{EmissionFactorRecord, FactorData, FactorOrigin};

/// Serialized form of a [`MemoryStore`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreState {
    #[serde(default)]
    factors: Vec<EmissionFactorRecord>,
    #[serde(default)]
    batch_records: Vec<BatchRecord>,
}

/// In-memory factor and batch store, optionally backed by a JSON file.
///
/// Enforces the record invariant on every write and refuses to modify
/// system-owned records.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<StoreState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store previously written by [`MemoryStore::save`].
    pub fn load(path: &Path) -> Result<Self, EcofactorError> {
        let content = std::fs::read_to_string(path)?;
        let state: StoreState = serde_json::from_str(&content)?;
        for record in &state.factors {
            record.data.check_invariants()?;
        }
        log::debug!(
            "loaded {} factors and {} batch records from {}",
            state.factors.len(),
            state.batch_records.len(),
            path.display()
        );
        Ok(Self {
            state: Mutex::new(state),
        })
    }

    /// Load from `path` if it exists, otherwise start empty.
    pub fn open(path: &Path) -> Result<Self, EcofactorError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::info!("store {} does not exist yet; starting empty", path.display());
            Ok(Self::new())
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), EcofactorError> {
        let json = {
            let state = self.lock()?;
            serde_json::to_string_pretty(&*state)?
        };
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Add a read-only reference record.
    pub fn seed_system_factor(&self, data: FactorData) -> Result<EmissionFactorRecord, EcofactorError> {
        self.insert(FactorOrigin::System, data)
    }

    /// Add a candidate for batch approval.
    pub fn add_batch_record(&self, record: BatchRecord) -> Result<(), EcofactorError> {
        self.lock()?.batch_records.push(record);
        Ok(())
    }

    pub fn factors(&self) -> Result<Vec<EmissionFactorRecord>, EcofactorError> {
        Ok(self.lock()?.factors.clone())
    }

    pub fn batch_records(&self) -> Result<Vec<BatchRecord>, EcofactorError> {
        Ok(self.lock()?.batch_records.clone())
    }

    /// Remove a custom record.
    pub fn delete_factor(&self, id: &str) -> Result<EmissionFactorRecord, EcofactorError> {
        let mut state = self.lock()?;
        let pos = state
            .factors
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| EcofactorError::RecordNotFound { id: id.to_string() })?;
        if !state.factors[pos].is_editable() {
            return Err(EcofactorError::ReadOnlyRecord { id: id.to_string() });
        }
        Ok(state.factors.remove(pos))
    }

    fn insert(
        &self,
        origin: FactorOrigin,
        data: FactorData,
    ) -> Result<EmissionFactorRecord, EcofactorError> {
        data.check_invariants()?;
        let record = EmissionFactorRecord {
            id: Uuid::new_v4().to_string(),
            origin,
            data,
        };
        self.lock()?.factors.push(record.clone());
        Ok(record)
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, EcofactorError> {
        self.state
            .lock()
            .map_err(|_| EcofactorError::Store("store lock poisoned".into()))
    }
}

#[async_trait]
impl FactorStore for MemoryStore {
    async fn list_existing_factors(&self) -> Result<Vec<EmissionFactorRecord>, EcofactorError> {
        self.factors()
    }

    async fn create_factor(&self, data: FactorData) -> Result<EmissionFactorRecord, EcofactorError> {
        self.insert(FactorOrigin::Custom, data)
    }

    async fn update_factor(
        &self,
        id: &str,
        data: FactorData,
    ) -> Result<EmissionFactorRecord, EcofactorError> {
        data.check_invariants()?;
        let mut state = self.lock()?;
        let record = state
            .factors
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| EcofactorError::RecordNotFound { id: id.to_string() })?;
        if !record.is_editable() {
            return Err(EcofactorError::ReadOnlyRecord { id: id.to_string() });
        }
        record.data = data;
        Ok(record.clone())
    }
}

#[async_trait]
impl BatchStore for MemoryStore {
    async fn list_eligible_batch_records(
        &self,
        threshold: f64,
    ) -> Result<Vec<BatchRecord>, EcofactorError> {
        Ok(self
            .lock()?
            .batch_records
            .iter()
            .filter(|r| r.is_eligible(threshold))
            .cloned()
            .collect())
    }

    async fn mark_record_decided(&self, id: &str, decision: Decision) -> Result<(), EcofactorError> {
        let mut state = self.lock()?;
        let record = state
            .batch_records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| EcofactorError::RecordNotFound { id: id.to_string() })?;
        record.decision = Some(decision);
        Ok(())
    }
}
