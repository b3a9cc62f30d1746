//! Patient directory: the session's in-memory copy of `GET /patients`.
//!
//! A [`PatientDirectory`] is an immutable snapshot (ordered list plus an
//! id index). [`DirectoryCache`] only ever swaps whole snapshots, so a reader
//! sees either the old set or the new one, never a mix.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::client::{ApiError, MatchingService};
use crate::models::PatientRecord;
use crate::session::SessionError;

/// Immutable, indexed set of patient records.
#[derive(Debug, Default)]
pub struct PatientDirectory {
    records: Vec<PatientRecord>,
    by_id: HashMap<String, usize>,
}

impl PatientDirectory {
    /// Index records in service order. A repeated id resolves to its last record.
    pub fn from_records(records: Vec<PatientRecord>) -> Self {
        let by_id = records
            .iter()
            .enumerate()
            .map(|(idx, record)| (record.patient_id.clone(), idx))
            .collect();
        Self { records, by_id }
    }

    pub fn lookup(&self, patient_id: &str) -> Option<&PatientRecord> {
        self.by_id.get(patient_id).map(|&idx| &self.records[idx])
    }

    /// Records in the order the service returned them.
    pub fn records(&self) -> &[PatientRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Why a directory load failed.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Holder of the current directory snapshot.
#[derive(Debug, Default)]
pub struct DirectoryCache {
    current: RwLock<Arc<PatientDirectory>>,
}

impl DirectoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot. Cheap; the lock is released before returning.
    pub fn snapshot(&self) -> Result<Arc<PatientDirectory>, SessionError> {
        self.current
            .read()
            .map(|guard| Arc::clone(&*guard))
            .map_err(|_| SessionError::LockPoisoned)
    }

    /// Swap in a new snapshot built from `records`.
    pub fn replace(&self, records: Vec<PatientRecord>) -> Result<Arc<PatientDirectory>, SessionError> {
        let next = Arc::new(PatientDirectory::from_records(records));
        let mut guard = self.current.write().map_err(|_| SessionError::LockPoisoned)?;
        *guard = Arc::clone(&next);
        Ok(next)
    }

    pub fn lookup(&self, patient_id: &str) -> Result<Option<PatientRecord>, SessionError> {
        Ok(self.snapshot()?.lookup(patient_id).cloned())
    }

    /// Fetch every patient and replace the cached set.
    ///
    /// On failure the previous snapshot stays in place.
    pub async fn load_all<S: MatchingService>(
        &self,
        service: &S,
    ) -> Result<Arc<PatientDirectory>, DirectoryError> {
        let records = service.list_patients().await.map_err(|e| {
            tracing::warn!(error = %e, "Patient load failed, keeping previous directory");
            e
        })?;
        let directory = self.replace(records)?;
        tracing::info!(patients = directory.len(), "Patient directory loaded");
        Ok(directory)
    }
}
