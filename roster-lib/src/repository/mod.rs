use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use tracing::{debug, error, warn};

use crate::{
    Error, Result,
    repository::{
        config::{CoreConfig, StorageMode},
        storage::{InMemory, Persistent, Storage},
    },
};

mod db;

pub mod config;
pub mod entities;
pub mod storage;

pub use entities::{
    CustomFields, FieldDefinition, FieldName, FieldRule, FieldType, Record, RecordFields,
    RecordId, RecordPatch,
};

/// Central access point for the member records.
///
/// The [`Repository`] keeps the record list in memory and writes the whole list to its
/// [`Storage`] after every change. The in-memory list is authoritative: storage failures are
/// logged and otherwise ignored.
#[derive(Clone, Debug)]
pub struct Repository {
    records: Arc<RwLock<Vec<Record>>>,
    storage: Arc<dyn Storage>,
}

impl Repository {
    /// Open the repository described by `cfg`.
    pub fn new(cfg: &CoreConfig) -> Result<Self> {
        Ok(match cfg.storage {
            StorageMode::InMemory => Self::with_storage(InMemory),
            StorageMode::LocalStorage => {
                Self::with_storage(Persistent::open(&cfg.database_path()?)?)
            }
        })
    }

    /// Build a repository on top of `storage`, loading whatever it holds. Falls back to the
    /// example records if the storage is not persistent or holds nothing.
    pub fn with_storage<S>(storage: S) -> Self
    where
        S: Storage + 'static,
    {
        let records = initial_records(&storage);

        Self {
            records: Arc::new(RwLock::new(records)),
            storage: Arc::new(storage),
        }
    }

    /// All records, in insertion order.
    pub fn list(&self) -> Vec<Record> {
        self.records.read().clone()
    }

    pub fn get(&self, id: &RecordId) -> Option<Record> {
        self.records.read().iter().find(|r| r.id() == id).cloned()
    }

    /// Append `record`. Fails if a record with the same id already exists.
    pub fn add(&self, record: Record) -> Result<Record> {
        let mut records = self.records.write();

        if records.iter().any(|r| r.id() == record.id()) {
            return Err(Error::DuplicateId(record.id().clone()));
        }

        records.push(record.clone());
        self.persist(&records);

        debug!("Added record: {}", record.id());

        Ok(record)
    }

    /// Merge `patch` into the record with the given id. Does nothing if there is no such
    /// record.
    pub fn update(&self, id: &RecordId, patch: RecordPatch) -> Option<Record> {
        let mut records = self.records.write();

        let Some(record) = records.iter_mut().find(|r| r.id() == id) else {
            debug!("Update skipped, no record with id {id}");
            return None;
        };

        record.apply(patch, Utc::now());
        let updated = record.clone();

        self.persist(&records);

        debug!("Updated record: {id}");

        Some(updated)
    }

    /// Remove the record with the given id. Returns whether anything was removed.
    pub fn delete(&self, id: &RecordId) -> bool {
        let mut records = self.records.write();

        let before = records.len();
        records.retain(|r| r.id() != id);

        if records.len() == before {
            debug!("Delete skipped, no record with id {id}");
            return false;
        }

        self.persist(&records);

        debug!("Removed record: {id}");

        true
    }

    /// A fresh id derived from the current time that no existing record uses.
    pub fn next_id(&self) -> RecordId {
        let records = self.records.read();
        let mut now = Utc::now();

        loop {
            let id = RecordId::from_time(now);
            if !records.iter().any(|r| r.id() == &id) {
                return id;
            }
            now += chrono::TimeDelta::milliseconds(1);
        }
    }

    pub fn is_persistent(&self) -> bool {
        self.storage.is_persistent()
    }

    fn persist(&self, records: &[Record]) {
        if let Err(err) = self.storage.save(records) {
            error!("Failed to save records: {err}");
        }
    }

    #[cfg(test)]
    /// Return a mock version of a [`Repository`] backed by an in-memory database.
    pub(crate) fn mock() -> Self {
        Self::with_storage(Persistent::in_memory("test").expect("in-memory database opens"))
    }
}

fn initial_records(storage: &dyn Storage) -> Vec<Record> {
    if !storage.is_persistent() {
        debug!("Storage is not persistent, starting from example records");
        return Record::seed();
    }

    match storage.load() {
        Ok(records) if !records.is_empty() => {
            debug!("Loaded {} records", records.len());
            records
        }
        Ok(_) => {
            debug!("No saved records, starting from example records");
            Record::seed()
        }
        Err(err) => {
            warn!("Failed to load saved records, starting from example records: {err}");
            Record::seed()
        }
    }
}
