use std::{fmt::Debug, path::Path};

use crate::{
    Result,
    repository::{db::Db, entities::Record},
};

/// The single key under which the record list is stored.
pub const RECORDS_KEY: &str = "member-records";

/// Backing store for the record list.
pub trait Storage: Debug {
    /// Whether [`Storage::save`] actually keeps anything.
    fn is_persistent(&self) -> bool;

    /// Read the saved record list. Returns an empty list if nothing was saved yet.
    fn load(&self) -> Result<Vec<Record>>;

    /// Replace the saved record list.
    fn save(&self, records: &[Record]) -> Result<()>;
}

/// Storage that never reads or writes.
#[derive(Debug, Clone, Copy, Default)]
pub struct InMemory;

impl Storage for InMemory {
    fn is_persistent(&self) -> bool {
        false
    }

    fn load(&self) -> Result<Vec<Record>> {
        Ok(Vec::new())
    }

    fn save(&self, _records: &[Record]) -> Result<()> {
        Ok(())
    }
}

/// Storage that keeps the record list as a JSON array in an agdb database.
#[derive(Debug, Clone)]
pub struct Persistent {
    db: Db,
}

impl Persistent {
    const KEYS: [(&'static str, &'static str); 1] = [(RECORDS_KEY, "[]")];

    /// Open the database file at `path`, creating it if needed.
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            db: Db::open(path, &Self::KEYS)?,
        })
    }

    /// A database that lives only as long as this handle and its clones.
    pub fn in_memory(name: &str) -> Result<Self> {
        Ok(Self {
            db: Db::in_memory(name, &Self::KEYS)?,
        })
    }
}

impl Storage for Persistent {
    fn is_persistent(&self) -> bool {
        true
    }

    fn load(&self) -> Result<Vec<Record>> {
        match self.db.get(RECORDS_KEY)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, records: &[Record]) -> Result<()> {
        let json = serde_json::to_string(records)?;
        self.db.set(RECORDS_KEY, json)
    }
}
