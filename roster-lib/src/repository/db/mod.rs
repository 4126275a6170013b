use std::{path::Path, sync::Arc};

use agdb::{DbAny, DbError, QueryBuilder};
use derive_more::Deref;
use parking_lot::RwLock;

use crate::{Error, Result};

/// Alias of the node that carries every stored key as one of its values.
const STORAGE_ALIAS: &str = "storage";

/// Key-value view over an agdb database. Each key is a string value on the
/// [`STORAGE_ALIAS`] node.
#[derive(Debug, Clone, Deref)]
pub(crate) struct Db {
    #[deref]
    db: Arc<RwLock<DbAny>>,
}

impl Db {
    /// Open (or create) a file backed database, initializing `keys` to their defaults if this
    /// is a fresh file.
    pub fn open(path: &Path, keys: &[(&'static str, &'static str)]) -> Result<Self> {
        let path_str = path.to_string_lossy();

        let mut db = Self {
            db: Arc::new(RwLock::new(DbAny::new_file(&path_str)?)),
        };

        db.init(keys)?;

        Ok(db)
    }

    /// Create a memory backed database
    pub fn in_memory(name: &str, keys: &[(&'static str, &'static str)]) -> Result<Self> {
        let mut db = Self {
            db: Arc::new(RwLock::new(DbAny::new_memory(name)?)),
        };

        db.init(keys)?;

        Ok(db)
    }

    fn init(&mut self, keys: &[(&'static str, &'static str)]) -> Result<()> {
        let alias_count = self
            .db
            .read()
            .exec(QueryBuilder::select().aliases().query())?
            .result;

        if alias_count == 0 {
            self.db
                .write()
                .transaction_mut(|t| -> std::result::Result<(), DbError> {
                    t.exec_mut(
                        QueryBuilder::insert()
                            .nodes()
                            .aliases([STORAGE_ALIAS])
                            .query(),
                    )?;

                    for (key, default) in keys {
                        t.exec_mut(
                            QueryBuilder::insert()
                                .values([[(*key, *default).into()]])
                                .ids(STORAGE_ALIAS)
                                .query(),
                        )?;
                    }

                    Ok(())
                })?;
        }

        Ok(())
    }

    /// Fetch the string stored under `key`, if any.
    pub fn get(&self, key: &'static str) -> Result<Option<String>> {
        let value = self
            .db
            .read()
            .exec(QueryBuilder::select().values(key).ids(STORAGE_ALIAS).query())?
            .elements
            .pop()
            .and_then(|mut element| element.values.pop())
            .map(|kv| kv.value);

        value
            .map(String::try_from)
            .transpose()
            .map_err(Error::from)
    }

    /// Overwrite the string stored under `key`.
    pub fn set(&self, key: &'static str, value: String) -> Result<()> {
        self.db.write().exec_mut(
            QueryBuilder::insert()
                .values([[(key, value).into()]])
                .ids(STORAGE_ALIAS)
                .query(),
        )?;

        Ok(())
    }
}
