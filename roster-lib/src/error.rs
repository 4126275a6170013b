use thiserror::Error;

use crate::{form::ValidationErrors, repository::RecordId};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Internal database error {0}")]
    Internal(#[from] agdb::DbError),
    #[error("Malformed record data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration file: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("Failed to write configuration file: {0}")]
    ConfigWrite(#[from] toml::ser::Error),
    #[error("$HOME must exist")]
    NoHome,
    #[error("A record with id '{0}' already exists")]
    DuplicateId(RecordId),
    #[error("No member with id '{0}'")]
    NotFound(RecordId),
    #[error("{0}")]
    Validation(#[from] ValidationErrors),
}
