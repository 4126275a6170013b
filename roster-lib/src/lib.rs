//! Core of the member roster: the record store, the field constraint table,
//! per-column filtering and the form/table synchronization controller.

pub mod error;
pub mod form;
pub mod fs;
pub mod repository;
pub mod table;

pub use error::{Error, Result};
pub use repository::Repository;
