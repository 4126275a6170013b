//! Core domain entities of the roster.
//!
//! [`Record`] is a member entry and [`RecordId`] its identifier. The [`fields`] module describes
//! the member form: the constraint table and the tagged field definitions.

pub mod fields;
mod record;
mod record_id;

pub use fields::{FieldDefinition, FieldName, FieldRule, FieldType};
pub use record::{CustomFields, Record, RecordFields, RecordPatch, day_key, start_of_day};
pub use record_id::RecordId;
