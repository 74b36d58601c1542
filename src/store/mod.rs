//! Persistent copy of extracted records, one row per `(stream, key)`.

pub mod sqlite;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::app::Result;
use crate::domain::Record;
use crate::streams::StreamKind;

pub use sqlite::SqliteStore;

/// A record as it was last written to the store
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub stream: StreamKind,
    pub key: String,
    pub payload: Value,
    pub extracted_at: DateTime<Utc>,
}

pub trait Store {
    /// Insert or replace the record under its stream and key
    fn put_record(&self, record: &Record, extracted_at: DateTime<Utc>) -> Result<()>;
    fn get_record(&self, stream: StreamKind, key: &str) -> Result<Option<StoredRecord>>;
    /// All records of `stream`, oldest extraction first
    fn records(&self, stream: StreamKind) -> Result<Vec<StoredRecord>>;
}
