use chrono::Utc;
use serde_json::Value;
use tracing::debug;

use crate::app::Result;
use crate::domain::Record;
use crate::sink::RecordSink;
use crate::store::Store;
use crate::streams::StreamKind;

/// Writes records into a [`Store`]; schema and state messages are not kept.
pub struct StoreSink<'a> {
    store: &'a dyn Store,
}

impl<'a> StoreSink<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }
}

impl RecordSink for StoreSink<'_> {
    fn write_schema(&mut self, stream: StreamKind, _schema: &Value, _key_properties: &[&str]) -> Result<()> {
        debug!("Storing records of {}", stream);
        Ok(())
    }

    fn write_record(&mut self, _stream: StreamKind, record: &Record) -> Result<()> {
        self.store.put_record(record, Utc::now())
    }

    fn write_state(&mut self, _state: &Value) -> Result<()> {
        Ok(())
    }
}
