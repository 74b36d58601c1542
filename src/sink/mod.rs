//! Where extracted records go.
//!
//! The engine hands every record to a [`RecordSink`] as soon as it is parsed.
//! [`SingerSink`] prints Singer messages, [`StoreSink`] keeps them in SQLite
//! and [`CollectSink`] holds them in memory.

pub mod singer;
pub mod store;

pub use singer::SingerSink;
pub use store::StoreSink;

use serde_json::Value;

use crate::app::Result;
use crate::domain::Record;
use crate::streams::StreamKind;

pub trait RecordSink {
    /// Announce a stream before its first record
    fn write_schema(
        &mut self,
        stream: StreamKind,
        schema: &Value,
        key_properties: &[&str],
    ) -> Result<()>;

    fn write_record(&mut self, stream: StreamKind, record: &Record) -> Result<()>;

    /// Bookmark state, written once at the end of a run
    fn write_state(&mut self, state: &Value) -> Result<()>;
}

/// Keeps records in memory, in the order they were written
#[derive(Debug, Default)]
pub struct CollectSink {
    pub schemas: Vec<StreamKind>,
    entries: Vec<Record>,
    pub states: Vec<Value>,
}

impl CollectSink {
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RecordSink for CollectSink {
    fn write_schema(&mut self, stream: StreamKind, _schema: &Value, _key_properties: &[&str]) -> Result<()> {
        self.schemas.push(stream);
        Ok(())
    }

    fn write_record(&mut self, _stream: StreamKind, record: &Record) -> Result<()> {
        self.entries.push(record.clone());
        Ok(())
    }

    fn write_state(&mut self, state: &Value) -> Result<()> {
        self.states.push(state.clone());
        Ok(())
    }
}
