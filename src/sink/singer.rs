//! Singer message output: one JSON object per line.
//!
//! ```text
//! {"type":"SCHEMA","stream":"seasons","schema":{..},"key_properties":[]}
//! {"type":"RECORD","stream":"seasons","record":{..},"time_extracted":"2022-03-17T08:00:00Z"}
//! {"type":"STATE","value":{}}
//! ```

use std::io::Write;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::app::Result;
use crate::domain::Record;
use crate::sink::RecordSink;
use crate::streams::StreamKind;

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
enum Message<'a> {
    Schema {
        stream: &'a str,
        schema: &'a Value,
        key_properties: &'a [&'a str],
    },
    Record {
        stream: &'a str,
        record: &'a Record,
        time_extracted: String,
    },
    State {
        value: &'a Value,
    },
}

pub struct SingerSink<W: Write> {
    out: W,
}

impl<W: Write> SingerSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, message: &Message<'_>) -> Result<()> {
        serde_json::to_writer(&mut self.out, message)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> RecordSink for SingerSink<W> {
    fn write_schema(&mut self, stream: StreamKind, schema: &Value, key_properties: &[&str]) -> Result<()> {
        self.emit(&Message::Schema {
            stream: stream.name(),
            schema,
            key_properties,
        })
    }

    fn write_record(&mut self, stream: StreamKind, record: &Record) -> Result<()> {
        self.emit(&Message::Record {
            stream: stream.name(),
            record,
            time_extracted: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        })
    }

    fn write_state(&mut self, state: &Value) -> Result<()> {
        self.emit(&Message::State { value: state })
    }
}
