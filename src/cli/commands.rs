use std::io;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};

use crate::app::{AppContext, Result, RunSummary};
use crate::config::{Backend, TapConfig};
use crate::fetcher::{self, report_close};
use crate::sink::{RecordSink, SingerSink, StoreSink};
use crate::store::{SqliteStore, Store};
use crate::streams::StreamKind;

/// Command-line values that take precedence over the config file
#[derive(Debug, Default)]
pub struct RunOverrides {
    pub stream: Option<String>,
    pub backend: Option<Backend>,
    pub base_url: Option<String>,
}

impl RunOverrides {
    pub fn apply(self, config: &mut TapConfig) {
        if let Some(stream) = self.stream {
            config.stream = Some(stream);
        }
        if let Some(backend) = self.backend {
            config.browser.backend = backend;
        }
        if let Some(base_url) = self.base_url {
            config.browser.base_url = base_url;
        }
    }
}

/// Run the configured streams, printing Singer messages or filling `db`.
pub async fn run(config_path: &Path, overrides: RunOverrides, db: Option<PathBuf>) -> Result<()> {
    let mut config = TapConfig::load(config_path)?;
    overrides.apply(&mut config);
    let ctx = AppContext::new(config);

    let store = db.map(SqliteStore::new).transpose()?;
    let stdout = io::stdout();
    let mut sink: Box<dyn RecordSink + '_> = match &store {
        Some(store) => Box::new(StoreSink::new(store)),
        None => Box::new(SingerSink::new(stdout.lock())),
    };

    let mut session = fetcher::connect(&ctx.config.browser).await?;
    let result = ctx.run(session.as_mut(), sink.as_mut()).await;
    report_close("page session", session.close().await);

    let summary = result?;
    if store.is_some() {
        print_summary(&summary);
    }
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    for stream in &summary.streams {
        println!(
            "{}: {} records from {} pages",
            stream.stream, stream.records, stream.pages
        );
    }
}

/// Stream name, key properties and schema of every stream
pub fn catalog() -> Value {
    let streams: Vec<Value> = StreamKind::ALL
        .iter()
        .map(|kind| {
            json!({
                "stream": kind.name(),
                "tap_stream_id": kind.name(),
                "key_properties": kind.key_properties(),
                "schema": kind.schema(),
            })
        })
        .collect();
    json!({ "streams": streams })
}

pub fn discover() -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&catalog())?);
    Ok(())
}

pub fn show(db: Option<PathBuf>, stream: &str) -> Result<()> {
    let stream: StreamKind = stream.parse()?;
    let path = match db {
        Some(p) => p,
        None => AppContext::default_db_path()?,
    };
    let store = SqliteStore::new(path)?;

    let records = store.records(stream)?;
    if records.is_empty() {
        println!("No {} records", stream);
        return Ok(());
    }

    for record in records {
        println!(
            "{} {}",
            record.extracted_at.format("%Y-%m-%d %H:%M"),
            serde_json::to_string(&record.payload)?
        );
    }

    Ok(())
}
