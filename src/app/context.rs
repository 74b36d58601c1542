use std::path::PathBuf;

use backon::ConstantBuilder;
use serde_json::json;
use tracing::{error, info};

use crate::app::error::{Result, TapError};
use crate::config::{ConfigResolver, PageRequest, TapConfig};
use crate::engine::{StreamEngine, StreamSummary};
use crate::fetcher::PageSession;
use crate::sink::RecordSink;
use crate::streams::StreamSpec;

/// Everything a run needs besides the session and the sink
pub struct AppContext {
    pub config: TapConfig,
    pub retry: ConstantBuilder,
}

/// Per-stream results of a completed run, in run order
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub streams: Vec<StreamSummary>,
}

impl RunSummary {
    pub fn records(&self) -> usize {
        self.streams.iter().map(|s| s.records).sum()
    }
}

impl AppContext {
    pub fn new(config: TapConfig) -> Self {
        let retry = config.retry.policy();
        Self { config, retry }
    }

    /// Run every selected stream in order through `session`.
    ///
    /// All streams are resolved before the first page is opened, so a
    /// missing configuration key fails the run without any traffic. The
    /// first failing stream aborts the run.
    pub async fn run(
        &self,
        session: &mut dyn PageSession,
        sink: &mut dyn RecordSink,
    ) -> Result<RunSummary> {
        let resolver = ConfigResolver::new(&self.config);
        let plan = self
            .config
            .selected_streams()?
            .into_iter()
            .map(|kind| StreamSpec::resolve(kind, &resolver))
            .collect::<Result<Vec<(StreamSpec, PageRequest)>>>()?;

        let mut summary = RunSummary::default();
        for (spec, request) in &plan {
            let kind = spec.kind();
            sink.write_schema(kind, &kind.schema(), kind.key_properties())?;

            let result = StreamEngine::new(&mut *session, self.retry.clone(), &self.config.browser.base_url)
                .run(spec, request, sink)
                .await;
            match result {
                Ok(stream) => summary.streams.push(stream),
                Err(e) => {
                    error!("Stream {} failed: {}", kind, e);
                    return Err(e);
                }
            }
        }

        sink.write_state(&json!({}))?;
        info!("Run complete: {} records", summary.records());
        Ok(summary)
    }

    pub fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| TapError::Config("Could not find data directory".into()))?;
        let tap_dir = data_dir.join("statbunker-tap");
        std::fs::create_dir_all(&tap_dir)?;
        Ok(tap_dir.join("records.db"))
    }
}
