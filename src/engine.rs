//! Per-stream extraction loop.
//!
//! ```text
//! open(first page) → html → validate → extract → has_next? ─ yes → advance ─┐
//!                     ↑                                   └─ no → done      │
//!                     └─────────────────────────────────────────────────────┘
//! ```
//!
//! A page that fails validation with a retriable error is reloaded under the
//! configured backoff policy; once the policy is exhausted it aborts the
//! stream as a fatal structure error. Records leave for the sink one at a
//! time, page by page, in document order.

use std::time::Duration;

use backon::{ConstantBuilder, RetryableWithContext};
use scraper::Html;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::app::{Result, TapError};
use crate::config::PageRequest;
use crate::fetcher::PageSession;
use crate::sink::RecordSink;
use crate::streams::{StreamKind, StreamSpec};

/// Outcome of one stream run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamSummary {
    pub stream: StreamKind,
    pub pages: usize,
    pub records: usize,
}

pub struct StreamEngine<'a> {
    session: &'a mut dyn PageSession,
    retry: ConstantBuilder,
    base_url: &'a str,
}

impl<'a> StreamEngine<'a> {
    pub fn new(session: &'a mut dyn PageSession, retry: ConstantBuilder, base_url: &'a str) -> Self {
        Self {
            session,
            retry,
            base_url,
        }
    }

    /// Run one stream from its first page until pagination is exhausted.
    pub async fn run(
        &mut self,
        spec: &StreamSpec,
        request: &PageRequest,
        sink: &mut dyn RecordSink,
    ) -> Result<StreamSummary> {
        let stream = spec.kind();
        let url = request.url(self.base_url)?;
        info!("Extracting {} from {}", stream, url);

        self.session.open(&url).await?;

        let mut summary = StreamSummary {
            stream,
            pages: 0,
            records: 0,
        };

        loop {
            let html = validated_page(&mut *self.session, spec, self.retry.clone())
                .await
                .map_err(|e| {
                    if e.is_retriable() {
                        TapError::FatalStructure(e.to_string())
                    } else {
                        e
                    }
                })?;
            let emitted = emit_page(spec, &html, sink)?;
            summary.pages += 1;
            summary.records += emitted;
            debug!("{}: page {} yielded {} records", stream, summary.pages, emitted);

            if !spec.paginates() || !self.session.has_next().await? {
                break;
            }
            self.session.advance().await?;
        }

        info!(
            "Finished {}: {} records from {} pages",
            stream, summary.records, summary.pages
        );
        Ok(summary)
    }
}

/// Session handed through the retried page attempts
struct PageAttempt<'s> {
    session: &'s mut dyn PageSession,
    reload: bool,
}

/// HTML of the current page once it passes validation.
///
/// Every attempt after the first reloads the page. A retriable error is
/// returned as is once `policy` runs out.
async fn validated_page<'s>(
    session: &'s mut dyn PageSession,
    spec: &StreamSpec,
    policy: ConstantBuilder,
) -> Result<String> {
    let stream = spec.kind();
    let attempt = |mut ctx: PageAttempt<'s>| async move {
        let result = fetch_and_validate(&mut ctx, spec).await;
        ctx.reload = true;
        (ctx, result)
    };

    let (_, result) = attempt
        .retry(policy)
        .sleep(sleep)
        .context(PageAttempt {
            session,
            reload: false,
        })
        .when(TapError::is_retriable)
        .notify(|err: &TapError, delay: Duration| {
            warn!("{}: page not ready ({}), retrying in {:?}", stream, err, delay);
        })
        .await;
    result
}

async fn fetch_and_validate(ctx: &mut PageAttempt<'_>, spec: &StreamSpec) -> Result<String> {
    if ctx.reload {
        ctx.session.reload().await?;
    }
    let html = ctx.session.html().await?;
    validate_page(spec, &html)?;
    Ok(html)
}

fn validate_page(spec: &StreamSpec, html: &str) -> Result<()> {
    spec.validate(&Html::parse_document(html))
}

/// Extract a validated page, handing each record to `sink`.
fn emit_page(spec: &StreamSpec, html: &str, sink: &mut dyn RecordSink) -> Result<usize> {
    let doc = Html::parse_document(html);

    let mut emitted = 0;
    for record in spec.extract(&doc)? {
        sink.write_record(spec.kind(), &record?)?;
        emitted += 1;
    }
    Ok(emitted)
}
