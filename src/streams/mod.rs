//! Per-stream page rules.
//!
//! Each stream knows three things about its page: what structure must be
//! present before extraction ([`StreamSpec::validate`]), how to turn the page
//! into records ([`StreamSpec::extract`]) and whether results continue on a
//! further page ([`StreamSpec::paginates`]).
//!
//! ```text
//! TapConfig → ConfigResolver → StreamSpec ─┬─ validate(&Html)
//!                                          ├─ extract(&Html) → records
//!                                          └─ paginates()
//! ```

pub(crate) mod html;
pub mod match_details;
pub mod matches;
pub mod seasons;
pub mod tokens;

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use scraper::Html;
use serde_json::Value;

use crate::app::{Result, TapError};
use crate::config::{ConfigResolver, PageRequest};
use crate::domain::Record;

/// Lazy, single-pass record sequence over one parsed page
pub type Records<'a> = Box<dyn Iterator<Item = Result<Record>> + 'a>;

/// Stream identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Seasons,
    Matches,
    MatchDetails,
}

impl StreamKind {
    /// Run order when no stream is selected
    pub const ALL: [StreamKind; 3] = [
        StreamKind::Seasons,
        StreamKind::Matches,
        StreamKind::MatchDetails,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StreamKind::Seasons => "seasons",
            StreamKind::Matches => "matches",
            StreamKind::MatchDetails => "match_details",
        }
    }

    pub fn schema(&self) -> Value {
        match self {
            StreamKind::Seasons => seasons::schema(),
            StreamKind::Matches => matches::schema(),
            StreamKind::MatchDetails => match_details::schema(),
        }
    }

    pub fn key_properties(&self) -> &'static [&'static str] {
        match self {
            StreamKind::MatchDetails => &["id"],
            StreamKind::Seasons | StreamKind::Matches => &[],
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StreamKind {
    type Err = TapError;

    fn from_str(s: &str) -> Result<Self> {
        StreamKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| TapError::Config(format!("unknown stream `{}`", s)))
    }
}

/// A stream with its resolved options; dispatches the per-stream rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamSpec {
    Seasons,
    Matches { target_date: Option<NaiveDate> },
    MatchDetails { id: i64, comp_id: i64 },
}

impl StreamSpec {
    /// Resolve options and the first page request. Fails on missing keys.
    pub fn resolve(kind: StreamKind, resolver: &ConfigResolver<'_>) -> Result<(Self, PageRequest)> {
        let request = resolver.resolve(kind)?;
        let spec = match kind {
            StreamKind::Seasons => StreamSpec::Seasons,
            StreamKind::Matches => StreamSpec::Matches {
                target_date: resolver.target_date()?,
            },
            StreamKind::MatchDetails => StreamSpec::MatchDetails {
                id: resolver.match_id()?,
                comp_id: resolver.comp_id()?,
            },
        };
        Ok((spec, request))
    }

    pub fn kind(&self) -> StreamKind {
        match self {
            StreamSpec::Seasons => StreamKind::Seasons,
            StreamSpec::Matches { .. } => StreamKind::Matches,
            StreamSpec::MatchDetails { .. } => StreamKind::MatchDetails,
        }
    }

    /// Whether results may continue behind a "next page" control
    pub fn paginates(&self) -> bool {
        matches!(self, StreamSpec::Matches { .. })
    }

    pub fn validate(&self, doc: &Html) -> Result<()> {
        match self {
            StreamSpec::Seasons => seasons::validate(doc),
            StreamSpec::Matches { .. } => matches::validate(doc),
            StreamSpec::MatchDetails { .. } => match_details::validate(doc),
        }
    }

    /// Records of a validated page, in document order
    pub fn extract<'a>(&'a self, doc: &'a Html) -> Result<Records<'a>> {
        match self {
            StreamSpec::Seasons => seasons::extract(doc),
            StreamSpec::Matches { target_date } => matches::extract(doc, *target_date),
            StreamSpec::MatchDetails { id, comp_id } => match_details::extract(doc, *id, *comp_id),
        }
    }
}
