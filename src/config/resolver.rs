use chrono::NaiveDate;
use url::Url;

use crate::app::{Result, TapError};
use crate::config::TapConfig;
use crate::streams::StreamKind;

pub const LAST_MATCHES_PATH: &str = "competitions/LastMatches";
pub const MATCH_DETAILS_PATH: &str = "competitions/MatchDetails";

/// Concrete request for the first page of a stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub path: String,
    pub params: Vec<(&'static str, String)>,
}

impl PageRequest {
    /// Absolute URL under `base_url` with params as query pairs
    pub fn url(&self, base_url: &str) -> Result<Url> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let mut url = base.join(&self.path)?;
        if !self.params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.params {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }
}

/// Turns tap configuration into per-stream request parameters.
///
/// Missing required keys fail here, before any page is requested.
pub struct ConfigResolver<'a> {
    config: &'a TapConfig,
}

impl<'a> ConfigResolver<'a> {
    pub fn new(config: &'a TapConfig) -> Self {
        Self { config }
    }

    pub fn resolve(&self, stream: StreamKind) -> Result<PageRequest> {
        match stream {
            StreamKind::Seasons => Ok(PageRequest {
                path: LAST_MATCHES_PATH.to_string(),
                params: vec![("comp_id", self.comp_id()?.to_string())],
            }),
            StreamKind::Matches => {
                let mut params = vec![("comp_id", self.comp_id()?.to_string())];
                if let Some(club_id) = self.config.club_id {
                    params.push(("club_id", club_id.to_string()));
                }
                Ok(PageRequest {
                    path: LAST_MATCHES_PATH.to_string(),
                    params,
                })
            }
            StreamKind::MatchDetails => {
                let comp_id = self.comp_id()?;
                let match_id = self.match_id()?;
                Ok(PageRequest {
                    path: match_details_path(self.comp_name()?),
                    params: vec![
                        ("comp_id", comp_id.to_string()),
                        ("match_id", match_id.to_string()),
                    ],
                })
            }
        }
    }

    pub fn comp_id(&self) -> Result<i64> {
        self.config
            .comp_id
            .ok_or_else(|| TapError::Config("comp_id is required".into()))
    }

    pub fn match_id(&self) -> Result<i64> {
        self.config
            .match_id
            .ok_or_else(|| TapError::Config("match_id is required".into()))
    }

    pub fn comp_name(&self) -> Result<&'a str> {
        self.config
            .comp_name
            .as_deref()
            .ok_or_else(|| TapError::Config("comp_name is required".into()))
    }

    /// Parsed `date` filter for the matches stream, if configured
    pub fn target_date(&self) -> Result<Option<NaiveDate>> {
        self.config
            .date
            .as_deref()
            .map(|raw| {
                NaiveDate::parse_from_str(raw.trim(), "%d/%m/%Y").map_err(|e| {
                    TapError::Config(format!("date must be DD/MM/YYYY, got `{}`: {}", raw, e))
                })
            })
            .transpose()
    }
}

/// `competitions/MatchDetails/<comp name with hyphens>`
pub fn match_details_path(comp_name: &str) -> String {
    format!("{}/{}", MATCH_DETAILS_PATH, comp_name.replace(' ', "-"))
}
