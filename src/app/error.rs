use thiserror::Error;

#[derive(Error, Debug)]
pub enum TapError {
    #[error("{0}")]
    Config(String),

    /// Page fetched but not yet showing the expected structure; safe to re-fetch.
    #[error("{0}")]
    RetriableStructure(String),

    /// Page structure present but inconsistent; retrying will not help.
    #[error("{0}")]
    FatalStructure(String),

    /// A fragment passed validation but broke an extraction rule.
    #[error("Malformed fragment: {0}")]
    MalformedFragment(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TapError {
    pub fn is_retriable(&self) -> bool {
        matches!(self, TapError::RetriableStructure(_))
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        TapError::MalformedFragment(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, TapError>;
