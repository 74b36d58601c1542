//! Page sessions: the live browsing context a stream runs in.
//!
//! A session owns the current page. The engine asks it to open the first
//! page of a stream, hands out its rendered HTML, and drives pagination
//! through the "next page" control (a link whose text is exactly `›`).
//!
//! - [`ChromeSession`]: headless Chrome via chromiumoxide, clicks the control
//! - [`HttpSession`]: reqwest client, follows the control's `href`

pub mod chrome;
pub mod http_fetcher;

pub use chrome::ChromeSession;
pub use http_fetcher::HttpSession;

use std::fmt::Display;

use async_trait::async_trait;
use tracing::warn;
use url::Url;

use crate::app::Result;
use crate::config::{Backend, BrowserConfig};

/// Visible text of the pagination control leading to the next page
pub const NEXT_PAGE_TEXT: &str = "\u{203a}";

#[async_trait]
pub trait PageSession: Send {
    /// Navigate to `url`, replacing the current page
    async fn open(&mut self, url: &Url) -> Result<()>;

    /// Rendered HTML of the current page
    async fn html(&mut self) -> Result<String>;

    /// Request the current page again
    async fn reload(&mut self) -> Result<()>;

    /// Whether the current page offers a next-page control
    async fn has_next(&mut self) -> Result<bool>;

    /// Activate the next-page control and wait for the new page
    async fn advance(&mut self) -> Result<()>;

    /// Release browser resources
    async fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Start a session for the configured backend
pub async fn connect(config: &BrowserConfig) -> Result<Box<dyn PageSession>> {
    match config.backend {
        Backend::Chrome => Ok(Box::new(ChromeSession::launch(config.clone()).await?)),
        Backend::Http => Ok(Box::new(HttpSession::new(config.clone())?)),
    }
}

/// Log a failed release of `what`; returns whether it closed cleanly.
pub(crate) fn report_close<E: Display>(what: &str, result: std::result::Result<(), E>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to close {}: {}", what, e);
            false
        }
    }
}
