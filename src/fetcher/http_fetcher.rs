use async_trait::async_trait;
use reqwest::Client;
use scraper::Html;
use url::Url;

use crate::app::{Result, TapError};
use crate::config::BrowserConfig;
use crate::fetcher::{PageSession, NEXT_PAGE_TEXT};
use crate::streams::html::{href, selector, text_content};

/// Session over plain HTTP; pages are used as served, without running scripts.
pub struct HttpSession {
    client: Client,
    current: Option<(Url, String)>,
}

impl HttpSession {
    pub fn new(config: BrowserConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(config.timeout())
            .gzip(true)
            .brotli(true);

        if let Some(ref ua) = config.user_agent {
            builder = builder.user_agent(ua.as_str());
        }

        Ok(Self {
            client: builder.build()?,
            current: None,
        })
    }

    fn current(&self) -> Result<&(Url, String)> {
        self.current
            .as_ref()
            .ok_or_else(|| TapError::Session("no page loaded".into()))
    }

    /// Target of the next-page control on the current page
    fn next_link(&self) -> Result<Option<Url>> {
        let (url, body) = self.current()?;
        next_page_url(url, body)
    }
}

/// Absolute URL of the `›` link in `body`, if the page has one
pub fn next_page_url(page_url: &Url, body: &str) -> Result<Option<Url>> {
    let doc = Html::parse_document(body);
    let link = selector("a")?;

    let target = doc
        .select(&link)
        .filter(|a| text_content(a) == NEXT_PAGE_TEXT)
        .find_map(|a| href(&a));

    match target {
        Some(target) => Ok(Some(page_url.join(target)?)),
        None => Ok(None),
    }
}

#[async_trait]
impl PageSession for HttpSession {
    async fn open(&mut self, url: &Url) -> Result<()> {
        tracing::debug!("GET {}", url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TapError::Session(format!("{} returned {}", url, status)));
        }

        let final_url = response.url().clone();
        let body = response.text().await?;
        self.current = Some((final_url, body));
        Ok(())
    }

    async fn html(&mut self) -> Result<String> {
        Ok(self.current()?.1.clone())
    }

    async fn reload(&mut self) -> Result<()> {
        let url = self.current()?.0.clone();
        self.open(&url).await
    }

    async fn has_next(&mut self) -> Result<bool> {
        Ok(self.next_link()?.is_some())
    }

    async fn advance(&mut self) -> Result<()> {
        let next = self
            .next_link()?
            .ok_or_else(|| TapError::Session("page has no next-page control".into()))?;
        self.open(&next).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGINATION: &str = r#"
        <div class="pagination"><ul>
        <li class="pagArrow"><a href="/1"><p>&#155;</p></a></li>
        <li class="pagArrow"><a><p>&#155;&#155;</p></a></li>
        </ul></div>"#;

    #[test]
    fn test_next_page_url_resolves_relative_href() {
        let page = Url::parse("http://localhost:8080/competitions/LastMatches?comp_id=689").unwrap();
        let next = next_page_url(&page, PAGINATION).unwrap();
        assert_eq!(next.unwrap().as_str(), "http://localhost:8080/1");
    }

    #[test]
    fn test_double_arrow_is_not_next_page() {
        let page = Url::parse("http://localhost:8080/").unwrap();
        let body = r#"<a href="/last"><p>&#155;&#155;</p></a>"#;
        assert!(next_page_url(&page, body).unwrap().is_none());
    }

    #[test]
    fn test_empty_pagination_has_no_next_page() {
        let page = Url::parse("http://localhost:8080/").unwrap();
        let body = r#"<div class="pagination"></div>"#;
        assert!(next_page_url(&page, body).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_session_without_page_reports_error() {
        let mut session = HttpSession::new(BrowserConfig::default()).unwrap();
        assert!(matches!(session.html().await, Err(TapError::Session(_))));
        assert!(session.has_next().await.is_err());
    }
}
