use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as ChromeConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use url::Url;

use crate::app::{Result, TapError};
use crate::config::BrowserConfig;
use crate::fetcher::{report_close, PageSession, NEXT_PAGE_TEXT};

/// Chrome-based page session using chromiumoxide
pub struct ChromeSession {
    browser: Browser,
    handler: JoinHandle<()>,
    page: Option<Page>,
    config: BrowserConfig,
}

impl ChromeSession {
    /// Launch a browser with the given configuration
    pub async fn launch(config: BrowserConfig) -> Result<Self> {
        let mut builder = ChromeConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-software-rasterizer")
            .request_timeout(config.timeout());

        if !config.headless {
            builder = builder.with_head();
        }

        let browser_config = builder
            .build()
            .map_err(|e| TapError::Session(format!("Failed to build browser config: {}", e)))?;

        let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
            TapError::Session(format!(
                "Failed to launch browser: {}. Is Chrome or Chromium installed and in PATH?",
                e
            ))
        })?;

        // Drive the CDP connection for the lifetime of the session
        let handler = tokio::spawn(async move {
            while let Some(_event) = handler.next().await {}
        });

        Ok(Self {
            browser,
            handler,
            page: None,
            config,
        })
    }

    fn page(&self) -> Result<&Page> {
        self.page
            .as_ref()
            .ok_or_else(|| TapError::Session("no page loaded".into()))
    }

    /// XPath for an anchor whose visible text is exactly the next-page arrow
    fn next_page_xpath() -> String {
        format!("//a[normalize-space(string(.))='{}']", NEXT_PAGE_TEXT)
    }

    async fn settle(&self) {
        tokio::time::sleep(self.config.wait_after_load()).await;
    }
}

#[async_trait]
impl PageSession for ChromeSession {
    async fn open(&mut self, url: &Url) -> Result<()> {
        tracing::debug!("Navigating to {}", url);

        if self.page.is_none() {
            let page = self
                .browser
                .new_page("about:blank")
                .await
                .map_err(|e| TapError::Session(format!("Failed to create page: {}", e)))?;

            if let Some(ref ua) = self.config.user_agent {
                page.set_user_agent(ua)
                    .await
                    .map_err(|e| TapError::Session(format!("Failed to set user agent: {}", e)))?;
            }
            self.page = Some(page);
        }

        let page = self.page()?;
        page.goto(url.as_str())
            .await
            .map_err(|e| TapError::Session(format!("Navigation failed: {}", e)))?;
        page.wait_for_navigation()
            .await
            .map_err(|e| TapError::Session(format!("Navigation failed: {}", e)))?;

        self.settle().await;
        Ok(())
    }

    async fn html(&mut self) -> Result<String> {
        self.page()?
            .content()
            .await
            .map_err(|e| TapError::Session(format!("Failed to read page content: {}", e)))
    }

    async fn reload(&mut self) -> Result<()> {
        let page = self.page()?;
        page.reload()
            .await
            .map_err(|e| TapError::Session(format!("Reload failed: {}", e)))?;
        page.wait_for_navigation()
            .await
            .map_err(|e| TapError::Session(format!("Navigation failed: {}", e)))?;

        self.settle().await;
        Ok(())
    }

    async fn has_next(&mut self) -> Result<bool> {
        let controls = self
            .page()?
            .find_xpaths(Self::next_page_xpath())
            .await
            .map_err(|e| TapError::Session(format!("Next-page lookup failed: {}", e)))?;
        Ok(!controls.is_empty())
    }

    async fn advance(&mut self) -> Result<()> {
        let page = self.page()?;
        let control = page
            .find_xpath(Self::next_page_xpath())
            .await
            .map_err(|e| TapError::Session(format!("Next-page control not found: {}", e)))?;

        control
            .click()
            .await
            .map_err(|e| TapError::Session(format!("Failed to click next page: {}", e)))?;
        page.wait_for_navigation()
            .await
            .map_err(|e| TapError::Session(format!("Navigation failed: {}", e)))?;

        self.settle().await;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(page) = self.page.take() {
            report_close("page", page.close().await);
        }
        self.browser
            .close()
            .await
            .map_err(|e| TapError::Session(format!("Failed to close browser: {}", e)))?;
        self.handler.abort();
        Ok(())
    }
}
