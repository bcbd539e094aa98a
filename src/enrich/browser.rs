//! Browser capability seam.
//!
//! The enricher depends only on [`PageSession`]/[`BrowserEngine`], so the
//! rendering engine can be swapped and tests run against a fake session.
//! The real implementation drives headless Chromium over CDP.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::SetBlockedUrLsParams;
use chromiumoxide::page::Page;
use futures_util::StreamExt;
use thiserror::Error;
use tokio::task::JoinHandle;

/// Pinned desktop user agent; mobile variants get served stripped-down
/// pages with worse metadata.
const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Heavyweight resource patterns blocked before navigation to cut page
/// load latency. Wildcard syntax is CDP `Network.setBlockedURLs`.
const BLOCKED_URL_PATTERNS: &[&str] = &[
    "*.png", "*.jpg", "*.jpeg", "*.gif", "*.webp", "*.svg", "*.ico",
    "*.woff", "*.woff2", "*.ttf", "*.eot",
    "*analytics*", "*tracking*",
];

#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("navigation timed out")]
    Timeout,

    #[error("navigation failed: {0}")]
    Failed(String),
}

/// One isolated browsing session pointed at a single URL.
pub trait PageSession {
    fn navigate(
        &self,
        url: &str,
        timeout: Duration,
    ) -> impl Future<Output = std::result::Result<(), NavigationError>> + Send;

    /// Read one attribute of the first element matching `selector`.
    /// Best-effort: failures and timeouts collapse to `None`.
    fn attribute(
        &self,
        selector: &str,
        attribute: &str,
        timeout: Duration,
    ) -> impl Future<Output = Option<String>> + Send;

    fn document_title(&self) -> impl Future<Output = Option<String>> + Send;

    /// Tear the session down. Called on every exit path.
    fn close(self) -> impl Future<Output = ()> + Send;
}

/// Source of page sessions. One engine (one browser process) is reused
/// sequentially across many sessions to bound resource usage.
pub trait BrowserEngine {
    type Session: PageSession;

    fn open_session(&self) -> impl Future<Output = Result<Self::Session>> + Send;
}

// ─── Chromium implementation ─────────────────────────────────────────────────

pub struct ChromiumEngine {
    browser: Browser,
    handler_loop: JoinHandle<()>,
}

impl ChromiumEngine {
    /// Launch one headless Chromium process. The CDP event handler is
    /// drained on a background task for the lifetime of the engine.
    pub async fn launch() -> Result<Self> {
        let config = BrowserConfig::builder()
            .window_size(1280, 720)
            .arg("--lang=pt-BR")
            .build()
            .map_err(|e| anyhow!(e))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .context("failed to launch headless browser")?;

        let handler_loop = tokio::spawn(async move {
            while handler.next().await.is_some() {}
        });

        Ok(Self {
            browser,
            handler_loop,
        })
    }

    pub async fn shutdown(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::debug!(error = %e, "browser close failed");
        }
        self.handler_loop.abort();
    }
}

impl BrowserEngine for ChromiumEngine {
    type Session = ChromiumSession;

    /// Fresh page per session: separate storage, pinned UA, resource
    /// blocking installed before any navigation.
    async fn open_session(&self) -> Result<ChromiumSession> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .context("failed to open page")?;
        page.set_user_agent(DESKTOP_USER_AGENT)
            .await
            .context("failed to pin user agent")?;
        let blocked: Vec<String> = BLOCKED_URL_PATTERNS.iter().map(ToString::to_string).collect();
        page.execute(SetBlockedUrLsParams::new(blocked))
        .await
        .context("failed to install resource blocks")?;
        Ok(ChromiumSession { page })
    }
}

pub struct ChromiumSession {
    page: Page,
}

impl PageSession for ChromiumSession {
    async fn navigate(&self, url: &str, timeout: Duration) -> std::result::Result<(), NavigationError> {
        match tokio::time::timeout(timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(NavigationError::Failed(e.to_string())),
            Err(_) => Err(NavigationError::Timeout),
        }
    }

    async fn attribute(
        &self,
        selector: &str,
        attribute: &str,
        timeout: Duration,
    ) -> Option<String> {
        let lookup = async {
            let element = self.page.find_element(selector).await.ok()?;
            element.attribute(attribute).await.ok().flatten()
        };
        tokio::time::timeout(timeout, lookup).await.ok().flatten()
    }

    async fn document_title(&self) -> Option<String> {
        self.page.get_title().await.ok().flatten()
    }

    async fn close(self) {
        if let Err(e) = self.page.close().await {
            tracing::debug!(error = %e, "page close failed");
        }
    }
}
