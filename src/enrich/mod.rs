//! Metadata enrichment: drive a browser session to a link and read
//! title/description with multi-source fallback.

pub mod browser;

use std::time::Duration;

use crate::links::{CanonicalLink, EnrichStatus};

pub use browser::{BrowserEngine, ChromiumEngine, NavigationError, PageSession};

#[derive(Debug, Clone)]
pub struct EnrichConfig {
    /// Navigation timeout per page.
    pub nav_timeout: Duration,
    /// Fixed wait after navigation so client-side rendering settles.
    pub settle: Duration,
    /// Timeout per metadata attribute lookup.
    pub lookup_timeout: Duration,
    /// Descriptions are truncated to this many characters.
    pub max_description: usize,
    /// Stored failure messages are truncated to this many characters.
    pub max_error: usize,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            nav_timeout: Duration::from_secs(15),
            settle: Duration::from_secs(2),
            lookup_timeout: Duration::from_secs(1),
            max_description: 500,
            max_error: 100,
        }
    }
}

impl EnrichConfig {
    pub fn with_nav_timeout(timeout: Duration) -> Self {
        Self {
            nav_timeout: timeout,
            ..Self::default()
        }
    }
}

/// Best-effort page metadata. Either field may be missing.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Enrich one link in place, consuming the session. The session is closed
/// on every exit path, whatever the outcome.
pub async fn enrich_link<S: PageSession>(
    session: S,
    link: &mut CanonicalLink,
    config: &EnrichConfig,
) -> EnrichStatus {
    let outcome = drive(&session, link, config).await;
    session.close().await;
    outcome
}

async fn drive<S: PageSession>(
    session: &S,
    link: &mut CanonicalLink,
    config: &EnrichConfig,
) -> EnrichStatus {
    match session.navigate(&link.url, config.nav_timeout).await {
        Ok(()) => {
            tokio::time::sleep(config.settle).await;
            let metadata = extract_metadata(session, config).await;
            if let Some(title) = metadata.title {
                link.title = title;
            }
            if let Some(description) = metadata.description {
                link.description = Some(description);
            }
            link.enriched = true;
            link.enrich_status = EnrichStatus::Success;
            link.enrich_error = None;
        }
        Err(NavigationError::Timeout) => {
            link.enriched = false;
            link.enrich_status = EnrichStatus::Timeout;
        }
        Err(NavigationError::Failed(message)) => {
            link.enriched = false;
            link.enrich_status = EnrichStatus::Error;
            link.enrich_error = Some(truncate_chars(&message, config.max_error));
        }
    }
    link.enrich_status
}

/// Fallback priority: social-card tags first (they are written for link
/// sharing), the document itself last. Every lookup is best-effort.
pub async fn extract_metadata<S: PageSession>(
    session: &S,
    config: &EnrichConfig,
) -> PageMetadata {
    let t = config.lookup_timeout;

    let mut title = session
        .attribute(r#"meta[property="og:title"]"#, "content", t)
        .await;
    if non_empty(&title).is_none() {
        title = session
            .attribute(r#"meta[name="twitter:title"]"#, "content", t)
            .await;
    }
    if non_empty(&title).is_none() {
        title = session.document_title().await;
    }

    let mut description = session
        .attribute(r#"meta[property="og:description"]"#, "content", t)
        .await;
    if non_empty(&description).is_none() {
        description = session
            .attribute(r#"meta[name="description"]"#, "content", t)
            .await;
    }
    if non_empty(&description).is_none() {
        description = session
            .attribute(r#"meta[name="twitter:description"]"#, "content", t)
            .await;
    }

    PageMetadata {
        title: non_empty(&title).map(str::to_string),
        description: non_empty(&description)
            .map(|d| truncate_chars(d, config.max_description)),
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}

/// Counts per outcome, for the end-of-run summary.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct EnrichSummary {
    pub success: usize,
    pub timeout: usize,
    pub error: usize,
}

impl EnrichSummary {
    pub fn record(&mut self, status: EnrichStatus) {
        match status {
            EnrichStatus::Success => self.success += 1,
            EnrichStatus::Timeout => self.timeout += 1,
            EnrichStatus::Error => self.error += 1,
            EnrichStatus::NotEnriched => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("descrição", 6), "descri");
        assert_eq!(truncate_chars("curto", 10), "curto");
    }

    #[test]
    fn summary_records_terminal_outcomes() {
        let mut summary = EnrichSummary::default();
        summary.record(EnrichStatus::Success);
        summary.record(EnrichStatus::Success);
        summary.record(EnrichStatus::Timeout);
        summary.record(EnrichStatus::NotEnriched);
        assert_eq!(
            summary,
            EnrichSummary {
                success: 2,
                timeout: 1,
                error: 0
            }
        );
    }
}
