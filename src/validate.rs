//! Reachability probing: lightweight HEAD requests under bounded
//! concurrency.
//!
//! Completion order only drives progress logging; the authoritative results
//! land in per-index slots so `output[i]` always describes `input[i]`.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::links::{CanonicalLink, ValidationStatus};

const USER_AGENT: &str = "Mozilla/5.0 (compatible; linklore/0.1)";

#[derive(Debug, Clone)]
pub struct ValidateConfig {
    /// Maximum simultaneously in-flight probes.
    pub concurrency: usize,
    /// Per-probe timeout, not a batch deadline.
    pub timeout: Duration,
}

impl Default for ValidateConfig {
    fn default() -> Self {
        Self {
            concurrency: 10,
            timeout: Duration::from_secs(10),
        }
    }
}

/// Result of probing one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    pub status: ValidationStatus,
    pub status_code: Option<u16>,
    pub final_url: Option<String>,
}

impl Probe {
    fn failed(status: ValidationStatus) -> Self {
        Self {
            status,
            status_code: None,
            final_url: None,
        }
    }
}

/// Probe every link and record the outcome in place. A failed probe is a
/// per-link status, never a batch error.
pub async fn validate_links(links: &mut [CanonicalLink], config: &ValidateConfig) -> Result<()> {
    let probes = probe_all(
        links.iter().map(|l| l.url.clone()).collect(),
        config,
    )
    .await?;

    for (link, probe) in links.iter_mut().zip(probes) {
        link.status = Some(probe.status);
        link.status_code = probe.status_code;
        link.final_url = probe.final_url;
    }
    Ok(())
}

/// Probe a list of URLs. The returned vector is index-aligned with the
/// input regardless of completion timing.
pub async fn probe_all(urls: Vec<String>, config: &ValidateConfig) -> Result<Vec<Probe>> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .context("failed to build HTTP client")?;

    let total = urls.len();
    let semaphore = Arc::new(Semaphore::new(config.concurrency.max(1)));
    let mut tasks: JoinSet<(usize, Probe)> = JoinSet::new();

    for (index, url) in urls.into_iter().enumerate() {
        let client = client.clone();
        let semaphore = Arc::clone(&semaphore);
        let timeout = config.timeout;
        tasks.spawn(async move {
            // Closes only if the semaphore is dropped, which it never is
            // while tasks are running.
            let _permit = semaphore.acquire_owned().await;
            (index, probe_url(&client, &url, timeout).await)
        });
    }

    // Each completed task owns its slot exclusively; completion order is
    // surfaced only as incremental progress.
    let mut probes: Vec<Option<Probe>> = vec![None; total];
    let mut done = 0;
    while let Some(joined) = tasks.join_next().await {
        let (index, probe) = joined.context("probe task panicked")?;
        done += 1;
        tracing::info!(done, total, status = ?probe.status, "probed");
        probes[index] = Some(probe);
    }

    Ok(probes
        .into_iter()
        .map(|p| p.unwrap_or_else(|| Probe::failed(ValidationStatus::Error)))
        .collect())
}

async fn probe_url(client: &reqwest::Client, url: &str, timeout: Duration) -> Probe {
    match client.head(url).timeout(timeout).send().await {
        Ok(response) => {
            let code = response.status().as_u16();
            let final_url = (response.url().as_str() != url)
                .then(|| response.url().to_string());
            Probe {
                status: if code < 400 {
                    ValidationStatus::Valid
                } else {
                    ValidationStatus::Invalid
                },
                status_code: Some(code),
                final_url,
            }
        }
        Err(e) if e.is_timeout() => Probe::failed(ValidationStatus::Timeout),
        Err(_) => Probe::failed(ValidationStatus::Error),
    }
}

/// Counts per terminal status, for the end-of-run summary.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ValidationSummary {
    pub valid: usize,
    pub invalid: usize,
    pub timeout: usize,
    pub error: usize,
}

pub fn summarize(links: &[CanonicalLink]) -> ValidationSummary {
    let mut summary = ValidationSummary::default();
    for link in links {
        match link.status {
            Some(ValidationStatus::Valid) => summary.valid += 1,
            Some(ValidationStatus::Invalid) => summary.invalid += 1,
            Some(ValidationStatus::Timeout) => summary.timeout += 1,
            Some(ValidationStatus::Error) => summary.error += 1,
            Some(ValidationStatus::Pending) | None => {}
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_statuses() {
        let mut links: Vec<CanonicalLink> = ["a", "b", "c"]
            .iter()
            .map(|s| {
                CanonicalLink::seeded(&crate::links::RawUrlMention {
                    url_original: format!("https://example.com/{s}"),
                    date: "05/08/2025".to_string(),
                    shared_by: "Ana".to_string(),
                })
            })
            .collect();
        links[0].status = Some(ValidationStatus::Valid);
        links[1].status = Some(ValidationStatus::Timeout);
        links[2].status = Some(ValidationStatus::Pending);

        let summary = summarize(&links);
        assert_eq!(summary.valid, 1);
        assert_eq!(summary.timeout, 1);
        assert_eq!(summary.invalid, 0);
        assert_eq!(summary.error, 0);
    }
}
