use serde::{Deserialize, Serialize};

use super::canonical::{canonicalize, domain_of};
use super::extract::{RawUrlMention, seed_title};

/// Reachability of a link as last probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Pending,
    Valid,
    Invalid,
    Timeout,
    Error,
}

/// Outcome of the last enrichment attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichStatus {
    #[default]
    NotEnriched,
    Success,
    Timeout,
    Error,
}

/// One curated link in the catalog. `url` is the canonical form and the
/// dedup key; field names and optionality mirror the persisted JSON schema,
/// so older store files round-trip through serde defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalLink {
    pub url: String,

    /// Exact substring found in the transcript, kept only when
    /// canonicalization changed it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_original: Option<String>,

    /// Lowercased host with a leading `www.` stripped.
    pub domain: String,

    /// Seeded from the URL at extraction, replaced by page metadata on
    /// successful enrichment.
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub shared_by: String,
    pub date: String,

    #[serde(default)]
    pub enriched: bool,

    #[serde(default)]
    pub enrich_status: EnrichStatus,

    /// Truncated failure message, present only when `enrich_status` is
    /// `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrich_error: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ValidationStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,

    /// Final URL after redirects, present only when it differs from `url`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_url: Option<String>,
}

impl CanonicalLink {
    /// Build a fresh catalog entry from a raw mention: canonicalize, derive
    /// the domain, seed a placeholder title, mark validation pending.
    pub fn seeded(mention: &RawUrlMention) -> Self {
        let url = canonicalize(&mention.url_original);
        let domain = domain_of(&url);
        let title = seed_title(&url, &domain);
        let url_original =
            (mention.url_original != url).then(|| mention.url_original.clone());

        Self {
            url,
            url_original,
            domain,
            title,
            description: None,
            shared_by: mention.shared_by.clone(),
            date: mention.date.clone(),
            enriched: false,
            enrich_status: EnrichStatus::NotEnriched,
            enrich_error: None,
            status: Some(ValidationStatus::Pending),
            status_code: None,
            final_url: None,
        }
    }
}
