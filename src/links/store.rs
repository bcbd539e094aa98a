//! The persisted link catalog: a JSON array ordered most-recently-merged
//! first. The store is the single source of truth for "already known" URLs.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::StoreError;

use super::extract::RawUrlMention;
use super::types::CanonicalLink;

#[derive(Debug, Default)]
pub struct LinkStore {
    links: Vec<CanonicalLink>,
    known: HashSet<String>,
}

impl LinkStore {
    /// Load a store from disk. A missing file is an empty store; a file
    /// that exists but is not valid JSON is corruption and aborts the run
    /// rather than risk clobbering the catalog.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path).map_err(|source| StoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let links: Vec<CanonicalLink> =
            serde_json::from_str(&text).map_err(|source| StoreError::Corrupt {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::from_links(links))
    }

    pub fn from_links(links: Vec<CanonicalLink>) -> Self {
        let known = links.iter().map(|l| l.url.clone()).collect();
        Self { links, known }
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn links(&self) -> &[CanonicalLink] {
        &self.links
    }

    pub fn links_mut(&mut self) -> &mut [CanonicalLink] {
        &mut self.links
    }

    pub fn known_urls(&self) -> &HashSet<String> {
        &self.known
    }

    /// Prepend new links ahead of the existing entries. Existing records
    /// are never touched; the catalog reads newest-merged first.
    pub fn merge(&mut self, new_links: Vec<CanonicalLink>) {
        for link in &new_links {
            self.known.insert(link.url.clone());
        }
        let mut merged = new_links;
        merged.append(&mut self.links);
        self.links = merged;
    }

    /// Write the full catalog as pretty-printed JSON, creating parent
    /// directories as needed. Also used for mid-batch checkpoints.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let write_err = |source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let json = serde_json::to_string_pretty(&self.links).map_err(|source| {
            StoreError::Write {
                path: path.to_path_buf(),
                source: source.into(),
            }
        })?;
        fs::write(path, json).map_err(write_err)
    }
}

/// Canonicalize mentions and keep only genuinely new links: not already in
/// `known` and not seen earlier in this batch. First occurrence wins the
/// title/metadata seeding. `known` is extended as links are accepted, so
/// one set can span several transcript files.
pub fn extract_new(
    mentions: impl IntoIterator<Item = RawUrlMention>,
    known: &mut HashSet<String>,
    limit: Option<usize>,
) -> Vec<CanonicalLink> {
    let mut new_links = Vec::new();
    for mention in mentions {
        if limit.is_some_and(|cap| new_links.len() >= cap) {
            break;
        }
        let link = CanonicalLink::seeded(&mention);
        if known.insert(link.url.clone()) {
            new_links.push(link);
        }
    }
    new_links
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mention(url: &str, shared_by: &str) -> RawUrlMention {
        RawUrlMention {
            url_original: url.to_string(),
            date: "05/08/2025".to_string(),
            shared_by: shared_by.to_string(),
        }
    }

    #[test]
    fn batch_dedup_is_first_seen_wins() {
        let mut known = HashSet::new();
        let new_links = extract_new(
            [
                mention("https://example.com/a?utm_source=wa", "Ana"),
                mention("https://example.com/a", "Bruno"),
            ],
            &mut known,
            None,
        );
        assert_eq!(new_links.len(), 1);
        assert_eq!(new_links[0].shared_by, "Ana");
    }

    #[test]
    fn known_urls_are_skipped() {
        let mut known = HashSet::from(["https://example.com/a".to_string()]);
        let new_links = extract_new([mention("https://example.com/a/", "Ana")], &mut known, None);
        assert!(new_links.is_empty());
    }

    #[test]
    fn limit_caps_accepted_links() {
        let mut known = HashSet::new();
        let new_links = extract_new(
            (0..5).map(|i| mention(&format!("https://example.com/{i}"), "Ana")),
            &mut known,
            Some(3),
        );
        assert_eq!(new_links.len(), 3);
    }

    #[test]
    fn merge_prepends_and_preserves_existing() {
        let mut known = HashSet::new();
        let old = extract_new([mention("https://old.example.com/1", "Ana")], &mut known, None);
        let mut store = LinkStore::from_links(old.clone());

        let new_links = extract_new(
            [
                mention("https://new.example.com/1", "Bruno"),
                mention("https://new.example.com/2", "Carla"),
            ],
            &mut known,
            None,
        );
        store.merge(new_links.clone());

        assert_eq!(store.len(), 3);
        assert_eq!(store.links()[..2], new_links[..]);
        assert_eq!(store.links()[2], old[0]);
        assert!(store.known_urls().contains("https://new.example.com/2"));
    }

    #[test]
    fn load_missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = LinkStore::load(&dir.path().join("absent.json")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn load_rejects_corrupt_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("links.json");
        fs::write(&path, "[{ truncated").unwrap();
        let err = LinkStore::load(&path).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("links.json");

        let mut known = HashSet::new();
        let links = extract_new(
            [mention("https://example.com/a?utm_source=wa", "Ana")],
            &mut known,
            None,
        );
        let store = LinkStore::from_links(links.clone());
        store.save(&path).unwrap();

        let reloaded = LinkStore::load(&path).unwrap();
        assert_eq!(reloaded.links(), &links[..]);
    }
}
