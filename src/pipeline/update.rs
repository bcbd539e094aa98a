//! Incremental-update mode: fold new links from transcript segments into
//! the existing store, optionally enriching them first.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::info;

use crate::enrich::{BrowserEngine, ChromiumEngine, EnrichConfig, EnrichSummary, enrich_link};
use crate::error::Result;
use crate::links::{CanonicalLink, LinkStore, extract_new, mentions_in};
use crate::pipeline::CHECKPOINT_INTERVAL;
use crate::transcript::parse_messages;

const DRY_RUN_PREVIEW: usize = 20;

#[derive(Debug, Clone)]
pub struct UpdateOptions {
    pub store_path: PathBuf,
    pub enrich: bool,
    pub config: EnrichConfig,
    pub dry_run: bool,
}

pub async fn run(inputs: &[PathBuf], options: &UpdateOptions) -> Result<()> {
    for input in inputs {
        super::require_exists(input)?;
    }

    // A missing store starts an empty catalog; a corrupt one aborts.
    let mut store = LinkStore::load(&options.store_path)?;
    info!(existing = store.len(), files = inputs.len(), "updating store");

    let mut known = store.known_urls().clone();
    let mut new_links = Vec::new();
    for input in inputs {
        let text = super::read_input(input)?;
        let mentions = parse_messages(&text).flat_map(|m| mentions_in(&m));
        let found = extract_new(mentions, &mut known, None);
        if !found.is_empty() {
            info!(file = %input.display(), count = found.len(), "new links");
        }
        new_links.extend(found);
    }

    info!(count = new_links.len(), "total new links");
    if new_links.is_empty() {
        info!("nothing to add");
        return Ok(());
    }

    if options.dry_run {
        preview(&new_links);
        return Ok(());
    }

    if options.enrich {
        let engine = ChromiumEngine::launch().await?;
        let result = enrich_new_links(&engine, &mut new_links, &store, options).await;
        engine.shutdown().await;
        result?;
    }

    let added = new_links.len();
    store.merge(new_links);
    store.save(&options.store_path)?;

    info!(
        total = store.len(),
        added,
        store = %options.store_path.display(),
        "store updated"
    );
    Ok(())
}

fn preview(new_links: &[CanonicalLink]) {
    eprintln!("[dry run] new links:");
    for link in new_links.iter().take(DRY_RUN_PREVIEW) {
        eprintln!("  - {} | {} | {}", link.date, link.domain, link.url);
    }
    if new_links.len() > DRY_RUN_PREVIEW {
        eprintln!("  ... and {} more", new_links.len() - DRY_RUN_PREVIEW);
    }
}

/// Sequential enrichment of the incoming batch. Checkpoints write the
/// would-be merged store so interrupting mid-batch loses at most one
/// interval, same as enrich mode.
pub async fn enrich_new_links<E: BrowserEngine>(
    engine: &E,
    new_links: &mut [CanonicalLink],
    store: &LinkStore,
    options: &UpdateOptions,
) -> Result<()> {
    let total = new_links.len();
    info!(total, "enriching new links");

    let mut summary = EnrichSummary::default();

    for index in 0..total {
        info!(position = index + 1, total, url = %new_links[index].url, "processing");
        let started = Instant::now();
        let session = engine.open_session().await?;
        let status = enrich_link(session, &mut new_links[index], &options.config).await;
        summary.record(status);
        info!(status = ?status, elapsed_secs = started.elapsed().as_secs_f32(), "done");

        if (index + 1) % CHECKPOINT_INTERVAL == 0 {
            checkpoint(new_links, store, &options.store_path)?;
            info!(processed = index + 1, "checkpoint saved");
        }
    }

    info!(
        success = summary.success,
        timeout = summary.timeout,
        error = summary.error,
        "enrichment finished"
    );
    Ok(())
}

fn checkpoint(new_links: &[CanonicalLink], store: &LinkStore, path: &Path) -> Result<()> {
    let merged = LinkStore::from_links(new_links.iter().chain(store.links()).cloned().collect());
    merged.save(path)?;
    Ok(())
}
