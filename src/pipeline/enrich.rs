//! Enrichment-only mode: run the browser over an existing store, with
//! periodic checkpoints so long runs survive interruption.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::info;

use crate::enrich::{BrowserEngine, ChromiumEngine, EnrichConfig, EnrichSummary, enrich_link};
use crate::error::Result;
use crate::links::LinkStore;
use crate::pipeline::CHECKPOINT_INTERVAL;

#[derive(Debug, Clone)]
pub struct EnrichOptions {
    /// `None` overwrites the input store.
    pub output: Option<PathBuf>,
    pub start: usize,
    pub limit: Option<usize>,
    pub config: EnrichConfig,
    pub skip_enriched: bool,
}

pub async fn run(store_path: &Path, options: &EnrichOptions) -> Result<()> {
    let engine = ChromiumEngine::launch().await?;
    let result = enrich_store(&engine, store_path, options).await;
    engine.shutdown().await;
    result
}

/// Enrichment loop over any engine. Split from [`run`] so the checkpoint
/// and skip logic can be exercised without a real browser.
pub async fn enrich_store<E: BrowserEngine>(
    engine: &E,
    store_path: &Path,
    options: &EnrichOptions,
) -> Result<()> {
    super::require_exists(store_path)?;
    let mut store = LinkStore::load(store_path)?;
    let output = options.output.as_deref().unwrap_or(store_path);

    let total = store.len();
    let end = options
        .limit
        .map_or(total, |limit| (options.start + limit).min(total));

    info!(total, start = options.start, output = %output.display(), "enriching links");

    let mut summary = EnrichSummary::default();
    let mut processed = 0;

    for index in options.start..end {
        let link = &store.links()[index];
        if options.skip_enriched && link.enriched {
            info!(position = index + 1, total, domain = %link.domain, "skip (already enriched)");
            continue;
        }
        info!(position = index + 1, total, url = %link.url, "processing");

        let started = Instant::now();
        let session = engine.open_session().await?;
        let status = enrich_link(
            session,
            &mut store.links_mut()[index],
            &options.config,
        )
        .await;
        summary.record(status);
        processed += 1;

        let link = &store.links()[index];
        info!(
            status = ?status,
            title = %link.title,
            elapsed_secs = started.elapsed().as_secs_f32(),
            "done"
        );

        if processed % CHECKPOINT_INTERVAL == 0 {
            store.save(output)?;
            info!(processed, "checkpoint saved");
        }
    }

    store.save(output)?;

    info!(
        processed,
        success = summary.success,
        timeout = summary.timeout,
        error = summary.error,
        output = %output.display(),
        "enrichment finished"
    );
    Ok(())
}
