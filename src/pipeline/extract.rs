//! Extract mode: transcript in, curated link list out.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::ValueEnum;
use tracing::info;

use crate::error::Result;
use crate::links::{CanonicalLink, extract_new, mentions_in};
use crate::transcript::parse_messages;
use crate::validate::{ValidateConfig, summarize, validate_links};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON array.
    Json,
    /// One JSON object per line.
    Jsonl,
}

#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub validate: bool,
    pub concurrency: usize,
    pub limit: Option<usize>,
    pub format: OutputFormat,
    /// `None` writes to stdout.
    pub output: Option<PathBuf>,
}

pub async fn run(input: &Path, options: &ExtractOptions) -> Result<()> {
    let text = super::read_input(input)?;

    info!(input = %input.display(), "extracting links");
    let mut links = extract_links(&text, options.limit);
    info!(count = links.len(), "unique links found");

    if options.validate {
        info!(concurrency = options.concurrency, "validating URLs");
        let config = ValidateConfig {
            concurrency: options.concurrency,
            ..ValidateConfig::default()
        };
        validate_links(&mut links, &config).await?;
        let summary = summarize(&links);
        info!(
            valid = summary.valid,
            invalid = summary.invalid,
            timeout = summary.timeout,
            error = summary.error,
            "validation finished"
        );
    }

    let rendered = render(&links, options.format)?;
    match &options.output {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            fs::write(path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(output = %path.display(), "saved");
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

/// Parse, scan, canonicalize and dedup in one pass over the transcript.
pub fn extract_links(text: &str, limit: Option<usize>) -> Vec<CanonicalLink> {
    let mentions = parse_messages(text).flat_map(|m| mentions_in(&m));
    let mut known = HashSet::new();
    extract_new(mentions, &mut known, limit)
}

fn render(links: &[CanonicalLink], format: OutputFormat) -> Result<String> {
    let rendered = match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(links).context("failed to serialize links")?
        }
        OutputFormat::Jsonl => links
            .iter()
            .map(|link| serde_json::to_string(link).context("failed to serialize link"))
            .collect::<anyhow::Result<Vec<_>>>()?
            .join("\n"),
    };
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRANSCRIPT: &str = "\
05/08/2025 10:00 da manhã - Ana: olha isso https://example.com/path?utm_source=wa&id=7
05/08/2025 10:02 da manhã - Bruno: de novo https://example.com/path?id=7
06/08/2025 14:30 da tarde - Carla: https://outro.example.org/artigo/";

    #[test]
    fn extracts_dedups_and_canonicalizes() {
        let links = extract_links(TRANSCRIPT, None);
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].url, "https://example.com/path?id=7");
        assert_eq!(links[0].shared_by, "Ana");
        assert_eq!(links[1].url, "https://outro.example.org/artigo");
    }

    #[test]
    fn limit_caps_output() {
        let links = extract_links(TRANSCRIPT, Some(1));
        assert_eq!(links.len(), 1);
    }

    #[test]
    fn jsonl_renders_one_object_per_line() {
        let links = extract_links(TRANSCRIPT, None);
        let rendered = render(&links, OutputFormat::Jsonl).unwrap();
        assert_eq!(rendered.lines().count(), 2);
        for line in rendered.lines() {
            serde_json::from_str::<CanonicalLink>(line).unwrap();
        }
    }
}
