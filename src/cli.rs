use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::pipeline::extract::OutputFormat;

/// `linklore` - curated link catalogs from exported chat transcripts.
#[derive(Parser, Debug)]
#[command(name = "linklore")]
#[command(version = "0.1.0")]
#[command(about = "Extract, validate and enrich links shared in chat exports.", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract links from an exported chat transcript
    Extract {
        /// Transcript file (.txt)
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Probe each URL with a HEAD request
        #[arg(long)]
        validate: bool,

        /// Simultaneous validation probes
        #[arg(long, default_value_t = 10)]
        concurrency: usize,

        /// Cap the number of extracted links
        #[arg(long)]
        limit: Option<usize>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// Enrich stored links with page metadata via a headless browser
    Enrich {
        /// Link store JSON file
        input: PathBuf,

        /// Output file (default: overwrite input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Index to resume from
        #[arg(long, default_value_t = 0)]
        start: usize,

        /// Cap the number of links to process
        #[arg(long)]
        limit: Option<usize>,

        /// Per-page navigation timeout in milliseconds
        #[arg(long, default_value_t = 15_000)]
        timeout: u64,

        /// Skip links already enriched
        #[arg(long)]
        skip_enriched: bool,
    },

    /// Merge new links from transcript segments into the store
    Update {
        /// Transcript segment file(s)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Link store JSON file
        #[arg(long, default_value = "links/links.json")]
        links_json: PathBuf,

        /// Enrich the new links before merging
        #[arg(long)]
        enrich: bool,

        /// Report new links without saving
        #[arg(long)]
        dry_run: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_has_no_flag_conflicts() {
        Cli::command().debug_assert();
    }
}
