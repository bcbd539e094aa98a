#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

use std::time::Duration;

use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use linklore::cli::{Cli, Commands};
use linklore::enrich::EnrichConfig;
use linklore::pipeline::{enrich, extract, update};

#[tokio::main]
async fn main() {
    // Diagnostics go to stderr; stdout is reserved for extracted JSON.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        tracing::error!("{e}");
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> linklore::Result<()> {
    match cli.command {
        Commands::Extract {
            input,
            output,
            validate,
            concurrency,
            limit,
            format,
        } => {
            let options = extract::ExtractOptions {
                validate,
                concurrency,
                limit,
                format,
                output,
            };
            extract::run(&input, &options).await
        }

        Commands::Enrich {
            input,
            output,
            start,
            limit,
            timeout,
            skip_enriched,
        } => {
            let options = enrich::EnrichOptions {
                output,
                start,
                limit,
                config: EnrichConfig::with_nav_timeout(Duration::from_millis(timeout)),
                skip_enriched,
            };
            enrich::run(&input, &options).await
        }

        Commands::Update {
            inputs,
            links_json,
            enrich,
            dry_run,
        } => {
            let options = update::UpdateOptions {
                store_path: links_json,
                enrich,
                config: EnrichConfig::default(),
                dry_run,
            };
            update::run(&inputs, &options).await
        }
    }
}
