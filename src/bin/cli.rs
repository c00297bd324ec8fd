//! awesome-ingest CLI
//!
//! Local execution entry point for the ingestion pipeline.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use awesome_ingest::{
    error::{AppError, Result},
    models::{CategoryMap, Config, SourceFormat, SourceInfo},
    pipeline,
    services::{estimate_cost, resolver_from_env},
    storage::{ListStorage, LocalStorage},
};

/// awesome-ingest - Awesome-list ingestion pipeline
#[derive(Parser, Debug)]
#[command(
    name = "awesome-ingest",
    version,
    about = "Parses awesome-list markdown into a categorized resource catalog"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Path to the snapshot storage directory
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full pipeline over all configured sources
    Pipeline,

    /// Parse a local document into a snapshot
    Parse {
        /// Path to the document
        input: PathBuf,

        /// Document format
        #[arg(long, value_enum, default_value = "markdown")]
        format: Format,

        /// Source name (default: input file stem)
        #[arg(long)]
        name: Option<String>,
    },

    /// Validate configuration and the category mapping table
    Validate,

    /// Estimate the AI fallback cost for a local document
    Estimate {
        /// Path to the markdown document
        input: PathBuf,
    },

    /// Show current snapshot info
    Info,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Markdown,
    Json,
}

impl From<Format> for SourceFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Markdown => SourceFormat::Markdown,
            Format::Json => SourceFormat::Json,
        }
    }
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);
    let storage = LocalStorage::new(&cli.storage_dir);

    match cli.command {
        Command::Pipeline => {
            config.validate()?;
            let map = CategoryMap::load_or_default(&config.mapping_path);
            let resolver = resolver_from_env(&config.ai);

            pipeline::run_pipeline(&config, &map, resolver.as_ref(), &storage).await?;
            log::info!("Pipeline complete!");
        }

        Command::Parse {
            input,
            format,
            name,
        } => {
            let map = CategoryMap::load_or_default(&config.mapping_path);
            let resolver = resolver_from_env(&config.ai);

            let name = name.unwrap_or_else(|| {
                input
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "local".to_string())
            });
            let source = SourceInfo {
                name,
                url: input.display().to_string(),
                format: format.into(),
            };

            let text = std::fs::read_to_string(&input)?;
            let (list, mut stats) = match source.format {
                SourceFormat::Markdown => {
                    pipeline::MarkdownParser::new(&config, resolver.as_ref())
                        .parse(&text, &source)
                        .await
                }
                SourceFormat::Json => pipeline::parse_json(&text, &source, &config)?,
            };

            let outcome = pipeline::reconcile(list, &map);
            stats.unmapped_labels = outcome.unmapped.len();

            let snapshot = awesome_ingest::models::ListSnapshot::new(outcome.list);
            let summary = storage
                .write_snapshot(&source.name, &snapshot, &stats)
                .await?;

            log::info!(
                "Parsed {} resources to {}",
                summary.resource_count,
                summary.snapshot_location
            );
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!(
                "✓ Config OK ({} sources, AI delay {} ms)",
                config.sources.len(),
                config.ai.request_delay_ms
            );

            let map = CategoryMap::load(&config.mapping_path).or_else(|e| {
                if matches!(e, AppError::Io(_)) {
                    log::warn!(
                        "Mapping table not found at {}; checking built-in table",
                        config.mapping_path
                    );
                    Ok(CategoryMap::default())
                } else {
                    Err(e)
                }
            })?;
            log::info!("✓ Mapping table OK ({} entries, no contradictions)", map.len());

            log::info!("All validations passed!");
        }

        Command::Estimate { input } => {
            let text = std::fs::read_to_string(&input)?;
            let count = pipeline::count_ambiguous(&text);
            let cost = estimate_cost(count, config.ai.cost_per_line);

            log::info!(
                "{} ambiguous lines, estimated cost ${:.2}",
                count,
                cost
            );
        }

        Command::Info => {
            log::info!("Storage directory: {}", cli.storage_dir.display());

            if config.sources.is_empty() {
                log::info!("No sources configured.");
            }
            for source in &config.sources {
                match storage.load_snapshot(&source.name).await? {
                    Some(snapshot) => {
                        log::info!(
                            "{}: {} resources, {} categories, generated {}",
                            source.name,
                            snapshot.count,
                            snapshot.list.categories.len(),
                            snapshot.generated_at
                        );
                    }
                    None => log::info!("{}: no snapshot yet", source.name),
                }
            }
        }
    }

    log::info!("Done!");

    Ok(())
}
