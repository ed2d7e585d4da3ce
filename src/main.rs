// src/main.rs

//! topicfeed: topic-taxonomy repository crawler and static feed publisher.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use topicfeed::{config, error::Result, pipeline, services::GitHubClient};

#[derive(Parser, Debug)]
#[command(
    name = "topicfeed",
    version,
    about = "Crawls topic-tagged repositories and republishes static indexes and feeds"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl the search API and rebuild the static export tree
    Run {
        /// Override the configured output root
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Validate the configuration file
    Validate,
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

    match cli.command {
        Command::Run { output } => {
            let config = config::load_or_default(&cli.config);
            config.validate()?;

            let token = config::resolve_token(&config);
            if token.is_none() {
                log::warn!(
                    "No bearer token in ${}; requests go out unauthenticated",
                    config.crawler.token_env
                );
            }

            let client = GitHubClient::new(&config.crawler, token.as_deref())?;
            let output_root = output.unwrap_or_else(|| PathBuf::from(&config.output.root));

            pipeline::run_pipeline(&config, &client, &output_root).await?;
            log::info!("Done!");
        }

        Command::Validate => {
            let config = config::load_config(&cli.config)?;
            config.validate()?;

            log::info!("Config OK");
            log::info!("  search query: {}", config.search.query);
            log::info!("  taxonomy prefix: {}", config.taxonomy.prefix);
            log::info!("  output root: {}", config.output.root);
            log::info!("  display timezone: {}", config.output.timezone);
            log::info!("  redirects: {}", config.redirect.len());
        }
    }

    Ok(())
}
