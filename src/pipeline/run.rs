// src/pipeline/run.rs

//! Full pipeline run.

use std::path::Path;

use chrono::Utc;

use crate::error::Result;
use crate::export::{Exporter, StaticRenderer};
use crate::models::{Config, Entry};
use crate::pipeline::{Classifier, build_indexes};
use crate::services::GitHubClient;

/// Run the full pipeline against the live API and write the export tree.
pub async fn run_pipeline(
    config: &Config,
    client: &GitHubClient,
    output_root: &Path,
) -> Result<()> {
    let now = Utc::now();

    log::info!("Searching repositories: {}", config.search.query);
    let mut items = client
        .search_repositories(&config.search.query, &config.search.sort)
        .await?;

    // Moved repositories keep their original identity, category, and URL;
    // only the timestamps are corrected from the redirect target.
    for item in &mut items {
        if let Some(target) = config.redirect.get(&item.full_name) {
            log::debug!("redirected from {} to {}", item.full_name, target);
            let timestamps = client.fetch_repo_timestamps(target).await?;
            item.created_at = timestamps.created_at;
            item.pushed_at = timestamps.pushed_at;
        }
    }

    let classifier = Classifier::new(&config.taxonomy, config.output.timezone, now);
    let mut entries: Vec<Entry> = Vec::new();
    for item in &items {
        match classifier.classify(item) {
            Ok(entry) => entries.push(entry),
            Err(dropped) => {
                log::debug!("Dropped {}: {}", item.full_name, dropped.reason());
            }
        }
    }
    log::info!("Classified {} of {} hits", entries.len(), items.len());

    let (categories, authors) = build_indexes(&entries);
    log::info!(
        "Indexed {} categories and {} authors",
        categories.len(),
        authors.len()
    );

    let generated_on = now
        .with_timezone(&config.output.timezone)
        .format("%Y-%m-%d")
        .to_string();
    let exporter = Exporter::new(output_root, config.site.clone(), StaticRenderer);
    exporter
        .export(&entries, &categories, &authors, &generated_on)
        .await?;

    log::info!("Export written to {}", output_root.display());
    Ok(())
}
