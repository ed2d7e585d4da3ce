//! Export orchestration.
//!
//! Drives the per-level export contract: site-wide, once per category,
//! once per author. Every level gets an HTML index, an RSS2 document,
//! and a JSON Feed; the site root additionally gets a sitemap.
//!
//! ## Output Layout
//!
//! ```text
//! {root}/
//! ├── index.html
//! ├── rss2.xml
//! ├── feed.json
//! ├── sitemap.xml
//! ├── {category}/            # recreated fresh each run
//! │   ├── index.html
//! │   ├── rss2.xml
//! │   └── feed.json
//! └── author/                # recreated fresh each run
//!     └── {author}/
//!         ├── index.html
//!         ├── rss2.xml
//!         └── feed.json
//! ```
//!
//! Scoped directories are destructively recreated so that no stale pages
//! survive a category or author disappearing between runs.

mod feed;
mod render;

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

use crate::error::Result;
use crate::models::{Entry, SiteConfig};
use crate::pipeline::{ScopeIndex, entries_for_author, entries_for_category};

pub use feed::{JSON_FEED_FILENAME, JSON_FEED_VERSION, JsonFeed, JsonFeedItem};
pub use render::{Renderer, StaticRenderer, author_url, category_url, scoped_title};

/// Directory name the author scopes live under.
///
/// Also the reason `author` is a denylisted category value: a category of
/// that name would collide with this directory.
pub const AUTHOR_DIR: &str = "author";

/// Writes the full export tree for one run.
pub struct Exporter<R: Renderer> {
    root: PathBuf,
    site: SiteConfig,
    renderer: R,
}

impl<R: Renderer> Exporter<R> {
    /// Create an exporter rooted at the given output directory.
    pub fn new(root: impl Into<PathBuf>, site: SiteConfig, renderer: R) -> Self {
        Self {
            root: root.into(),
            site,
            renderer,
        }
    }

    /// Export every level: site-wide, per category, per author, plus the sitemap.
    pub async fn export(
        &self,
        entries: &[Entry],
        categories: &ScopeIndex,
        authors: &ScopeIndex,
        generated_on: &str,
    ) -> Result<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        self.remove_stale_category_dirs(categories).await?;

        // Site-wide level.
        let all: Vec<&Entry> = entries.iter().collect();
        self.write_documents(
            &self.root,
            self.renderer.top_index(&all, &self.site),
            self.renderer.top_rss2(&all, &self.site),
            JsonFeed::for_level(&self.site.title, &self.site.url, &self.site.description, &all),
        )
        .await?;

        // Category levels, each directory recreated fresh.
        for category in categories.iter() {
            let dir = self.root.join(category);
            recreate_dir(&dir).await?;

            let scoped = entries_for_category(entries, category);
            self.write_documents(
                &dir,
                self.renderer.category_index(category, &scoped, &self.site),
                self.renderer.category_rss2(category, &scoped, &self.site),
                JsonFeed::for_level(
                    scoped_title(category, &self.site),
                    &category_url(category, &self.site),
                    &self.site.description,
                    &scoped,
                ),
            )
            .await?;
        }

        // Author levels under one recreated author root.
        let author_root = self.root.join(AUTHOR_DIR);
        recreate_dir(&author_root).await?;
        for author in authors.iter() {
            let dir = author_root.join(author);
            tokio::fs::create_dir_all(&dir).await?;

            let scoped = entries_for_author(entries, author);
            self.write_documents(
                &dir,
                self.renderer.author_index(author, &scoped, &self.site),
                self.renderer.author_rss2(author, &scoped, &self.site),
                JsonFeed::for_level(
                    scoped_title(author, &self.site),
                    &author_url(author, &self.site),
                    &self.site.description,
                    &scoped,
                ),
            )
            .await?;
        }

        let sitemap = self
            .renderer
            .sitemap(categories, authors, generated_on, &self.site);
        write_document(&self.root.join("sitemap.xml"), &sitemap).await?;

        Ok(())
    }

    /// Remove subdirectories for categories that disappeared since the
    /// previous run.
    ///
    /// The output tree is exclusively owned by the exporter: every
    /// subdirectory except the author root is a category scope.
    async fn remove_stale_category_dirs(&self, categories: &ScopeIndex) -> Result<()> {
        let mut dir = tokio::fs::read_dir(&self.root).await?;
        while let Some(dirent) = dir.next_entry().await? {
            if !dirent.file_type().await?.is_dir() {
                continue;
            }
            let name = dirent.file_name();
            let Some(name) = name.to_str() else { continue };
            if name == AUTHOR_DIR || categories.contains(name) {
                continue;
            }
            log::debug!("Removing stale scope directory {}", dirent.path().display());
            tokio::fs::remove_dir_all(dirent.path()).await?;
        }
        Ok(())
    }

    /// Write the three per-level documents into one directory.
    async fn write_documents(
        &self,
        dir: &Path,
        index_html: String,
        rss2_xml: String,
        feed: JsonFeed,
    ) -> Result<()> {
        write_document(&dir.join("index.html"), &index_html).await?;
        write_document(&dir.join("rss2.xml"), &rss2_xml).await?;

        let feed_json = serde_json::to_string_pretty(&feed)?;
        write_document(&dir.join(JSON_FEED_FILENAME), &feed_json).await?;

        log::debug!("Wrote level {}", dir.display());
        Ok(())
    }
}

/// Remove a directory tree if present, then create it empty.
async fn recreate_dir(dir: &Path) -> Result<()> {
    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    tokio::fs::create_dir_all(dir).await?;
    Ok(())
}

/// Write a document atomically (write to temp sibling, then rename),
/// with a trailing newline.
async fn write_document(path: &Path, contents: &str) -> Result<()> {
    let tmp = path.with_extension("tmp");
    let mut file = tokio::fs::File::create(&tmp).await?;
    file.write_all(contents.as_bytes()).await?;
    if !contents.ends_with('\n') {
        file.write_all(b"\n").await?;
    }
    file.flush().await?;
    drop(file);

    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}
