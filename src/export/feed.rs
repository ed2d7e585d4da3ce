// src/export/feed.rs

//! JSON Feed construction.
//!
//! One feed document per export level, with items projected 1:1 from
//! canonical entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Entry;

/// JSON Feed specification version advertised in every envelope.
pub const JSON_FEED_VERSION: &str = "https://jsonfeed.org/version/1.1";

/// File name of the JSON Feed document at every level.
pub const JSON_FEED_FILENAME: &str = "feed.json";

/// JSON Feed envelope for one export level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonFeed {
    pub version: String,
    pub title: String,
    pub home_page_url: String,
    pub feed_url: String,
    pub description: String,
    pub items: Vec<JsonFeedItem>,
}

/// One feed item, projected from an entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonFeedItem {
    /// The entry's derived slug, not its URL
    pub id: String,
    pub url: String,
    pub title: String,
    pub date_published: DateTime<Utc>,
    pub date_modified: DateTime<Utc>,
}

impl JsonFeed {
    /// Build the feed for one export level.
    ///
    /// `base_url` is the level's public URL with trailing slash; the feed
    /// URL is derived by appending the feed file name.
    pub fn for_level(
        title: impl Into<String>,
        base_url: &str,
        description: impl Into<String>,
        entries: &[&Entry],
    ) -> Self {
        Self {
            version: JSON_FEED_VERSION.to_string(),
            title: title.into(),
            home_page_url: base_url.to_string(),
            feed_url: format!("{base_url}{JSON_FEED_FILENAME}"),
            description: description.into(),
            items: entries.iter().map(|entry| JsonFeedItem::from(*entry)).collect(),
        }
    }
}

impl From<&Entry> for JsonFeedItem {
    fn from(entry: &Entry) -> Self {
        Self {
            id: entry.id.clone(),
            url: entry.html_url.clone(),
            title: entry.title.clone(),
            date_published: entry.created_at,
            date_modified: entry.updated_at,
        }
    }
}
