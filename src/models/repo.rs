//! Raw repository search API shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One page of the repository search response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPage {
    /// Hits in API-supplied order
    pub items: Vec<RawSearchItem>,
}

/// One repository hit from the search API.
///
/// Ephemeral input shape; the pipeline turns it into an [`Entry`]
/// or drops it during classification.
///
/// [`Entry`]: crate::models::Entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSearchItem {
    /// Identity path, `owner/name`
    pub full_name: String,

    /// Display name
    pub name: String,

    /// Repository owner
    pub owner: RepoOwner,

    /// Topic tags as supplied by the API
    #[serde(default)]
    pub topics: Vec<String>,

    /// Canonical web URL
    pub html_url: String,

    /// Creation instant
    pub created_at: DateTime<Utc>,

    /// Last push instant
    pub pushed_at: DateTime<Utc>,
}

/// Repository owner reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoOwner {
    pub login: String,
}

/// Authoritative timestamps fetched from a redirect target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoTimestamps {
    pub created_at: DateTime<Utc>,
    pub pushed_at: DateTime<Utc>,
}
