// src/pipeline/classify.rs

//! Entry normalization and classification.
//!
//! Turns a raw search hit into a canonical entry: derives the category
//! from the topic-tag taxonomy, localizes timestamps for display, and
//! buckets recency. Items without a usable category are dropped, which
//! is filtering, not an error.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::models::{Entry, RawSearchItem, RecencyClass, TaxonomyConfig};

/// Localized display format for timestamps.
const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// RFC 2822 format used for RSS `pubDate` fields.
const RFC2822_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

/// Reason a raw item was excluded from the canonical entry set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dropped {
    /// No topic tag carried the taxonomy prefix
    NoTaxonomyTag,
    /// Every taxonomy tag was a denylisted value
    OnlyDenylisted,
}

impl Dropped {
    /// Human-readable drop reason for logging.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::NoTaxonomyTag => "no taxonomy tag",
            Self::OnlyDenylisted => "only disallowed categories",
        }
    }
}

/// Classifier turning raw search hits into canonical entries.
pub struct Classifier {
    prefix: String,
    denylist: Vec<String>,
    timezone: Tz,
    now: DateTime<Utc>,
}

impl Classifier {
    /// Create a classifier for one pipeline run.
    ///
    /// `now` is fixed per run so every entry is bucketed against the
    /// same reference instant.
    pub fn new(taxonomy: &TaxonomyConfig, timezone: Tz, now: DateTime<Utc>) -> Self {
        Self {
            prefix: taxonomy.prefix.clone(),
            denylist: taxonomy.denylist.clone(),
            timezone,
            now,
        }
    }

    /// Normalize one raw item into an entry, or report why it was dropped.
    ///
    /// Redirected timestamps must already be applied to the item; this
    /// step is pure.
    pub fn classify(&self, item: &RawSearchItem) -> Result<Entry, Dropped> {
        // A tag that is exactly the prefix strips to nothing; a category
        // is never empty.
        let tagged: Vec<&str> = item
            .topics
            .iter()
            .filter_map(|topic| topic.strip_prefix(&self.prefix))
            .filter(|value| !value.is_empty())
            .collect();
        if tagged.is_empty() {
            return Err(Dropped::NoTaxonomyTag);
        }

        // First surviving tag wins, in source order.
        let category = tagged
            .into_iter()
            .find(|value| !self.denylist.iter().any(|denied| denied == value))
            .ok_or(Dropped::OnlyDenylisted)?;

        let created_local = item.created_at.with_timezone(&self.timezone);
        let updated_local = item.pushed_at.with_timezone(&self.timezone);

        Ok(Entry {
            id: Entry::slug(&item.full_name),
            title: item.name.clone(),
            category: category.to_string(),
            author: item.owner.login.clone(),
            html_url: item.html_url.clone(),
            created_at: item.created_at,
            updated_at: item.pushed_at,
            created_at_display: created_local.format(DISPLAY_FORMAT).to_string(),
            updated_at_display: updated_local.format(DISPLAY_FORMAT).to_string(),
            updated_at_rfc2822: updated_local.format(RFC2822_FORMAT).to_string(),
            recency: RecencyClass::from_elapsed(self.now - item.pushed_at),
        })
    }
}
