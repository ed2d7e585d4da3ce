//! Canonical entry data structure.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A classified repository, the unit the pipeline operates on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Entry {
    /// Stable slug derived from the identity path
    pub id: String,

    /// Display name
    pub title: String,

    /// Taxonomy category, first recognized tag with the prefix stripped
    pub category: String,

    /// Owner login
    pub author: String,

    /// Canonical web URL
    pub html_url: String,

    /// Creation instant
    pub created_at: DateTime<Utc>,

    /// Last push instant
    pub updated_at: DateTime<Utc>,

    /// Creation instant in the display timezone, `YYYY-MM-DD hh:mm:ss`
    pub created_at_display: String,

    /// Last push instant in the display timezone, `YYYY-MM-DD hh:mm:ss`
    pub updated_at_display: String,

    /// Last push instant in RFC 2822 form for RSS `pubDate`
    pub updated_at_rfc2822: String,

    /// Recency bucket for display styling
    pub recency: RecencyClass,
}

impl Entry {
    /// Derive the stable slug for an identity path.
    pub fn slug(full_name: &str) -> String {
        full_name.replace('/', "_")
    }
}

/// Recency bucket derived from the time elapsed since the last update.
///
/// Buckets are keyed by whole elapsed days, half-open on the lower
/// bound: exactly one elapsed day already falls into `OverDay`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RecencyClass {
    /// Updated within the last day
    #[serde(rename = "days-over-0")]
    Current,
    /// Updated one to six days ago
    #[serde(rename = "days-over-1")]
    OverDay,
    /// Updated seven to 29 days ago
    #[serde(rename = "days-over-7")]
    OverWeek,
    /// Updated 30 to 364 days ago
    #[serde(rename = "days-over-30")]
    OverMonth,
    /// Updated a year or more ago
    #[serde(rename = "days-over-365")]
    OverYear,
}

impl RecencyClass {
    /// Bucket an elapsed duration.
    pub fn from_elapsed(elapsed: Duration) -> Self {
        match elapsed.num_days() {
            d if d < 1 => Self::Current,
            d if d < 7 => Self::OverDay,
            d if d < 30 => Self::OverWeek,
            d if d < 365 => Self::OverMonth,
            _ => Self::OverYear,
        }
    }

    /// CSS class name used by the index templates.
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Current => "days-over-0",
            Self::OverDay => "days-over-1",
            Self::OverWeek => "days-over-7",
            Self::OverMonth => "days-over-30",
            Self::OverYear => "days-over-365",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug() {
        assert_eq!(Entry::slug("alice/sample-repo"), "alice_sample-repo");
        assert_eq!(Entry::slug("no-separator"), "no-separator");
    }

    #[test]
    fn test_recency_buckets() {
        assert_eq!(
            RecencyClass::from_elapsed(Duration::hours(5)),
            RecencyClass::Current
        );
        assert_eq!(
            RecencyClass::from_elapsed(Duration::days(3)),
            RecencyClass::OverDay
        );
        assert_eq!(
            RecencyClass::from_elapsed(Duration::days(10)),
            RecencyClass::OverWeek
        );
        assert_eq!(
            RecencyClass::from_elapsed(Duration::days(100)),
            RecencyClass::OverMonth
        );
        assert_eq!(
            RecencyClass::from_elapsed(Duration::days(400)),
            RecencyClass::OverYear
        );
    }

    #[test]
    fn test_recency_boundaries_are_half_open() {
        // Exactly one elapsed day is already over the first bucket.
        assert_eq!(
            RecencyClass::from_elapsed(Duration::hours(24)),
            RecencyClass::OverDay
        );
        assert_eq!(
            RecencyClass::from_elapsed(Duration::days(7)),
            RecencyClass::OverWeek
        );
        assert_eq!(
            RecencyClass::from_elapsed(Duration::days(30)),
            RecencyClass::OverMonth
        );
        assert_eq!(
            RecencyClass::from_elapsed(Duration::days(365)),
            RecencyClass::OverYear
        );
    }

    #[test]
    fn test_css_class_names() {
        assert_eq!(RecencyClass::Current.css_class(), "days-over-0");
        assert_eq!(RecencyClass::OverYear.css_class(), "days-over-365");
    }
}
