// src/pipeline/index.rs

//! Aggregation index construction.
//!
//! Builds the distinct category and author sets observed in a run.
//! First-seen order is the canonical order for scoped exports, so the
//! index is an ordered set by construction rather than by call-site
//! discipline.

use crate::models::Entry;

/// Ordered set of distinct scope values in first-encounter order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeIndex {
    values: Vec<String>,
}

impl ScopeIndex {
    /// Build from scope values in arrival order, keeping the first occurrence.
    pub fn from_values<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        let values = values
            .into_iter()
            .fold(Vec::<String>::new(), |mut seen, value| {
                if !seen.iter().any(|v| v == value) {
                    seen.push(value.to_string());
                }
                seen
            });
        Self { values }
    }

    /// Scope values in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }
}

/// Build the category and author indexes over canonical entries.
pub fn build_indexes(entries: &[Entry]) -> (ScopeIndex, ScopeIndex) {
    let categories = ScopeIndex::from_values(entries.iter().map(|e| e.category.as_str()));
    let authors = ScopeIndex::from_values(entries.iter().map(|e| e.author.as_str()));
    (categories, authors)
}

/// Entries belonging to one category, preserving canonical entry order.
///
/// Membership is an equality filter over the full sequence, so partition
/// order always matches canonical order regardless of index-build order.
pub fn entries_for_category<'a>(entries: &'a [Entry], category: &str) -> Vec<&'a Entry> {
    entries.iter().filter(|e| e.category == category).collect()
}

/// Entries belonging to one author, preserving canonical entry order.
pub fn entries_for_author<'a>(entries: &'a [Entry], author: &str) -> Vec<&'a Entry> {
    entries.iter().filter(|e| e.author == author).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecencyClass;
    use chrono::{TimeZone, Utc};

    fn entry(id: &str, category: &str, author: &str) -> Entry {
        let instant = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        Entry {
            id: id.to_string(),
            title: id.to_string(),
            category: category.to_string(),
            author: author.to_string(),
            html_url: format!("https://example.com/{id}"),
            created_at: instant,
            updated_at: instant,
            created_at_display: "2025-06-01 09:00:00".to_string(),
            updated_at_display: "2025-06-01 09:00:00".to_string(),
            updated_at_rfc2822: "Sun, 01 Jun 2025 09:00:00 +0900".to_string(),
            recency: RecencyClass::Current,
        }
    }

    #[test]
    fn test_first_seen_order_no_duplicates() {
        let entries = vec![
            entry("a", "ghost", "alice"),
            entry("b", "shell", "bob"),
            entry("c", "ghost", "alice"),
            entry("d", "balloon", "carol"),
            entry("e", "shell", "alice"),
        ];

        let (categories, authors) = build_indexes(&entries);

        let categories: Vec<_> = categories.iter().collect();
        assert_eq!(categories, vec!["ghost", "shell", "balloon"]);

        let authors: Vec<_> = authors.iter().collect();
        assert_eq!(authors, vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn test_partition_preserves_canonical_order() {
        let entries = vec![
            entry("a", "shell", "alice"),
            entry("b", "ghost", "bob"),
            entry("c", "shell", "alice"),
            entry("d", "shell", "bob"),
        ];

        let shells = entries_for_category(&entries, "shell");
        let ids: Vec<_> = shells.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "d"]);

        let alices = entries_for_author(&entries, "alice");
        let ids: Vec<_> = alices.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_empty_entries() {
        let (categories, authors) = build_indexes(&[]);
        assert!(categories.is_empty());
        assert!(authors.is_empty());
        assert_eq!(authors.len(), 0);
    }

    #[test]
    fn test_contains() {
        let index = ScopeIndex::from_values(["ghost", "shell"]);
        assert!(index.contains("ghost"));
        assert!(!index.contains("balloon"));
    }
}
