// src/export/render.rs

//! Document rendering.
//!
//! The exporter hands each template a fixed data shape and writes the
//! returned text verbatim; `Renderer` is that contract. `StaticRenderer`
//! is the built-in implementation producing plain HTML and XML.

use std::fmt::Write as _;

use crate::models::{Entry, SiteConfig};
use crate::pipeline::ScopeIndex;

/// The seven logical templates of the export contract.
///
/// Index and RSS2 documents receive the level's entry subset plus site
/// config; the sitemap receives the scope indexes and a generation date.
pub trait Renderer {
    fn top_index(&self, entries: &[&Entry], site: &SiteConfig) -> String;
    fn top_rss2(&self, entries: &[&Entry], site: &SiteConfig) -> String;
    fn category_index(&self, category: &str, entries: &[&Entry], site: &SiteConfig) -> String;
    fn category_rss2(&self, category: &str, entries: &[&Entry], site: &SiteConfig) -> String;
    fn author_index(&self, author: &str, entries: &[&Entry], site: &SiteConfig) -> String;
    fn author_rss2(&self, author: &str, entries: &[&Entry], site: &SiteConfig) -> String;
    fn sitemap(
        &self,
        categories: &ScopeIndex,
        authors: &ScopeIndex,
        generated_on: &str,
        site: &SiteConfig,
    ) -> String;
}

/// Compose the title for a scoped level.
pub fn scoped_title(scope: &str, site: &SiteConfig) -> String {
    format!("{} | {}", scope, site.title)
}

/// Compose the public URL for a category level.
pub fn category_url(category: &str, site: &SiteConfig) -> String {
    format!("{}{}/", site.url, category)
}

/// Compose the public URL for an author level.
pub fn author_url(author: &str, site: &SiteConfig) -> String {
    format!("{}author/{}/", site.url, author)
}

/// Built-in renderer producing static HTML and XML documents.
pub struct StaticRenderer;

impl Renderer for StaticRenderer {
    fn top_index(&self, entries: &[&Entry], site: &SiteConfig) -> String {
        render_index(&site.title, &site.url, entries, site)
    }

    fn top_rss2(&self, entries: &[&Entry], site: &SiteConfig) -> String {
        render_rss2(&site.title, &site.url, entries, site)
    }

    fn category_index(&self, category: &str, entries: &[&Entry], site: &SiteConfig) -> String {
        render_index(
            &scoped_title(category, site),
            &category_url(category, site),
            entries,
            site,
        )
    }

    fn category_rss2(&self, category: &str, entries: &[&Entry], site: &SiteConfig) -> String {
        render_rss2(
            &scoped_title(category, site),
            &category_url(category, site),
            entries,
            site,
        )
    }

    fn author_index(&self, author: &str, entries: &[&Entry], site: &SiteConfig) -> String {
        render_index(
            &scoped_title(author, site),
            &author_url(author, site),
            entries,
            site,
        )
    }

    fn author_rss2(&self, author: &str, entries: &[&Entry], site: &SiteConfig) -> String {
        render_rss2(
            &scoped_title(author, site),
            &author_url(author, site),
            entries,
            site,
        )
    }

    fn sitemap(
        &self,
        categories: &ScopeIndex,
        authors: &ScopeIndex,
        generated_on: &str,
        site: &SiteConfig,
    ) -> String {
        let mut urls = String::new();
        let _ = write!(
            urls,
            "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n  </url>\n",
            escape(&site.url),
            generated_on
        );
        for category in categories.iter() {
            let _ = write!(
                urls,
                "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n  </url>\n",
                escape(&category_url(category, site)),
                generated_on
            );
        }
        for author in authors.iter() {
            let _ = write!(
                urls,
                "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n  </url>\n",
                escape(&author_url(author, site)),
                generated_on
            );
        }

        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n\
             {urls}</urlset>"
        )
    }
}

fn render_index(title: &str, base_url: &str, entries: &[&Entry], site: &SiteConfig) -> String {
    let mut rows = String::new();
    for entry in entries {
        let _ = write!(
            rows,
            "      <li class=\"{}\">\n        <a href=\"{}\">{}</a>\n        \
             <a class=\"category\" href=\"{}\">{}</a>\n        \
             <a class=\"author\" href=\"{}\">{}</a>\n        \
             <time datetime=\"{}\">{}</time>\n      </li>\n",
            entry.recency.css_class(),
            escape(&entry.html_url),
            escape(&entry.title),
            escape(&category_url(&entry.category, site)),
            escape(&entry.category),
            escape(&author_url(&entry.author, site)),
            escape(&entry.author),
            entry.updated_at.to_rfc3339(),
            escape(&entry.updated_at_display),
        );
    }

    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{title}</title>\n\
         <link rel=\"alternate\" type=\"application/rss+xml\" href=\"{base}rss2.xml\">\n\
         <link rel=\"alternate\" type=\"application/feed+json\" href=\"{base}feed.json\">\n\
         </head>\n\
         <body>\n\
         <h1>{title}</h1>\n\
         <p>{description}</p>\n\
         <ul class=\"entries\">\n{rows}    </ul>\n\
         </body>\n\
         </html>",
        title = escape(title),
        base = escape(base_url),
        description = escape(&site.description),
        rows = rows,
    )
}

fn render_rss2(title: &str, base_url: &str, entries: &[&Entry], site: &SiteConfig) -> String {
    let mut items = String::new();
    for entry in entries {
        let _ = write!(
            items,
            "    <item>\n      <title>{}</title>\n      <link>{}</link>\n      \
             <guid isPermaLink=\"false\">{}</guid>\n      <category>{}</category>\n      \
             <pubDate>{}</pubDate>\n    </item>\n",
            escape(&entry.title),
            escape(&entry.html_url),
            escape(&entry.id),
            escape(&entry.category),
            escape(&entry.updated_at_rfc2822),
        );
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <rss version=\"2.0\">\n\
         <channel>\n\
         <title>{title}</title>\n\
         <link>{link}</link>\n\
         <description>{description}</description>\n\
         {items}</channel>\n\
         </rss>",
        title = escape(title),
        link = escape(base_url),
        description = escape(&site.description),
        items = items,
    )
}

/// Escape text for HTML/XML element and attribute content.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecencyClass;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn site() -> SiteConfig {
        SiteConfig {
            title: "Repo Station".to_string(),
            description: "Repositories by topic".to_string(),
            url: "https://example.com/station/".to_string(),
        }
    }

    fn sample_entry() -> Entry {
        Entry {
            id: "alice_sample-repo".to_string(),
            title: "sample <repo>".to_string(),
            category: "ghost".to_string(),
            author: "alice".to_string(),
            html_url: "https://example.com/alice/sample-repo".to_string(),
            created_at: Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
            created_at_display: "2025-01-10 09:00:00".to_string(),
            updated_at_display: "2025-06-01 21:00:00".to_string(),
            updated_at_rfc2822: "Sun, 01 Jun 2025 21:00:00 +0900".to_string(),
            recency: RecencyClass::Current,
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"a & <b> "c" 'd'"#),
            "a &amp; &lt;b&gt; &quot;c&quot; &#39;d&#39;"
        );
    }

    #[test]
    fn test_scoped_title_and_urls() {
        let site = site();
        assert_eq!(scoped_title("ghost", &site), "ghost | Repo Station");
        assert_eq!(
            category_url("ghost", &site),
            "https://example.com/station/ghost/"
        );
        assert_eq!(
            author_url("alice", &site),
            "https://example.com/station/author/alice/"
        );
    }

    #[test]
    fn test_index_contains_entry_row() {
        let entry = sample_entry();
        let html = StaticRenderer.top_index(&[&entry], &site());

        assert!(html.contains("<title>Repo Station</title>"));
        assert!(html.contains("class=\"days-over-0\""));
        assert!(html.contains("sample &lt;repo&gt;"));
        assert!(html.contains("https://example.com/station/author/alice/"));
        assert!(html.contains("2025-06-01 21:00:00"));
    }

    #[test]
    fn test_scoped_index_title() {
        let entry = sample_entry();
        let html = StaticRenderer.category_index("ghost", &[&entry], &site());
        assert!(html.contains("<title>ghost | Repo Station</title>"));
    }

    #[test]
    fn test_rss2_item_fields() {
        let entry = sample_entry();
        let xml = StaticRenderer.top_rss2(&[&entry], &site());

        assert!(xml.contains("<rss version=\"2.0\">"));
        assert!(xml.contains("<guid isPermaLink=\"false\">alice_sample-repo</guid>"));
        assert!(xml.contains("<pubDate>Sun, 01 Jun 2025 21:00:00 +0900</pubDate>"));
        assert!(xml.contains("<link>https://example.com/alice/sample-repo</link>"));
    }

    #[test]
    fn test_sitemap_lists_every_scope() {
        let categories = ScopeIndex::from_values(["ghost", "shell"]);
        let authors = ScopeIndex::from_values(["alice"]);
        let xml = StaticRenderer.sitemap(&categories, &authors, "2025-06-02", &site());

        assert!(xml.contains("<loc>https://example.com/station/</loc>"));
        assert!(xml.contains("<loc>https://example.com/station/ghost/</loc>"));
        assert!(xml.contains("<loc>https://example.com/station/shell/</loc>"));
        assert!(xml.contains("<loc>https://example.com/station/author/alice/</loc>"));
        assert!(xml.contains("<lastmod>2025-06-02</lastmod>"));
    }
}
