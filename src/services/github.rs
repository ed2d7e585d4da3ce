// src/services/github.rs

//! Repository search API client.
//!
//! Issues authenticated requests against the search endpoint, follows
//! cursor pagination from the `link` response header, and retries each
//! failed request exactly once after a backoff.

use std::time::Duration;

use regex::Regex;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Response};

use crate::error::{AppError, Result};
use crate::models::{CrawlerConfig, RawSearchItem, RepoTimestamps, SearchPage};

/// Accept header fixed by the API.
const ACCEPT_HEADER: &str = "application/vnd.github+json";

/// API version marker attached to every request.
const API_VERSION: &str = "2022-11-28";

/// Client for the repository search API.
///
/// Authentication, API version, and client identity are fixed at
/// construction and attached to every outbound request, including
/// redirect-resolution requests.
pub struct GitHubClient {
    client: Client,
    api_base: String,
    retry_default: Duration,
}

impl GitHubClient {
    /// Create a new API client from crawler settings and an optional bearer token.
    pub fn new(config: &CrawlerConfig, token: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT_HEADER));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(API_VERSION),
        );
        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| AppError::config("bearer token is not a valid header value"))?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            retry_default: Duration::from_secs(config.retry_default_secs),
        })
    }

    /// Fetch all search hits for a query, following pagination until exhausted.
    ///
    /// Items are aggregated in page order, item order within page; later
    /// stages treat first-seen as canonical, so this ordering is significant.
    pub async fn search_repositories(
        &self,
        query: &str,
        sort: &str,
    ) -> Result<Vec<RawSearchItem>> {
        let mut url = format!("{}/search/repositories", self.api_base);
        let search_params = [("q", query), ("sort", sort)];
        let mut first_request = true;
        let mut items = Vec::new();
        let mut pages = 0usize;

        loop {
            // Only the first request carries explicit parameters.
            let params = first_request.then_some(search_params.as_slice());
            first_request = false;

            let response = self.get_with_retry(&url, params).await?;
            let next = next_link(response.headers());

            let page: SearchPage = response.json().await?;
            items.extend(page.items);
            pages += 1;

            match next {
                // The next link already encodes all pagination parameters.
                Some(next_url) => url = next_url,
                None => break,
            }
        }

        log::info!("Fetched {} search hits over {} pages", items.len(), pages);
        Ok(items)
    }

    /// Fetch authoritative timestamps for a single repository.
    ///
    /// Used to resolve redirected identity paths before classification.
    pub async fn fetch_repo_timestamps(&self, full_name: &str) -> Result<RepoTimestamps> {
        let url = format!("{}/repos/{}", self.api_base, full_name);
        let response = self.get_with_retry(&url, None).await?;
        Ok(response.json().await?)
    }

    /// Issue a GET request, retrying exactly once on a non-success status.
    ///
    /// The backoff honors a `Retry-After` response header and falls back
    /// to the configured default. This sleep is the only suspension point
    /// in the pipeline; the API is globally rate-limited, so there is
    /// nothing useful to overlap with the wait.
    pub async fn get_with_retry(
        &self,
        url: &str,
        query: Option<&[(&str, &str)]>,
    ) -> Result<Response> {
        let first = self.send(url, query).await?;
        if first.status().is_success() {
            return Ok(first);
        }

        log::warn!("Status: {}, URL: {}", first.status().as_u16(), url);
        let wait = retry_after(first.headers()).unwrap_or(self.retry_default);
        log::debug!("{}", first.text().await.unwrap_or_default());
        log::debug!("Sleeping to retry after {} seconds.", wait.as_secs());
        tokio::time::sleep(wait).await;

        let second = self.send(url, query).await?;
        let status = second.status();
        if status.is_success() {
            log::debug!("Status: {}, URL: {}", status.as_u16(), url);
            return Ok(second);
        }

        log::warn!("Status: {}, URL: {}", status.as_u16(), url);
        log::debug!("{}", second.text().await.unwrap_or_default());
        Err(AppError::fetch(status.as_u16(), url))
    }

    async fn send(&self, url: &str, query: Option<&[(&str, &str)]>) -> Result<Response> {
        let mut request = self.client.get(url);
        if let Some(query) = query {
            request = request.query(query);
        }
        Ok(request.send().await?)
    }
}

/// Extract the `rel="next"` URL from a `link` response header.
fn next_link(headers: &HeaderMap) -> Option<String> {
    let link = headers.get("link")?.to_str().ok()?;
    let pattern = Regex::new(r#"<([^>]+)>; rel="next""#).ok()?;
    pattern
        .captures(link)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Parse a `Retry-After` header given in seconds.
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    let value = headers.get("retry-after")?.to_str().ok()?;
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_map(name: &'static str, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_next_link_present() {
        let headers = header_map(
            "link",
            r#"<https://api.example.com/search?page=2>; rel="next", <https://api.example.com/search?page=5>; rel="last""#,
        );
        assert_eq!(
            next_link(&headers),
            Some("https://api.example.com/search?page=2".to_string())
        );
    }

    #[test]
    fn test_next_link_after_other_relations() {
        // Middle pages list prev before next.
        let headers = header_map(
            "link",
            r#"<https://api.example.com/search?page=1>; rel="prev", <https://api.example.com/search?page=3>; rel="next", <https://api.example.com/search?page=5>; rel="last""#,
        );
        assert_eq!(
            next_link(&headers),
            Some("https://api.example.com/search?page=3".to_string())
        );
    }

    #[test]
    fn test_next_link_absent_on_last_page() {
        let headers = header_map(
            "link",
            r#"<https://api.example.com/search?page=1>; rel="prev", <https://api.example.com/search?page=5>; rel="first""#,
        );
        assert_eq!(next_link(&headers), None);
    }

    #[test]
    fn test_next_link_no_header() {
        assert_eq!(next_link(&HeaderMap::new()), None);
    }

    #[test]
    fn test_retry_after_seconds() {
        let headers = header_map("retry-after", "42");
        assert_eq!(retry_after(&headers), Some(Duration::from_secs(42)));
    }

    #[test]
    fn test_retry_after_invalid() {
        let headers = header_map("retry-after", "soon");
        assert_eq!(retry_after(&headers), None);
    }
}
