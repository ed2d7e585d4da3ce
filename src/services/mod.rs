//! Service layer for the crawler application.
//!
//! This module contains the outbound API access logic:
//! - Search and redirect-resolution requests (`GitHubClient`)

mod github;

pub use github::GitHubClient;
