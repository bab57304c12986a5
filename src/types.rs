use chrono::{DateTime, Utc};
use serde::Deserialize;

// GitHub API response structures
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubRepo {
    pub name: String,
    pub full_name: String,
    pub html_url: String,
    #[serde(default)]
    pub stargazers_count: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubUser {
    pub login: String,
    pub id: u64,
    pub avatar_url: Option<String>,
    pub html_url: String,
}

/// Entry of `/users/{login}/starred` under the `star+json` media type.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubStarredEntry {
    pub starred_at: DateTime<Utc>,
    pub repo: GitHubRepo,
}
