use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// A repository a user starred, and when they starred it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarredRepository {
    full_name: String,
    starred_at: i64,
}

impl StarredRepository {
    pub fn new(full_name: impl Into<String>, starred_at: i64) -> Self {
        Self {
            full_name: full_name.into(),
            starred_at,
        }
    }

    /// `owner/name` of the repository.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Unix timestamp, in seconds.
    pub fn starred_at(&self) -> i64 {
        self.starred_at
    }
}

/// Rate limit state reported by the last response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitState {
    pub remaining: u32,
    pub limit: u32,
    pub reset_time: DateTime<Utc>,
    pub is_limited: bool,
}

impl Default for RateLimitState {
    fn default() -> Self {
        Self {
            remaining: 5000,
            limit: 5000,
            reset_time: Utc::now() + chrono::Duration::hours(1),
            is_limited: false,
        }
    }
}

/// Metadata of a single API response.
#[derive(Debug, Clone)]
pub struct ResponseMeta {
    pub status: StatusCode,
    /// Page to request next, `0` when there is none.
    pub next_page: u32,
    pub headers: HeaderMap,
    pub rate: Option<RateLimitState>,
}

impl ResponseMeta {
    pub fn new(status: StatusCode, next_page: u32) -> Self {
        Self {
            status,
            next_page,
            headers: HeaderMap::new(),
            rate: None,
        }
    }

    pub fn has_next_page(&self) -> bool {
        self.next_page != 0
    }
}

/// One page of a paginated listing.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: ResponseMeta,
}
