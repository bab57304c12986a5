use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, ACCEPT, AUTHORIZATION, CONTENT_LENGTH};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use crate::error::ApiError;
use crate::models::{Page, RateLimitState, ResponseMeta};
use crate::pagination::LinkPagination;
use crate::types::{GitHubStarredEntry, GitHubUser};

pub const API_BASE_URL: &str = "https://api.github.com";
pub const PER_PAGE: u32 = 100;

const JSON_MEDIA_TYPE: &str = "application/vnd.github.v3+json";
// Adds `starred_at` to every entry of the starred listing.
const STAR_MEDIA_TYPE: &str = "application/vnd.github.star+json";

/// Capabilities a provider needs from a GitHub API client.
///
/// Implementations own transport, authentication, decoding and next-page
/// discovery. A `next_page` of `0` in the returned metadata ends pagination.
#[async_trait]
pub trait GitHubApi: Send + Sync {
    async fn fetch_starred_page(
        &self,
        login: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Page<GitHubStarredEntry>, ApiError>;

    async fn fetch_followers_page(
        &self,
        login: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Page<GitHubUser>, ApiError>;

    /// Users `login` follows.
    async fn fetch_followees_page(
        &self,
        login: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Page<GitHubUser>, ApiError>;

    /// Follow `login` as the authenticated user.
    async fn follow(&self, login: &str) -> Result<ResponseMeta, ApiError>;
}

#[derive(Debug, Clone)]
pub struct GitHubConfig {
    pub token: Option<String>,
    pub api_url: String,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: API_BASE_URL.to_string(),
            user_agent: concat!("github-user-graph/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// GitHub REST client backed by `reqwest`.
///
/// Reports rate limit headers through [`ResponseMeta::rate`] but never waits
/// on them or retries.
pub struct GitHubClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(config: GitHubConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(config.user_agent)
            .timeout(config.timeout)
            .build()?;

        let base_url = Url::parse(&config.api_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Config(format!(
                "API URL cannot be used as a base: {}",
                config.api_url
            )));
        }

        Ok(GitHubClient {
            client,
            base_url,
            token: config.token,
        })
    }

    pub fn from_token(token: String) -> Result<Self, ApiError> {
        Self::new(GitHubConfig {
            token: Some(token),
            ..Default::default()
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Config(format!("invalid API URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url, accept: &str) -> RequestBuilder {
        let request = self.client.request(method, url).header(ACCEPT, accept);

        match &self.token {
            Some(token) => request.header(AUTHORIZATION, format!("token {}", token)),
            None => request,
        }
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let rate = rate_limit_state(response.headers());
        match status {
            StatusCode::NOT_FOUND => Err(ApiError::NotFound(response.url().path().to_string())),
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
                if rate.as_ref().is_some_and(|r| r.is_limited) =>
            {
                let reset = rate.map(|r| r.reset_time).unwrap_or_else(Utc::now);
                Err(ApiError::RateLimitExceeded(format!(
                    "API rate limit exceeded. Reset at: {}",
                    reset
                )))
            }
            status => {
                let message = response.text().await.unwrap_or_default();
                Err(ApiError::Status { status, message })
            }
        }
    }

    async fn fetch_page<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        page: u32,
        per_page: u32,
        accept: &str,
    ) -> Result<Page<T>, ApiError> {
        let mut url = self.endpoint(segments)?;
        url.query_pairs_mut()
            .append_pair("per_page", &per_page.to_string())
            .append_pair("page", &page.to_string());

        let response = self.execute(self.request(Method::GET, url, accept)).await?;
        let meta = response_meta(response.status(), response.headers());

        let body = response.bytes().await?;
        let items: Vec<T> = serde_json::from_slice(&body)?;

        Ok(Page { items, meta })
    }
}

#[async_trait]
impl GitHubApi for GitHubClient {
    async fn fetch_starred_page(
        &self,
        login: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Page<GitHubStarredEntry>, ApiError> {
        self.fetch_page(&["users", login, "starred"], page, per_page, STAR_MEDIA_TYPE)
            .await
    }

    async fn fetch_followers_page(
        &self,
        login: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Page<GitHubUser>, ApiError> {
        self.fetch_page(&["users", login, "followers"], page, per_page, JSON_MEDIA_TYPE)
            .await
    }

    async fn fetch_followees_page(
        &self,
        login: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Page<GitHubUser>, ApiError> {
        self.fetch_page(&["users", login, "following"], page, per_page, JSON_MEDIA_TYPE)
            .await
    }

    async fn follow(&self, login: &str) -> Result<ResponseMeta, ApiError> {
        let url = self.endpoint(&["user", "following", login])?;
        let request = self
            .request(Method::PUT, url, JSON_MEDIA_TYPE)
            .header(CONTENT_LENGTH, "0");

        let response = self.execute(request).await?;
        Ok(response_meta(response.status(), response.headers()))
    }
}

fn response_meta(status: StatusCode, headers: &HeaderMap) -> ResponseMeta {
    ResponseMeta {
        status,
        next_page: LinkPagination::from_headers(headers).next_cursor(),
        headers: headers.clone(),
        rate: rate_limit_state(headers),
    }
}

/// Rate limit state from `X-RateLimit-*` headers, if the response carried them.
pub fn rate_limit_state(headers: &HeaderMap) -> Option<RateLimitState> {
    let header = |name: &str| headers.get(name).and_then(|h| h.to_str().ok());

    let remaining = header("X-RateLimit-Remaining")?.parse::<u32>().ok()?;

    let limit = header("X-RateLimit-Limit")
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(5000);

    let reset_time = header("X-RateLimit-Reset")
        .and_then(|s| s.parse::<i64>().ok())
        .and_then(|timestamp| DateTime::from_timestamp(timestamp, 0))
        .unwrap_or_else(|| Utc::now() + chrono::Duration::hours(1));

    Some(RateLimitState {
        remaining,
        limit,
        reset_time,
        is_limited: remaining == 0,
    })
}
