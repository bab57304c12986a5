#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use github_user_graph::error::ApiError;
use github_user_graph::github::GitHubApi;
use github_user_graph::models::{Page, ResponseMeta};
use github_user_graph::types::{GitHubRepo, GitHubStarredEntry, GitHubUser};
use reqwest::StatusCode;
use std::io;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub endpoint: &'static str,
    pub login: String,
    pub page: u32,
    pub per_page: u32,
}

pub enum FollowOutcome {
    Status(StatusCode),
    Fail,
}

/// In-memory GitHub API that serves fixed collections page by page.
pub struct FakeGitHub {
    pub starred: Vec<GitHubStarredEntry>,
    pub followers: Vec<GitHubUser>,
    pub followees: Vec<GitHubUser>,
    /// Keep pointing at the next page while the current one is full, so an
    /// exact multiple of the page size ends with an empty page.
    pub trailing_empty_page: bool,
    pub fail_on_page: Option<u32>,
    /// Never answer this page.
    pub stall_on_page: Option<u32>,
    pub follow_outcome: FollowOutcome,
    pub requests: Mutex<Vec<PageRequest>>,
    pub follows: Mutex<Vec<String>>,
}

impl Default for FakeGitHub {
    fn default() -> Self {
        Self {
            starred: Vec::new(),
            followers: Vec::new(),
            followees: Vec::new(),
            trailing_empty_page: false,
            fail_on_page: None,
            stall_on_page: None,
            follow_outcome: FollowOutcome::Status(StatusCode::NO_CONTENT),
            requests: Mutex::new(Vec::new()),
            follows: Mutex::new(Vec::new()),
        }
    }
}

impl FakeGitHub {
    pub fn with_stars(count: usize) -> Self {
        Self {
            starred: starred_entries(count),
            ..Default::default()
        }
    }

    pub fn with_followers(count: usize) -> Self {
        Self {
            followers: users("follower", count),
            ..Default::default()
        }
    }

    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn follows(&self) -> Vec<String> {
        self.follows.lock().unwrap().clone()
    }

    async fn stall(&self, page: u32) {
        if self.stall_on_page == Some(page) {
            futures::future::pending::<()>().await;
        }
    }

    fn serve<T: Clone>(
        &self,
        endpoint: &'static str,
        items: &[T],
        login: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Page<T>, ApiError> {
        self.requests.lock().unwrap().push(PageRequest {
            endpoint,
            login: login.to_string(),
            page,
            per_page,
        });

        if self.fail_on_page == Some(page) {
            return Err(ApiError::Status {
                status: StatusCode::BAD_GATEWAY,
                message: "upstream unavailable".to_string(),
            });
        }

        let size = per_page as usize;
        let start = (page as usize - 1) * size;
        let end = (start + size).min(items.len());
        let page_items = items.get(start..end).unwrap_or_default().to_vec();

        let has_next = if self.trailing_empty_page {
            page_items.len() == size
        } else {
            end < items.len()
        };
        let next_page = if has_next { page + 1 } else { 0 };

        Ok(Page {
            items: page_items,
            meta: ResponseMeta::new(StatusCode::OK, next_page),
        })
    }
}

#[async_trait]
impl GitHubApi for FakeGitHub {
    async fn fetch_starred_page(
        &self,
        login: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Page<GitHubStarredEntry>, ApiError> {
        let page_result = self.serve("starred", &self.starred, login, page, per_page);
        self.stall(page).await;
        page_result
    }

    async fn fetch_followers_page(
        &self,
        login: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Page<GitHubUser>, ApiError> {
        let page_result = self.serve("followers", &self.followers, login, page, per_page);
        self.stall(page).await;
        page_result
    }

    async fn fetch_followees_page(
        &self,
        login: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Page<GitHubUser>, ApiError> {
        let page_result = self.serve("following", &self.followees, login, page, per_page);
        self.stall(page).await;
        page_result
    }

    async fn follow(&self, login: &str) -> Result<ResponseMeta, ApiError> {
        self.follows.lock().unwrap().push(login.to_string());

        match self.follow_outcome {
            FollowOutcome::Status(status) => Ok(ResponseMeta::new(status, 0)),
            FollowOutcome::Fail => Err(ApiError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "connection reset".to_string(),
            }),
        }
    }
}

pub fn starred_entries(count: usize) -> Vec<GitHubStarredEntry> {
    (0..count)
        .map(|i| GitHubStarredEntry {
            starred_at: DateTime::<Utc>::from_timestamp(1_600_000_000 + i as i64 * 60, 0).unwrap(),
            repo: GitHubRepo {
                name: format!("repo-{}", i),
                full_name: format!("owner-{}/repo-{}", i % 7, i),
                html_url: format!("https://github.com/owner-{}/repo-{}", i % 7, i),
                stargazers_count: i as u32,
            },
        })
        .collect()
}

pub fn users(prefix: &str, count: usize) -> Vec<GitHubUser> {
    (0..count)
        .map(|i| GitHubUser {
            login: format!("{}-{}", prefix, i),
            id: i as u64 + 1,
            avatar_url: None,
            html_url: format!("https://github.com/{}-{}", prefix, i),
        })
        .collect()
}

/// Shared buffer that collects formatted log lines.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    pub fn lines_at(&self, level: &str) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|line| line.contains(level))
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Route every event of the current thread into a [`LogCapture`].
pub fn capture_logs() -> (LogCapture, tracing::subscriber::DefaultGuard) {
    let capture = LogCapture::default();
    let writer = capture.clone();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let guard = tracing::subscriber::set_default(subscriber);
    (capture, guard)
}
