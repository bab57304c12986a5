use async_trait::async_trait;
use futures::stream::{self, Stream, TryStreamExt};
use reqwest::StatusCode;
use std::future::Future;
use tracing::{debug, info, warn};

use crate::error::{ApiError, Listing, ProviderError, Result};
use crate::github::{GitHubApi, PER_PAGE};
use crate::models::{Page, StarredRepository};
use crate::types::{GitHubStarredEntry, GitHubUser};

/// Read and follow operations on a user's social graph.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Repositories `login` starred, in the order the API returns them.
    async fn list_starred_repositories(&self, login: &str) -> Result<Vec<StarredRepository>>;

    /// Logins of the users following `login`.
    async fn list_followers(&self, login: &str) -> Result<Vec<String>>;

    /// Logins of the users `login` follows.
    async fn list_followees(&self, login: &str) -> Result<Vec<String>>;

    /// Repositories owned by `login`.
    async fn list_owned_repositories(&self, login: &str) -> Result<Vec<String>>;

    /// Follow `login` as the authenticated user.
    async fn follow_user(&self, login: &str) -> Result<()>;
}

/// [`Provider`] over a GitHub API client.
///
/// Listings walk pages of [`PER_PAGE`] items one request at a time, starting
/// at page 1 and stopping once the client reports no next page. A failed page
/// fails the whole listing; nothing collected before it is returned.
pub struct GitHubProvider<C> {
    client: C,
}

impl<C: GitHubApi> GitHubProvider<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Lazy form of [`Provider::list_starred_repositories`].
    ///
    /// Each page is requested once the previous one has been consumed. The
    /// stream ends after the first error. Call again to start over.
    pub fn starred_repositories<'a>(
        &'a self,
        login: &'a str,
    ) -> impl Stream<Item = Result<StarredRepository>> + Send + 'a {
        paginate(
            Listing::Stars,
            login,
            move |page| self.client.fetch_starred_page(login, page, PER_PAGE),
            |entry: GitHubStarredEntry| {
                StarredRepository::new(entry.repo.full_name, entry.starred_at.timestamp())
            },
        )
    }

    /// Lazy form of [`Provider::list_followers`].
    pub fn followers<'a>(&'a self, login: &'a str) -> impl Stream<Item = Result<String>> + Send + 'a {
        paginate(
            Listing::Followers,
            login,
            move |page| self.client.fetch_followers_page(login, page, PER_PAGE),
            |user: GitHubUser| user.login,
        )
    }

    /// Lazy form of [`Provider::list_followees`].
    pub fn followees<'a>(&'a self, login: &'a str) -> impl Stream<Item = Result<String>> + Send + 'a {
        paginate(
            Listing::Followees,
            login,
            move |page| self.client.fetch_followees_page(login, page, PER_PAGE),
            |user: GitHubUser| user.login,
        )
    }
}

#[async_trait]
impl<C: GitHubApi> Provider for GitHubProvider<C> {
    async fn list_starred_repositories(&self, login: &str) -> Result<Vec<StarredRepository>> {
        self.starred_repositories(login).try_collect().await
    }

    async fn list_followers(&self, login: &str) -> Result<Vec<String>> {
        self.followers(login).try_collect().await
    }

    async fn list_followees(&self, login: &str) -> Result<Vec<String>> {
        self.followees(login).try_collect().await
    }

    /// Not implemented yet: always empty, and GitHub is never contacted.
    async fn list_owned_repositories(&self, _login: &str) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    async fn follow_user(&self, login: &str) -> Result<()> {
        info!(operation = "follow_user", user.login = login, "following user");

        let meta = self
            .client
            .follow(login)
            .await
            .map_err(|source| ProviderError::Follow {
                login: login.to_string(),
                source,
            })?;

        // GitHub itself answers 204 No Content here.
        if meta.status != StatusCode::OK {
            warn!(
                operation = "follow_user",
                user.login = login,
                res.status = %meta.status,
                res.headers = ?meta.headers,
                "following user returned a non-ok status code"
            );
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
struct Cursor {
    page: u32,
    count: usize,
}

fn paginate<'a, W, T, F, Fut, M>(
    listing: Listing,
    login: &'a str,
    fetch: F,
    map: M,
) -> impl Stream<Item = Result<T>> + Send + 'a
where
    W: Send + 'a,
    T: Send + 'a,
    F: Fn(u32) -> Fut + Send + 'a,
    Fut: Future<Output = std::result::Result<Page<W>, ApiError>> + Send + 'a,
    M: Fn(W) -> T + Send + 'a,
{
    let pages = stream::try_unfold(Cursor { page: 1, count: 0 }, move |cursor| {
        let request = (cursor.page != 0).then(|| {
            if cursor.page == 1 && cursor.count == 0 {
                info!(
                    operation = listing.operation(),
                    user.login = login,
                    "getting user's {}",
                    listing
                );
            }
            fetch(cursor.page)
        });

        async move {
            let Some(request) = request else {
                return Ok(None);
            };

            let page = request.await.map_err(|source| ProviderError::Retrieval {
                operation: listing,
                login: login.to_string(),
                source,
            })?;

            let count = cursor.count + page.items.len();
            debug!(
                operation = listing.operation(),
                user.login = login,
                current_page = cursor.page,
                count,
                res.code = page.meta.status.as_u16(),
                res.next_page = page.meta.next_page,
                "got {}",
                listing
            );

            let next = Cursor {
                page: page.meta.next_page,
                count,
            };
            Ok::<_, ProviderError>(Some((page.items, next)))
        }
    });

    pages
        .map_ok(|items| stream::iter(items.into_iter().map(Ok::<W, ProviderError>)))
        .try_flatten()
        .map_ok(map)
}
