//! Starred repositories, followers and followees of GitHub users, fetched
//! page by page through a pluggable API client.

pub mod error;
pub mod github;
pub mod models;
pub mod pagination;
pub mod provider;
pub mod types;

pub use error::{ApiError, Listing, ProviderError, Result};
pub use github::{GitHubApi, GitHubClient, GitHubConfig};
pub use models::StarredRepository;
pub use provider::{GitHubProvider, Provider};
