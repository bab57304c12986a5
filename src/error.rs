use std::fmt;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised by a GitHub API client while talking to the REST API.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("GitHub API error ({status}): {message}")]
    Status { status: StatusCode, message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// The paginated collections a provider can list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
    Stars,
    Followers,
    Followees,
}

impl Listing {
    /// Name used in log fields.
    pub fn operation(&self) -> &'static str {
        match self {
            Listing::Stars => "list_starred_repositories",
            Listing::Followers => "list_followers",
            Listing::Followees => "list_followees",
        }
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Listing::Stars => f.write_str("stars"),
            Listing::Followers => f.write_str("followers"),
            Listing::Followees => f.write_str("followees"),
        }
    }
}

/// Errors surfaced by a [`Provider`](crate::provider::Provider).
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("could not retrieve {login}'s {operation}")]
    Retrieval {
        operation: Listing,
        login: String,
        #[source]
        source: ApiError,
    },

    #[error("could not follow user {login}")]
    Follow {
        login: String,
        #[source]
        source: ApiError,
    },
}

impl ProviderError {
    /// Login of the user the failed operation targeted.
    pub fn login(&self) -> &str {
        match self {
            ProviderError::Retrieval { login, .. } | ProviderError::Follow { login, .. } => login,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;
