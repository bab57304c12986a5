use clap::{Parser, Subcommand};
use github_user_graph::github::{GitHubConfig, API_BASE_URL};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "github-user-graph")]
#[command(about = "Lists a GitHub user's stars, followers and followees")]
#[command(version)]
pub struct Cli {
    /// GitHub API token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// GitHub API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = API_BASE_URL)]
    pub api_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "GITHUB_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Repositories starred by a user
    Stars { login: String },
    /// Users following a user
    Followers { login: String },
    /// Users a user follows
    Followees { login: String },
    /// Repositories owned by a user (not implemented yet)
    Repos { login: String },
    /// Follow a user with the authenticated account
    Follow { login: String },
}

impl Cli {
    pub fn github_config(&self) -> GitHubConfig {
        GitHubConfig {
            token: self.token.clone(),
            api_url: self.api_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            ..Default::default()
        }
    }
}
