mod cli;

use anyhow::Context;
use chrono::DateTime;
use clap::Parser;
use cli::{Cli, Command};
use colored::*;
use github_user_graph::{GitHubClient, GitHubProvider, Provider, StarredRepository};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&cli.log_level))
        )
        .with_writer(std::io::stderr)
        .init();

    let client = GitHubClient::new(cli.github_config())
        .context("failed to create GitHub client")?;
    let provider = GitHubProvider::new(client);

    match &cli.command {
        Command::Stars { login } => {
            let stars = provider.list_starred_repositories(login).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&stars)?);
            } else {
                print_stars(login, &stars);
            }
        }
        Command::Followers { login } => {
            let followers = provider.list_followers(login).await?;
            print_logins(&format!("{} followers of {}", followers.len(), login), &followers, cli.json)?;
        }
        Command::Followees { login } => {
            let followees = provider.list_followees(login).await?;
            print_logins(&format!("{} users followed by {}", followees.len(), login), &followees, cli.json)?;
        }
        Command::Repos { login } => {
            let repos = provider.list_owned_repositories(login).await?;
            print_logins(&format!("{} repositories owned by {}", repos.len(), login), &repos, cli.json)?;
        }
        Command::Follow { login } => {
            provider.follow_user(login).await?;
            if !cli.json {
                println!("✅ Now following {}", login.green());
            }
        }
    }

    Ok(())
}

fn print_stars(login: &str, stars: &[StarredRepository]) {
    println!("{}", format!("⭐ {} repositories starred by {}", stars.len(), login).bold().green());
    println!("{}", "=".repeat(50).dimmed());

    for star in stars {
        let starred_at = DateTime::from_timestamp(star.starred_at(), 0)
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!("{}  {}", starred_at.dimmed(), star.full_name());
    }
}

fn print_logins(title: &str, logins: &[String], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(logins)?);
        return Ok(());
    }

    println!("{}", title.bold().green());
    println!("{}", "=".repeat(50).dimmed());
    for login in logins {
        println!("{}", login);
    }

    Ok(())
}
