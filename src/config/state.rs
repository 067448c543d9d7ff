// Application state module
// Immutable per-process state shared by every connection task

use crate::github::GitHubClient;

use super::types::Config;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Pooled upstream client, built once at startup
    pub github: GitHubClient,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let github = GitHubClient::new(&config.github)?;

        Ok(Self {
            config: config.clone(),
            github,
        })
    }
}
