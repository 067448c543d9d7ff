//! GitHub client implementation

use std::time::Duration;

use hyper::body::Bytes;
use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use secrecy::ExposeSecret;

use crate::config::GitHubConfig;
use crate::error::Result;
use crate::secrets::Credentials;

/// Media type pinning the v3 REST API
pub const GITHUB_V3_ACCEPT: &str = "application/vnd.github.v3+json";

/// Fixed upstream path; never derived from the inbound request
pub const USER_ORGS_PATH: &str = "user/orgs";

/// Status, content type and body exactly as GitHub sent them
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: u16,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

/// GitHub API client for making authenticated requests
pub struct GitHubClient {
    client: reqwest::Client,
    orgs_url: String,
}

impl GitHubClient {
    /// Build the pooled client. `timeout_secs` unset keeps reqwest's default.
    pub fn new(config: &GitHubConfig) -> std::result::Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            orgs_url: format!(
                "{}/{USER_ORGS_PATH}",
                config.api_base.trim_end_matches('/')
            ),
        })
    }

    /// Target of every outbound call
    pub fn orgs_url(&self) -> &str {
        &self.orgs_url
    }

    /// List the organizations of the authenticated user.
    ///
    /// Any HTTP answer, 4xx and 5xx included, is returned as `Ok`.
    pub async fn fetch_user_orgs(&self, credentials: &Credentials) -> Result<UpstreamResponse> {
        let authorization = format!("Basic {}", credentials.basic_auth_value().expose_secret());

        let response = self
            .client
            .get(&self.orgs_url)
            .header(AUTHORIZATION, authorization)
            .header(ACCEPT, GITHUB_V3_ACCEPT)
            .send()
            .await?;

        let status = response.status().as_u16();
        let content_type = response.headers().get(CONTENT_TYPE).cloned();
        let body = response.bytes().await?;

        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }
}
