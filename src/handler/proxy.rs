//! GitHub organizations proxy
//!
//! Reads the mounted credentials, calls `GET /user/orgs` once and relays the
//! answer. Local failures become a plain-text response; nothing is retried.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use crate::config::AppState;
use crate::error::Result;
use crate::github::UpstreamResponse;
use crate::http;
use crate::logger;
use crate::secrets::{self, SecretsLocation};

/// Serve the organizations route
pub async fn list_my_orgs(state: &AppState, is_head: bool) -> Response<Full<Bytes>> {
    match fetch_orgs(state).await {
        Ok(upstream) => {
            logger::log_upstream_status(upstream.status, upstream.body.len());
            http::build_relay_response(upstream, is_head)
        }
        Err(err) => {
            logger::log_error(&format!("Error querying GitHub: {err}"));
            http::build_error_response(&err)
        }
    }
}

async fn fetch_orgs(state: &AppState) -> Result<UpstreamResponse> {
    let location = SecretsLocation::parse(&state.config.secrets.path)?;
    let credentials = secrets::read_credentials(&location).await?;

    logger::log_upstream_call(state.github.orgs_url(), credentials.username());
    state.github.fetch_user_orgs(&credentials).await
}
