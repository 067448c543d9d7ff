//! GitHub REST API access
//!
//! Only one call is made: `GET /user/orgs`, authenticated with the Basic
//! credentials read from the mounted secret files.

mod client;

pub use client::{GitHubClient, UpstreamResponse};
