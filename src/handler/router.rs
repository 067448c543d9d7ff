//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, route matching,
//! dispatching and access logging.

use crate::config::AppState;
use crate::handler::proxy;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{header, Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let (parts, _body) = req.into_parts();
    let response = route_request(&parts.method, parts.uri.path(), &state).await;

    if state.config.logging.access_log {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            parts.method.to_string(),
            parts.uri.path().to_string(),
        );
        entry.query = parts.uri.query().map(ToString::to_string);
        entry.http_version = http_version_label(parts.version).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.user_agent = parts
            .headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route by method and path. The query string never influences dispatch.
pub async fn route_request(
    method: &Method,
    path: &str,
    state: &AppState,
) -> Response<Full<Bytes>> {
    if let Some(resp) = check_http_method(method) {
        return resp;
    }
    let is_head = *method == Method::HEAD;
    let routes = &state.config.routes;

    // Health check endpoints (highest priority, always fast)
    if routes.health.enabled
        && (path == routes.health.liveness_path || path == routes.health.readiness_path)
    {
        return http::build_health_response("ok");
    }

    if path == routes.orgs_path {
        return proxy::list_my_orgs(state, is_head).await;
    }

    http::build_404_response()
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response()),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

fn http_version_label(version: hyper::Version) -> &'static str {
    match version {
        hyper::Version::HTTP_09 => "0.9",
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        hyper::Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::proxy::tests::{mount_secrets, test_state};
    use hyper::StatusCode;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_health_endpoints() {
        let state = test_state("/nonexistent", "http://127.0.0.1:9");
        let response = route_request(&Method::GET, "/healthz", &state).await;
        assert_eq!(response.status(), StatusCode::OK);
        let response = route_request(&Method::GET, "/readyz", &state).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let state = test_state("/nonexistent", "http://127.0.0.1:9");
        let response = route_request(&Method::GET, "/user/repos", &state).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_method_checks() {
        let state = test_state("/nonexistent", "http://127.0.0.1:9");

        let response = route_request(&Method::POST, "/mygithuborgs", &state).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

        let response = route_request(&Method::OPTIONS, "/mygithuborgs", &state).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_only_orgs_route_reaches_upstream() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/orgs"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("[]", "application/json"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let dir = mount_secrets("alice", Some("tok123"));
        let state = test_state(&dir.path().to_string_lossy(), &mock_server.uri());

        let response = route_request(&Method::GET, "/mygithuborgs", &state).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = route_request(&Method::GET, "/mygithuborgs/../user/repos", &state).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_head_on_orgs_route_has_empty_body() {
        use http_body_util::BodyExt;

        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/orgs"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("[]", "application/json"))
            .mount(&mock_server)
            .await;

        let dir = mount_secrets("alice", Some("tok123"));
        let state = test_state(&dir.path().to_string_lossy(), &mock_server.uri());

        let response = route_request(&Method::HEAD, "/mygithuborgs", &state).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }
}
