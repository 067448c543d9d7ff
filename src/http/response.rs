//! HTTP response building module
//!
//! Builders for every response the proxy emits, decoupled from routing.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{header, Response, StatusCode};

use crate::error::ProxyError;
use crate::github::UpstreamResponse;

/// Build a plain-text response with the given status
pub fn build_text_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from(message.to_string())))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::from(message.to_string())))
        })
}

/// Local failure: status from the error, body is its message
pub fn build_error_response(err: &ProxyError) -> Response<Full<Bytes>> {
    build_text_response(err.status(), &err.to_string())
}

/// Relay GitHub's answer: same status, same body, same content type
pub fn build_relay_response(upstream: UpstreamResponse, is_head: bool) -> Response<Full<Bytes>> {
    let content_length = upstream.body.len();
    let body = if is_head { Bytes::new() } else { upstream.body };

    let mut builder = Response::builder()
        .status(upstream.status)
        .header(header::CONTENT_LENGTH, content_length);
    if let Some(content_type) = upstream.content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }

    builder.body(Full::new(body)).unwrap_or_else(|e| {
        log_build_error("relay", &e);
        build_text_response(
            StatusCode::BAD_GATEWAY,
            &format!("Unrelayable upstream status {}", upstream.status),
        )
    })
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    build_text_response(StatusCode::NOT_FOUND, "404 Not Found")
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(header::ALLOW, "GET, HEAD, OPTIONS")
        .body(Full::new(Bytes::from("405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::from("405 Method Not Allowed")))
        })
}

/// Build OPTIONS response
pub fn build_options_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(header::ALLOW, "GET, HEAD, OPTIONS")
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build health check response (liveness/readiness probes)
pub fn build_health_response(status: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/plain")
        .header(header::CACHE_CONTROL, "no-cache, no-store")
        .body(Full::new(Bytes::from(status.to_string())))
        .unwrap_or_else(|e| {
            log_build_error("health", &e);
            Response::new(Full::new(Bytes::from(status.to_string())))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
