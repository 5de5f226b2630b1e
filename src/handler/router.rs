//! Request dispatch module
//!
//! Entry point for HTTP request processing: method validation, dispatch to
//! the static file handler, header decoration and access logging.

use crate::config::AppState;
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderMap, RANGE, REFERER, USER_AGENT};
use hyper::{Method, Request, Response, StatusCode, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    /// Raw (still percent-encoded) request path
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub range_header: Option<&'a str>,
}

/// Main entry point for HTTP request handling
///
/// The request body is never read; only GET and HEAD are served.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let (parts, body) = req.into_parts();
    drop(body);

    logger::log_debug(&format!(
        "{} {} from {peer_addr} ({} headers)",
        parts.method,
        parts.uri,
        parts.headers.len()
    ));

    let is_head = parts.method == Method::HEAD;
    let mut response = match check_http_method(&parts.method) {
        Some(resp) => resp,
        None => {
            let ctx = RequestContext {
                path: parts.uri.path(),
                query: parts.uri.query(),
                is_head,
                range_header: header_str(&parts.headers, RANGE.as_str()),
            };
            static_files::serve_path(&ctx, &state.root, &state.config.http.index_files).await
        }
    };

    state.headers.apply(&mut response);

    if state.config.logging.access_log {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            parts.method.to_string(),
            parts.uri.path().to_string(),
        );
        entry.query = parts.uri.query().map(ToString::to_string);
        entry.http_version = version_label(parts.version).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.referer = header_str(&parts.headers, REFERER.as_str()).map(ToString::to_string);
        entry.user_agent =
            header_str(&parts.headers, USER_AGENT.as_str()).map(ToString::to_string);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Reject everything except GET and HEAD with 501, including OPTIONS
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        _ => {
            logger::log_warning(&format!("Unsupported method: {method}"));
            let message = format!("Unsupported method ('{method}')");
            Some(http::build_error_response(
                StatusCode::NOT_IMPLEMENTED,
                Some(&message),
                false,
            ))
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn version_label(version: Version) -> &'static str {
    if version == Version::HTTP_10 {
        "1.0"
    } else if version == Version::HTTP_2 {
        "2"
    } else if version == Version::HTTP_09 {
        "0.9"
    } else {
        "1.1"
    }
}
