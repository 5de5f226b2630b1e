//! Response header decorator
//!
//! Every response leaving the server passes through [`CorsHeaders::apply`],
//! which stamps the cross-origin and no-cache headers onto it right before
//! hyper writes the header block. Preflight `OPTIONS` requests are not
//! special-cased; they get the same headers on their error response.

use hyper::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL, SERVER,
};
use hyper::Response;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET";
pub const NO_CACHE: &str = "no-store, no-cache, must-revalidate";

/// Headers injected into every response
#[derive(Debug, Clone)]
pub struct CorsHeaders {
    server: Option<HeaderValue>,
}

impl CorsHeaders {
    /// `server_name` becomes the `Server` header; an empty or non-ASCII name is skipped
    pub fn new(server_name: &str) -> Self {
        let server = if server_name.is_empty() {
            None
        } else {
            HeaderValue::from_str(server_name).ok()
        };
        Self { server }
    }

    /// Inject the headers, replacing any value the handler already set
    pub fn apply<B>(&self, response: &mut Response<B>) {
        let headers = response.headers_mut();
        headers.insert(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(ALLOW_ORIGIN),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        );
        headers.insert(CACHE_CONTROL, HeaderValue::from_static(NO_CACHE));
        if let Some(server) = &self.server {
            headers.insert(SERVER, server.clone());
        }
    }
}
