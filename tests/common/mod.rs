// Shared helpers for end-to-end tests: start a server on a free port and
// talk raw HTTP/1.1 to it.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use cors_serve::config::{AppState, Config};
use cors_serve::{port, server};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

pub struct RawResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Serve `root` on an OS-assigned port in the current runtime, return the port
pub async fn start_server(root: &Path) -> u16 {
    start_server_with(root, |_| {}).await
}

/// Like `start_server`, with `tweak` applied to the config before binding
pub async fn start_server_with(root: &Path, tweak: impl FnOnce(&mut Config)) -> u16 {
    let mut cfg = Config::load_from("this-config-file-does-not-exist").unwrap();
    cfg.server.root = root.to_string_lossy().into_owned();
    cfg.logging.access_log = false;
    tweak(&mut cfg);

    let port = port::resolve_port(None, None).unwrap();
    let listener = server::create_listener(cfg.socket_addr(port).unwrap()).unwrap();
    tokio::spawn(server::serve_forever(listener, Arc::new(AppState::new(&cfg))));
    port
}

/// Send one request with `Connection: close` and read the whole response
pub async fn send(port: u16, method: &str, path: &str, extra_headers: &[(&str, &str)]) -> RawResponse {
    let mut stream = TcpStream::connect(("127.0.0.1", port)).await.unwrap();

    let mut request = format!("{method} {path} HTTP/1.1\r\nHost: localhost:{port}\r\nConnection: close\r\n");
    for (name, value) in extra_headers {
        request.push_str(&format!("{name}: {value}\r\n"));
    }
    request.push_str("\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.unwrap();
    parse_response(&raw)
}

pub async fn get(port: u16, path: &str) -> RawResponse {
    send(port, "GET", path, &[]).await
}

fn parse_response(raw: &[u8]) -> RawResponse {
    let split = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response has a header block");
    let head = String::from_utf8_lossy(&raw[..split]).into_owned();
    let body = raw[split + 4..].to_vec();

    let mut lines = head.split("\r\n");
    let status_line = lines.next().unwrap();
    let status = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .expect("status code");

    let headers = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    RawResponse {
        status,
        headers,
        body,
    }
}

pub fn assert_cors_headers(resp: &RawResponse) {
    assert_eq!(resp.header("Access-Control-Allow-Origin"), Some("*"));
    assert_eq!(resp.header("Access-Control-Allow-Methods"), Some("GET"));
    assert!(
        resp.header("Cache-Control").unwrap_or_default().contains("no-store"),
        "Cache-Control missing no-store: {:?}",
        resp.header("Cache-Control")
    );
}
