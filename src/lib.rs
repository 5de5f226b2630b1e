//! Serve a directory over HTTP for browser-based development.
//!
//! Every response carries permissive CORS headers and disables caching. When
//! no port is given, a free one is picked by the OS.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod port;
pub mod server;
