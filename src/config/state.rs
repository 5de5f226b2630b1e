// Application state module
// Immutable per-process state shared by every connection

use std::path::PathBuf;

use super::types::Config;
use crate::http::CorsHeaders;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Directory served as the URL root
    pub root: PathBuf,
    /// Header decorator applied to every response
    pub headers: CorsHeaders,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            root: config.root_dir(),
            headers: CorsHeaders::new(&config.http.server_name),
            config: config.clone(),
        }
    }
}
