// Configuration module entry point
// Layers built-in defaults, an optional config file and environment variables

mod state;
mod types;

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

pub use state::AppState;
pub use types::{Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig};

/// Config file looked up in the working directory (extension inferred)
pub const DEFAULT_CONFIG_FILE: &str = "cors-serve";

/// Prefix for environment overrides, e.g. `CORS_SERVE_SERVER__PORT=8000`
pub const ENV_PREFIX: &str = "CORS_SERVE";

impl Config {
    /// Load configuration from `cors-serve.toml` (if present) and the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// A missing file is not an error: every key has a default.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.root", ".")?
            .set_default(
                "http.server_name",
                concat!("cors-serve/", env!("CARGO_PKG_VERSION")),
            )?
            .set_default("http.index_files", vec!["index.html", "index.htm"])?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "common")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.connection_timeout", 0)?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Address the listener binds for the chosen port
    ///
    /// `server.host` is a bare IPv4 or IPv6 address, e.g. `0.0.0.0` or `::`.
    pub fn socket_addr(&self, port: u16) -> Result<SocketAddr, String> {
        let host = self.server.host.trim();
        // Accept the bracketed URL form of IPv6 addresses too
        let host = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);
        host.parse::<IpAddr>()
            .map(|ip| SocketAddr::new(ip, port))
            .map_err(|e| format!("Invalid address '{}': {e}", self.server.host))
    }

    /// Directory served as the URL root
    pub fn root_dir(&self) -> PathBuf {
        PathBuf::from(&self.server.root)
    }
}
