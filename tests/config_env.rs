// Environment overrides. Kept in its own test binary: the variables are
// process-wide and would leak into other config tests.

use cors_serve::config::Config;

#[test]
fn env_overrides_config_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("serve.toml"),
        "[server]\nport = 9001\n\n[logging]\nlevel = \"warn\"\n",
    )
    .unwrap();
    let stem = dir.path().join("serve");

    std::env::set_var("CORS_SERVE_SERVER__PORT", "9100");
    std::env::set_var("CORS_SERVE_PERFORMANCE__CONNECTION_TIMEOUT", "7");
    let cfg = Config::load_from(stem.to_str().unwrap());
    std::env::remove_var("CORS_SERVE_SERVER__PORT");
    std::env::remove_var("CORS_SERVE_PERFORMANCE__CONNECTION_TIMEOUT");

    let cfg = cfg.unwrap();
    assert_eq!(cfg.server.port, Some(9100));
    assert_eq!(cfg.performance.connection_timeout, 7);
    // keys without an override still come from the file
    assert_eq!(cfg.logging.level, "warn");
}
