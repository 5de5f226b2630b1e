use std::sync::Arc;

use cors_serve::config::{AppState, Config};
use cors_serve::{logger, port, server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;
    logger::init(&cfg)?;

    // The only argument is an optional port; anything beyond it is ignored
    let port_arg = std::env::args().nth(1);
    let port = port::resolve_port(port_arg.as_deref(), cfg.server.port)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg, port))
}

async fn async_main(cfg: Config, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.socket_addr(port)?;
    let listener = server::create_listener(addr)?;
    let state = Arc::new(AppState::new(&cfg));

    println!("Starting server on port {port}");
    println!("Open your browser to: http://localhost:{port}");
    logger::log_server_start(&addr, &cfg);

    server::serve_forever(listener, state).await;
    Ok(())
}
