// Server module entry point
// Binds the listener and runs the accept loop

pub mod connection;
pub mod listener;

use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::AppState;
use crate::logger;

pub use connection::handle_connection;
pub use listener::create_listener;

/// Accept and serve connections until the process is killed.
///
/// Accept errors (e.g. running out of file descriptors) are logged and the
/// loop keeps going; there is no shutdown path.
pub async fn serve_forever(listener: TcpListener, state: Arc<AppState>) {
    loop {
        match listener.accept().await {
            Ok((stream, peer_addr)) => {
                logger::log_debug(&format!("Accepted connection from {peer_addr}"));
                handle_connection(stream, peer_addr, Arc::clone(&state));
            }
            Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
        }
    }
}
