//! Port selection
//!
//! Picks the port the server listens on: an explicit command-line argument,
//! then the configured port, then a free port handed out by the OS.

use socket2::{Domain, Protocol, Socket, Type};
use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};
use std::num::ParseIntError;

/// Errors raised while choosing a port
#[derive(Debug)]
pub enum PortError {
    /// The command-line argument is not a valid port number
    InvalidArgument { value: String, source: ParseIntError },
    /// The OS refused to hand out an ephemeral port
    Probe(std::io::Error),
}

impl fmt::Display for PortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument { value, source } => {
                write!(f, "invalid port argument '{value}': {source}")
            }
            Self::Probe(e) => write!(f, "failed to obtain a free port: {e}"),
        }
    }
}

impl std::error::Error for PortError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidArgument { source, .. } => Some(source),
            Self::Probe(e) => Some(e),
        }
    }
}

/// Resolve the listening port.
///
/// `arg` is the optional positional argument and is parsed verbatim;
/// `configured` comes from `server.port`.
pub fn resolve_port(arg: Option<&str>, configured: Option<u16>) -> Result<u16, PortError> {
    if let Some(value) = arg {
        return value
            .trim()
            .parse::<u16>()
            .map_err(|source| PortError::InvalidArgument {
                value: value.to_string(),
                source,
            });
    }

    match configured {
        Some(port) => Ok(port),
        None => find_free_port().map_err(PortError::Probe),
    }
}

/// Ask the OS for a free TCP port.
///
/// Binds a throwaway socket to port 0 on the unspecified address, reads the
/// assigned port back and closes the socket. Another process may grab the
/// port before the real listener binds it.
pub fn find_free_port() -> std::io::Result<u16> {
    let socket = Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP))?;
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0));
    socket.bind(&addr.into())?;

    let port = socket
        .local_addr()?
        .as_socket()
        .map(|a| a.port())
        .ok_or_else(|| std::io::Error::other("probe socket has no inet address"))?;

    drop(socket);
    Ok(port)
}
