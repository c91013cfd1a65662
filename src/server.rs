//! Dual-stack listener and accept loop.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tokio::task::JoinSet;
use tracing::{error, info, info_span, warn, Instrument};

use crate::config::ListenerConfig;
use crate::connection::handle_connection;

const BACKLOG: i32 = 128;

#[derive(Debug)]
pub struct BindError {
    pub port: u16,
    pub attempts: Vec<(SocketAddr, std::io::Error)>,
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not bind to port {}", self.port)?;
        for (addr, e) in &self.attempts {
            write!(f, "; {addr}: {e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for BindError {}

/// Wildcard addresses tried in order; IPv6 first so one socket can take both
/// families.
pub fn candidate_addrs(port: u16) -> Vec<SocketAddr> {
    vec![
        SocketAddr::from((Ipv6Addr::UNSPECIFIED, port)),
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)),
    ]
}

/// Binds the first candidate that accepts bind + listen. The IPv6 socket has
/// `IPV6_V6ONLY` cleared so IPv4 clients arrive as mapped addresses.
/// Must be called from within a tokio runtime.
pub fn bind_dual_stack(port: u16) -> Result<TcpListener, BindError> {
    let mut attempts = Vec::new();
    for addr in candidate_addrs(port) {
        match bind_one(addr) {
            Ok(listener) => return Ok(listener),
            Err(e) => {
                warn!("Cannot bind to address {}: {}", addr, e);
                attempts.push((addr, e));
            }
        }
    }
    Err(BindError { port, attempts })
}

fn bind_one(addr: SocketAddr) -> std::io::Result<TcpListener> {
    // dropping `socket` on any error below closes it
    let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    if addr.is_ipv6() {
        if let Err(e) = socket.set_only_v6(false) {
            warn!("Cannot enable dual-stack on {}: {}", addr, e);
        }
    }
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(BACKLOG)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}

/// Accepts connections until `shutdown` is notified, one task per connection.
/// Accept failures are logged and skipped. After the first notification the
/// in-flight connections are awaited; a second one aborts them.
pub async fn serve(listener: TcpListener, config: Arc<ListenerConfig>, shutdown: Arc<Notify>) {
    let mut tasks = JoinSet::new();
    loop {
        tokio::select! {
            _ = shutdown.notified() => {
                info!("Shutting down...");
                break;
            }
            Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((socket, peer)) => {
                        info!("New connection from {}", peer);
                        let config = Arc::clone(&config);
                        let span = info_span!("connection", %peer);
                        tasks.spawn(
                            async move {
                                handle_connection(socket, &config).await;
                            }
                            .instrument(span),
                        );
                    }
                    Err(e) => {
                        error!("Accept fail: {}", e);
                    }
                }
            }
        }
    }
    drop(listener);

    if !tasks.is_empty() {
        info!("Waiting for {} connection(s) to finish", tasks.len());
    }
    loop {
        tokio::select! {
            joined = tasks.join_next() => {
                if joined.is_none() {
                    break;
                }
            }
            _ = shutdown.notified() => {
                warn!("Aborting {} connection(s)", tasks.len());
                tasks.shutdown().await;
                break;
            }
        }
    }
}
