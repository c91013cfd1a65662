//! One request per connection: read once, parse, route, respond, close.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, ErrorKind};
use tracing::{debug, error, info, warn};

use crate::config::ListenerConfig;
use crate::handler::{listing, static_files};
use crate::http::{HttpRequest, HttpResponse};
use crate::router::{self, Action};

/// Size of the single read a request line must fit in.
pub const MAX_REQUEST_LINE: usize = 4096;

/// Serves exactly one request on `stream` and then shuts it down. Every error
/// stays inside this connection.
pub async fn handle_connection<S>(mut stream: S, config: &ListenerConfig)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    if let Err(e) = respond(&mut stream, config).await {
        match e.kind() {
            ErrorKind::NotConnected | ErrorKind::BrokenPipe | ErrorKind::ConnectionReset => {
                debug!("peer went away: {}", e);
            }
            _ => warn!("Failed to respond: {}", e),
        }
    }
    if let Err(e) = stream.shutdown().await {
        match e.kind() {
            ErrorKind::NotConnected => {}
            _ => error!("Failed to shutdown connection: {}", e),
        }
    }
}

async fn respond<S>(stream: &mut S, config: &ListenerConfig) -> std::io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut buf = vec![0u8; MAX_REQUEST_LINE];
    let n = match stream.read(&mut buf).await {
        Ok(0) => {
            debug!("connection closed before a request arrived");
            return Ok(());
        }
        Ok(n) => n,
        Err(e) => {
            debug!("initial read failed: {}", e);
            return Ok(());
        }
    };

    let request = match HttpRequest::parse(&buf[..n]) {
        Ok(r) => r,
        Err(e) => {
            warn!("Failed to parse request: {}", e);
            return HttpResponse::bad_request().send(stream, false).await;
        }
    };
    info!("Request received: {} {}", request.method, request.target);

    let head_only = request.is_head();
    match router::route_request(&request, &config.document_root).await {
        Action::Hello => HttpResponse::hello().send(stream, head_only).await,
        Action::ServeFile(path) => static_files::serve_file(stream, &path, head_only).await,
        Action::ServeDirectory { path, url_path } => {
            listing::serve_directory(stream, &path, &url_path, head_only).await
        }
        Action::NotFound => HttpResponse::not_found().send(stream, head_only).await,
    }
}
