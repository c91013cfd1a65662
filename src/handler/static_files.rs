//! Static file responses.

use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, warn};

use crate::http::{mime, HttpResponse};

/// Chunk size used when streaming file contents.
pub const SEND_CHUNK: usize = 8192;

/// Sends `path` with its exact size as `Content-Length`. If the file vanished
/// or cannot be read since routing looked at it, a 404 is sent instead.
pub async fn serve_file<W>(writer: &mut W, path: &Path, head_only: bool) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let opened = match File::open(path).await {
        Ok(file) => file.metadata().await.map(|meta| (file, meta.len())),
        Err(e) => Err(e),
    };
    let (file, size) = match opened {
        Ok(v) => v,
        Err(e) => {
            warn!(path = %path.display(), "cannot open file: {}", e);
            return HttpResponse::not_found().send(writer, head_only).await;
        }
    };

    HttpResponse::ok()
        .sized(mime::content_type(path), size)
        .send(writer, true)
        .await?;
    if head_only {
        return Ok(());
    }

    // never send more than the advertised length, even if the file grew
    let mut reader = BufReader::with_capacity(SEND_CHUNK, file.take(size));
    let sent = tokio::io::copy_buf(&mut reader, writer).await?;
    if sent < size {
        warn!(path = %path.display(), sent, size, "file shrank while sending");
    } else {
        debug!(path = %path.display(), sent, "file sent");
    }
    writer.flush().await
}
