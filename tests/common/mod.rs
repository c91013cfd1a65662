#![allow(dead_code)]

use std::fs;
use std::io;
use std::path::Path;
use std::pin::Pin;
use std::task::{Context, Poll};

use dualstack_http_server::config::ListenerConfig;
use dualstack_http_server::connection::handle_connection;
use tempfile::TempDir;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, ReadBuf};

/// Document root with a few files and directories:
///
/// ```text
/// index.html
/// style.CSS
/// data.bin
/// docs/readme.txt
/// docs/img/
/// site/index.html
/// empty/
/// ```
pub fn docroot() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("index.html"), "<h1>home</h1>").unwrap();
    fs::write(root.join("style.CSS"), "body { color: red; }").unwrap();
    fs::write(root.join("data.bin"), [0u8, 1, 2, 3, 255]).unwrap();
    fs::create_dir_all(root.join("docs/img")).unwrap();
    fs::write(root.join("docs/readme.txt"), "read me\n").unwrap();
    fs::create_dir(root.join("site")).unwrap();
    fs::write(root.join("site/index.html"), "<p>site</p>").unwrap();
    fs::create_dir(root.join("empty")).unwrap();
    dir
}

pub fn config(root: &Path) -> ListenerConfig {
    ListenerConfig::new(0, root).unwrap()
}

#[derive(Debug)]
pub struct Reply {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn content_length(&self) -> usize {
        self.header("Content-Length").unwrap().parse().unwrap()
    }

    pub fn body_text(&self) -> String {
        String::from_utf8(self.body.clone()).unwrap()
    }
}

pub fn parse_reply(raw: &[u8]) -> Reply {
    let split = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response has no header terminator");
    let head = std::str::from_utf8(&raw[..split]).unwrap();
    let mut lines = head.split("\r\n");
    let status_line = lines.next().unwrap();
    let mut parts = status_line.splitn(3, ' ');
    assert_eq!(parts.next(), Some("HTTP/1.1"));
    let status = parts.next().unwrap().parse().unwrap();
    let headers = lines
        .map(|l| {
            let (k, v) = l.split_once(": ").unwrap();
            (k.to_string(), v.to_string())
        })
        .collect();
    Reply {
        status,
        headers,
        body: raw[split + 4..].to_vec(),
    }
}

/// Runs one connection over an in-memory pipe and returns the raw bytes the
/// server wrote before closing.
pub async fn exchange_raw(root: &Path, request: &[u8]) -> Vec<u8> {
    let config = config(root);
    let (mut client, server) = tokio::io::duplex(64 * 1024);
    let task = tokio::spawn(async move { handle_connection(server, &config).await });

    if request.is_empty() {
        client.shutdown().await.unwrap();
    } else {
        client.write_all(request).await.unwrap();
    }
    let mut out = Vec::new();
    client.read_to_end(&mut out).await.unwrap();
    task.await.unwrap();
    out
}

pub async fn exchange(root: &Path, request: &str) -> Reply {
    parse_reply(&exchange_raw(root, request.as_bytes()).await)
}

/// Yields `request` on the first read, accepts `limit` written bytes and
/// then fails every write with `BrokenPipe`.
pub struct FailingStream {
    pub request: Vec<u8>,
    pub limit: usize,
    pub written: Vec<u8>,
    pub shut_down: bool,
    read_pos: usize,
}

impl FailingStream {
    pub fn new(request: &str, limit: usize) -> Self {
        FailingStream {
            request: request.as_bytes().to_vec(),
            limit,
            written: Vec::new(),
            shut_down: false,
            read_pos: 0,
        }
    }
}

impl AsyncRead for FailingStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let start = self.read_pos;
        let n = (self.request.len() - start).min(buf.remaining());
        buf.put_slice(&self.request[start..start + n]);
        self.read_pos += n;
        Poll::Ready(Ok(()))
    }
}

impl AsyncWrite for FailingStream {
    fn poll_write(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let room = self.limit - self.written.len();
        if room == 0 {
            return Poll::Ready(Err(io::ErrorKind::BrokenPipe.into()));
        }
        let n = room.min(buf.len());
        self.written.extend_from_slice(&buf[..n]);
        Poll::Ready(Ok(n))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.shut_down = true;
        Poll::Ready(Ok(()))
    }
}
