use serde_json::json;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::debug;

use super::date;

pub const SERVER_NAME: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
pub const HELLO_MESSAGE: &str = "Hello from Windows HTTP Server!";

const NOT_FOUND_BODY: &str = "<html><body><h1>404 Not Found</h1></body></html>";

#[derive(Debug)]
pub struct HttpResponse {
    pub version: &'static str,
    pub code: u16,
    pub reason: &'static str,
    pub content_type: &'static str,
    pub content_length: u64,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// 200 OK
    pub fn ok() -> Self {
        Self::new_with_status(200, "OK")
    }

    /// 400 Bad Request
    pub fn bad_request() -> Self {
        Self::new_with_status(400, "Bad Request").body("text/plain", "Bad Request\n")
    }

    /// 404 Not Found
    pub fn not_found() -> Self {
        Self::new_with_status(404, "Not Found").body("text/html", NOT_FOUND_BODY)
    }

    /// Fixed JSON greeting served under `/hello`.
    pub fn hello() -> Self {
        let mut body = json!({ "message": HELLO_MESSAGE }).to_string();
        body.push('\n');
        Self::ok().body("application/json", body)
    }

    fn new_with_status(code: u16, reason: &'static str) -> Self {
        HttpResponse {
            version: "HTTP/1.1",
            code,
            reason,
            content_type: "text/plain",
            content_length: 0,
            body: Vec::new(),
        }
    }

    /// 设置响应体，自动设置 Content-Type 和 Content-Length
    pub fn body(mut self, content_type: &'static str, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self.content_type = content_type;
        self.content_length = self.body.len() as u64;
        self
    }

    /// Head-only response whose body is streamed by the caller.
    pub fn sized(mut self, content_type: &'static str, content_length: u64) -> Self {
        self.body.clear();
        self.content_type = content_type;
        self.content_length = content_length;
        self
    }

    pub fn head_bytes(&self, date: &str) -> Vec<u8> {
        format!(
            "{} {} {}\r\n\
             Date: {}\r\n\
             Server: {}\r\n\
             Content-Type: {}\r\n\
             Content-Length: {}\r\n\
             Connection: close\r\n\r\n",
            self.version,
            self.code,
            self.reason,
            date,
            SERVER_NAME,
            self.content_type,
            self.content_length,
        )
        .into_bytes()
    }

    /// Writes the head and, unless `head_only`, the body. `write_all` keeps
    /// retrying short writes; the first error aborts the rest.
    pub async fn send<W>(&self, writer: &mut W, head_only: bool) -> std::io::Result<()>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        debug!(code = self.code, length = self.content_length, "sending response");
        writer.write_all(&self.head_bytes(&date::now())).await?;
        if !head_only && !self.body.is_empty() {
            writer.write_all(&self.body).await?;
        }
        writer.flush().await
    }
}
