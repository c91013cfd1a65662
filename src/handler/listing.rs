use std::path::Path;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use tokio::fs;
use tokio::io::AsyncWrite;
use tracing::debug;

use crate::http::HttpResponse;

/// Characters escaped when a file name is placed in an href.
const HREF_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub is_dir: bool,
}

/// Immediate children of `path`, sorted by name.
pub async fn read_entries(path: &Path) -> std::io::Result<Vec<ListingEntry>> {
    let mut entries = fs::read_dir(path).await?;
    let mut result = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name == "." || name == ".." {
            continue;
        }
        // follow symlinks so a link to a directory is listed as one
        let is_dir = match fs::metadata(entry.path()).await {
            Ok(meta) => meta.is_dir(),
            Err(_) => entry.file_type().await?.is_dir(),
        };
        result.push(ListingEntry { name, is_dir });
    }
    result.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(result)
}

pub fn render_listing(url_path: &str, entries: &[ListingEntry]) -> String {
    let title = escape_html(url_path);
    // `//name` would be read as a network-path reference to host `name`
    let base = if url_path.starts_with("//") {
        escape_html(&format!("/{}", url_path.trim_start_matches('/')))
    } else {
        title.clone()
    };
    let separator = if base.ends_with('/') { "" } else { "/" };
    let mut html = format!(
        "<html><head><title>Index of {title}</title></head>\
         <body><h1>Index of {title}</h1><ul>"
    );
    for entry in entries {
        let slash = if entry.is_dir { "/" } else { "" };
        html.push_str(&format!(
            "<li><a href=\"{}{}{}{}\">{}{}</a></li>",
            base,
            separator,
            utf8_percent_encode(&entry.name, HREF_ESCAPE),
            slash,
            escape_html(&entry.name),
            slash,
        ));
    }
    html.push_str("</ul></body></html>");
    html
}

/// Renders the whole page before sending so `Content-Length` is exact. An
/// enumeration error is returned before anything is written.
pub async fn serve_directory<W>(
    writer: &mut W,
    path: &Path,
    url_path: &str,
    head_only: bool,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let entries = read_entries(path).await?;
    debug!(path = %path.display(), count = entries.len(), "directory listed");
    HttpResponse::ok()
        .body("text/html; charset=utf-8", render_listing(url_path, &entries))
        .send(writer, head_only)
        .await
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
