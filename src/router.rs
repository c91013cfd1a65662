use std::path::{Component, Path, PathBuf};

use percent_encoding::percent_decode_str;
use tokio::fs;
use tracing::warn;

use crate::http::HttpRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Hello,
    ServeFile(PathBuf),
    ServeDirectory { path: PathBuf, url_path: String },
    NotFound,
}

/// Picks the responder for a request. The method never affects routing.
pub async fn route_request(req: &HttpRequest, document_root: &Path) -> Action {
    let target = if req.target == "/" {
        "/index.html"
    } else {
        req.target.as_str()
    };

    if target.starts_with("/hello") {
        return Action::Hello;
    }

    let Some(path) = resolve_path(document_root, target) else {
        warn!("target {} does not map into the document root", target);
        return Action::NotFound;
    };

    let Ok(meta) = fs::metadata(&path).await else {
        return Action::NotFound;
    };
    if meta.is_file() {
        return Action::ServeFile(path);
    }
    if !meta.is_dir() {
        return Action::NotFound;
    }

    let index = path.join("index.html");
    match fs::metadata(&index).await {
        Ok(m) if m.is_file() => Action::ServeFile(index),
        _ => Action::ServeDirectory {
            path,
            url_path: target.to_string(),
        },
    }
}

/// Maps a URL path onto the document root. Returns `None` for targets that
/// would leave the root (`..`, drive prefixes, embedded separators) or that
/// are not valid percent-encoded UTF-8.
pub fn resolve_path(document_root: &Path, target: &str) -> Option<PathBuf> {
    let relative = target.strip_prefix('/').unwrap_or(target);
    let decoded = percent_decode_str(relative).decode_utf8().ok()?;

    let mut path = document_root.to_path_buf();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return None,
            _ => {}
        }
        let mut components = Path::new(segment).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(part)), None) => path.push(part),
            _ => return None,
        }
    }
    Some(path)
}
