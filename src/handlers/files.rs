// Static file handlers: exported models and frontend assets

use std::convert::Infallible;
use std::path::{Component, Path, PathBuf};

use percent_encoding::percent_decode_str;
use tracing::warn;
use warp::http::StatusCode;
use warp::path::Tail;
use warp::reply::Response;
use warp::Reply;

use super::text_reply;
use crate::state::SharedState;

pub const DEFAULT_PAGE: &str = "front.html";
pub const INDEX_PAGE: &str = "index.html";

/// Join `relative` onto `root`, refusing anything that could climb out of it
pub fn resolve_within(root: &Path, relative: &str) -> Option<PathBuf> {
    let relative = Path::new(relative);
    let mut resolved = root.to_path_buf();
    for component in relative.components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(resolved)
}

/// Percent-decode a request tail and resolve it under `root`
///
/// Traversal is checked on the decoded form, so `%2e%2e` is refused like `..`.
pub fn resolve_request(root: &Path, tail: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(tail).decode_utf8().ok()?;
    resolve_within(root, &decoded)
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}

/// Read a file and reply with a content type guessed from its extension
async fn serve_file(path: &Path) -> Response {
    match tokio::fs::read(path).await {
        Ok(bytes) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            warp::reply::with_header(bytes, "content-type", mime.to_string()).into_response()
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read static file");
            text_reply("Failed to read file", StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /models/<file>
pub async fn models_handler(state: SharedState, tail: Tail) -> Result<Response, Infallible> {
    let Some(path) = resolve_request(&state.config.models_dir, tail.as_str()) else {
        return Ok(text_reply("Invalid path", StatusCode::BAD_REQUEST));
    };
    if !is_file(&path).await {
        return Ok(text_reply("Not found", StatusCode::NOT_FOUND));
    }
    Ok(serve_file(&path).await)
}

/// GET /<path>, falling back to the default page
pub async fn frontend_handler(state: SharedState, tail: Tail) -> Result<Response, Infallible> {
    let root = &state.config.frontend_root;
    let requested = if tail.as_str().is_empty() {
        DEFAULT_PAGE
    } else {
        tail.as_str()
    };

    let Some(path) = resolve_request(root, requested) else {
        return Ok(text_reply("Invalid path", StatusCode::BAD_REQUEST));
    };
    if is_file(&path).await {
        return Ok(serve_file(&path).await);
    }

    for page in [DEFAULT_PAGE, INDEX_PAGE] {
        let candidate = root.join(page);
        if is_file(&candidate).await {
            return Ok(serve_file(&candidate).await);
        }
    }

    Ok(text_reply(
        "front.html/index.html not found on server",
        StatusCode::INTERNAL_SERVER_ERROR,
    ))
}
