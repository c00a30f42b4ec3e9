//! SPA fallback serving module
//!
//! Resolves request paths against the document root. A path that resolves to
//! an existing regular file is served with standard static-file semantics;
//! anything else is answered with the configured fallback document so the
//! client-side router can handle the URL. A missing fallback ends in 404.

use std::io;
use std::path::{Path, PathBuf};

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use tokio::fs;

use crate::config::AppState;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime, range::RangeParseResult};
use crate::logger;

/// Serve the request path, substituting the fallback document at most once.
pub async fn serve(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    let root = Path::new(&state.config.site.root);
    let fallback = &state.config.site.fallback;

    // Literal resolution first; only an unresolved path takes the fallback.
    let resolved = match resolve(root, ctx.path).await {
        Some(file_path) => Some(file_path),
        None => resolve(root, fallback).await,
    };

    let Some(file_path) = resolved else {
        return http::build_404_response();
    };

    match fs::read(&file_path).await {
        Ok(content) => {
            let content_type =
                mime::get_content_type(file_path.extension().and_then(|e| e.to_str()));
            build_file_response(&content, content_type, ctx)
        }
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                file_path.display()
            ));
            read_error_response(e.kind())
        }
    }
}

/// Map a file read failure to its response: permission problems surface as
/// 403, every other I/O error as 500.
fn read_error_response(kind: io::ErrorKind) -> Response<Full<Bytes>> {
    if kind == io::ErrorKind::PermissionDenied {
        http::build_403_response()
    } else {
        http::build_500_response()
    }
}

/// Resolve a URL path to an existing regular file under `root`.
///
/// The path is percent-decoded, joined onto the document root, and
/// canonicalized. Returns `None` when the result does not exist, is not a
/// regular file, or escapes the document root.
pub async fn resolve(root: &Path, url_path: &str) -> Option<PathBuf> {
    let decoded = urlencoding::decode(url_path).ok()?;
    let relative = decoded.trim_start_matches('/');

    let root_canonical = match fs::canonicalize(root).await {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Document root not found or inaccessible '{}': {e}",
                root.display()
            ));
            return None;
        }
    };

    // Canonicalization collapses `.`/`..` segments and symlinks; a candidate
    // landing outside the root is a traversal attempt.
    let candidate = fs::canonicalize(root_canonical.join(relative)).await.ok()?;
    if !candidate.starts_with(&root_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {url_path} -> {}",
            candidate.display()
        ));
        return None;
    }

    let meta = fs::metadata(&candidate).await.ok()?;
    meta.is_file().then_some(candidate)
}

/// Build the static file response with `ETag` and Range support
fn build_file_response(
    data: &[u8],
    content_type: &str,
    ctx: &RequestContext<'_>,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(data);
    let total_size = data.len();

    if cache::check_etag_match(ctx.if_none_match.as_deref(), &etag) {
        return http::build_304_response(&etag);
    }

    match http::parse_range_header(ctx.range_header.as_deref(), total_size) {
        RangeParseResult::Valid(range) => {
            let start = range.start;
            let end = range.end_position(total_size);

            let body = if ctx.is_head {
                Bytes::new()
            } else {
                Bytes::from(data[start..=end].to_vec())
            };

            http::response::build_partial_response(
                body,
                content_type,
                &etag,
                start,
                end,
                total_size,
                ctx.is_head,
            )
        }
        RangeParseResult::NotSatisfiable => http::build_416_response(total_size),
        RangeParseResult::None => {
            let body = if ctx.is_head {
                Bytes::new()
            } else {
                Bytes::from(data.to_owned())
            };
            http::response::build_cached_response(body, content_type, &etag, ctx.is_head)
        }
    }
}
