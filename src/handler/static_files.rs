//! Static file serving module
//!
//! Resolves a request path under the document root and answers with the
//! file, an index page, a directory listing, a redirect or an error.

use crate::config::AppState;
use crate::handler::listing;
use crate::handler::path::{self, TranslatedPath};
use crate::handler::router::RequestContext;
use crate::http::{self, conditional, mime, ResponseBody};
use crate::logger;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use tokio::fs;

/// Tried in order when a directory is requested
pub const INDEX_FILES: [&str; 2] = ["index.html", "index.htm"];

/// Serve whatever `ctx.path` names below the document root
pub async fn serve(ctx: &RequestContext<'_>, state: &AppState) -> Response<ResponseBody> {
    let TranslatedPath {
        fs_path,
        trailing_slash,
    } = path::translate(state.root(), ctx.path);

    let is_dir = fs::metadata(&fs_path).await.is_ok_and(|m| m.is_dir());
    if !is_dir {
        if trailing_slash {
            return http::build_404_response("File not found", ctx.is_head);
        }
        return serve_file(ctx, &fs_path).await;
    }

    if !ctx.path.ends_with('/') {
        return http::build_redirect_response(&directory_location(ctx));
    }

    for index in INDEX_FILES {
        let candidate = fs_path.join(index);
        if fs::metadata(&candidate).await.is_ok_and(|m| m.is_file()) {
            return serve_file(ctx, &candidate).await;
        }
    }

    serve_listing(ctx, &fs_path).await
}

/// `Location` for a directory requested without its trailing slash
fn directory_location(ctx: &RequestContext<'_>) -> String {
    match ctx.query {
        Some(q) => format!("{}/?{q}", ctx.path),
        None => format!("{}/", ctx.path),
    }
}

/// Serve a single regular file, honoring `If-Modified-Since`
pub async fn serve_file(ctx: &RequestContext<'_>, file_path: &Path) -> Response<ResponseBody> {
    let metadata = match fs::metadata(file_path).await {
        Ok(m) if m.is_file() => m,
        _ => return http::build_404_response("File not found", ctx.is_head),
    };

    let modified = metadata.modified().ok();
    let last_modified = modified.map(conditional::format_http_date);

    if let (Some(mtime), Some(date)) = (modified, last_modified.as_deref()) {
        if conditional::not_modified(ctx.if_modified_since, ctx.if_none_match, mtime) {
            return http::build_304_response(date);
        }
    }

    let content = match fs::read(file_path).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_warning(&format!(
                "Failed to read file '{}': {e}",
                file_path.display()
            ));
            return http::build_404_response("File not found", ctx.is_head);
        }
    };

    http::build_file_response(
        Bytes::from(content),
        mime::content_type_for(file_path),
        last_modified.as_deref(),
        ctx.is_head,
    )
}

async fn serve_listing(ctx: &RequestContext<'_>, dir: &Path) -> Response<ResponseBody> {
    match listing::read_entries(dir).await {
        Ok(entries) => {
            let html = listing::render(&path::decode(ctx.path), &entries);
            http::build_html_response(html, ctx.is_head)
        }
        Err(e) => {
            logger::log_warning(&format!("Cannot list '{}': {e}", dir.display()));
            http::build_404_response("No permission to list directory", ctx.is_head)
        }
    }
}
