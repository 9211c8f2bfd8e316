//! MIME type detection module
//!
//! Maps a file extension (case-insensitive) to a Content-Type value.

use std::path::Path;

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Content-Type for the file at `path`, judged by its extension only
///
/// # Examples
/// ```
/// use std::path::Path;
/// use nocache_serve::http::mime::content_type_for;
/// assert_eq!(content_type_for(Path::new("a/index.HTML")), "text/html");
/// assert_eq!(content_type_for(Path::new("Makefile")), "application/octet-stream");
/// ```
pub fn content_type_for(path: &Path) -> &'static str {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(DEFAULT_CONTENT_TYPE, |ext| {
            lookup(&ext.to_ascii_lowercase()).unwrap_or(DEFAULT_CONTENT_TYPE)
        })
}

fn lookup(extension: &str) -> Option<&'static str> {
    let content_type = match extension {
        // Text
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "txt" | "text" | "log" => "text/plain",
        "md" | "markdown" => "text/markdown",
        "csv" => "text/csv",
        "xml" => "text/xml",

        // Scripts and data
        "js" | "mjs" => "text/javascript",
        "json" | "map" => "application/json",
        "wasm" => "application/wasm",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/vnd.microsoft.icon",
        "webp" => "image/webp",
        "bmp" => "image/bmp",

        // Audio / video
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "ogv" => "video/ogg",
        "mp3" => "audio/mpeg",
        "wav" => "audio/x-wav",
        "ogg" | "oga" => "audio/ogg",

        // Fonts
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",

        // Archives and documents
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" => "application/gzip",
        "tar" => "application/x-tar",
        "bin" => DEFAULT_CONTENT_TYPE,

        _ => return None,
    };
    Some(content_type)
}
