//! HTTP response building module
//!
//! Builders for every response the file server produces. None of them sets
//! the injected CORS/caching headers; that happens once, in the middleware.

use hyper::body::Bytes;
use hyper::http::response::Builder;
use hyper::header::{HeaderValue, CONTENT_LENGTH};
use hyper::{Response, StatusCode};
use std::time::SystemTime;

use super::body::ResponseBody;
use super::conditional::format_http_date;

pub const SERVER_NAME: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

const HTML_UTF8: &str = "text/html; charset=utf-8";

/// Every response starts with `Server` and `Date`
///
/// Setting `Date` here keeps hyper from appending its own after the
/// injected headers.
fn builder(status: StatusCode) -> Builder {
    Response::builder()
        .status(status)
        .header("Server", SERVER_NAME)
        .header("Date", format_http_date(SystemTime::now()))
}

/// HEAD responses keep their headers but drop the payload
fn body_unless_head(data: Bytes, is_head: bool) -> ResponseBody {
    if is_head {
        ResponseBody::bodiless()
    } else {
        ResponseBody::new(data)
    }
}

fn finish(builder: Builder, body: ResponseBody, what: &str) -> Response<ResponseBody> {
    builder.body(body).unwrap_or_else(|e| {
        log_build_error(what, &e);
        let mut fallback = Response::new(ResponseBody::new(Bytes::new()));
        fallback
            .headers_mut()
            .insert(CONTENT_LENGTH, HeaderValue::from_static("0"));
        fallback
    })
}

/// 200 with file contents
pub fn build_file_response(
    data: Bytes,
    content_type: &str,
    last_modified: Option<&str>,
    is_head: bool,
) -> Response<ResponseBody> {
    let mut b = builder(StatusCode::OK)
        .header("Content-Type", content_type)
        .header("Content-Length", data.len());
    if let Some(date) = last_modified {
        b = b.header("Last-Modified", date);
    }
    finish(b, body_unless_head(data, is_head), "200")
}

/// 200 with a generated HTML page (directory listings)
pub fn build_html_response(html: String, is_head: bool) -> Response<ResponseBody> {
    let data = Bytes::from(html);
    let b = builder(StatusCode::OK)
        .header("Content-Type", HTML_UTF8)
        .header("Content-Length", data.len());
    finish(b, body_unless_head(data, is_head), "HTML")
}

/// 304 Not Modified
pub fn build_304_response(last_modified: &str) -> Response<ResponseBody> {
    let b = builder(StatusCode::NOT_MODIFIED).header("Last-Modified", last_modified);
    finish(b, ResponseBody::bodiless(), "304")
}

/// 301 to the slash-terminated form of a directory URL
pub fn build_redirect_response(location: &str) -> Response<ResponseBody> {
    let b = builder(StatusCode::MOVED_PERMANENTLY)
        .header("Location", location)
        .header("Content-Length", 0);
    finish(b, ResponseBody::new(Bytes::new()), "301")
}

/// Error page for `status`, with an optional human readable message
pub fn build_error_response(
    status: StatusCode,
    message: Option<&str>,
    is_head: bool,
) -> Response<ResponseBody> {
    let reason = status.canonical_reason().unwrap_or("Unknown");
    let message = escape_html(message.unwrap_or(reason));
    let html = format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Error response</title>\n</head>\n<body>\n\
         <h1>Error response</h1>\n<p>Error code: {code}</p>\n<p>Message: {message}.</p>\n\
         <p>Error code explanation: {code} - {reason}.</p>\n</body>\n</html>\n",
        code = status.as_u16(),
    );
    let data = Bytes::from(html);
    let b = builder(status)
        .header("Content-Type", HTML_UTF8)
        .header("Content-Length", data.len())
        .header("Connection", "close");
    finish(b, body_unless_head(data, is_head), status.as_str())
}

pub fn build_404_response(message: &str, is_head: bool) -> Response<ResponseBody> {
    build_error_response(StatusCode::NOT_FOUND, Some(message), is_head)
}

pub fn build_501_response(method: &hyper::Method) -> Response<ResponseBody> {
    build_error_response(
        StatusCode::NOT_IMPLEMENTED,
        Some(&format!("Unsupported method ('{method}')")),
        false,
    )
}

/// Escape text for inclusion in HTML element content or attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    out
}

fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
