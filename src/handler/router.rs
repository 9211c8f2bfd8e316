//! Request dispatch module
//!
//! Entry point for HTTP request processing: method validation, then the
//! static file logic. Produces the response before header injection.

use crate::config::AppState;
use crate::handler::path::collapse_leading_slashes;
use crate::handler::static_files;
use crate::http::{self, ResponseBody};
use crate::logger;
use hyper::header::{IF_MODIFIED_SINCE, IF_NONE_MATCH};
use hyper::{HeaderMap, Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

/// Request context encapsulating information needed for request processing
///
/// `path` never starts with more than one slash.
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_modified_since: Option<&'a str>,
    pub if_none_match: Option<&'a str>,
}

impl<'a> RequestContext<'a> {
    pub fn from_parts(method: &Method, uri: &'a hyper::Uri, headers: &'a HeaderMap) -> Self {
        Self {
            path: collapse_leading_slashes(uri.path()),
            query: uri.query(),
            is_head: *method == Method::HEAD,
            if_modified_since: header_str(headers, &IF_MODIFIED_SINCE),
            if_none_match: header_str(headers, &IF_NONE_MATCH),
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &hyper::header::HeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Main entry point for HTTP request handling
///
/// The request body is never read, so any body type is accepted.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<ResponseBody>, Infallible> {
    let method = req.method();

    if let Some(resp) = check_http_method(method) {
        return Ok(resp);
    }

    let ctx = RequestContext::from_parts(method, req.uri(), req.headers());
    Ok(static_files::serve(&ctx, &state).await)
}

/// Only GET and HEAD are served; everything else is 501
fn check_http_method(method: &Method) -> Option<Response<ResponseBody>> {
    match *method {
        Method::GET | Method::HEAD => None,
        _ => {
            logger::log_warning(&format!("Unsupported method: {method}"));
            Some(http::build_501_response(method))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, ServerConfig};
    use http_body_util::BodyExt;
    use hyper::StatusCode;
    use std::path::Path;

    fn state(root: &Path) -> Arc<AppState> {
        let server = ServerConfig::new("127.0.0.1:0".parse().unwrap(), root);
        Arc::new(AppState::new(&Config::default(), &server))
    }

    fn get(uri: &str) -> Request<()> {
        Request::builder().uri(uri).body(()).unwrap()
    }

    async fn body_of(resp: Response<ResponseBody>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_serves_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>hi</h1>").unwrap();

        let resp = handle_request(get("/index.html"), state(dir.path())).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["content-type"], "text/html");
        assert_eq!(resp.headers()["content-length"], "11");
        assert!(resp.headers().contains_key("last-modified"));
        assert_eq!(body_of(resp).await, "<h1>hi</h1>");
    }

    #[tokio::test]
    async fn test_missing_file_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let resp = handle_request(get("/does-not-exist.txt"), state(dir.path())).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_trailing_slash_on_file_is_404() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "n").unwrap();
        let resp = handle_request(get("/notes.txt/"), state(dir.path())).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_directory_redirect_keeps_query() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        let resp = handle_request(get("/docs?lang=en"), state(dir.path())).await.unwrap();
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(resp.headers()["location"], "/docs/?lang=en");
    }

    #[tokio::test]
    async fn test_redirect_never_protocol_relative() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("evil.com")).unwrap();

        for uri in ["//evil.com", "///evil.com"] {
            let resp = handle_request(get(uri), state(dir.path())).await.unwrap();
            assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
            assert_eq!(resp.headers()["location"], "/evil.com/");
        }
    }

    #[tokio::test]
    async fn test_empty_file_keeps_zero_length() {
        use hyper::body::Body;

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("empty.txt"), "").unwrap();

        let resp = handle_request(get("/empty.txt"), state(dir.path())).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["content-length"], "0");
        assert_eq!(resp.body().size_hint().exact(), Some(0));
        assert!(!resp.body().is_end_stream());
    }

    #[tokio::test]
    async fn test_directory_index_preferred() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("site")).unwrap();
        std::fs::write(dir.path().join("site/index.htm"), "old index").unwrap();

        let resp = handle_request(get("/site/"), state(dir.path())).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_of(resp).await, "old index");
    }

    #[tokio::test]
    async fn test_directory_listing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), "b").unwrap();
        std::fs::create_dir(dir.path().join("a")).unwrap();

        let resp = handle_request(get("/"), state(dir.path())).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["content-type"], "text/html; charset=utf-8");
        let body = body_of(resp).await;
        assert!(body.contains("Directory listing for /"));
        let a = body.find("href=\"a/\"").unwrap();
        let b = body.find("href=\"b.txt\"").unwrap();
        assert!(a < b);
    }

    #[tokio::test]
    async fn test_head_has_no_body() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("data.json"), "{\"k\":1}").unwrap();

        let req = Request::builder()
            .method(Method::HEAD)
            .uri("/data.json")
            .body(())
            .unwrap();
        let resp = handle_request(req, state(dir.path())).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["content-length"], "7");
        assert_eq!(body_of(resp).await, "");
    }

    #[tokio::test]
    async fn test_if_modified_since() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.css"), "body{}").unwrap();
        let st = state(dir.path());

        let req = Request::builder()
            .uri("/app.css")
            .header("If-Modified-Since", "Fri, 01 Jan 2100 00:00:00 GMT")
            .body(())
            .unwrap();
        let resp = handle_request(req, Arc::clone(&st)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);

        let req = Request::builder()
            .uri("/app.css")
            .header("If-Modified-Since", "Thu, 01 Jan 1970 00:00:00 GMT")
            .body(())
            .unwrap();
        let resp = handle_request(req, st).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unsupported_method() {
        let dir = tempfile::tempdir().unwrap();
        let req = Request::builder()
            .method(Method::POST)
            .uri("/")
            .body(())
            .unwrap();
        let resp = handle_request(req, state(dir.path())).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_IMPLEMENTED);
    }

    #[tokio::test]
    async fn test_traversal_cannot_escape_root() {
        let outer = tempfile::tempdir().unwrap();
        std::fs::write(outer.path().join("secret.txt"), "secret").unwrap();
        std::fs::create_dir(outer.path().join("public")).unwrap();

        let resp = handle_request(get("/../secret.txt"), state(&outer.path().join("public")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
