//! Access logging
//!
//! Outermost service layer: records the request line before dispatch and
//! writes one access log line once the final response is known.

use hyper::header::{HeaderName, CONTENT_LENGTH, REFERER, USER_AGENT};
use hyper::service::Service;
use hyper::{Method, Request, Response, StatusCode};
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

use crate::logger::{self, AccessLogEntry};

/// Service decorator logging each exchange for one connection
#[derive(Clone)]
pub struct AccessLog<S> {
    inner: S,
    peer_addr: SocketAddr,
    /// `None` disables logging
    format: Option<Arc<str>>,
}

impl<S> AccessLog<S> {
    pub const fn new(inner: S, peer_addr: SocketAddr, format: Option<Arc<str>>) -> Self {
        Self {
            inner,
            peer_addr,
            format,
        }
    }
}

fn entry_for<B>(req: &Request<B>, peer_addr: SocketAddr) -> AccessLogEntry {
    let target = req
        .uri()
        .path_and_query()
        .map_or_else(|| req.uri().path().to_string(), ToString::to_string);
    let header = |name: HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(peer_addr.ip().to_string(), req.method().as_str(), target);
    entry.version = format!("{:?}", req.version());
    entry.referer = header(REFERER);
    entry.user_agent = header(USER_AGENT);
    entry
}

/// Bytes actually sent: nothing for HEAD and bodiless statuses
fn sent_bytes<B>(method: &Method, response: &Response<B>) -> Option<u64> {
    let status = response.status();
    if *method == Method::HEAD
        || status == StatusCode::NOT_MODIFIED
        || status.is_informational()
        || status == StatusCode::NO_CONTENT
    {
        return None;
    }
    response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|len| *len > 0)
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for AccessLog<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
    S::Future: 'static,
    S::Error: 'static,
    ResBody: 'static,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn call(&self, req: Request<ReqBody>) -> Self::Future {
        let Some(format) = self.format.clone() else {
            return Box::pin(self.inner.call(req));
        };

        let started = Instant::now();
        let method = req.method().clone();
        let mut entry = entry_for(&req, self.peer_addr);
        let fut = self.inner.call(req);

        Box::pin(async move {
            let response = fut.await?;
            entry.status = response.status().as_u16();
            entry.body_bytes = sent_bytes(&method, &response);
            entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
            logger::log_access(&entry, &format);
            Ok(response)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: StatusCode, len: &str) -> Response<()> {
        Response::builder()
            .status(status)
            .header("content-length", len)
            .body(())
            .unwrap()
    }

    #[test]
    fn test_entry_captures_request_line() {
        let req = Request::builder()
            .uri("/files/a.txt?download=1")
            .header("user-agent", "curl/8.5.0")
            .body(())
            .unwrap();
        let entry = entry_for(&req, "192.0.2.10:51000".parse().unwrap());
        assert_eq!(entry.remote_addr, "192.0.2.10");
        assert_eq!(entry.method, "GET");
        assert_eq!(entry.target, "/files/a.txt?download=1");
        assert_eq!(entry.version, "HTTP/1.1");
        assert_eq!(entry.user_agent.as_deref(), Some("curl/8.5.0"));
        assert!(entry.referer.is_none());
    }

    #[test]
    fn test_sent_bytes() {
        assert_eq!(sent_bytes(&Method::GET, &response(StatusCode::OK, "42")), Some(42));
        assert_eq!(sent_bytes(&Method::HEAD, &response(StatusCode::OK, "42")), None);
        assert_eq!(sent_bytes(&Method::GET, &response(StatusCode::NOT_MODIFIED, "0")), None);
        assert_eq!(sent_bytes(&Method::GET, &response(StatusCode::MOVED_PERMANENTLY, "0")), None);
    }
}
