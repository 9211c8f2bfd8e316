//! Fixed response header injection
//!
//! [`InjectHeaders`] wraps any hyper service and rewrites every response it
//! produces, whatever the status or code path, so that the response ends
//! with exactly one copy of each injected header, in order.
//!
//! The HTTP/1 layer appends its own `Connection` header when the response
//! has none, which would land after the injected ones. The decorator sets
//! that header itself first, so nothing follows `Expires` on the wire.

use hyper::header::{
    HeaderName, HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL, CONNECTION, EXPIRES,
};
use hyper::service::Service;
use hyper::{HeaderMap, Request, Response, Version};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::logger;

/// Ordered list of headers appended to every response
pub type InjectedHeaders = Arc<[(HeaderName, HeaderValue)]>;

/// `Access-Control-Allow-Origin: *`, `Cache-Control: no-store, must-revalidate`, `Expires: 0`
pub fn cors_no_store_headers() -> InjectedHeaders {
    Arc::from(vec![
        (ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*")),
        (
            CACHE_CONTROL,
            HeaderValue::from_static("no-store, must-revalidate"),
        ),
        (EXPIRES, HeaderValue::from_static("0")),
    ])
}

/// Replace any queued copies of the injected headers and append them last
pub fn finalize_headers(headers: &mut HeaderMap, injected: &[(HeaderName, HeaderValue)]) {
    for (name, _) in injected {
        headers.remove(name);
    }
    for (name, value) in injected {
        headers.append(name.clone(), value.clone());
    }
}

/// `Connection` value hyper would add to the response on its own
///
/// HTTP/1.1 gets `close` once keep-alive is off for the exchange. HTTP/1.0
/// gets `keep-alive` when the client asked for it and it is allowed.
pub fn connection_value(
    version: Version,
    request: &HeaderMap,
    keep_alive: bool,
) -> Option<HeaderValue> {
    match version {
        Version::HTTP_10 => (keep_alive && has_connection_token(request, "keep-alive"))
            .then(|| HeaderValue::from_static("keep-alive")),
        Version::HTTP_11 => (!keep_alive || has_connection_token(request, "close"))
            .then(|| HeaderValue::from_static("close")),
        _ => None,
    }
}

fn has_connection_token(headers: &HeaderMap, token: &str) -> bool {
    headers
        .get_all(CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .any(|t| t.trim().eq_ignore_ascii_case(token))
}

/// Service decorator running [`finalize_headers`] on every response
#[derive(Clone)]
pub struct InjectHeaders<S> {
    inner: S,
    headers: InjectedHeaders,
    keep_alive: bool,
    trace: bool,
}

impl<S> InjectHeaders<S> {
    pub fn new(inner: S, headers: InjectedHeaders) -> Self {
        Self {
            inner,
            headers,
            keep_alive: true,
            trace: false,
        }
    }

    /// Whether the connection is allowed to outlive one exchange
    #[must_use]
    pub fn with_keep_alive(mut self, keep_alive: bool) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    /// Emit one trace line per finalized response
    #[must_use]
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }
}

impl<S, ReqBody, B> Service<Request<ReqBody>> for InjectHeaders<S>
where
    S: Service<Request<ReqBody>, Response = Response<B>>,
    S::Future: 'static,
    S::Error: 'static,
    B: 'static,
{
    type Response = Response<B>;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn call(&self, req: Request<ReqBody>) -> Self::Future {
        let version = req.version();
        let connection = connection_value(version, req.headers(), self.keep_alive);
        let fut = self.inner.call(req);
        let headers = Arc::clone(&self.headers);
        let trace = self.trace;

        Box::pin(async move {
            let mut response = fut.await?;
            if version == Version::HTTP_10 {
                // An HTTP/1.0 head without `keep-alive` makes hyper close
                // instead of adding the header itself
                *response.version_mut() = Version::HTTP_10;
            }
            if let Some(value) = connection {
                response.headers_mut().entry(CONNECTION).or_insert(value);
            }
            finalize_headers(response.headers_mut(), &headers);
            if trace {
                logger::log_response_trace(response.status().as_u16(), response.headers().len());
            }
            Ok(response)
        })
    }
}
