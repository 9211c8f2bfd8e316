//! Response body type
//!
//! Like `http_body_util::Full`, but an empty payload still reports an exact
//! length of zero instead of end-of-stream. hyper then writes the
//! `Content-Length` the builders set where it stands in the header map,
//! rather than dropping it and adding its own after every other header.

use hyper::body::{Body, Bytes, Frame, SizeHint};
use std::convert::Infallible;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Payload of every response the server produces
#[derive(Debug, Clone)]
pub struct ResponseBody {
    data: Option<Bytes>,
    /// Nothing follows the head at all (304, HEAD)
    bodiless: bool,
}

impl ResponseBody {
    pub const fn new(data: Bytes) -> Self {
        Self {
            data: Some(data),
            bodiless: false,
        }
    }

    /// A body the connection treats as absent
    pub const fn bodiless() -> Self {
        Self {
            data: None,
            bodiless: true,
        }
    }
}

impl Body for ResponseBody {
    type Data = Bytes;
    type Error = Infallible;

    fn poll_frame(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let data = self.get_mut().data.take().filter(|d| !d.is_empty());
        Poll::Ready(data.map(|d| Ok(Frame::data(d))))
    }

    fn is_end_stream(&self) -> bool {
        self.bodiless
    }

    fn size_hint(&self) -> SizeHint {
        SizeHint::with_exact(self.data.as_ref().map_or(0, |d| d.len() as u64))
    }
}
