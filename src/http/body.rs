//! Synthetic response body
//!
//! Streams a deterministic byte sequence in fixed-size chunks. The byte at
//! absolute offset `i` depends only on `i`, so a ranged body is exactly the
//! matching slice of the full body.

use hyper::body::{Body, Bytes, Frame, SizeHint};
use std::convert::Infallible;
use std::pin::Pin;
use std::task::{Context, Poll};

use super::compose::BodySpan;

const CHUNK_SIZE: u64 = 16 * 1024;

/// Pattern period, prime so chunk boundaries never line up with it
const PATTERN_PERIOD: u64 = 251;

/// Byte at absolute offset `offset` of the synthetic content
#[allow(clippy::cast_possible_truncation)]
pub const fn synthetic_byte(offset: u64) -> u8 {
    (offset % PATTERN_PERIOD) as u8
}

/// `len` bytes of synthetic content starting at `offset`
pub fn synthetic_bytes(offset: u64, len: u64) -> Bytes {
    (offset..offset + len).map(synthetic_byte).collect()
}

#[derive(Debug)]
pub struct SyntheticBody {
    offset: u64,
    remaining: u64,
    /// Whether the response declares its length. Without it hyper falls
    /// back to chunked encoding.
    declared: bool,
}

impl SyntheticBody {
    pub const fn new(span: BodySpan, declared: bool) -> Self {
        Self {
            offset: span.offset,
            remaining: span.len,
            declared,
        }
    }

    /// Bytes not yet emitted
    pub const fn remaining(&self) -> u64 {
        self.remaining
    }
}

impl Body for SyntheticBody {
    type Data = Bytes;
    type Error = Infallible;

    fn poll_frame(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.get_mut();
        if this.remaining == 0 {
            return Poll::Ready(None);
        }

        let n = this.remaining.min(CHUNK_SIZE);
        let chunk = synthetic_bytes(this.offset, n);
        this.offset += n;
        this.remaining -= n;

        Poll::Ready(Some(Ok(Frame::data(chunk))))
    }

    // An undeclared body never reports its end up front, otherwise hyper
    // would infer and send `Content-Length: 0`
    fn is_end_stream(&self) -> bool {
        self.declared && self.remaining == 0
    }

    fn size_hint(&self) -> SizeHint {
        if self.declared {
            SizeHint::with_exact(self.remaining)
        } else {
            SizeHint::default()
        }
    }
}
