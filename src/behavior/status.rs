//! Request head and status code strategy

use hyper::header::{HeaderMap, HeaderName, HeaderValue, RANGE};
use hyper::http::request::Parts;
use hyper::{Method, Request, Uri, Version};
use std::fmt;
use std::sync::Arc;

/// The parts of a request the handler decides on. The body is never read.
#[derive(Debug, Clone)]
pub struct RequestHead {
    pub method: Method,
    pub uri: Uri,
    pub version: Version,
    pub headers: HeaderMap,
}

impl RequestHead {
    /// Bare request for `/` with no headers
    pub fn new(method: Method) -> Self {
        Self {
            method,
            uri: Uri::from_static("/"),
            version: Version::HTTP_11,
            headers: HeaderMap::new(),
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Raw `Range` header value, if present and visible ASCII
    pub fn range(&self) -> Option<&str> {
        self.headers.get(RANGE).and_then(|v| v.to_str().ok())
    }

    pub fn is_head(&self) -> bool {
        self.method == Method::HEAD
    }
}

impl From<&Parts> for RequestHead {
    fn from(parts: &Parts) -> Self {
        Self {
            method: parts.method.clone(),
            uri: parts.uri.clone(),
            version: parts.version,
            headers: parts.headers.clone(),
        }
    }
}

impl<B> From<&Request<B>> for RequestHead {
    fn from(req: &Request<B>) -> Self {
        Self {
            method: req.method().clone(),
            uri: req.uri().clone(),
            version: req.version(),
            headers: req.headers().clone(),
        }
    }
}

type StatusCallback = dyn Fn(&RequestHead) -> u16 + Send + Sync;

/// Decides the status code of a non-ranged response.
///
/// Two strategies compare equal when they are the same fixed code or the
/// same shared callback.
#[derive(Clone)]
pub enum StatusFn {
    Fixed(u16),
    Dynamic(Arc<StatusCallback>),
}

impl StatusFn {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&RequestHead) -> u16 + Send + Sync + 'static,
    {
        Self::Dynamic(Arc::new(f))
    }

    pub fn decide(&self, head: &RequestHead) -> u16 {
        match self {
            Self::Fixed(code) => *code,
            Self::Dynamic(f) => f(head),
        }
    }
}

impl Default for StatusFn {
    fn default() -> Self {
        Self::Fixed(200)
    }
}

impl PartialEq for StatusFn {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Fixed(a), Self::Fixed(b)) => a == b,
            (Self::Dynamic(a), Self::Dynamic(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for StatusFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(code) => f.debug_tuple("Fixed").field(code).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}
