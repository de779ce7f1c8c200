//! Hyper service glue
//!
//! Wraps `SyntheticHandler` for use with `service_fn`, adding request and
//! access logging.

use hyper::header::{HeaderName, RANGE, USER_AGENT};
use hyper::{Request, Response};
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use super::SyntheticHandler;
use crate::behavior::RequestHead;
use crate::config::Config;
use crate::http::SyntheticBody;
use crate::logger::{self, AccessLogEntry};

const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything a connection task needs, shared read-only across connections
#[derive(Debug, Clone)]
pub struct ServeState {
    pub handler: SyntheticHandler,
    /// Access log format; `None` disables access logging
    pub access_log_format: Option<String>,
    /// Upper bound on a single connection's lifetime
    pub connection_timeout: Duration,
}

impl ServeState {
    pub const fn new(handler: SyntheticHandler) -> Self {
        Self {
            handler,
            access_log_format: None,
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
        }
    }

    pub fn from_config(handler: SyntheticHandler, config: &Config) -> Self {
        Self {
            handler,
            access_log_format: config
                .logging
                .access_log
                .then(|| config.logging.access_log_format.clone()),
            connection_timeout: Duration::from_secs(config.performance.read_timeout),
        }
    }
}

/// Main entry point for HTTP request handling
pub fn handle_request<B>(
    req: &Request<B>,
    state: &ServeState,
    peer_addr: SocketAddr,
) -> Response<SyntheticBody> {
    let started = Instant::now();
    let head = RequestHead::from(req);
    logger::log_request(&head.method, &head.uri, head.version);

    let response = state.handler.respond(&head);

    if let Some(format) = state.access_log_format.as_deref() {
        let entry = access_entry(&head, &response, peer_addr, started);
        logger::log_access(&entry, format);
    }

    response
}

fn access_entry(
    head: &RequestHead,
    response: &Response<SyntheticBody>,
    peer_addr: SocketAddr,
    started: Instant,
) -> AccessLogEntry {
    let header = |name: HeaderName| {
        head.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        head.method.to_string(),
        head.uri.path().to_string(),
    );
    entry.query = head.uri.query().map(ToString::to_string);
    entry.http_version = logger::version_label(head.version).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response.body().remaining();
    entry.range = header(RANGE);
    entry.user_agent = header(USER_AGENT);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::content_length;
    use hyper::StatusCode;

    #[test]
    fn test_handle_request_with_access_log() {
        let handler = SyntheticHandler::from_options([content_length(128)]).unwrap();
        let mut state = ServeState::new(handler);
        state.access_log_format = Some("combined".to_string());

        let req = Request::builder()
            .method("GET")
            .uri("/file.bin?x=1")
            .header(RANGE, "bytes=64-")
            .body(())
            .unwrap();
        let response = handle_request(&req, &state, "127.0.0.1:9000".parse().unwrap());

        assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(response.body().remaining(), 64);
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.logging.access_log = false;
        config.performance.read_timeout = 5;
        let state = ServeState::from_config(SyntheticHandler::default(), &config);
        assert_eq!(state.access_log_format, None);
        assert_eq!(state.connection_timeout, Duration::from_secs(5));
    }
}
