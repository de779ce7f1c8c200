//! Response composition
//!
//! Turns a request head, the behavior config and a range resolution into a
//! `ResponsePlan`. The plan is computed in full before blacklisted headers
//! are stripped, so suppression never changes the body that is sent.

use chrono::{DateTime, Utc};
use hyper::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT_RANGES, ALLOW, CONTENT_DISPOSITION,
    CONTENT_LENGTH, CONTENT_RANGE, LAST_MODIFIED,
};
use hyper::StatusCode;
use std::collections::HashSet;

use super::range::ResolvedRange;
use crate::behavior::{BehaviorConfig, RequestHead};
use crate::logger;

/// RFC 1123 date in GMT, as used by HTTP-date headers
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Bytes of the synthetic body to transmit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BodySpan {
    /// Absolute offset of the first byte within the full body
    pub offset: u64,
    pub len: u64,
}

/// Fully decided response, before serialization
#[derive(Debug, Clone)]
pub struct ResponsePlan {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: BodySpan,
}

impl ResponsePlan {
    fn empty(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: BodySpan::default(),
        }
    }

    /// Header value as a string, if present and ASCII
    pub fn header(&self, name: &HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Remove every header named in `blocked`
    #[must_use]
    pub fn suppress(mut self, blocked: &HashSet<HeaderName>) -> Self {
        for name in blocked {
            self.headers.remove(name);
        }
        self
    }
}

/// Compose a served (200-ish or 206) response
pub fn compose(
    head: &RequestHead,
    config: &BehaviorConfig,
    range: Option<&ResolvedRange>,
) -> ResponsePlan {
    let status = match range {
        Some(_) => StatusCode::PARTIAL_CONTENT,
        None => decide_status(head, config),
    };

    let mut plan = ResponsePlan::empty(status);

    if config.accept_ranges() {
        plan.headers
            .insert(ACCEPT_RANGES, HeaderValue::from_static("bytes"));
    }

    let body = match range {
        Some(r) => {
            insert_header(
                &mut plan.headers,
                CONTENT_RANGE,
                &r.content_range(config.content_length()),
            );
            BodySpan {
                offset: r.start,
                len: r.length(),
            }
        }
        None => BodySpan {
            offset: 0,
            len: config.content_length(),
        },
    };
    // 1xx and 204 carry neither Content-Length nor content
    let bodiless = status.is_informational() || status == StatusCode::NO_CONTENT;
    if !bodiless {
        plan.headers.insert(CONTENT_LENGTH, HeaderValue::from(body.len));
    }

    if let Some(name) = config.attachment_filename() {
        insert_header(
            &mut plan.headers,
            CONTENT_DISPOSITION,
            &format!("attachment;filename=\"{name}\""),
        );
    }

    if let Some(ts) = config.last_modified() {
        insert_header(&mut plan.headers, LAST_MODIFIED, &http_date(ts));
    }

    // HEAD and 304 keep the logical Content-Length but send no bytes
    plan.body = if bodiless || head.is_head() || status == StatusCode::NOT_MODIFIED {
        BodySpan {
            offset: body.offset,
            len: 0,
        }
    } else {
        body
    };

    plan
}

/// 405 for a method outside the whitelist
pub fn method_not_allowed(config: &BehaviorConfig) -> ResponsePlan {
    let mut plan = ResponsePlan::empty(StatusCode::METHOD_NOT_ALLOWED);
    insert_header(&mut plan.headers, ALLOW, &config.allowed_methods().join(", "));
    plan.headers.insert(CONTENT_LENGTH, HeaderValue::from(0u64));
    plan
}

/// 416 for a range starting at or past the end of the body
pub fn range_not_satisfiable(config: &BehaviorConfig) -> ResponsePlan {
    let mut plan = ResponsePlan::empty(StatusCode::RANGE_NOT_SATISFIABLE);
    plan.headers
        .insert(ACCEPT_RANGES, HeaderValue::from_static("bytes"));
    insert_header(
        &mut plan.headers,
        CONTENT_RANGE,
        &format!("bytes */{}", config.content_length()),
    );
    plan.headers.insert(CONTENT_LENGTH, HeaderValue::from(0u64));
    plan
}

/// Format a timestamp as an HTTP-date, e.g. `Thu, 29 Nov 1973 21:33:09 GMT`
pub fn http_date(ts: DateTime<Utc>) -> String {
    ts.format(HTTP_DATE_FORMAT).to_string()
}

fn decide_status(head: &RequestHead, config: &BehaviorConfig) -> StatusCode {
    let code = config.status_for(head);
    StatusCode::from_u16(code).unwrap_or_else(|_| {
        logger::log_error(&format!("Status function returned invalid code {code}, using 500"));
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

fn insert_header(headers: &mut HeaderMap, name: HeaderName, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(v) => {
            headers.insert(name, v);
        }
        Err(e) => logger::log_warning(&format!("Dropping header {name}: {e}")),
    }
}
