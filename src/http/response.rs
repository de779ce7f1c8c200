//! HTTP response building module
//!
//! Serializes a `ResponsePlan` into a hyper response with a synthetic body.

use hyper::header::CONTENT_LENGTH;
use hyper::Response;

use super::body::SyntheticBody;
use super::compose::ResponsePlan;

/// Build the hyper response for a plan
///
/// The body only declares its length when `Content-Length` survived
/// suppression.
pub fn build_response(plan: ResponsePlan) -> Response<SyntheticBody> {
    let declared = plan.headers.contains_key(CONTENT_LENGTH);
    let body = SyntheticBody::new(plan.body, declared);

    let mut response = Response::new(body);
    *response.status_mut() = plan.status;
    *response.headers_mut() = plan.headers;
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::compose::BodySpan;
    use hyper::body::Body;
    use hyper::header::{HeaderMap, HeaderValue};
    use hyper::StatusCode;

    fn plan(len: u64, with_length: bool) -> ResponsePlan {
        let mut headers = HeaderMap::new();
        if with_length {
            headers.insert(CONTENT_LENGTH, HeaderValue::from(len));
        }
        ResponsePlan {
            status: StatusCode::OK,
            headers,
            body: BodySpan { offset: 0, len },
        }
    }

    #[test]
    fn test_declared_length() {
        let response = build_response(plan(321, true));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_LENGTH], "321");
        assert_eq!(response.body().size_hint().exact(), Some(321));
    }

    #[test]
    fn test_suppressed_length_streams() {
        let response = build_response(plan(4096, false));
        assert!(response.headers().get(CONTENT_LENGTH).is_none());
        assert_eq!(response.body().size_hint().exact(), None);
        assert_eq!(response.body().remaining(), 4096);
    }

    #[test]
    fn test_suppressed_length_on_empty_body() {
        let response = build_response(plan(0, false));
        assert!(response.headers().get(CONTENT_LENGTH).is_none());
        assert_eq!(response.body().size_hint().exact(), None);
        assert!(!response.body().is_end_stream());
    }
}
