//! Composable behavior options
//!
//! Each option changes exactly one field of a `BehaviorConfig`. Options on
//! different fields commute; on the same field the last one wins, except
//! `HeaderBlacklist` which accumulates.

use chrono::{DateTime, Utc};
use hyper::header::{HeaderName, HeaderValue};
use hyper::Method;

use super::{BehaviorConfig, RequestHead, StatusFn};
use crate::error::BehaviorError;

#[derive(Debug, Clone, PartialEq)]
pub enum BehaviorOption {
    /// Replace the set of served methods (matched after uppercasing)
    MethodWhitelist(Vec<String>),
    /// Add headers to strip from every response
    HeaderBlacklist(Vec<String>),
    StatusCode(StatusFn),
    /// Logical body size; negative values are rejected
    ContentLength(i64),
    AcceptRanges(bool),
    AttachmentFilename(String),
    LastModified(DateTime<Utc>),
}

impl BehaviorOption {
    pub fn apply(self, mut config: BehaviorConfig) -> Result<BehaviorConfig, BehaviorError> {
        match self {
            Self::MethodWhitelist(methods) => {
                config.allowed_methods = methods
                    .iter()
                    .map(|m| parse_method(m))
                    .collect::<Result<_, _>>()?;
            }
            Self::HeaderBlacklist(names) => {
                for name in &names {
                    config.blocked_headers.insert(parse_header_name(name)?);
                }
            }
            Self::StatusCode(status_fn) => config.status_fn = status_fn,
            Self::ContentLength(n) => {
                config.content_length =
                    u64::try_from(n).map_err(|_| BehaviorError::InvalidContentLength(n))?;
            }
            Self::AcceptRanges(enabled) => config.accept_ranges = enabled,
            Self::AttachmentFilename(name) => {
                config.attachment_filename = Some(parse_filename(name)?);
            }
            Self::LastModified(ts) => config.last_modified = Some(ts),
        }
        Ok(config)
    }
}

fn parse_method(raw: &str) -> Result<Method, BehaviorError> {
    Method::from_bytes(raw.trim().to_ascii_uppercase().as_bytes())
        .map_err(|_| BehaviorError::InvalidMethod(raw.to_string()))
}

// HeaderName normalises to lowercase, which makes blacklist lookups case-insensitive
fn parse_header_name(raw: &str) -> Result<HeaderName, BehaviorError> {
    HeaderName::from_bytes(raw.trim().as_bytes())
        .map_err(|_| BehaviorError::InvalidHeaderName(raw.to_string()))
}

// Quoted into Content-Disposition, so it must be a valid header value without quotes
fn parse_filename(raw: String) -> Result<String, BehaviorError> {
    if raw.contains('"') || HeaderValue::from_str(&raw).is_err() {
        return Err(BehaviorError::InvalidFilename(raw));
    }
    Ok(raw)
}

pub fn method_whitelist<I, S>(methods: I) -> BehaviorOption
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    BehaviorOption::MethodWhitelist(methods.into_iter().map(Into::into).collect())
}

pub fn header_blacklist<I, S>(names: I) -> BehaviorOption
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    BehaviorOption::HeaderBlacklist(names.into_iter().map(Into::into).collect())
}

/// Status code computed from each request
pub fn status_code<F>(f: F) -> BehaviorOption
where
    F: Fn(&RequestHead) -> u16 + Send + Sync + 'static,
{
    BehaviorOption::StatusCode(StatusFn::new(f))
}

/// Same status code for every non-ranged response
pub const fn fixed_status(code: u16) -> BehaviorOption {
    BehaviorOption::StatusCode(StatusFn::Fixed(code))
}

pub const fn content_length(n: i64) -> BehaviorOption {
    BehaviorOption::ContentLength(n)
}

pub const fn accept_ranges(enabled: bool) -> BehaviorOption {
    BehaviorOption::AcceptRanges(enabled)
}

pub fn attachment_filename(name: impl Into<String>) -> BehaviorOption {
    BehaviorOption::AttachmentFilename(name.into())
}

pub const fn last_modified(ts: DateTime<Utc>) -> BehaviorOption {
    BehaviorOption::LastModified(ts)
}

/// `LastModified` from Unix seconds
pub fn last_modified_unix(secs: i64) -> Result<BehaviorOption, BehaviorError> {
    DateTime::from_timestamp(secs, 0)
        .map(BehaviorOption::LastModified)
        .ok_or(BehaviorError::InvalidTimestamp(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(options: Vec<BehaviorOption>) -> BehaviorConfig {
        BehaviorConfig::new(options).unwrap()
    }

    #[test]
    fn test_method_whitelist_uppercases() {
        let config = build(vec![method_whitelist(["get", " head "])]);
        assert!(config.allows(&Method::GET));
        assert!(config.allows(&Method::HEAD));
        assert!(!config.allows(&Method::POST));
    }

    #[test]
    fn test_method_whitelist_get_does_not_imply_head() {
        let config = build(vec![method_whitelist(["GET"])]);
        assert!(config.allows(&Method::GET));
        assert!(!config.allows(&Method::HEAD));
    }

    #[test]
    fn test_method_whitelist_last_wins() {
        let config = build(vec![method_whitelist(["GET"]), method_whitelist(["PUT"])]);
        assert!(!config.allows(&Method::GET));
        assert!(config.allows(&Method::PUT));
    }

    #[test]
    fn test_invalid_method() {
        let err = BehaviorConfig::new([method_whitelist(["GE T"])]).unwrap_err();
        assert_eq!(err, BehaviorError::InvalidMethod("GE T".to_string()));
    }

    #[test]
    fn test_header_blacklist_case_insensitive() {
        let config = build(vec![header_blacklist(["Content-Length", "ACCEPT-RANGES"])]);
        assert!(config.is_blocked(&hyper::header::CONTENT_LENGTH));
        assert!(config.is_blocked(&hyper::header::ACCEPT_RANGES));
        assert!(!config.is_blocked(&hyper::header::LAST_MODIFIED));
    }

    #[test]
    fn test_header_blacklist_accumulates() {
        let config = build(vec![
            header_blacklist(["Content-Length"]),
            header_blacklist(["Last-Modified"]),
        ]);
        assert_eq!(config.blocked_headers().len(), 2);
    }

    #[test]
    fn test_invalid_header_name() {
        let err = BehaviorConfig::new([header_blacklist(["bad header"])]).unwrap_err();
        assert_eq!(err, BehaviorError::InvalidHeaderName("bad header".to_string()));
    }

    #[test]
    fn test_negative_content_length_rejected() {
        assert_eq!(
            BehaviorConfig::new([content_length(-5)]).unwrap_err(),
            BehaviorError::InvalidContentLength(-5)
        );
        assert_eq!(build(vec![content_length(0)]).content_length(), 0);
    }

    #[test]
    fn test_invalid_attachment_filename() {
        for name in ["foo\nbar.pdf", "foo\"bar.pdf", "foo\u{7f}.pdf"] {
            assert_eq!(
                BehaviorConfig::new([attachment_filename(name)]).unwrap_err(),
                BehaviorError::InvalidFilename(name.to_string()),
                "{name:?}"
            );
        }
        let config = build(vec![attachment_filename("my file.pdf")]);
        assert_eq!(config.attachment_filename(), Some("my file.pdf"));
    }

    #[test]
    fn test_last_modified_unix() {
        let config = build(vec![last_modified_unix(123_456_789).unwrap()]);
        assert_eq!(config.last_modified().map(|t| t.timestamp()), Some(123_456_789));
        assert_eq!(
            last_modified_unix(i64::MAX).unwrap_err(),
            BehaviorError::InvalidTimestamp(i64::MAX)
        );
    }

    #[test]
    fn test_options_idempotent() {
        let status = status_code(|_| 418);
        let options = vec![
            method_whitelist(["GET", "HEAD"]),
            header_blacklist(["Content-Length"]),
            status,
            content_length(128),
            accept_ranges(false),
            attachment_filename("foo.pdf"),
            last_modified_unix(123_456_789).unwrap(),
        ];
        for option in options {
            let once = build(vec![option.clone()]);
            let twice = build(vec![option.clone(), option]);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_order_independent_across_fields() {
        let a = build(vec![content_length(64), accept_ranges(false), fixed_status(418)]);
        let b = build(vec![fixed_status(418), accept_ranges(false), content_length(64)]);
        assert_eq!(a, b);
    }
}
