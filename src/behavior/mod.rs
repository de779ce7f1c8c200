//! Behavior configuration
//!
//! A `BehaviorConfig` is assembled from `BehaviorOption`s once, before the
//! handler is built, and is read-only afterwards. It is shared between
//! connections without locking.

mod options;
mod status;

use chrono::{DateTime, Utc};
use hyper::header::HeaderName;
use hyper::Method;
use std::collections::HashSet;

use crate::error::BehaviorError;

pub use options::{
    accept_ranges, attachment_filename, content_length, fixed_status, header_blacklist,
    last_modified, last_modified_unix, method_whitelist, status_code, BehaviorOption,
};
pub use status::{RequestHead, StatusFn};

/// Body size served when no content length option is given (1 MiB)
pub const DEFAULT_CONTENT_LENGTH: u64 = 1_048_576;

/// Resolved behavior of one handler instance
#[derive(Debug, Clone, PartialEq)]
pub struct BehaviorConfig {
    allowed_methods: HashSet<Method>,
    blocked_headers: HashSet<HeaderName>,
    status_fn: StatusFn,
    content_length: u64,
    accept_ranges: bool,
    attachment_filename: Option<String>,
    last_modified: Option<DateTime<Utc>>,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            allowed_methods: HashSet::new(),
            blocked_headers: HashSet::new(),
            status_fn: StatusFn::default(),
            content_length: DEFAULT_CONTENT_LENGTH,
            accept_ranges: true,
            attachment_filename: None,
            last_modified: None,
        }
    }
}

impl BehaviorConfig {
    /// Apply options in order on top of the defaults
    pub fn new<I>(options: I) -> Result<Self, BehaviorError>
    where
        I: IntoIterator<Item = BehaviorOption>,
    {
        options
            .into_iter()
            .try_fold(Self::default(), |config, option| option.apply(config))
    }

    /// An empty whitelist allows every method
    pub fn allows(&self, method: &Method) -> bool {
        self.allowed_methods.is_empty() || self.allowed_methods.contains(method)
    }

    /// Whitelisted methods in a stable order, for the `Allow` header
    pub fn allowed_methods(&self) -> Vec<&str> {
        let mut methods: Vec<&str> = self.allowed_methods.iter().map(Method::as_str).collect();
        methods.sort_unstable();
        methods
    }

    pub fn is_blocked(&self, name: &HeaderName) -> bool {
        self.blocked_headers.contains(name)
    }

    pub const fn blocked_headers(&self) -> &HashSet<HeaderName> {
        &self.blocked_headers
    }

    pub fn status_for(&self, head: &RequestHead) -> u16 {
        self.status_fn.decide(head)
    }

    pub const fn content_length(&self) -> u64 {
        self.content_length
    }

    pub const fn accept_ranges(&self) -> bool {
        self.accept_ranges
    }

    pub fn attachment_filename(&self) -> Option<&str> {
        self.attachment_filename.as_deref()
    }

    pub const fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.last_modified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BehaviorConfig::default();
        assert!(config.allows(&Method::GET));
        assert!(config.allows(&Method::DELETE));
        assert!(config.blocked_headers().is_empty());
        assert_eq!(config.status_for(&RequestHead::new(Method::GET)), 200);
        assert_eq!(config.content_length(), DEFAULT_CONTENT_LENGTH);
        assert!(config.accept_ranges());
        assert_eq!(config.attachment_filename(), None);
        assert_eq!(config.last_modified(), None);
    }

    #[test]
    fn test_new_applies_options() {
        let config = BehaviorConfig::new([
            content_length(321),
            accept_ranges(false),
            attachment_filename("foo.pdf"),
        ])
        .unwrap();
        assert_eq!(config.content_length(), 321);
        assert!(!config.accept_ranges());
        assert_eq!(config.attachment_filename(), Some("foo.pdf"));
    }

    #[test]
    fn test_new_stops_at_first_error() {
        let err = BehaviorConfig::new([content_length(10), content_length(-1)]).unwrap_err();
        assert_eq!(err, BehaviorError::InvalidContentLength(-1));
    }

    #[test]
    fn test_allowed_methods_sorted() {
        let config = BehaviorConfig::new([method_whitelist(["head", "GET", "Post"])]).unwrap();
        assert_eq!(config.allowed_methods(), vec!["GET", "HEAD", "POST"]);
    }
}
