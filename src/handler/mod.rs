//! Request handler module
//!
//! `SyntheticHandler` is the single entry point that turns a request head
//! into a response: method gating, range resolution, composition, then
//! header suppression.

pub mod service;

use hyper::Response;

use crate::behavior::{BehaviorConfig, BehaviorOption, RequestHead};
use crate::error::BehaviorError;
use crate::http::{self, RangeResolution, ResponsePlan, SyntheticBody};
use crate::logger;

// Re-export main entry point
pub use service::{handle_request, ServeState};

#[derive(Debug, Clone, Default)]
pub struct SyntheticHandler {
    config: BehaviorConfig,
}

impl SyntheticHandler {
    pub const fn new(config: BehaviorConfig) -> Self {
        Self { config }
    }

    pub fn from_options<I>(options: I) -> Result<Self, BehaviorError>
    where
        I: IntoIterator<Item = BehaviorOption>,
    {
        BehaviorConfig::new(options).map(Self::new)
    }

    pub const fn config(&self) -> &BehaviorConfig {
        &self.config
    }

    /// Decide status, headers and body span for one request
    pub fn plan(&self, head: &RequestHead) -> ResponsePlan {
        let config = &self.config;

        if !config.allows(&head.method) {
            logger::log_method_rejected(&head.method);
            return http::method_not_allowed(config).suppress(config.blocked_headers());
        }

        let plan = match http::resolve_range(
            head.range(),
            config.content_length(),
            config.accept_ranges(),
        ) {
            RangeResolution::Satisfiable(range) => http::compose(head, config, Some(&range)),
            RangeResolution::Absent => http::compose(head, config, None),
            RangeResolution::Unsatisfiable => {
                logger::log_range_unsatisfiable(
                    head.range().unwrap_or_default(),
                    config.content_length(),
                );
                http::range_not_satisfiable(config)
            }
        };

        plan.suppress(config.blocked_headers())
    }

    /// Plan and serialize the response for one request
    pub fn respond(&self, head: &RequestHead) -> Response<SyntheticBody> {
        http::build_response(self.plan(head))
    }
}
