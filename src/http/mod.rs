//! HTTP protocol layer module
//!
//! Range resolution, response composition and the synthetic body, kept free
//! of any transport concerns.

pub mod body;
pub mod compose;
pub mod range;
pub mod response;

// Re-export commonly used types
pub use body::SyntheticBody;
pub use compose::{
    compose, http_date, method_not_allowed, range_not_satisfiable, BodySpan, ResponsePlan,
};
pub use range::{resolve_range, RangeResolution, ResolvedRange};
pub use response::build_response;
