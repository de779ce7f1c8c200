//! grabtest - configurable synthetic HTTP server
//!
//! Serves a deterministic byte sequence of configurable length and lets a
//! test toggle the server behaviors download clients depend on: method
//! whitelisting, header suppression, custom status codes, byte ranges,
//! attachment disposition and `Last-Modified`.
//!
//! ```no_run
//! # async fn demo() -> grabtest::Result<()> {
//! use grabtest::behavior::{content_length, header_blacklist};
//! use grabtest::TestServer;
//!
//! let server = TestServer::start([content_length(4096), header_blacklist(["Content-Length"])])?;
//! println!("serving on {}", server.url());
//! server.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod behavior;
pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use behavior::{BehaviorConfig, BehaviorOption, RequestHead, StatusFn};
pub use error::{BehaviorError, Result, ServerError};
pub use handler::SyntheticHandler;
pub use server::{with_test_server, TestServer};
