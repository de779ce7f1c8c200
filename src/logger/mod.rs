//! Logger module
//!
//! Provides logging utilities for the synthetic server including:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging
//! - File-based logging support
//!
//! Events go through `tracing`; `init` installs the `tracing-subscriber`
//! sink. Without `init` the helpers are silent, which keeps library users
//! and tests free to bring their own subscriber.

mod format;

pub use format::AccessLogEntry;

use hyper::{Method, Uri, Version};
use std::fs::{File, OpenOptions};
use std::io;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{Config, LoggingConfig};
use crate::error::ServerError;

/// Target for access log lines, filterable on its own
pub const ACCESS_TARGET: &str = "grabtest::access";

/// Initialize the global subscriber from configuration
///
/// Should be called once at application startup.
pub fn init(config: &LoggingConfig) -> Result<(), ServerError> {
    let filter = EnvFilter::try_new(&config.level).map_err(|e| ServerError::Logger(e.to_string()))?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = match config.log_file.as_deref() {
        Some(path) => builder
            .with_ansi(false)
            .with_writer(Mutex::new(open_log_file(path)?))
            .try_init(),
        None => builder.with_writer(io::stderr).try_init(),
    };

    result.map_err(|e| ServerError::Logger(e.to_string()))
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    // Create parent directories if they don't exist
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

pub fn log_server_start(addr: SocketAddr, config: &Config) {
    info!("Synthetic server listening on: http://{addr}");
    info!("Log level: {}", config.logging.level);
    if let Some(workers) = config.server.workers {
        info!("Worker threads: {workers}");
    }
    if let Some(ref path) = config.logging.log_file {
        info!("Log file: {path}");
    }
    let behavior = &config.behavior;
    info!(
        content_length = ?behavior.content_length,
        accept_ranges = ?behavior.accept_ranges,
        methods = ?behavior.methods,
        blocked_headers = ?behavior.blocked_headers,
        "Serving synthetic content"
    );
}

pub fn log_shutdown() {
    info!("Shutdown signal received, stopping server");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    debug!("[Connection] Accepted from: {peer_addr}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    error!("Failed to serve connection: {err:?}");
}

pub fn log_connection_timeout(secs: u64) {
    warn!("Connection timeout after {secs} seconds");
}

pub fn log_request(method: &Method, uri: &Uri, version: Version) {
    debug!("[Request] {method} {uri} {version:?}");
}

pub fn log_method_rejected(method: &Method) {
    warn!("Method not allowed: {method}");
}

pub fn log_range_unsatisfiable(range: &str, content_length: u64) {
    warn!("Range not satisfiable: {range:?} (content length {content_length})");
}

pub fn log_error(message: &str) {
    error!("{message}");
}

pub fn log_warning(message: &str) {
    warn!("{message}");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    info!(target: ACCESS_TARGET, "{}", entry.format(format));
}

/// `1.1`-style label used in access logs
pub const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
