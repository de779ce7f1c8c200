// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};

use crate::behavior::{self, BehaviorOption};
use crate::error::BehaviorError;

/// Main configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub behavior: BehaviorSettings,
}

/// Server configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            workers: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `grabtest=debug`
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    pub access_log_format: String,
    /// Log file path (optional, stderr if not set)
    pub log_file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            access_log: true,
            access_log_format: "combined".to_string(),
            log_file: None,
        }
    }
}

/// Performance configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    /// Seconds a single connection may stay open
    pub read_timeout: u64,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            keep_alive: true,
            read_timeout: 30,
        }
    }
}

/// `[behavior]` table; unset keys keep the handler defaults
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct BehaviorSettings {
    pub methods: Vec<String>,
    pub blocked_headers: Vec<String>,
    pub status_code: Option<u16>,
    pub content_length: Option<i64>,
    pub accept_ranges: Option<bool>,
    pub attachment_filename: Option<String>,
    /// Unix seconds
    pub last_modified: Option<i64>,
}

impl BehaviorSettings {
    /// Convert to handler options
    pub fn to_options(&self) -> Result<Vec<BehaviorOption>, BehaviorError> {
        let mut options = Vec::new();

        if !self.methods.is_empty() {
            options.push(behavior::method_whitelist(self.methods.iter().cloned()));
        }
        if !self.blocked_headers.is_empty() {
            options.push(behavior::header_blacklist(self.blocked_headers.iter().cloned()));
        }
        if let Some(code) = self.status_code {
            options.push(behavior::fixed_status(code));
        }
        if let Some(n) = self.content_length {
            options.push(behavior::content_length(n));
        }
        if let Some(enabled) = self.accept_ranges {
            options.push(behavior::accept_ranges(enabled));
        }
        if let Some(ref name) = self.attachment_filename {
            options.push(behavior::attachment_filename(name.clone()));
        }
        if let Some(secs) = self.last_modified {
            options.push(behavior::last_modified_unix(secs)?);
        }

        Ok(options)
    }
}
