//! Access log format module
//!
//! Supports multiple log formats:
//! - `combined` (Apache/Nginx combined format)
//! - `common` (Common Log Format - CLF)
//! - `json` (JSON structured logging)
//! - Custom patterns with variables

use chrono::Local;
use serde::Serialize;

const CLF_TIME_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

/// Access log entry containing all request/response information
#[derive(Debug, Clone, Serialize)]
pub struct AccessLogEntry {
    /// Client IP address
    pub remote_addr: String,
    /// Request timestamp
    pub time: chrono::DateTime<Local>,
    /// HTTP method (GET, HEAD, etc.)
    pub method: String,
    /// Request URI path
    pub path: String,
    /// Query string (without leading ?)
    pub query: Option<String>,
    /// HTTP version (1.0, 1.1, 2)
    pub http_version: String,
    /// Response status code
    pub status: u16,
    /// Response body size in bytes
    pub body_bytes: u64,
    /// Range header as sent by the client
    pub range: Option<String>,
    /// User-Agent header
    pub user_agent: Option<String>,
    /// Request processing time in microseconds
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Create a new access log entry with current timestamp
    pub fn new(remote_addr: String, method: String, path: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            path,
            query: None,
            http_version: "1.1".to_string(),
            status: 200,
            body_bytes: 0,
            range: None,
            user_agent: None,
            request_time_us: 0,
        }
    }

    /// Format the log entry according to the specified format
    pub fn format(&self, format: &str) -> String {
        match format {
            "combined" => self.format_combined(),
            "common" => self.format_common(),
            "json" => self.format_json(),
            custom => self.format_custom(custom),
        }
    }

    fn request_uri(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{q}", self.path),
            None => self.path.clone(),
        }
    }

    /// Common Log Format (CLF)
    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{} {} HTTP/{}\" {} {}",
            self.remote_addr,
            self.time.format(CLF_TIME_FORMAT),
            self.method,
            self.request_uri(),
            self.http_version,
            self.status,
            self.body_bytes,
        )
    }

    /// Combined format with the Range header in place of the referer
    /// `... $status $body_bytes_sent "$http_range" "$http_user_agent"`
    fn format_combined(&self) -> String {
        format!(
            "{} \"{}\" \"{}\"",
            self.format_common(),
            self.range.as_deref().unwrap_or("-"),
            self.user_agent.as_deref().unwrap_or("-"),
        )
    }

    /// JSON structured log format
    fn format_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| format!(r#"{{"error":"{e}"}}"#))
    }

    /// Custom format with variable substitution
    ///
    /// Supported variables:
    /// - `$remote_addr` - Client IP address
    /// - `$time_local` - Local time in Common Log Format
    /// - `$time_iso8601` - ISO 8601 timestamp
    /// - `$request` - Full request line ("METHOD /path HTTP/version")
    /// - `$request_method` - HTTP method
    /// - `$request_uri` - Request URI with query string
    /// - `$status` - Response status code
    /// - `$body_bytes_sent` - Response body size
    /// - `$http_range` - Range header
    /// - `$http_user_agent` - User-Agent header
    /// - `$request_time` - Request processing time in seconds (3 decimal places)
    fn format_custom(&self, pattern: &str) -> String {
        let request_uri = self.request_uri();
        let request_line = format!("{} {} HTTP/{}", self.method, request_uri, self.http_version);

        #[allow(clippy::cast_precision_loss)]
        let request_time = self.request_time_us as f64 / 1_000_000.0;

        // $request_* must be replaced before $request
        pattern
            .replace("$remote_addr", &self.remote_addr)
            .replace("$time_local", &self.time.format(CLF_TIME_FORMAT).to_string())
            .replace("$time_iso8601", &self.time.to_rfc3339())
            .replace("$request_time", &format!("{request_time:.3}"))
            .replace("$request_method", &self.method)
            .replace("$request_uri", &request_uri)
            .replace("$request", &request_line)
            .replace("$status", &self.status.to_string())
            .replace("$body_bytes_sent", &self.body_bytes.to_string())
            .replace("$http_range", self.range.as_deref().unwrap_or("-"))
            .replace("$http_user_agent", self.user_agent.as_deref().unwrap_or("-"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_entry() -> AccessLogEntry {
        let mut entry = AccessLogEntry::new(
            "192.168.1.1".to_string(),
            "GET".to_string(),
            "/file.bin".to_string(),
        );
        entry.query = Some("v=2".to_string());
        entry.status = 206;
        entry.body_bytes = 64;
        entry.range = Some("bytes=64-".to_string());
        entry.user_agent = Some("grab/3".to_string());
        entry.request_time_us = 1_250_000;
        entry
    }

    #[test]
    fn test_format_combined() {
        let log = create_test_entry().format("combined");
        assert!(log.contains("192.168.1.1"));
        assert!(log.contains("GET /file.bin?v=2 HTTP/1.1"));
        assert!(log.contains("206 64"));
        assert!(log.ends_with("\"bytes=64-\" \"grab/3\""));
    }

    #[test]
    fn test_format_common() {
        let log = create_test_entry().format("common");
        assert!(log.contains("GET /file.bin?v=2 HTTP/1.1"));
        assert!(log.ends_with("206 64"));
        assert!(!log.contains("grab/3"));
    }

    #[test]
    fn test_format_json() {
        let log = create_test_entry().format("json");
        let value: serde_json::Value = serde_json::from_str(&log).unwrap();
        assert_eq!(value["remote_addr"], "192.168.1.1");
        assert_eq!(value["status"], 206);
        assert_eq!(value["body_bytes"], 64);
        assert_eq!(value["range"], "bytes=64-");
    }

    #[test]
    fn test_format_custom() {
        let log = create_test_entry().format("$request_method $request_uri $status $http_range $request_time");
        assert_eq!(log, "GET /file.bin?v=2 206 bytes=64- 1.250");
    }
}
