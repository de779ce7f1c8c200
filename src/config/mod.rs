// Configuration module entry point
// Loads server, logging and behavior settings from file and environment

mod types;

use std::net::SocketAddr;

use crate::error::{Result, ServerError};

// Re-export public types
pub use types::{BehaviorSettings, Config, LoggingConfig, PerformanceConfig, ServerConfig};

/// Environment variable prefix, e.g. `GRABTEST_SERVER__PORT=9000`
const ENV_PREFIX: &str = "GRABTEST";

impl Config {
    /// Load configuration from specified file path (extension optional)
    /// A missing file falls back to defaults plus environment overrides
    pub fn load_from(config_path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("behavior.methods")
                    .with_list_parse_key("behavior.blocked_headers")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Parse a TOML document; missing sections take their defaults
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| ServerError::Address(format!("{}:{}: {e}", self.server.host, self.server.port)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::BehaviorConfig;
    use hyper::Method;

    const SAMPLE: &str = r#"
[server]
host = "0.0.0.0"
port = 9090

[logging]
level = "debug"
access_log_format = "json"

[behavior]
methods = ["get", "HEAD"]
blocked_headers = ["Content-Length"]
status_code = 418
content_length = 4096
accept_ranges = false
attachment_filename = "foo.pdf"
last_modified = 123456789
"#;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.access_log);
        assert_eq!(config.performance.read_timeout, 30);
        assert_eq!(config.behavior, BehaviorSettings::default());
        assert!(config.behavior.to_options().unwrap().is_empty());
    }

    #[test]
    fn test_from_toml_str() {
        let config = Config::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.socket_addr().unwrap(), "0.0.0.0:9090".parse().unwrap());
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.access_log_format, "json");
        // Untouched section keeps defaults
        assert_eq!(config.performance.read_timeout, 30);
    }

    #[test]
    fn test_behavior_options() {
        let config = Config::from_toml_str(SAMPLE).unwrap();
        let behavior = BehaviorConfig::new(config.behavior.to_options().unwrap()).unwrap();
        assert!(behavior.allows(&Method::GET));
        assert!(!behavior.allows(&Method::POST));
        assert!(behavior.is_blocked(&hyper::header::CONTENT_LENGTH));
        assert_eq!(behavior.content_length(), 4096);
        assert!(!behavior.accept_ranges());
        assert_eq!(behavior.attachment_filename(), Some("foo.pdf"));
        assert_eq!(behavior.last_modified().map(|t| t.timestamp()), Some(123_456_789));
    }

    #[test]
    fn test_negative_content_length_rejected() {
        let config = Config::from_toml_str("[behavior]\ncontent_length = -1\n").unwrap();
        let options = config.behavior.to_options().unwrap();
        assert!(BehaviorConfig::new(options).is_err());
    }

    #[test]
    fn test_invalid_address() {
        let mut config = Config::default();
        config.server.host = "not a host".to_string();
        assert!(matches!(config.socket_addr(), Err(ServerError::Address(_))));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = Config::load_from("definitely/not/here/grabtest").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
    }
}
