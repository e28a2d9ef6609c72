//! Configuration module for the CADOP search service.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the semicolon-delimited CADOP export
    pub data_file_path: String,
    /// Search API HTTP port
    pub http_port: u16,
    /// Prometheus metrics HTTP port
    pub metrics_port: u16,
    /// Bind address (supports IPv4, IPv6, or dual-stack)
    pub bind_address: String,
    /// Serve the built-in sample dataset instead of reading a file
    pub sample_dataset: bool,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `DATA_FILE_PATH` - Path to the CSV export (required unless SAMPLE_DATASET=true)
    /// - `HTTP_PORT` - Search API port (default: 5000)
    /// - `METRICS_PORT` - Prometheus metrics port (default: 9090)
    /// - `BIND_ADDRESS` - Bind address (default: auto-detect [::] or 0.0.0.0)
    /// - `SAMPLE_DATASET` - Serve built-in sample data (default: false)
    /// - `RUST_LOG` - Log level (default: info)
    pub fn from_env() -> Result<Self, ConfigError> {
        let sample_dataset = env::var("SAMPLE_DATASET")
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(false);

        let data_file_path = env::var("DATA_FILE_PATH").unwrap_or_else(|_| {
            if sample_dataset {
                String::new()
            } else {
                "data/Relatorio_cadop.csv".to_string()
            }
        });

        if !sample_dataset && data_file_path.is_empty() {
            return Err(ConfigError::MissingRequired("DATA_FILE_PATH"));
        }

        let http_port = env::var("HTTP_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5000);

        let metrics_port = env::var("METRICS_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(9090);

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let bind_address = env::var("BIND_ADDRESS").unwrap_or_else(|_| "auto".to_string());

        Ok(Config {
            data_file_path,
            http_port,
            metrics_port,
            bind_address,
            sample_dataset,
            log_level,
        })
    }

    /// Resolve the configured bind address for `port`.
    ///
    /// `auto` resolves to the dual-stack wildcard; callers fall back to
    /// `0.0.0.0` when binding it fails. Bare IPv6 literals get bracketed.
    pub fn bind_addr(&self, port: u16) -> Result<SocketAddr, ConfigError> {
        let bind_str = if self.bind_address == "auto" {
            format!("[::]:{}", port)
        } else if self.bind_address.contains(':') && !self.bind_address.starts_with('[') {
            format!("[{}]:{}", self.bind_address, port)
        } else {
            format!("{}:{}", self.bind_address, port)
        };

        bind_str
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddress(self.bind_address.clone()))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn config_with_bind(bind_address: &str) -> Config {
        Config {
            data_file_path: String::new(),
            http_port: 5000,
            metrics_port: 9090,
            bind_address: bind_address.to_string(),
            sample_dataset: true,
            log_level: "info".to_string(),
        }
    }

    #[test]
    #[serial]
    fn test_config_defaults_with_sample_dataset() {
        env::set_var("SAMPLE_DATASET", "true");
        env::remove_var("DATA_FILE_PATH");
        env::remove_var("HTTP_PORT");
        env::remove_var("METRICS_PORT");

        let config = Config::from_env().unwrap();
        assert!(config.sample_dataset);
        assert_eq!(config.http_port, 5000);
        assert_eq!(config.metrics_port, 9090);

        env::remove_var("SAMPLE_DATASET");
    }

    #[test]
    #[serial]
    fn test_config_default_data_path() {
        env::remove_var("SAMPLE_DATASET");
        env::remove_var("DATA_FILE_PATH");

        let config = Config::from_env().unwrap();
        assert_eq!(config.data_file_path, "data/Relatorio_cadop.csv");
    }

    #[test]
    fn test_bind_addr_auto_is_dual_stack() {
        let addr = config_with_bind("auto").bind_addr(5000).unwrap();
        assert!(addr.is_ipv6());
        assert_eq!(addr.port(), 5000);
    }

    #[test]
    fn test_bind_addr_ipv4() {
        let addr = config_with_bind("127.0.0.1").bind_addr(8080).unwrap();
        assert!(addr.is_ipv4());
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn test_bind_addr_brackets_ipv6_literal() {
        let addr = config_with_bind("::1").bind_addr(5000).unwrap();
        assert!(addr.is_ipv6());
        assert!(addr.ip().is_loopback());
    }

    #[test]
    fn test_bind_addr_rejects_garbage() {
        let err = config_with_bind("not an address").bind_addr(5000).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBindAddress(_)));
    }
}
