//! Server configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// yt-dlp configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Path or name of the yt-dlp executable
    pub binary: String,

    /// Socket timeout passed to yt-dlp in seconds
    pub socket_timeout_secs: u64,

    /// Transport-level retries inside yt-dlp
    pub retries: u32,

    /// Fragment retries inside yt-dlp
    pub fragment_retries: u32,

    /// HTTP chunk size in bytes
    pub http_chunk_size: u64,

    /// Streaming-manifest formats to skip (irrelevant for captions)
    pub skip_formats: Vec<String>,

    /// Upper bound for a single yt-dlp run in seconds
    pub command_timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            binary: "yt-dlp".to_string(),
            socket_timeout_secs: 30,
            retries: 3,
            fragment_retries: 3,
            http_chunk_size: 10 * 1024 * 1024,
            skip_formats: vec!["dash".to_string(), "hls".to_string()],
            command_timeout_secs: 120,
        }
    }
}

impl SourceConfig {
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }
}

/// Retry configuration for caption source calls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one
    pub max_attempts: u32,

    /// Delay before the first retry in milliseconds, doubled after every failure
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
        }
    }
}

impl RetryConfig {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}

/// Batch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Number of batch items processed at the same time (1 = sequential)
    pub concurrency: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { concurrency: 1 }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// yt-dlp configuration
    pub source: SourceConfig,

    /// Retry configuration
    pub retry: RetryConfig,

    /// Batch configuration
    pub batch: BatchConfig,

    /// Enable CORS
    pub cors_enabled: bool,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Log format (pretty, json)
    pub log_format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            source: SourceConfig::default(),
            retry: RetryConfig::default(),
            batch: BatchConfig::default(),
            cors_enabled: true,
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
