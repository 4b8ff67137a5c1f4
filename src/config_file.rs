//! Configuration file support
//!
//! Loads server configuration from TOML files.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::{BatchConfig, RetryConfig, ServerConfig, SourceConfig};

/// Configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Server settings
    pub server: ServerSettings,
    /// yt-dlp settings
    pub source: Option<SourceSettings>,
    /// Retry settings
    pub retry: Option<RetrySettings>,
    /// Batch settings
    pub batch: Option<BatchSettings>,
    /// Logging settings
    pub logging: Option<LoggingSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Enable CORS
    pub cors_enabled: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSettings {
    /// Path or name of the yt-dlp executable
    pub binary: Option<String>,
    pub socket_timeout_secs: Option<u64>,
    pub retries: Option<u32>,
    pub fragment_retries: Option<u32>,
    pub http_chunk_size: Option<u64>,
    pub skip_formats: Option<Vec<String>>,
    pub command_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Maximum attempts per caption source call
    pub max_attempts: u32,
    /// First backoff delay in milliseconds
    pub base_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSettings {
    /// Items processed at the same time
    pub concurrency: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty)
    pub format: Option<String>,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: ConfigFile = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Generate default configuration file
    pub fn default_config() -> Self {
        let source = SourceConfig::default();
        let retry = RetryConfig::default();
        Self {
            server: ServerSettings {
                host: "0.0.0.0".to_string(),
                port: 8000,
                cors_enabled: Some(true),
            },
            source: Some(SourceSettings {
                binary: Some(source.binary),
                socket_timeout_secs: Some(source.socket_timeout_secs),
                retries: Some(source.retries),
                fragment_retries: Some(source.fragment_retries),
                http_chunk_size: Some(source.http_chunk_size),
                skip_formats: Some(source.skip_formats),
                command_timeout_secs: Some(source.command_timeout_secs),
            }),
            retry: Some(RetrySettings {
                max_attempts: retry.max_attempts,
                base_delay_ms: retry.base_delay_ms,
            }),
            batch: Some(BatchSettings { concurrency: 1 }),
            logging: Some(LoggingSettings {
                level: "info".to_string(),
                format: Some("pretty".to_string()),
            }),
        }
    }

    /// Convert to ServerConfig
    pub fn into_server_config(self) -> ServerConfig {
        let defaults = SourceConfig::default();
        let source = match self.source {
            Some(s) => SourceConfig {
                binary: s.binary.unwrap_or(defaults.binary),
                socket_timeout_secs: s.socket_timeout_secs.unwrap_or(defaults.socket_timeout_secs),
                retries: s.retries.unwrap_or(defaults.retries),
                fragment_retries: s.fragment_retries.unwrap_or(defaults.fragment_retries),
                http_chunk_size: s.http_chunk_size.unwrap_or(defaults.http_chunk_size),
                skip_formats: s.skip_formats.unwrap_or(defaults.skip_formats),
                command_timeout_secs: s
                    .command_timeout_secs
                    .unwrap_or(defaults.command_timeout_secs),
            },
            None => defaults,
        };

        ServerConfig {
            host: self.server.host,
            port: self.server.port,
            source,
            retry: self
                .retry
                .map(|r| RetryConfig {
                    max_attempts: r.max_attempts,
                    base_delay_ms: r.base_delay_ms,
                })
                .unwrap_or_default(),
            batch: self
                .batch
                .map(|b| BatchConfig {
                    concurrency: b.concurrency.max(1),
                })
                .unwrap_or_default(),
            cors_enabled: self.server.cors_enabled.unwrap_or(true),
            log_level: self
                .logging
                .as_ref()
                .map(|l| l.level.clone())
                .unwrap_or_else(|| "info".to_string()),
            log_format: self
                .logging
                .and_then(|l| l.format)
                .unwrap_or_else(|| "pretty".to_string()),
        }
    }
}

/// Generate default configuration file at the specified path
pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<(), Box<dyn std::error::Error>> {
    let config = ConfigFile::default_config();
    config.to_file(path)?;
    Ok(())
}
