//! Application state management
//!
//! This module defines the AppState structure that holds:
//! - Server configuration
//! - The transcript service shared by all handlers
//! - The process start time used for uptime reporting

use chrono::{DateTime, Utc};
use std::time::Instant;

use crate::config::ServerConfig;
use crate::transcript::TranscriptService;

/// Application state shared across all handlers
pub struct AppState {
    /// Server configuration
    pub config: ServerConfig,

    /// Caption fetching and conversion
    pub service: TranscriptService,

    /// Monotonic start time
    pub started_at: Instant,

    /// Wall-clock start time
    pub started: DateTime<Utc>,
}

impl AppState {
    /// Create a new AppState backed by yt-dlp
    pub fn new(config: ServerConfig) -> Self {
        let service = TranscriptService::from_config(&config);
        Self::with_service(config, service)
    }

    /// Create an AppState around an existing service
    pub fn with_service(config: ServerConfig, service: TranscriptService) -> Self {
        Self {
            config,
            service,
            started_at: Instant::now(),
            started: Utc::now(),
        }
    }

    /// Seconds since startup
    pub fn uptime_secs(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }
}
