//! Caption source module
//!
//! Contract over the video platform client:
//! - List the caption tracks a video offers (manual and auto-generated)
//! - Fetch the raw WebVTT payload for one language
//!
//! Failures are reported as a closed `SourceError` so callers can decide
//! on retries and status codes without inspecting messages.

pub mod ytdlp;

use async_trait::async_trait;

use crate::error::SourceError;
use crate::url::VideoId;

pub use ytdlp::YtDlpSource;

/// Whether a track was uploaded by a person or generated by speech recognition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackOrigin {
    Manual,
    AutoGenerated,
}

/// One caption track offered by a video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionTrack {
    /// Language code as reported by the platform (e.g. "en", "pt-BR")
    pub language: String,
    pub origin: TrackOrigin,
}

impl CaptionTrack {
    pub fn manual(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            origin: TrackOrigin::Manual,
        }
    }

    pub fn auto_generated(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            origin: TrackOrigin::AutoGenerated,
        }
    }

    pub fn is_generated(&self) -> bool {
        self.origin == TrackOrigin::AutoGenerated
    }
}

/// A downloaded caption file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionPayload {
    /// Raw WebVTT markup
    pub content: String,
    /// Language of the delivered file, which may differ from the request
    pub language: String,
}

/// Access to caption tracks of a video platform
#[async_trait]
pub trait CaptionSource: Send + Sync {
    /// List the offered tracks, manual ones first, each group in discovery order.
    async fn list_tracks(&self, video_id: &VideoId) -> Result<Vec<CaptionTrack>, SourceError>;

    /// Fetch the caption file for one language.
    async fn fetch_caption(
        &self,
        video_id: &VideoId,
        language: &str,
    ) -> Result<CaptionPayload, SourceError>;
}
