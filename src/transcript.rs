//! Transcript requests
//!
//! Sequences one logical request:
//! URL → video id → track listing → language choice → caption download →
//! rendering. Calls to the caption source go through the retry policy.

use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};

use crate::config::ServerConfig;
use crate::error::{Result, TranscriptError};
use crate::language::{available_languages, language_infos, select_language, LanguageInfo};
use crate::retry::RetryPolicy;
use crate::source::{CaptionPayload, CaptionSource, CaptionTrack, YtDlpSource};
use crate::subtitle::{to_plain_text, OutputFormat};
use crate::url::VideoId;

/// Language requested when the caller does not name one
pub const DEFAULT_LANGUAGE: &str = "en";

/// A plain text transcript
#[derive(Debug, Clone, Serialize)]
pub struct Transcript {
    pub video_id: VideoId,
    /// Language of the delivered captions
    pub language: String,
    pub transcript: String,
    pub available_languages: Vec<String>,
}

/// Captions rendered for download
#[derive(Debug, Clone)]
pub struct Document {
    pub video_id: VideoId,
    pub language: String,
    pub format: OutputFormat,
    pub content: String,
}

impl Document {
    /// `<id>_<lang>.<ext>`
    pub fn filename(&self) -> String {
        format!(
            "{}_{}.{}",
            self.video_id,
            self.language,
            self.format.extension()
        )
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchRequest {
    pub urls: Vec<String>,
    #[serde(default)]
    pub language: Option<String>,
}

/// Outcome of one batch item
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchVideoResult {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_id: Option<VideoId>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_languages: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchResponse {
    pub total_requested: usize,
    pub successful: usize,
    pub failed: usize,
    pub results: Vec<BatchVideoResult>,
}

/// Fetches and converts captions
pub struct TranscriptService {
    source: Arc<dyn CaptionSource>,
    retry: RetryPolicy,
    batch_concurrency: usize,
}

impl TranscriptService {
    pub fn new(
        source: Arc<dyn CaptionSource>,
        retry: RetryPolicy,
        batch_concurrency: usize,
    ) -> Self {
        Self {
            source,
            retry,
            batch_concurrency: batch_concurrency.max(1),
        }
    }

    /// Service backed by yt-dlp
    pub fn from_config(config: &ServerConfig) -> Self {
        let retry = RetryPolicy::from(&config.retry);
        tracing::debug!(
            "Using {} with up to {} attempts per call",
            config.source.binary,
            retry.max_attempts()
        );
        Self::new(
            Arc::new(YtDlpSource::new(config.source.clone())),
            retry,
            config.batch.concurrency,
        )
    }

    /// Plain text transcript for a video URL
    pub async fn transcript(&self, url: &str, language: &str) -> Result<Transcript> {
        let video_id = VideoId::from_url(url)?;
        tracing::info!(
            "Processing transcript request for video_id: {}, requested_lang: {}",
            video_id,
            language
        );

        let offered = self.offered_languages(&video_id).await?;
        let payload = self.fetch(&video_id, language, &offered).await?;
        let transcript = to_plain_text(&payload.content);

        tracing::info!(
            "Successfully extracted transcript for {} ({}), length: {} chars",
            video_id,
            payload.language,
            transcript.len()
        );

        Ok(Transcript {
            video_id,
            language: payload.language,
            transcript,
            available_languages: offered,
        })
    }

    /// Captions for a video URL rendered in `format`
    pub async fn document(
        &self,
        url: &str,
        language: &str,
        format: OutputFormat,
    ) -> Result<Document> {
        let video_id = VideoId::from_url(url)?;
        tracing::info!(
            "Download request for video_id: {}, format: {}, lang: {}",
            video_id,
            format,
            language
        );

        let offered = self.offered_languages(&video_id).await?;
        let payload = self.fetch(&video_id, language, &offered).await?;
        let content = format.render(&payload.content);

        tracing::info!(
            "Download successful for {} ({}) in {} format",
            video_id,
            payload.language,
            format
        );

        Ok(Document {
            video_id,
            language: payload.language,
            format,
            content,
        })
    }

    /// Languages offered by a video, manual tracks first
    pub async fn languages(&self, video_id: &VideoId) -> Result<Vec<LanguageInfo>> {
        let tracks = self.list_tracks(video_id).await?;
        Ok(language_infos(&tracks))
    }

    /// Transcripts for several URLs.
    ///
    /// Items never fail the batch; results keep the order of `urls`.
    pub async fn batch(&self, urls: Vec<String>, language: &str) -> BatchResponse {
        let total_requested = urls.len();
        tracing::info!(
            "Batch processing {} videos, language: {}",
            total_requested,
            language
        );

        let results: Vec<BatchVideoResult> = stream::iter(urls)
            .map(|url| self.batch_item(url, language))
            .buffered(self.batch_concurrency)
            .collect()
            .await;

        let successful = results.iter().filter(|r| r.success).count();
        let failed = results.len() - successful;
        tracing::info!(
            "Batch complete: {} successful, {} failed out of {}",
            successful,
            failed,
            total_requested
        );

        BatchResponse {
            total_requested,
            successful,
            failed,
            results,
        }
    }

    async fn batch_item(&self, url: String, language: &str) -> BatchVideoResult {
        let mut result = BatchVideoResult {
            url,
            ..Default::default()
        };

        let video_id = match VideoId::from_url(&result.url) {
            Ok(id) => id,
            Err(e) => {
                result.error = Some(format!("Invalid YouTube URL: {}", e));
                return result;
            }
        };
        result.video_id = Some(video_id.clone());
        tracing::info!("Processing video {} in batch", video_id);

        let offered = match self.offered_languages(&video_id).await {
            Ok(offered) => offered,
            Err(e) => {
                result.error = Some(format!("Video not found or unavailable: {}", e));
                return result;
            }
        };
        result.available_languages = Some(offered.clone());

        if offered.is_empty() {
            result.error = Some(TranscriptError::NoLanguagesOffered.to_string());
            return result;
        }

        match self.fetch(&video_id, language, &offered).await {
            Ok(payload) => {
                tracing::info!("Batch: Successfully processed {} ({})", video_id, payload.language);
                result.success = true;
                result.transcript = Some(to_plain_text(&payload.content));
                result.language = Some(payload.language);
            }
            Err(e) => {
                tracing::warn!("Batch: Failed to download transcript for {}: {}", video_id, e);
                result.error = Some(format!("Failed to download transcript: {}", e));
            }
        }

        result
    }

    async fn list_tracks(&self, video_id: &VideoId) -> Result<Vec<CaptionTrack>> {
        let source = self.source.as_ref();
        let tracks = self
            .retry
            .run(|| source.list_tracks(video_id))
            .await
            .map_err(|e| {
                tracing::error!("Failed to get video info for {}: {}", video_id, e);
                e
            })?;
        Ok(tracks)
    }

    async fn offered_languages(&self, video_id: &VideoId) -> Result<Vec<String>> {
        let tracks = self.list_tracks(video_id).await?;
        let offered = available_languages(&tracks);
        tracing::info!("Available languages for {}: {:?}", video_id, offered);
        Ok(offered)
    }

    /// Pick a language among `offered` and download it.
    async fn fetch(
        &self,
        video_id: &VideoId,
        requested: &str,
        offered: &[String],
    ) -> Result<CaptionPayload> {
        let selected = select_language(requested, offered)?;
        if selected != requested {
            tracing::info!(
                "Requested language '{}' not available for {}, using: {}",
                requested,
                video_id,
                selected
            );
        }

        let source = self.source.as_ref();
        let selected = selected.as_str();
        let payload = self
            .retry
            .run(|| source.fetch_caption(video_id, selected))
            .await
            .map_err(|e| {
                tracing::error!("Failed to download subtitles for {}: {}", video_id, e);
                e
            })?;
        Ok(payload)
    }
}
