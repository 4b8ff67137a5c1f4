//! yt-dlp backed caption source
//!
//! Runs the `yt-dlp` executable as a child process. Listing uses
//! `--dump-single-json`; fetching writes the subtitle file into a private
//! temporary directory which is removed when the call returns.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;

use super::{CaptionPayload, CaptionSource, CaptionTrack};
use crate::config::SourceConfig;
use crate::error::SourceError;
use crate::url::VideoId;

/// Suffix of the caption files we ask yt-dlp to write
const CAPTION_SUFFIX: &str = ".vtt";

/// stderr fragments that indicate a transport fault rather than a problem
/// with the video itself. Matched case-insensitively.
const NETWORK_MARKERS: &[&str] = &[
    "connection reset",
    "broken pipe",
    "timed out",
    "connection refused",
    "connection aborted",
    "network is unreachable",
    "temporary failure in name resolution",
    "name or service not known",
    "remote end closed connection",
    "incompleteread",
];

/// Caption source driving the `yt-dlp` command line client
#[derive(Debug, Clone)]
pub struct YtDlpSource {
    config: SourceConfig,
}

/// The parts of yt-dlp's info JSON we care about.
///
/// Both maps are keyed by language code. serde_json is built with
/// `preserve_order`, so key order is yt-dlp's discovery order.
#[derive(Debug, Deserialize)]
struct VideoInfo {
    #[serde(default)]
    subtitles: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    automatic_captions: Option<serde_json::Map<String, serde_json::Value>>,
}

impl YtDlpSource {
    pub fn new(config: SourceConfig) -> Self {
        Self { config }
    }

    /// Network settings shared by every invocation
    fn common_args(&self) -> Vec<String> {
        let mut args = vec![
            "--quiet".to_string(),
            "--no-warnings".to_string(),
            "--socket-timeout".to_string(),
            self.config.socket_timeout_secs.to_string(),
            "--retries".to_string(),
            self.config.retries.to_string(),
            "--fragment-retries".to_string(),
            self.config.fragment_retries.to_string(),
            "--http-chunk-size".to_string(),
            self.config.http_chunk_size.to_string(),
        ];
        if !self.config.skip_formats.is_empty() {
            args.push("--extractor-args".to_string());
            args.push(format!("youtube:skip={}", self.config.skip_formats.join(",")));
        }
        args
    }

    fn list_args(&self, video_id: &VideoId) -> Vec<String> {
        let mut args = vec![
            "--dump-single-json".to_string(),
            "--skip-download".to_string(),
        ];
        args.extend(self.common_args());
        args.push(video_id.watch_url());
        args
    }

    fn download_args(&self, video_id: &VideoId, language: &str, dir: &Path) -> Vec<String> {
        let mut args = vec![
            "--skip-download".to_string(),
            "--write-subs".to_string(),
            "--write-auto-subs".to_string(),
            "--sub-format".to_string(),
            "vtt".to_string(),
        ];
        if !language.is_empty() {
            args.push("--sub-langs".to_string());
            args.push(language.to_string());
        }
        args.push("-o".to_string());
        args.push(dir.join("%(id)s.%(ext)s").to_string_lossy().to_string());
        args.extend(self.common_args());
        args.push(video_id.watch_url());
        args
    }

    /// Run yt-dlp and return its stdout.
    async fn run(&self, args: &[String]) -> Result<Vec<u8>, SourceError> {
        tracing::debug!("Running {} {}", self.config.binary, args.join(" "));

        let child = Command::new(&self.config.binary)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(self.config.command_timeout(), child).await {
            Ok(result) => result.map_err(|e| classify_io_error(&self.config.binary, e))?,
            Err(_) => {
                return Err(SourceError::TransientNetwork(format!(
                    "{} did not finish within {}s",
                    self.config.binary, self.config.command_timeout_secs
                )));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::debug!(
                "{} exited with {}: {}",
                self.config.binary,
                output.status,
                stderr.trim()
            );
            return Err(classify_failure(&stderr, output.status));
        }

        Ok(output.stdout)
    }
}

#[async_trait]
impl CaptionSource for YtDlpSource {
    async fn list_tracks(&self, video_id: &VideoId) -> Result<Vec<CaptionTrack>, SourceError> {
        tracing::info!("Getting video info for: {}", video_id);
        let stdout = self.run(&self.list_args(video_id)).await?;
        let tracks = parse_listing(&stdout)?;
        tracing::debug!("{} offers {} caption track(s)", video_id, tracks.len());
        Ok(tracks)
    }

    async fn fetch_caption(
        &self,
        video_id: &VideoId,
        language: &str,
    ) -> Result<CaptionPayload, SourceError> {
        tracing::info!("Downloading subtitles for {}, language: {}", video_id, language);

        // Removed on drop, whichever way we leave this function.
        let scratch = tempfile::Builder::new()
            .prefix("captions-")
            .tempdir()
            .map_err(|e| SourceError::Unexpected(format!("failed to create scratch dir: {}", e)))?;

        self.run(&self.download_args(video_id, language, scratch.path()))
            .await?;

        let path = find_caption_file(scratch.path(), video_id)
            .await?
            .ok_or(SourceError::NoCaptionsAvailable)?;

        let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
            SourceError::Unexpected(format!("failed to read {}: {}", path.display(), e))
        })?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let language = language_from_filename(&file_name, video_id, language);

        Ok(CaptionPayload { content, language })
    }
}

/// Extract the offered tracks from yt-dlp's info JSON.
fn parse_listing(json: &[u8]) -> Result<Vec<CaptionTrack>, SourceError> {
    let info: VideoInfo = serde_json::from_slice(json)
        .map_err(|e| SourceError::Unexpected(format!("unreadable video info: {}", e)))?;

    let manual = info
        .subtitles
        .unwrap_or_default()
        .into_iter()
        .map(|(lang, _)| CaptionTrack::manual(lang));
    let automatic = info
        .automatic_captions
        .unwrap_or_default()
        .into_iter()
        .map(|(lang, _)| CaptionTrack::auto_generated(lang));

    Ok(manual.chain(automatic).collect())
}

/// Find the caption file yt-dlp wrote for `video_id`.
///
/// Several files may match when the platform delivers more than one
/// language; the first in filename order wins.
async fn find_caption_file(dir: &Path, video_id: &VideoId) -> Result<Option<PathBuf>, SourceError> {
    let unreadable = |e: std::io::Error| {
        SourceError::Unexpected(format!("failed to list {}: {}", dir.display(), e))
    };

    let mut entries = tokio::fs::read_dir(dir).await.map_err(unreadable)?;
    let mut matches = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(unreadable)? {
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with(video_id.as_str()) && name.ends_with(CAPTION_SUFFIX) {
            matches.push(name);
        }
    }

    matches.sort();
    Ok(matches.into_iter().next().map(|name| dir.join(name)))
}

/// Language code from a `<id>.<lang>.vtt` file name.
///
/// Falls back to the requested language, then to "unknown".
fn language_from_filename(file_name: &str, video_id: &VideoId, requested: &str) -> String {
    let parsed = file_name
        .strip_prefix(video_id.as_str())
        .and_then(|rest| rest.strip_prefix('.'))
        .and_then(|rest| rest.strip_suffix(CAPTION_SUFFIX))
        .filter(|lang| !lang.is_empty() && !lang.contains('.'));

    match parsed {
        Some(lang) => lang.to_string(),
        None if !requested.is_empty() => requested.to_string(),
        None => "unknown".to_string(),
    }
}

/// Map a failed yt-dlp run onto the error taxonomy.
///
/// Only a diagnostic line starting with `ERROR:` counts as a report about the
/// video. Python exceptions (`KeyError: ...`) are a broken client.
fn classify_failure(stderr: &str, status: std::process::ExitStatus) -> SourceError {
    let diagnostic = stderr
        .lines()
        .map(str::trim)
        .filter(|l| l.starts_with("ERROR:"))
        .last();
    let message = diagnostic
        .or_else(|| stderr.lines().map(str::trim).filter(|l| !l.is_empty()).last())
        .map(str::to_string)
        .unwrap_or_else(|| format!("yt-dlp exited with {}", status));

    let lower = stderr.to_lowercase();
    if NETWORK_MARKERS.iter().any(|m| lower.contains(m)) {
        SourceError::TransientNetwork(message)
    } else if diagnostic.is_some() {
        SourceError::VideoUnavailable(message)
    } else {
        SourceError::Unexpected(message)
    }
}

/// Map an I/O error from spawning or talking to the child process.
fn classify_io_error(binary: &str, err: std::io::Error) -> SourceError {
    use std::io::ErrorKind;

    match err.kind() {
        ErrorKind::ConnectionReset
        | ErrorKind::ConnectionAborted
        | ErrorKind::ConnectionRefused
        | ErrorKind::BrokenPipe
        | ErrorKind::TimedOut => SourceError::TransientNetwork(err.to_string()),
        _ => SourceError::Unexpected(format!("failed to run {}: {}", binary, err)),
    }
}
