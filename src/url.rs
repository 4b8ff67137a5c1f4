use serde::Serialize;
use std::fmt;

use crate::error::{Result, TranscriptError};

/// A YouTube video id.
///
/// To work with a VideoId:
///
/// // From anything the user pasted.
/// let video_id = VideoId::from_url(url)?;
///
/// // Hand it to the caption source.
/// let tracks = source.list_tracks(&video_id).await?;
///
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    /// Wrap an id that is already known, e.g. from a path segment.
    pub fn new(id: impl Into<String>) -> VideoId {
        VideoId(id.into())
    }

    /// Extract the id from a YouTube URL.
    ///
    /// The first matching shape wins. The id is taken verbatim and ends at
    /// the first `&`, `?`, `#` or newline.
    pub fn from_url(url: &str) -> Result<VideoId> {
        let patterns = [
            // youtube.com/watch?v=<id>, youtu.be/<id>
            regex!(r"(?:youtube\.com/watch\?v=|youtu\.be/)([^&\n?#]+)"),
            // youtube.com/embed/<id>
            regex!(r"youtube\.com/embed/([^&\n?#]+)"),
            // youtube.com/v/<id>
            regex!(r"youtube\.com/v/([^&\n?#]+)"),
        ];

        patterns
            .iter()
            .find_map(|re| re.captures(url))
            .map(|caps| VideoId(caps[1].to_string()))
            .ok_or(TranscriptError::InvalidUrl)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The canonical watch URL handed to the platform client.
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}
