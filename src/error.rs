use thiserror::Error;

/// Main error type for transcript requests
#[derive(Error, Debug)]
pub enum TranscriptError {
    /// None of the recognized YouTube URL shapes matched
    #[error("Invalid YouTube URL")]
    InvalidUrl,

    /// The video exposes neither manual nor automatic captions
    #[error("No subtitles available for this video")]
    NoLanguagesOffered,

    /// An error reported by the caption source
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Caption source errors
///
/// Produced by the adapter around the platform client. Only
/// `TransientNetwork` is eligible for retrying.
#[derive(Error, Debug, Clone)]
pub enum SourceError {
    /// The platform reports the video cannot be accessed
    #[error("Video not accessible: {0}")]
    VideoUnavailable(String),

    /// The download finished without producing a caption file
    #[error("No subtitles found for this video")]
    NoCaptionsAvailable,

    /// Connection reset, broken pipe, timeout or a similar transport fault
    #[error("Network error, please try again: {0}")]
    TransientNetwork(String),

    /// Anything else
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl SourceError {
    /// Whether the retry policy may try the operation again
    pub fn is_retryable(&self) -> bool {
        matches!(self, SourceError::TransientNetwork(_))
    }
}

/// Coarse failure category, used to pick the response status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    TransientNetwork,
    Unexpected,
}

impl TranscriptError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TranscriptError::InvalidUrl => ErrorKind::InvalidInput,
            TranscriptError::NoLanguagesOffered => ErrorKind::NotFound,
            TranscriptError::Source(e) => match e {
                SourceError::VideoUnavailable(_) | SourceError::NoCaptionsAvailable => {
                    ErrorKind::NotFound
                }
                SourceError::TransientNetwork(_) => ErrorKind::TransientNetwork,
                SourceError::Unexpected(_) => ErrorKind::Unexpected,
            },
        }
    }
}

/// Startup errors returned from `main`
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, TranscriptError>;
