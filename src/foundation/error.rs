/// Result alias used across the crate.
pub type ComposerResult<T> = Result<T, ComposerError>;

/// Error taxonomy for preview, export and job queries.
#[derive(thiserror::Error, Debug)]
pub enum ComposerError {
    /// Invalid or missing input paths, or numeric fields out of bounds.
    #[error("config error: {0}")]
    Config(String),

    /// A source could not be opened or decoded.
    #[error("media error: {0}")]
    Media(String),

    /// The source carries no audio stream.
    #[error("audio extraction error: {0}")]
    AudioExtraction(String),

    /// The encoding toolchain is missing or a mux step failed.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Unknown job id.
    #[error("job not found: {0}")]
    NotFound(String),

    /// The job exists but has no artifact yet.
    #[error("job not ready: {0}")]
    NotReady(String),

    /// The export was aborted between frames.
    #[error("export cancelled")]
    Cancelled,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ComposerError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn media(msg: impl Into<String>) -> Self {
        Self::Media(msg.into())
    }

    pub fn audio_extraction(msg: impl Into<String>) -> Self {
        Self::AudioExtraction(msg.into())
    }

    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn not_ready(msg: impl Into<String>) -> Self {
        Self::NotReady(msg.into())
    }
}
