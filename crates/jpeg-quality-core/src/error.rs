use thiserror::Error;

/// Result type alias for quality estimation and compression.
pub type Result<T> = std::result::Result<T, QualityError>;

#[derive(Error, Debug)]
pub enum QualityError {
    /// Represents a media format that cannot be decoded. For example, a text file
    #[error("Media format is not supported")]
    UnsupportedMedia,

    /// Represents a broken image file of a known format. For example, a truncated PNG
    #[error("Image media is invalid")]
    InvalidImageMedia,

    /// Represents a JPEG stream whose marker structure could not be read
    #[error("Invalid JPEG: {reason}")]
    InvalidJpeg { reason: String },

    /// Represents a failure to read from input.
    #[error("Read error: {source}")]
    ReadError { source: std::io::Error },

    /// Represents a failure to write target file.
    #[error("Write error: {source}")]
    WriteError { source: std::io::Error },

    /// Represents a failure when encoding the JPEG output.
    #[error("Image encoding error")]
    ImageEncodingError,

    #[error("No source image set")]
    SourceNotSet,

    /// Represents all other cases of `std::io::Error`.
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

impl QualityError {
    pub(crate) fn invalid_jpeg(reason: impl Into<String>) -> Self {
        QualityError::InvalidJpeg {
            reason: reason.into(),
        }
    }
}
